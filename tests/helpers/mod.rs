//! Shared setup for tests against a mocked evaluation service

#![allow(dead_code)]

use std::net::TcpListener;
use std::time::Duration;

use interview_eval::{
    models::submission::{ResumeFile, SubmissionInput},
    services::{
        controller::SubmissionController,
        encoder::{NamingScheme, RequestEncoder},
        transport::TransportClient,
    },
};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::{CANDIDATE_RESPONSE, JOB_DESCRIPTION, RESUME_BYTES};

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server that answers POSTs to `endpoint` with `response`.
pub async fn mock_service(endpoint: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

pub fn json_reply(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn transport(base_url: &str) -> TransportClient {
    TransportClient::new(base_url, TEST_TIMEOUT).expect("failed to build transport")
}

pub fn controller(server: &MockServer, scheme: NamingScheme) -> SubmissionController {
    SubmissionController::new(RequestEncoder::for_scheme(scheme), transport(&server.uri()))
}

/// Base URL of a local port nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn sample_input() -> SubmissionInput {
    SubmissionInput::new(
        Some(ResumeFile::new(
            "resume.pdf",
            "application/pdf",
            RESUME_BYTES.to_vec(),
        )),
        JOB_DESCRIPTION,
        CANDIDATE_RESPONSE,
    )
}

/// Raw multipart bodies of every request the server has seen.
pub async fn received_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect()
}
