use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::services::encoder::{EncodedRequest, FormPart, MultipartBody};

const USER_AGENT: &str = concat!("interview-eval/", env!("CARGO_PKG_VERSION"));

/// Successful reply from the evaluation service, not yet normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

/// HTTP client for the evaluation service.
///
/// One call, one request: failures are never retried here because an
/// evaluation is expensive and not idempotent on the server.
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl TransportClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one encoded request and return the parsed JSON body.
    pub async fn send(&self, request: EncodedRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(url = %url, method = %request.method, parts = request.body.parts.len(), "Sending evaluation request");

        let form = build_form(request.body)?;
        let response = self
            .http
            .request(request.method, &url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Evaluation service rejected request");
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| TransportError::InvalidBody(e.to_string()))?;

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn network_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Network(format!(
                "request timed out after {}s",
                self.timeout.as_secs_f64()
            ))
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

fn build_form(body: MultipartBody) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in body.parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                media_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&media_type)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Could not reach evaluation service: {0}")]
    Network(String),

    #[error("Evaluation service returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Evaluation service returned a body that is not JSON: {0}")]
    InvalidBody(String),

    #[error("Could not build evaluation request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// HTTP status for application-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TransportClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_http_error_exposes_status() {
        let err = TransportError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "Evaluation service returned HTTP 502");
        assert_eq!(TransportError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn test_invalid_media_type_rejected_when_building_form() {
        let body = MultipartBody {
            parts: vec![FormPart::File {
                name: "resume".to_string(),
                file_name: "cv.pdf".to_string(),
                media_type: "not a mime".to_string(),
                bytes: vec![1],
            }],
        };
        assert!(matches!(build_form(body), Err(TransportError::InvalidRequest(_))));
    }
}
