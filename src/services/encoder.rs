use reqwest::Method;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::submission::SubmissionInput;

/// Field-naming conventions observed on deployed evaluation services.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NamingScheme {
    /// `resume_file` / `job_description` / `mock_response_text` on `/evaluate_all`.
    Combined,
    /// `resume` / `job_description` / `candidate_response` on `/run-interview-evaluation/`.
    #[default]
    Interview,
}

impl NamingScheme {
    pub fn field_naming(self) -> FieldNaming {
        match self {
            Self::Combined => FieldNaming {
                path: "/evaluate_all".to_string(),
                resume: "resume_file".to_string(),
                job_description: "job_description".to_string(),
                candidate_response: "mock_response_text".to_string(),
            },
            Self::Interview => FieldNaming {
                path: "/run-interview-evaluation/".to_string(),
                resume: "resume".to_string(),
                job_description: "job_description".to_string(),
                candidate_response: "candidate_response".to_string(),
            },
        }
    }
}

/// Destination path and multipart field names for one backend contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNaming {
    pub path: String,
    pub resume: String,
    pub job_description: String,
    pub candidate_response: String,
}

impl FieldNaming {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Ordered multipart parts, kept inspectable until the transport builds the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    pub parts: Vec<FormPart>,
}

impl MultipartBody {
    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub method: Method,
    pub path: String,
    pub body: MultipartBody,
}

/// Packages validated inputs into the multipart request a backend expects.
#[derive(Debug, Clone)]
pub struct RequestEncoder {
    naming: FieldNaming,
}

impl RequestEncoder {
    pub fn new(naming: FieldNaming) -> Self {
        Self { naming }
    }

    pub fn for_scheme(scheme: NamingScheme) -> Self {
        Self::new(scheme.field_naming())
    }

    pub fn naming(&self) -> &FieldNaming {
        &self.naming
    }

    /// Build the request: résumé file part first, then the two text parts.
    ///
    /// Expects input that passed validation; a missing résumé simply
    /// produces no file part.
    pub fn encode(&self, input: &SubmissionInput) -> EncodedRequest {
        let mut parts = Vec::with_capacity(3);

        if let Some(resume) = &input.resume_file {
            parts.push(FormPart::File {
                name: self.naming.resume.clone(),
                file_name: resume.file_name.clone(),
                media_type: resume.media_type.trim().to_string(),
                bytes: resume.bytes.clone(),
            });
        }

        parts.push(FormPart::Text {
            name: self.naming.job_description.clone(),
            value: input.job_description.clone(),
        });
        parts.push(FormPart::Text {
            name: self.naming.candidate_response.clone(),
            value: input.candidate_response.clone(),
        });

        EncodedRequest {
            method: Method::POST,
            path: self.naming.path.clone(),
            body: MultipartBody { parts },
        }
    }
}
