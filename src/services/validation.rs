use strum::{AsRefStr, Display};

use crate::models::submission::SubmissionInput;

/// Required inputs, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum InputField {
    ResumeFile,
    JobDescription,
    CandidateResponse,
}

/// Check that a submission is complete before anything is sent.
///
/// Reports the first missing field in the order résumé, job description,
/// candidate response. Text fields count as missing when blank after
/// trimming. Once all three are present, the résumé's declared media type
/// must be PDF, DOC, DOCX or plain text.
pub fn validate(input: &SubmissionInput) -> Result<(), ValidationError> {
    let Some(resume) = input.resume_file.as_ref() else {
        return Err(ValidationError::MissingField(InputField::ResumeFile));
    };

    if input.job_description.trim().is_empty() {
        return Err(ValidationError::MissingField(InputField::JobDescription));
    }

    if input.candidate_response.trim().is_empty() {
        return Err(ValidationError::MissingField(InputField::CandidateResponse));
    }

    if resume.resume_media_type().is_none() {
        return Err(ValidationError::UnsupportedMediaType(resume.media_type.clone()));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(InputField),

    #[error("Unsupported resume media type: {0}")]
    UnsupportedMediaType(String),
}
