use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Résumé formats the evaluation service accepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum ResumeMediaType {
    #[strum(serialize = "application/pdf")]
    #[serde(rename = "application/pdf")]
    Pdf,

    #[strum(serialize = "application/msword")]
    #[serde(rename = "application/msword")]
    Doc,

    #[strum(serialize = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    #[serde(rename = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    Docx,

    #[strum(serialize = "text/plain")]
    #[serde(rename = "text/plain")]
    PlainText,
}

/// Declared type for résumé files whose extension is not recognized.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

impl ResumeMediaType {
    /// Map a file extension (without the dot, any case) to a media type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// An uploaded résumé: raw bytes plus the name and media type the picker declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a résumé from disk, declaring its media type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ResumeMediaType::from_extension)
            .map(|t| t.to_string())
            .unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string());

        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }

    /// The declared media type, if it is one the service accepts.
    pub fn resume_media_type(&self) -> Option<ResumeMediaType> {
        self.media_type.trim().parse().ok()
    }
}

/// The three candidate inputs collected before a submission.
///
/// Built fresh on every edit and handed to the controller by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub resume_file: Option<ResumeFile>,
    pub job_description: String,
    pub candidate_response: String,
}

impl SubmissionInput {
    pub fn new(
        resume_file: Option<ResumeFile>,
        job_description: impl Into<String>,
        candidate_response: impl Into<String>,
    ) -> Self {
        Self {
            resume_file,
            job_description: job_description.into(),
            candidate_response: candidate_response.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(ResumeMediaType::from_extension("PDF"), Some(ResumeMediaType::Pdf));
        assert_eq!(ResumeMediaType::from_extension("docx"), Some(ResumeMediaType::Docx));
        assert_eq!(ResumeMediaType::from_extension("txt"), Some(ResumeMediaType::PlainText));
        assert_eq!(ResumeMediaType::from_extension("png"), None);
    }

    #[test]
    fn test_media_type_string_forms() {
        assert_eq!(ResumeMediaType::Doc.to_string(), "application/msword");
        assert_eq!(
            "text/plain".parse::<ResumeMediaType>().ok(),
            Some(ResumeMediaType::PlainText)
        );
        assert!("image/png".parse::<ResumeMediaType>().is_err());
    }

    #[tokio::test]
    async fn test_resume_from_path_declares_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let resume = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(resume.file_name, "cv.pdf");
        assert_eq!(resume.media_type, "application/pdf");
        assert_eq!(resume.resume_media_type(), Some(ResumeMediaType::Pdf));
        assert_eq!(resume.bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_resume_from_path_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.odt");
        tokio::fs::write(&path, b"odt").await.unwrap();

        let resume = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(resume.media_type, UNKNOWN_MEDIA_TYPE);
        assert_eq!(resume.resume_media_type(), None);
    }
}
