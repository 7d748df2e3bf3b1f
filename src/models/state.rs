use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::models::report::EvaluationReport;
use crate::services::controller::SubmissionError;

/// Identifier minted for every accepted submission.
pub type SubmissionId = Uuid;

/// Lifecycle stage of the controller's current submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

impl SubmissionStatus {
    /// A submission is in flight; new submits are rejected.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Snapshot published by the controller: status plus report or error.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating {
        id: SubmissionId,
    },
    Submitting {
        id: SubmissionId,
    },
    Success {
        id: SubmissionId,
        report: Arc<EvaluationReport>,
        completed_at: DateTime<Utc>,
    },
    Failed {
        id: SubmissionId,
        error: SubmissionError,
        completed_at: DateTime<Utc>,
    },
}

impl SubmissionState {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            Self::Idle => SubmissionStatus::Idle,
            Self::Validating { .. } => SubmissionStatus::Validating,
            Self::Submitting { .. } => SubmissionStatus::Submitting,
            Self::Success { .. } => SubmissionStatus::Success,
            Self::Failed { .. } => SubmissionStatus::Failed,
        }
    }

    pub fn submission_id(&self) -> Option<SubmissionId> {
        match self {
            Self::Idle => None,
            Self::Validating { id }
            | Self::Submitting { id }
            | Self::Success { id, .. }
            | Self::Failed { id, .. } => Some(*id),
        }
    }

    pub fn report(&self) -> Option<&EvaluationReport> {
        match self {
            Self::Success { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.status().is_busy()
    }
}
