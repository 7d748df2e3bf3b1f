use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::report::EvaluationReport;
use crate::models::state::{SubmissionId, SubmissionState};
use crate::models::submission::SubmissionInput;
use crate::services::encoder::{EncodedRequest, RequestEncoder};
use crate::services::normalizer::{self, NormalizationError};
use crate::services::transport::{TransportClient, TransportError};
use crate::services::validation::{self, ValidationError};

/// Register descriptions for the controller's metrics.
pub fn describe_metrics() {
    metrics::describe_counter!(
        "evaluation_submissions_total",
        "Submissions accepted by the controller"
    );
    metrics::describe_counter!(
        "evaluation_submissions_succeeded",
        "Submissions that produced a report"
    );
    metrics::describe_counter!(
        "evaluation_submissions_failed",
        "Submissions that ended in an error"
    );
    metrics::describe_counter!(
        "evaluation_submissions_rejected",
        "Submit calls rejected because a submission was in flight"
    );
    metrics::describe_histogram!(
        "evaluation_request_seconds",
        "Time from dispatch to normalized response"
    );
}

/// Drives one submission at a time through validate, encode, send, normalize.
///
/// The controller is the only writer of its state. Readers either take a
/// snapshot with [`state`](Self::state) or follow changes through
/// [`subscribe`](Self::subscribe). Dropping the controller aborts any
/// request still in flight.
pub struct SubmissionController {
    inner: Arc<Inner>,
}

struct Inner {
    encoder: RequestEncoder,
    transport: TransportClient,
    state: watch::Sender<SubmissionState>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl SubmissionController {
    pub fn new(encoder: RequestEncoder, transport: TransportClient) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            inner: Arc::new(Inner {
                encoder,
                transport,
                state,
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        let encoder = RequestEncoder::new(config.field_naming());
        let transport = TransportClient::from_config(config)?;
        Ok(Self::new(encoder, transport))
    }

    /// Current status with its report or error.
    pub fn state(&self) -> SubmissionState {
        self.inner.state.borrow().clone()
    }

    /// True while validating or submitting; callers disable resubmission.
    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().is_busy()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.inner.state.subscribe()
    }

    /// Start a submission. The outcome is published through the state.
    ///
    /// Must be called from within a Tokio runtime. Rejected, not queued,
    /// while another submission is validating or submitting.
    pub fn submit(&self, input: SubmissionInput) -> Result<SubmissionId, SubmitRejected> {
        let id = Uuid::new_v4();
        let mut in_flight = None;

        self.inner.state.send_if_modified(|state| {
            if state.is_busy() {
                in_flight = state.submission_id();
                return false;
            }
            *state = SubmissionState::Validating { id };
            true
        });

        if let Some(in_flight) = in_flight {
            metrics::counter!("evaluation_submissions_rejected").increment(1);
            tracing::warn!(in_flight = %in_flight, "Rejected submit while a submission is in flight");
            return Err(SubmitRejected { in_flight });
        }

        metrics::counter!("evaluation_submissions_total").increment(1);
        tracing::info!(submission_id = %id, "Validating submission");

        if let Err(e) = validation::validate(&input) {
            self.inner.finish(id, Err(e.into()), None);
            return Ok(id);
        }

        let request = self.inner.encoder.encode(&input);
        drop(input);

        if !self.inner.advance(id, SubmissionState::Submitting { id }) {
            return Ok(id);
        }
        tracing::info!(
            submission_id = %id,
            path = %request.path,
            base_url = %self.inner.transport.base_url(),
            "Submitting to evaluation service"
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.dispatch(id, request).await });
        if !self.inner.track(id, handle) {
            tracing::debug!(submission_id = %id, "Submission abandoned before dispatch");
        }

        Ok(id)
    }

    /// Abandon any in-flight submission and return to `Idle`.
    pub fn reset(&self) {
        let mut slot = self.inner.in_flight();
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        let previous = self.inner.state.send_replace(SubmissionState::Idle);
        drop(slot);

        if previous.is_busy() {
            tracing::info!(
                submission_id = ?previous.submission_id(),
                "Abandoned in-flight submission"
            );
        } else {
            tracing::debug!(status = %previous.status(), "Controller reset");
        }
    }

    /// Wait until no submission is in flight and return that state.
    pub async fn wait_until_settled(&self) -> SubmissionState {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(|state| !state.is_busy()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.in_flight().take() {
            handle.abort();
        }
    }
}

impl Inner {
    async fn dispatch(&self, id: SubmissionId, request: EncodedRequest) {
        let start = Instant::now();

        let outcome = match self.transport.send(request).await {
            Ok(raw) => {
                tracing::debug!(submission_id = %id, status = raw.status, "Evaluation response received");
                normalizer::normalize(&raw.body).map_err(SubmissionError::from)
            }
            Err(e) => Err(e.into()),
        };

        let elapsed = start.elapsed();
        metrics::histogram!("evaluation_request_seconds").record(elapsed.as_secs_f64());
        self.finish(id, outcome, Some(elapsed.as_millis()));
    }

    /// Move a busy submission to `next`, only if it is still the tracked one.
    fn advance(&self, id: SubmissionId, next: SubmissionState) -> bool {
        self.state.send_if_modified(|state| {
            if state.submission_id() != Some(id) || !state.is_busy() {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Record the terminal state of submission `id`; stale outcomes are dropped.
    fn finish(
        &self,
        id: SubmissionId,
        outcome: Result<EvaluationReport, SubmissionError>,
        elapsed_ms: Option<u128>,
    ) {
        let completed_at = Utc::now();
        let next = match outcome {
            Ok(report) => SubmissionState::Success {
                id,
                report: Arc::new(report),
                completed_at,
            },
            Err(error) => SubmissionState::Failed {
                id,
                error,
                completed_at,
            },
        };

        if !self.advance(id, next.clone()) {
            tracing::debug!(submission_id = %id, "Discarding outcome of abandoned submission");
            return;
        }

        match &next {
            SubmissionState::Success { report, .. } => {
                metrics::counter!("evaluation_submissions_succeeded").increment(1);
                tracing::info!(
                    submission_id = %id,
                    elapsed_ms = ?elapsed_ms,
                    outcome_score = report.outcome.score,
                    behavioral_questions = report.behavioral_questions.len(),
                    "Submission completed"
                );
            }
            SubmissionState::Failed { error, .. } => {
                metrics::counter!("evaluation_submissions_failed").increment(1);
                tracing::warn!(
                    submission_id = %id,
                    elapsed_ms = ?elapsed_ms,
                    error = %error,
                    "Submission failed"
                );
            }
            _ => {}
        }
    }

    /// Keep `handle` as the task of submission `id`, or abort it when `id`
    /// was abandoned before the handle could be stored.
    ///
    /// Runs under the slot lock, as does `reset`, so the two cannot interleave.
    fn track(&self, id: SubmissionId, handle: JoinHandle<()>) -> bool {
        let mut slot = self.in_flight();
        if self.state.borrow().submission_id() != Some(id) {
            handle.abort();
            return false;
        }
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
        true
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Why a submission ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

/// Returned by [`SubmissionController::submit`] while another submission is in flight.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Submission {in_flight} is still in progress")]
pub struct SubmitRejected {
    pub in_flight: SubmissionId,
}
