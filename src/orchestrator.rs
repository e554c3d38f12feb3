//! The submission state machine.
//!
//! One orchestrator instance drives one submit-or-confirm-resubmit cycle at
//! a time: it sends the payload, runs the classifier, holds the confirmation
//! context while a human decides, derives the override flags on confirm, and
//! triggers the independent care-plan fetch after an unconditional success.
//! State is an explicit value with identifiers carried as transition data;
//! the caller observes it through [`Orchestrator::state`] and never mutates
//! it directly.
use crate::artifact::{persist_artifact, ArtifactOutcome};
use crate::classify::classify;
use crate::hint::{hint_for_outcome, PresentationHint};
use crate::outcome::{ConfirmationIssues, SubmissionOutcome};
use crate::payload::SubmissionPayload;
use crate::transport::Transport;
use std::fmt;
use std::mem;
use std::path::Path;

/// Where one orchestrator currently is in its cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorState {
    Idle,
    /// A request is on the wire. Observable only if a submission call was
    /// abandoned mid-flight; a fresh call in this state is refused rather
    /// than risking a silent double submit.
    Submitting,
    /// The service reported soft conflicts; the original payload is retained
    /// untouched so the human can confirm or cancel without re-entering data.
    AwaitingConfirmation {
        payload: SubmissionPayload,
        issues: ConfirmationIssues,
    },
    /// The order was created; the care-plan fetch is still owed.
    GeneratingArtifact { patient_id: u64, order_id: u64 },
    /// Resting record of a finished cycle. Submit-ready, like `Idle`;
    /// `reset` clears it back to `Idle` explicitly.
    Terminal(CycleOutcome),
}

/// The recorded end of one submission cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The order stands regardless of how the artifact fetch went.
    Succeeded {
        patient_id: u64,
        order_id: u64,
        artifact: ArtifactOutcome,
    },
    Failed {
        outcome: SubmissionOutcome,
        hint: PresentationHint,
    },
}

/// A call that the current state does not permit. The submission itself is
/// never an `Err`: classified failures come back as [`SubmissionOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// `submit` while a cycle is already in progress.
    CycleInProgress,
    /// `confirm` or `cancel` without a pending confirmation.
    NoPendingConfirmation,
    /// `run_artifact_step` without a freshly created order.
    NoPendingArtifact,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StateError::CycleInProgress => "a submission cycle is already in progress",
            StateError::NoPendingConfirmation => "no confirmation is pending",
            StateError::NoPendingArtifact => "no care-plan fetch is pending",
        };
        f.write_str(text)
    }
}

impl std::error::Error for StateError {}

pub struct Orchestrator<T: Transport> {
    transport: T,
    state: OrchestratorState,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(transport: T) -> Self {
        Orchestrator {
            transport,
            state: OrchestratorState::Idle,
        }
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Start a fresh submission cycle. All override flags are forced false;
    /// they are only meaningful on the resubmission after a confirmation.
    pub fn submit(
        &mut self,
        mut payload: SubmissionPayload,
    ) -> Result<SubmissionOutcome, StateError> {
        match self.state {
            OrchestratorState::Idle | OrchestratorState::Terminal(_) => {}
            _ => return Err(StateError::CycleInProgress),
        }
        payload.clear_overrides();
        Ok(self.dispatch(payload))
    }

    /// Resubmit the retained payload with override flags derived from which
    /// sub-issues the service reported. The non-flag fields are exactly what
    /// the caller submitted originally.
    pub fn confirm(&mut self) -> Result<SubmissionOutcome, StateError> {
        match mem::replace(&mut self.state, OrchestratorState::Submitting) {
            OrchestratorState::AwaitingConfirmation { mut payload, issues } => {
                payload.confirm_patient_mismatch = issues.patient.is_some();
                payload.confirm_provider_mismatch = issues.provider.is_some();
                payload.confirm_duplicate_order = issues.order.is_some();
                Ok(self.dispatch(payload))
            }
            other => {
                self.state = other;
                Err(StateError::NoPendingConfirmation)
            }
        }
    }

    /// Abandon a pending confirmation without sending anything. The retained
    /// payload is handed back, flags still false, so the form layer can
    /// restore the entered data.
    pub fn cancel(&mut self) -> Result<SubmissionPayload, StateError> {
        match mem::replace(&mut self.state, OrchestratorState::Idle) {
            OrchestratorState::AwaitingConfirmation { payload, .. } => Ok(payload),
            other => {
                self.state = other;
                Err(StateError::NoPendingConfirmation)
            }
        }
    }

    /// Fetch and persist the care plan owed after a successful order. The
    /// fetch is best-effort: its failure is reported in the returned
    /// [`ArtifactOutcome`] but the cycle still lands on `Succeeded`.
    pub fn run_artifact_step(&mut self, out_dir: &Path) -> Result<ArtifactOutcome, StateError> {
        let OrchestratorState::GeneratingArtifact {
            patient_id,
            order_id,
        } = self.state
        else {
            return Err(StateError::NoPendingArtifact);
        };
        let raw = self.transport.fetch_care_plan(patient_id, order_id);
        let artifact = persist_artifact(out_dir, patient_id, order_id, &raw);
        if let ArtifactOutcome::Failed { message } = &artifact {
            tracing::info!(error = %message, "care plan fetch failed; order outcome unchanged");
        }
        self.state = OrchestratorState::Terminal(CycleOutcome::Succeeded {
            patient_id,
            order_id,
            artifact: artifact.clone(),
        });
        Ok(artifact)
    }

    /// Clear a finished cycle back to `Idle`, discarding the record.
    pub fn reset(&mut self) {
        if matches!(self.state, OrchestratorState::Terminal(_)) {
            self.state = OrchestratorState::Idle;
        }
    }

    fn dispatch(&mut self, payload: SubmissionPayload) -> SubmissionOutcome {
        self.state = OrchestratorState::Submitting;
        tracing::info!(
            mrn = %payload.mrn,
            overrides = payload.has_overrides(),
            "submitting order"
        );
        let raw = self.transport.create_order(&payload);
        let outcome = classify(&raw);
        self.state = match &outcome {
            SubmissionOutcome::Success {
                patient_id,
                order_id,
                ..
            } => {
                tracing::info!(patient_id, order_id, "order created");
                OrchestratorState::GeneratingArtifact {
                    patient_id: *patient_id,
                    order_id: *order_id,
                }
            }
            SubmissionOutcome::ConfirmationRequired { issues } => {
                let mut retained = payload;
                // The stored payload stays in its fresh shape; flags are
                // derived from the issues only at confirm time.
                retained.clear_overrides();
                OrchestratorState::AwaitingConfirmation {
                    payload: retained,
                    issues: issues.clone(),
                }
            }
            failure => OrchestratorState::Terminal(CycleOutcome::Failed {
                outcome: failure.clone(),
                hint: hint_for_outcome(failure),
            }),
        };
        outcome
    }
}
