//! Intake-submission client for a medical-order workflow.
//!
//! The crate sends an order payload to the intake service, classifies the
//! response into a closed outcome taxonomy, and drives the interactive
//! confirmation flow when the service reports soft conflicts (patient or
//! provider name mismatch, duplicate order). An unconditional success owes a
//! follow-up care-plan fetch, handled as an independent best-effort step.
//!
//! The two moving parts, in dependency order:
//! - [`classify::classify`] - a pure decision table over raw responses.
//! - [`orchestrator::Orchestrator`] - the state machine that owns the
//!   cycle, retains the confirmation context, and derives override flags.

pub mod artifact;
pub mod classify;
pub mod config;
pub mod hint;
pub mod orchestrator;
pub mod outcome;
pub mod payload;
pub mod transport;

pub use artifact::ArtifactOutcome;
pub use classify::classify;
pub use config::Config;
pub use hint::{hint_for_message, hint_for_outcome, PresentationHint};
pub use orchestrator::{CycleOutcome, Orchestrator, OrchestratorState, StateError};
pub use outcome::{
    ConfirmationIssues, DuplicateOrder, FieldError, PatientMismatch, ProviderMismatch,
    SubmissionOutcome,
};
pub use payload::SubmissionPayload;
pub use transport::{HttpTransport, RawResponse, Transport};
