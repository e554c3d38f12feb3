//! Classified submission outcomes and the confirmation issue shapes.
use serde::{Deserialize, Serialize};

/// Result of classifying one intake-service response.
///
/// `ConfirmationRequired` is a control-flow branch rather than a true error:
/// the orchestrator recovers it into the interactive confirmation flow and
/// surfaces every other variant to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success {
        patient_id: u64,
        order_id: u64,
        message: String,
    },
    ConfirmationRequired {
        issues: ConfirmationIssues,
    },
    ValidationFailed {
        field_errors: Vec<FieldError>,
    },
    /// No usable response: connection failure, endpoint not found, or a body
    /// the client could not read.
    TransportFailed {
        cause: String,
    },
    /// 4xx other than validation/confirmation.
    RequestRejected {
        message: String,
    },
    /// 5xx.
    ServerFailed {
        message: String,
    },
}

impl SubmissionOutcome {
    /// Caller-facing message for the outcome, aggregated where needed.
    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Success { message, .. } => message.clone(),
            SubmissionOutcome::ConfirmationRequired { .. } => {
                "submission requires confirmation".to_string()
            }
            SubmissionOutcome::ValidationFailed { field_errors } => {
                aggregate_field_errors(field_errors)
            }
            SubmissionOutcome::TransportFailed { cause } => cause.clone(),
            SubmissionOutcome::RequestRejected { message }
            | SubmissionOutcome::ServerFailed { message } => message.clone(),
        }
    }
}

/// One flattened field-validation failure: `field` is the location path with
/// its leading segment dropped and the remainder joined with `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn aggregate_field_errors(field_errors: &[FieldError]) -> String {
    let parts: Vec<String> = field_errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect();
    parts.join("; ")
}

/// Soft conflicts reported by the service, each mapping to exactly one
/// override flag. The classifier never produces an instance with all three
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationIssues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientMismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderMismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<DuplicateOrder>,
}

impl ConfirmationIssues {
    pub fn is_empty(&self) -> bool {
        self.patient.is_none() && self.provider.is_none() && self.order.is_none()
    }
}

/// The submitted MRN already belongs to a patient with a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMismatch {
    pub existing_name: String,
    pub submitted_name: String,
    pub mrn: String,
}

/// The submitted NPI already belongs to a provider with a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMismatch {
    pub existing_name: String,
    pub submitted_name: String,
    pub npi: String,
}

/// An order for the same patient and medication already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateOrder {
    pub medication_name: String,
    pub existing_order_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_message_joins_entries_in_order() {
        let outcome = SubmissionOutcome::ValidationFailed {
            field_errors: vec![
                FieldError {
                    field: "mrn".to_string(),
                    message: "Field required".to_string(),
                },
                FieldError {
                    field: "npi".to_string(),
                    message: "String should have at least 10 characters".to_string(),
                },
            ],
        };
        assert_eq!(
            outcome.message(),
            "mrn: Field required; npi: String should have at least 10 characters"
        );
    }

    #[test]
    fn issues_emptiness_tracks_all_three_slots() {
        let mut issues = ConfirmationIssues {
            patient: None,
            provider: None,
            order: None,
        };
        assert!(issues.is_empty());
        issues.order = Some(DuplicateOrder {
            medication_name: "Metformin".to_string(),
            existing_order_id: 7,
        });
        assert!(!issues.is_empty());
    }
}
