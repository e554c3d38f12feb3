//! Order request payload and its wire serialization.
//!
//! The form layer owns field-level validation; this module only fixes the
//! wire shape. Optional collections are omitted entirely when empty rather
//! than sent as `[]`, while the override flags are always sent explicitly.
use serde::Serialize;

/// One medical-order request as posted to the intake service.
///
/// A fresh submission always carries all three override flags false; the
/// orchestrator sets them only on the single resubmission permitted by a
/// confirmation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub first_name: String,
    pub last_name: String,
    /// 6-digit medical-record number.
    pub mrn: String,
    pub provider_name: String,
    /// 10-digit national provider identifier.
    pub npi: String,
    pub medication_name: String,
    pub primary_diagnosis: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_diagnoses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prior_medications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
    pub confirm_patient_mismatch: bool,
    pub confirm_provider_mismatch: bool,
    pub confirm_duplicate_order: bool,
}

impl SubmissionPayload {
    /// True when any override flag is set.
    pub fn has_overrides(&self) -> bool {
        self.confirm_patient_mismatch
            || self.confirm_provider_mismatch
            || self.confirm_duplicate_order
    }

    /// Clear all override flags, returning the payload to its fresh shape.
    pub(crate) fn clear_overrides(&mut self) {
        self.confirm_patient_mismatch = false;
        self.confirm_provider_mismatch = false;
        self.confirm_duplicate_order = false;
    }
}
