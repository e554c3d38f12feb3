//! Shared fixtures: a scripted transport and payload builders.
use order_intake::{RawResponse, SubmissionPayload, Transport};
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Transport that replays a script of canned responses and records every
/// request it was asked to send.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    pub order_requests: RefCell<Vec<SubmissionPayload>>,
    pub care_plan_requests: RefCell<Vec<(u64, u64)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<RawResponse>) -> Self {
        ScriptedTransport {
            responses: RefCell::new(responses.into()),
            order_requests: RefCell::new(Vec::new()),
            care_plan_requests: RefCell::new(Vec::new()),
        }
    }

    fn next_response(&self) -> RawResponse {
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("scripted transport exhausted")
    }
}

impl Transport for &ScriptedTransport {
    fn create_order(&self, payload: &SubmissionPayload) -> RawResponse {
        self.order_requests.borrow_mut().push(payload.clone());
        self.next_response()
    }

    fn fetch_care_plan(&self, patient_id: u64, order_id: u64) -> RawResponse {
        self.care_plan_requests
            .borrow_mut()
            .push((patient_id, order_id));
        self.next_response()
    }
}

pub fn sample_payload() -> SubmissionPayload {
    SubmissionPayload {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        mrn: "123456".to_string(),
        provider_name: "Dr. Babbage".to_string(),
        npi: "1234567890".to_string(),
        medication_name: "Metformin".to_string(),
        primary_diagnosis: "E11.9".to_string(),
        secondary_diagnoses: vec!["I10".to_string()],
        prior_medications: vec!["Glipizide".to_string()],
        clinical_notes: Some("A1c trending down".to_string()),
        confirm_patient_mismatch: false,
        confirm_provider_mismatch: false,
        confirm_duplicate_order: false,
    }
}

pub fn success_response(patient_id: u64, order_id: u64) -> RawResponse {
    RawResponse::received(
        201,
        "application/json",
        json!({
            "message": "Order created",
            "patient_id": patient_id,
            "order_id": order_id
        })
        .to_string(),
    )
}

pub fn confirmation_response(body: serde_json::Value) -> RawResponse {
    RawResponse::received(422, "application/json", body.to_string())
}
