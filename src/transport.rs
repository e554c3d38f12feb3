//! Wire boundary for the intake service.
//!
//! The orchestrator talks to the service through the [`Transport`] trait so
//! tests can script responses; [`HttpTransport`] is the ureq-backed
//! implementation of the two wire operations. Whatever happens on the wire
//! is folded into a [`RawResponse`] for the classifier - transport never
//! interprets bodies.
use crate::config::Config;
use crate::payload::SubmissionPayload;
use ureq::Agent;

/// What came back from one wire operation, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResponse {
    /// No response was delivered: connection refused, DNS failure, timeout.
    TransportError { message: String },
    /// A response arrived; the body has already been drained so the
    /// connection is released regardless of how classification goes.
    Received {
        status: u16,
        reason: Option<String>,
        content_type: Option<String>,
        body: Vec<u8>,
    },
}

impl RawResponse {
    /// Shorthand used by tests and the ureq plumbing below.
    pub fn received(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        RawResponse::Received {
            status,
            reason: reason_phrase(status).map(str::to_string),
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }
}

fn reason_phrase(status: u16) -> Option<&'static str> {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
}

/// The two intake-service operations, at the boundary the orchestrator sees.
pub trait Transport {
    /// `POST /patients` with the order payload.
    fn create_order(&self, payload: &SubmissionPayload) -> RawResponse;
    /// `GET /patients/{patient_id}/orders/{order_id}/care-plan`.
    fn fetch_care_plan(&self, patient_id: u64, order_id: u64) -> RawResponse;
}

/// Blocking HTTP transport with a bounded global timeout, so a hung service
/// surfaces as `TransportError` instead of stalling the state machine.
pub struct HttpTransport {
    agent: Agent,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        HttpTransport {
            agent: agent_config.new_agent(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn drain(response: ureq::http::Response<ureq::Body>) -> RawResponse {
        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);
        let content_type = response
            .headers()
            .get(ureq::http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        match response.into_body().read_to_vec() {
            Ok(body) => RawResponse::Received {
                status: status.as_u16(),
                reason,
                content_type,
                body,
            },
            Err(err) => RawResponse::TransportError {
                message: format!("failed to read response body: {err}"),
            },
        }
    }
}

impl Transport for HttpTransport {
    fn create_order(&self, payload: &SubmissionPayload) -> RawResponse {
        let url = format!("{}/patients", self.base_url);
        tracing::debug!(url = %url, "posting order payload");
        match self.agent.post(&url).send_json(payload) {
            Ok(response) => Self::drain(response),
            Err(err) => RawResponse::TransportError {
                message: format!("could not reach the intake service: {err}"),
            },
        }
    }

    fn fetch_care_plan(&self, patient_id: u64, order_id: u64) -> RawResponse {
        let url = format!(
            "{}/patients/{patient_id}/orders/{order_id}/care-plan",
            self.base_url
        );
        tracing::debug!(url = %url, "fetching care plan");
        match self.agent.get(&url).call() {
            Ok(response) => Self::drain(response),
            Err(err) => RawResponse::TransportError {
                message: format!("could not reach the intake service: {err}"),
            },
        }
    }
}
