//! Response classification for intake submissions.
//!
//! A pure decision table over [`RawResponse`]: no state, safe to call
//! concurrently for independent responses. Classification is structural
//! (status code + body shape); the cosmetic message matching lives in
//! `hint` and never feeds back into this module.
use crate::outcome::{ConfirmationIssues, FieldError, SubmissionOutcome};
use crate::transport::RawResponse;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct SuccessBody {
    message: String,
    patient_id: u64,
    order_id: u64,
}

const INVALID_FORMAT: &str = "invalid response format from the intake service";

/// Classify one raw response into a [`SubmissionOutcome`].
///
/// Priority order matters most at status 422, which is ambiguous between
/// "your data is malformed" and "your data conflicts with existing state":
/// the `requires_confirmation` marker is the sole disambiguator and is probed
/// before the generic validation-array shape.
pub fn classify(response: &RawResponse) -> SubmissionOutcome {
    let (status, reason, content_type, body) = match response {
        RawResponse::TransportError { message } => {
            return SubmissionOutcome::TransportFailed {
                cause: format!("could not reach the intake service: {message}"),
            };
        }
        RawResponse::Received {
            status,
            reason,
            content_type,
            body,
        } => (*status, reason.as_deref(), content_type.as_deref(), body),
    };

    if !is_json_content_type(content_type) {
        // Body is already drained by the transport; only the status matters.
        return classify_unstructured(status, reason);
    }

    let Ok(parsed) = serde_json::from_slice::<Value>(body) else {
        return SubmissionOutcome::TransportFailed {
            cause: INVALID_FORMAT.to_string(),
        };
    };

    if (200..300).contains(&status) {
        return classify_success(&parsed);
    }

    if status == 422 {
        if let Some(issues) = extract_confirmation(&parsed) {
            return SubmissionOutcome::ConfirmationRequired { issues };
        }
        if let Some(field_errors) = extract_validation_errors(&parsed) {
            return SubmissionOutcome::ValidationFailed { field_errors };
        }
    }

    if status >= 500 {
        return SubmissionOutcome::ServerFailed {
            message: body_message(&parsed)
                .unwrap_or_else(|| format!("server error, status {status}")),
        };
    }

    if status == 400 {
        return SubmissionOutcome::RequestRejected {
            message: body_message(&parsed).unwrap_or_else(|| "bad request".to_string()),
        };
    }

    SubmissionOutcome::RequestRejected {
        message: body_message(&parsed)
            .unwrap_or_else(|| format!("request failed with status {status}")),
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    essence.eq_ignore_ascii_case("application/json") || essence.to_ascii_lowercase().ends_with("+json")
}

/// A response with no structured body: classify by status alone. A 404 here
/// is a deployment/config issue (wrong base URL, service not mounted), not a
/// data issue, so it lands on the transport side of the taxonomy.
fn classify_unstructured(status: u16, reason: Option<&str>) -> SubmissionOutcome {
    if status == 404 {
        return SubmissionOutcome::TransportFailed {
            cause: "intake endpoint not found; check the service deployment".to_string(),
        };
    }
    if status >= 500 {
        return SubmissionOutcome::ServerFailed {
            message: format!("server error, status {status} {}", reason.unwrap_or("")),
        };
    }
    SubmissionOutcome::RequestRejected {
        message: format!("request failed: {status} {}", reason.unwrap_or("")).trim_end().to_string(),
    }
}

fn classify_success(parsed: &Value) -> SubmissionOutcome {
    match SuccessBody::deserialize(parsed) {
        Ok(body) => SubmissionOutcome::Success {
            patient_id: body.patient_id,
            order_id: body.order_id,
            message: body.message,
        },
        Err(_) => SubmissionOutcome::TransportFailed {
            cause: INVALID_FORMAT.to_string(),
        },
    }
}

/// Ordered fallback list of places the confirmation shape may live: the
/// top-level body, then (legacy services) the same shape nested under
/// `detail`. Keeping this a list keeps the probe order auditable.
fn confirmation_candidates(parsed: &Value) -> [Option<&Value>; 2] {
    [Some(parsed), parsed.get("detail")]
}

fn extract_confirmation(parsed: &Value) -> Option<ConfirmationIssues> {
    for candidate in confirmation_candidates(parsed).into_iter().flatten() {
        if candidate.get("requires_confirmation").and_then(Value::as_bool) != Some(true) {
            continue;
        }
        let Some(raw_issues) = candidate.get("issues") else {
            continue;
        };
        let Ok(issues) = ConfirmationIssues::deserialize(raw_issues) else {
            continue;
        };
        // A marker with an empty issue set gives the human nothing to
        // judge; let it fall through to the generic rejection paths.
        if issues.is_empty() {
            continue;
        }
        return Some(issues);
    }
    None
}

fn extract_validation_errors(parsed: &Value) -> Option<Vec<FieldError>> {
    let entries = parsed.get("detail")?.as_array()?;
    let mut field_errors = Vec::new();
    for entry in entries {
        let Some(message) = entry.get("msg").and_then(Value::as_str) else {
            continue;
        };
        let field = entry
            .get("loc")
            .and_then(Value::as_array)
            .map(|loc| flatten_location(loc))
            .unwrap_or_default();
        field_errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }
    if field_errors.is_empty() {
        return None;
    }
    Some(field_errors)
}

/// Drop the leading location segment (`body`, `query`, ...) and join the
/// remainder with `.`; a single-segment location is kept as-is.
fn flatten_location(loc: &[Value]) -> String {
    let segments: Vec<String> = loc.iter().map(location_segment).collect();
    if segments.len() > 1 {
        segments[1..].join(".")
    } else {
        segments.join(".")
    }
}

fn location_segment(segment: &Value) -> String {
    match segment {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn body_message(parsed: &Value) -> Option<String> {
    if let Some(detail) = parsed.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    parsed
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
