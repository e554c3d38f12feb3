//! Care-plan artifact retrieval results and local persistence.
//!
//! Artifact fetching is best-effort: every failure mode folds into
//! [`ArtifactOutcome::Failed`] with a message, never an error across the
//! component boundary, and never touches the recorded order outcome.
use crate::transport::RawResponse;
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one artifact fetch-and-save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    Saved { path: PathBuf },
    Failed { message: String },
}

/// Deterministic artifact file name: ids plus the fetch date, extension
/// derived from the delivered content type.
pub fn artifact_file_name(
    patient_id: u64,
    order_id: u64,
    date: NaiveDate,
    content_type: Option<&str>,
) -> String {
    let extension = match content_type.map(content_type_essence) {
        Some(essence) if essence.eq_ignore_ascii_case("application/pdf") => "pdf",
        _ => "txt",
    };
    format!(
        "care_plan_{patient_id}_{order_id}_{}.{extension}",
        date.format("%Y-%m-%d")
    )
}

fn content_type_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or(content_type).trim()
}

/// Fold a care-plan response into a saved file or a failure message.
pub fn persist_artifact(
    out_dir: &Path,
    patient_id: u64,
    order_id: u64,
    response: &RawResponse,
) -> ArtifactOutcome {
    persist_artifact_on(
        out_dir,
        patient_id,
        order_id,
        response,
        chrono::Local::now().date_naive(),
    )
}

/// Same as [`persist_artifact`] with the date injected, so tests can pin it.
pub fn persist_artifact_on(
    out_dir: &Path,
    patient_id: u64,
    order_id: u64,
    response: &RawResponse,
    date: NaiveDate,
) -> ArtifactOutcome {
    let (status, content_type, body) = match response {
        RawResponse::TransportError { message } => {
            return ArtifactOutcome::Failed {
                message: format!("care plan download failed: {message}"),
            };
        }
        RawResponse::Received {
            status,
            content_type,
            body,
            ..
        } => (*status, content_type.as_deref(), body),
    };

    if !(200..300).contains(&status) {
        return ArtifactOutcome::Failed {
            message: failure_message(status, body),
        };
    }

    let file_name = artifact_file_name(patient_id, order_id, date, content_type);
    let path = out_dir.join(file_name);
    match fs::write(&path, body) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "care plan saved");
            ArtifactOutcome::Saved { path }
        }
        Err(err) => ArtifactOutcome::Failed {
            message: format!("could not write care plan to {}: {err}", path.display()),
        },
    }
}

/// Failure bodies are either JSON `{error}` or plain text; fall back to the
/// status code when neither carries anything useful.
fn failure_message(status: u16, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<Value>(body) {
        if let Some(error) = parsed.get("error").and_then(Value::as_str) {
            return format!("care plan download failed: {error}");
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("care plan download failed with status {status}")
    } else {
        format!("care plan download failed: {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn file_name_is_deterministic_and_dated() {
        assert_eq!(
            artifact_file_name(12, 34, date(), Some("application/pdf")),
            "care_plan_12_34_2026-08-25.pdf"
        );
        assert_eq!(
            artifact_file_name(12, 34, date(), Some("text/plain; charset=utf-8")),
            "care_plan_12_34_2026-08-25.txt"
        );
        assert_eq!(artifact_file_name(12, 34, date(), None), "care_plan_12_34_2026-08-25.txt");
    }

    #[test]
    fn successful_fetch_writes_the_body() {
        let dir = tempfile::tempdir().unwrap();
        let response = RawResponse::received(200, "application/pdf", b"%PDF-1.4".to_vec());
        let outcome = persist_artifact_on(dir.path(), 1, 2, &response, date());
        let ArtifactOutcome::Saved { path } = outcome else {
            panic!("expected saved artifact");
        };
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "care_plan_1_2_2026-08-25.pdf"
        );
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn json_error_body_surfaces_its_error_field() {
        let dir = tempfile::tempdir().unwrap();
        let response = RawResponse::received(
            500,
            "application/json",
            serde_json::json!({"error": "generator crashed"}).to_string(),
        );
        assert_eq!(
            persist_artifact_on(dir.path(), 1, 2, &response, date()),
            ArtifactOutcome::Failed {
                message: "care plan download failed: generator crashed".to_string(),
            }
        );
    }

    #[test]
    fn transport_error_folds_into_a_failure_message() {
        let dir = tempfile::tempdir().unwrap();
        let response = RawResponse::TransportError {
            message: "timed out".to_string(),
        };
        let ArtifactOutcome::Failed { message } =
            persist_artifact_on(dir.path(), 1, 2, &response, date())
        else {
            panic!("expected failure");
        };
        assert!(message.contains("timed out"));
    }
}
