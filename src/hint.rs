//! Cosmetic severity hints for user-facing labeling.
//!
//! Hint selection is lightweight text matching on the outcome message and
//! never changes the structural classification from `classify` - it only
//! picks the label a UI should hang on the toast.
use crate::outcome::SubmissionOutcome;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// User-facing label category for a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationHint {
    DuplicateEntry,
    ConnectionError,
    ValidationError,
    SubmissionFailed,
}

struct HintPatterns {
    duplicate: Regex,
    connection: Regex,
    validation: Regex,
}

fn patterns() -> &'static HintPatterns {
    static PATTERNS: OnceLock<HintPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HintPatterns {
        duplicate: compile(r"duplicate|already exists|medical[ -]record[ -]number"),
        connection: compile(r"could not reach|endpoint not found|network|connection"),
        validation: compile(r"validation error"),
    })
}

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed literals; a build failure here is a programmer error.
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|err| panic!("invalid hint pattern {pattern:?}: {err}"))
}

/// Pick the presentation label for a message.
pub fn hint_for_message(message: &str) -> PresentationHint {
    let patterns = patterns();
    if patterns.duplicate.is_match(message) {
        PresentationHint::DuplicateEntry
    } else if patterns.connection.is_match(message) {
        PresentationHint::ConnectionError
    } else if patterns.validation.is_match(message) {
        PresentationHint::ValidationError
    } else {
        PresentationHint::SubmissionFailed
    }
}

/// Pick the presentation label for a classified outcome.
///
/// Validation failures label as validation errors regardless of message
/// text; everything else goes through the message patterns.
pub fn hint_for_outcome(outcome: &SubmissionOutcome) -> PresentationHint {
    match outcome {
        SubmissionOutcome::ValidationFailed { .. } => PresentationHint::ValidationError,
        SubmissionOutcome::TransportFailed { cause } => hint_for_message(cause),
        other => hint_for_message(&other.message()),
    }
}
