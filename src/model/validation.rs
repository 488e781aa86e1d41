use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Validation errors for trip request fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("only English letters and digits allowed")]
    LettersAndDigitsOnly,
    #[error("only English letters and spaces allowed")]
    LettersAndSpacesOnly,
    #[error("only digits allowed")]
    DigitsOnly,
}

/// A pure per-field check, run on blur and again on submit.
pub type FieldRule = fn(&str) -> Result<(), ValidationError>;

static ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid hardcoded regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]*$").expect("valid hardcoded regex"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid hardcoded regex"));

/// Validates a flight number (e.g. `CI123`): non-empty ASCII letters and digits.
pub fn validate_flight(flight: &str) -> Result<(), ValidationError> {
    if ALNUM_RE.is_match(flight) {
        Ok(())
    } else {
        Err(ValidationError::LettersAndDigitsOnly)
    }
}

/// Validates a passenger name: ASCII letters and spaces. Empty is allowed.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::LettersAndSpacesOnly)
    }
}

/// Validates a phone number: non-empty ASCII digits.
pub fn validate_tel(tel: &str) -> Result<(), ValidationError> {
    if DIGITS_RE.is_match(tel) {
        Ok(())
    } else {
        Err(ValidationError::DigitsOnly)
    }
}

/// Validates an ID card or passport number: non-empty ASCII letters and digits.
pub fn validate_identity(identity: &str) -> Result<(), ValidationError> {
    if ALNUM_RE.is_match(identity) {
        Ok(())
    } else {
        Err(ValidationError::LettersAndDigitsOnly)
    }
}
