// Validation utilities module
// Custom field rules shared by the identity, appointment and message forms

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::appointments::models::AppointmentStatus;
use crate::auth::models::Gender;

static ALPHA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("alphabetic pattern is valid"));
static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("numeric pattern is valid"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Names must contain only ASCII letters, without spaces
pub fn validate_alpha_name(value: &str) -> Result<(), ValidationError> {
    if ALPHA_RE.is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            "alpha",
            "Please provide a valid name that includes only alphabets without any spaces!",
        ))
    }
}

/// Phone and national identity numbers must contain only digits
pub fn validate_numeric(value: &str) -> Result<(), ValidationError> {
    if NUMERIC_RE.is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            "numeric",
            "Please provide a valid number that includes only digits!",
        ))
    }
}

/// Validates that gender is one of: Male, Female, Non-binary
pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Gender>()
        .map(|_| ())
        .map_err(|_| invalid("invalid_gender", "Gender must be one of: Male, Female, Non-binary"))
}

/// Validates that status is one of: Pending, Accepted, Rejected
pub fn validate_appointment_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<AppointmentStatus>()
        .map(|_| ())
        .map_err(|_| {
            invalid(
                "invalid_status",
                "Status must be one of: Pending, Accepted, Rejected",
            )
        })
}

/// Password strength policy: at least 8 characters with one upper-case letter,
/// one lower-case letter, one digit and one symbol
pub fn validate_strong_password(value: &str) -> Result<(), ValidationError> {
    let long_enough = value.chars().count() >= 8;
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_symbol = value
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        Err(invalid(
            "weak_password",
            "Please provide a strong password that includes at least one uppercase letter, one lowercase letter, one number, and one special character!",
        ))
    }
}

/// Copy of the errors with the submitted values dropped
///
/// The validator derive records each rejected input under `params["value"]`;
/// for password fields that is the plaintext, so no value leaves the service.
pub fn without_values(errors: &ValidationErrors) -> ValidationErrors {
    let mut redacted = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let mut error = error.clone();
            error.params.remove("value");
            redacted.add(field, error);
        }
    }
    redacted
}

/// Picks a single human-readable message out of a set of field errors
///
/// Fields are visited in name order so the message is stable across runs.
pub fn first_error_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().copied().collect();
    fields.sort_unstable();

    fields
        .first()
        .and_then(|field| {
            field_errors[field].first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for field '{}'", field),
            })
        })
        .unwrap_or_else(|| "Request validation failed".to_string())
}
