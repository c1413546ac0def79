//! Validation helpers for training statistics.

use validator::{ValidateEmail, ValidationError};

/// Longest session a coach can log, in minutes (one full day).
const MAX_SESSION_MINUTES: i32 = 24 * 60;

/// Validates that a percentage (headshot rate, accuracy) is within 0 to 100.
pub fn validate_percentage(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("percentage_range");
        err.message = Some("Percentage must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates that a counter (kills, deaths) is non-negative.
pub fn validate_count(value: i32) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("count_range");
        err.message = Some("Count must be non-negative".into());
        Err(err)
    }
}

/// Validates a session duration in minutes.
pub fn validate_duration_minutes(value: i32) -> Result<(), ValidationError> {
    if (0..=MAX_SESSION_MINUTES).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("duration_range");
        err.message = Some(format!("Duration must be between 0 and {} minutes", MAX_SESSION_MINUTES).into());
        Err(err)
    }
}

/// Validates that a required free-text field is not blank.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates an email address after trimming surrounding whitespace.
pub fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    if value.trim().validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}
