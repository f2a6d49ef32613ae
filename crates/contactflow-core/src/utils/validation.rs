/// Input validation utilities
use crate::error::IntakeError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Keeps a value only when it is present and non-empty
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Checks an address before mail is addressed to it.
///
/// Submissions are accepted whatever their `email` looks like; this only
/// guards outbound messages.
pub fn validate_email_address(email: &str) -> Result<(), IntakeError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(IntakeError::Transport(format!(
            "Invalid email address: {}",
            email
        )))
    }
}

/// Interprets boolean-like environment values
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
