/// Logging utilities for PII redaction
///
/// Submitters' addresses and messages must not reach the logs verbatim;
/// these helpers produce the safe forms used in tracing fields.
use crate::models::Submission;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap());

/// Redacts email addresses from text, preserving domain for debugging
///
/// # Examples
/// ```
/// use contactflow_core::utils::logging::redact_email;
///
/// assert_eq!(redact_email("ana@x.com"), "***@x.com");
/// assert_eq!(redact_email("Reply to test@acme.com soon"), "Reply to ***@acme.com soon");
/// ```
pub fn redact_email(text: &str) -> String {
    EMAIL_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            match email.find('@') {
                Some(at_pos) => format!("***{}", &email[at_pos..]),
                None => "***@***".to_string(),
            }
        })
        .to_string()
}

/// Message bodies are logged by size only
pub fn redact_body(body: &str) -> String {
    format!("[{} bytes]", body.len())
}

/// Structured, PII-free description of a submission for log events
pub fn safe_submission_context(submission: &Submission) -> serde_json::Value {
    serde_json::json!({
        "email_domain": extract_domain(&submission.email),
        "name_length": submission.name.chars().count(),
        "message": redact_body(&submission.message),
        "received_at": submission.received_at.to_rfc3339(),
    })
}

fn extract_domain(email: &str) -> String {
    email.split('@').nth(1).unwrap_or("unknown").to_string()
}
