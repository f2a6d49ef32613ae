/// Contact submission models
use crate::error::IntakeError;
use crate::utils::validation::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw contact form body as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactForm {
    /// Parses a request body.
    ///
    /// Anything that is not a JSON object with string fields is reported as
    /// missing fields, the only client-side rejection the endpoint knows.
    pub fn from_slice(body: &[u8]) -> Result<Self, IntakeError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Contact form body is not a JSON object");
            IntakeError::MissingFields
        })
    }

    /// Validates presence of all three fields and stamps the submission.
    pub fn into_submission(self) -> Result<Submission, IntakeError> {
        match (
            non_empty(self.name),
            non_empty(self.email),
            non_empty(self.message),
        ) {
            (Some(name), Some(email), Some(message)) => Ok(Submission::new(name, email, message)),
            _ => Err(IntakeError::MissingFields),
        }
    }
}

/// A validated contact-form entry, alive for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            received_at: Utc::now(),
        }
    }

    /// Document written to the store
    pub fn to_record(&self) -> ContactRecord {
        ContactRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
            created_at: self.received_at,
        }
    }
}

/// Persisted layout of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Store acknowledgement for an inserted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub record: ContactRecord,
}
