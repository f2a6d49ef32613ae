/// Best-effort notification dispatch
use crate::email::templates;
use crate::error::IntakeError;
use crate::models::{
    DeliveryReceipt, NotificationSettings, OutgoingMail, RequiredConfig, Submission,
};
use crate::services::mailer::{MailClientProvider, MailTransport};
use crate::utils::logging::redact_email;
use crate::utils::validation::validate_email_address;
use std::sync::Arc;
use tracing::{error, info, warn};

pub type DeliveryResult = Result<DeliveryReceipt, IntakeError>;

/// Outcome of one notification attempt.
///
/// Returned to the caller for logging only; the HTTP response never
/// depends on it.
#[derive(Debug)]
pub struct DispatchReport {
    /// Notification to the site owner
    pub owner: DeliveryResult,
    /// Confirmation to the submitter, when enabled
    pub confirmation: Option<DeliveryResult>,
}

impl DispatchReport {
    pub fn all_delivered(&self) -> bool {
        self.failures().is_empty()
    }

    /// Errors of every attempted message, owner first
    pub fn failures(&self) -> Vec<&IntakeError> {
        std::iter::once(&self.owner)
            .chain(self.confirmation.as_ref())
            .filter_map(|result| result.as_ref().err())
            .collect()
    }

    /// Writes the outcome to the log with full error detail
    pub fn log(&self) {
        log_delivery("owner", &self.owner);
        if let Some(confirmation) = &self.confirmation {
            log_delivery("confirmation", confirmation);
        }

        if !self.all_delivered() {
            warn!(
                failed = self.failures().len(),
                "Notification step incomplete, submission was still stored"
            );
        }
    }
}

fn log_delivery(kind: &str, result: &DeliveryResult) {
    match result {
        Ok(receipt) => info!(
            kind = kind,
            to = %redact_email(&receipt.to),
            response = %receipt.response,
            "Email sent successfully"
        ),
        Err(e) => error!(
            kind = kind,
            error = %e,
            details = ?e,
            "Email sending error"
        ),
    }
}

pub struct NotificationDispatcher {
    provider: Arc<MailClientProvider>,
    settings: NotificationSettings,
}

impl NotificationDispatcher {
    pub fn new(provider: Arc<MailClientProvider>, settings: NotificationSettings) -> Self {
        Self { provider, settings }
    }

    /// Sends the owner notification and, if enabled, the confirmation.
    ///
    /// Never fails: every error is captured in the report. A credential
    /// failure fails every message of the attempt.
    pub async fn dispatch(
        &self,
        config: &RequiredConfig,
        submission: &Submission,
    ) -> DispatchReport {
        info!("Starting email process");

        let client = match self.provider.mail_client(&config.credentials).await {
            Ok(client) => client,
            Err(e) => {
                return DispatchReport {
                    owner: Err(e.clone()),
                    confirmation: self.settings.send_confirmation.then_some(Err(e)),
                };
            }
        };

        let owner_mail =
            templates::owner_notification(submission, &config.sender, &config.recipient);
        let owner = self.deliver(client.as_ref(), &owner_mail).await;

        let confirmation = if self.settings.send_confirmation {
            let result = match validate_email_address(&submission.email) {
                Ok(()) => {
                    let mail = templates::confirmation(submission, &config.sender, &self.settings);
                    self.deliver(client.as_ref(), &mail).await
                }
                Err(e) => Err(e),
            };
            Some(result)
        } else {
            None
        };

        DispatchReport {
            owner,
            confirmation,
        }
    }

    async fn deliver(&self, client: &dyn MailTransport, mail: &OutgoingMail) -> DeliveryResult {
        let result = client.send(mail).await;
        if let Err(IntakeError::Credential(_)) = &result {
            self.provider.invalidate().await;
        }
        result
    }
}
