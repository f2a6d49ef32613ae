/// Mail transport and the cached, OAuth2-backed mail client
use crate::email::compose;
use crate::error::IntakeError;
use crate::models::{DeliveryReceipt, OAuthCredentials, OutgoingMail};
use crate::services::oauth::{AccessToken, TokenExchanger};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// SMTP reply codes meaning the XOAUTH2 login was refused
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, IntakeError>;
}

/// Builds an authenticated transport from an access token
pub trait MailTransportFactory: Send + Sync {
    fn build(
        &self,
        user: &str,
        token: &AccessToken,
    ) -> Result<Arc<dyn MailTransport>, IntakeError>;
}

/// SMTP relay authenticated with XOAUTH2
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, IntakeError> {
        let message = compose(mail)?;

        let response = self.mailer.send(message).await.map_err(|e| {
            let code = e.status().map(|code| code.to_string());
            if code
                .as_deref()
                .is_some_and(|code| AUTH_FAILURE_CODES.contains(&code))
            {
                IntakeError::Credential(format!("SMTP authentication rejected: {}", e))
            } else {
                IntakeError::Transport(format!("SMTP send failed: {}", e))
            }
        })?;

        let reply = response.message().collect::<Vec<_>>().join(" ");
        Ok(DeliveryReceipt {
            to: mail.to.clone(),
            response: format!("{} {}", response.code(), reply),
        })
    }
}

pub struct SmtpTransportFactory {
    relay: String,
}

impl SmtpTransportFactory {
    pub fn new(relay: impl Into<String>) -> Self {
        Self {
            relay: relay.into(),
        }
    }
}

impl MailTransportFactory for SmtpTransportFactory {
    fn build(
        &self,
        user: &str,
        token: &AccessToken,
    ) -> Result<Arc<dyn MailTransport>, IntakeError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)
            .map_err(|e| IntakeError::Transport(format!("Invalid SMTP relay: {}", e)))?
            .credentials(Credentials::new(user.to_string(), token.secret.clone()))
            .authentication(vec![Mechanism::Xoauth2])
            .build();

        debug!(relay = %self.relay, "SMTP transport built");
        Ok(Arc::new(SmtpMailTransport { mailer }))
    }
}

struct CachedClient {
    client: Arc<dyn MailTransport>,
    token: AccessToken,
}

/// Hands out an authenticated mail client, exchanging a token only when
/// none is cached or the cached one is about to expire.
///
/// The lock is held across the exchange so concurrent first callers share
/// one token exchange.
pub struct MailClientProvider {
    exchanger: Arc<dyn TokenExchanger>,
    factory: Arc<dyn MailTransportFactory>,
    cached: Mutex<Option<CachedClient>>,
}

impl MailClientProvider {
    pub fn new(
        exchanger: Arc<dyn TokenExchanger>,
        factory: Arc<dyn MailTransportFactory>,
    ) -> Self {
        Self {
            exchanger,
            factory,
            cached: Mutex::new(None),
        }
    }

    pub async fn mail_client(
        &self,
        credentials: &OAuthCredentials,
    ) -> Result<Arc<dyn MailTransport>, IntakeError> {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref()
            && entry.token.is_fresh()
        {
            return Ok(Arc::clone(&entry.client));
        }

        if cached.is_some() {
            info!("Cached access token expiring, exchanging a new one");
        }

        let token = self.exchanger.exchange(credentials).await?;
        let client = self.factory.build(&credentials.user, &token)?;

        info!(expires_at = %token.expires_at, "Mail client created");
        *cached = Some(CachedClient {
            client: Arc::clone(&client),
            token,
        });

        Ok(client)
    }

    /// Drops the cached client so the next caller exchanges a new token
    pub async fn invalidate(&self) {
        if self.cached.lock().await.take().is_some() {
            warn!("Mail client invalidated after authentication failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        Exchanger {}

        #[async_trait]
        impl TokenExchanger for Exchanger {
            async fn exchange(&self, credentials: &OAuthCredentials) -> Result<AccessToken, IntakeError>;
        }
    }

    struct NullTransport;

    #[async_trait]
    impl MailTransport for NullTransport {
        async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, IntakeError> {
            Ok(DeliveryReceipt {
                to: mail.to.clone(),
                response: "250 OK".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        builds: AtomicUsize,
    }

    impl MailTransportFactory for CountingFactory {
        fn build(
            &self,
            _user: &str,
            _token: &AccessToken,
        ) -> Result<Arc<dyn MailTransport>, IntakeError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullTransport))
        }
    }

    fn credentials() -> OAuthCredentials {
        OAuthCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            user: "owner@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_client_is_cached() {
        let mut exchanger = MockExchanger::new();
        exchanger
            .expect_exchange()
            .times(1)
            .returning(|_| Ok(AccessToken::new("token", 3600)));
        let factory = Arc::new(CountingFactory::default());
        let provider = MailClientProvider::new(Arc::new(exchanger), factory.clone());

        for _ in 0..3 {
            provider.mail_client(&credentials()).await.unwrap();
        }

        assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiring_token_is_replaced() {
        let mut exchanger = MockExchanger::new();
        exchanger
            .expect_exchange()
            .times(2)
            .returning(|_| Ok(AccessToken::new("short-lived", 10)));
        let provider = MailClientProvider::new(
            Arc::new(exchanger),
            Arc::new(CountingFactory::default()),
        );

        provider.mail_client(&credentials()).await.unwrap();
        provider.mail_client(&credentials()).await.unwrap();
    }

    #[tokio::test]
    async fn test_exchange_failure_is_not_cached() {
        let mut exchanger = MockExchanger::new();
        let mut seq = mockall::Sequence::new();
        exchanger
            .expect_exchange()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(IntakeError::Credential("Failed to get access token".to_string())));
        exchanger
            .expect_exchange()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(AccessToken::new("token", 3600)));
        let provider = MailClientProvider::new(
            Arc::new(exchanger),
            Arc::new(CountingFactory::default()),
        );

        assert!(matches!(
            provider.mail_client(&credentials()).await,
            Err(IntakeError::Credential(_))
        ));
        assert!(provider.mail_client(&credentials()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_exchange() {
        let mut exchanger = MockExchanger::new();
        exchanger
            .expect_exchange()
            .times(2)
            .returning(|_| Ok(AccessToken::new("token", 3600)));
        let provider = MailClientProvider::new(
            Arc::new(exchanger),
            Arc::new(CountingFactory::default()),
        );

        provider.mail_client(&credentials()).await.unwrap();
        provider.invalidate().await;
        provider.mail_client(&credentials()).await.unwrap();
    }

    #[test]
    fn test_smtp_factory_builds_transport() {
        let factory = SmtpTransportFactory::new("smtp.gmail.com");
        let token = AccessToken::new("token", 3600);

        assert!(factory.build("owner@example.com", &token).is_ok());
    }
}
