/// Contact Context - shared state for the contact handlers
use contactflow_core::models::IntakeSettings;
use contactflow_core::services::{
    GoogleTokenExchanger, MailClientProvider, MailTransportFactory, MongoConnector,
    NotificationDispatcher, PersistenceGateway, SmtpTransportFactory, StoreConnector,
    TokenExchanger,
};
use std::sync::Arc;

/// Resources built once per cold start and reused by every invocation
pub struct ContactContext {
    /// Settings read from the environment
    pub settings: IntakeSettings,

    /// Lazily connected document store
    pub gateway: PersistenceGateway,

    /// Owner notification and confirmation mail
    pub dispatcher: NotificationDispatcher,
}

impl ContactContext {
    /// Create a context from explicit collaborators
    pub fn new(
        settings: IntakeSettings,
        connector: Arc<dyn StoreConnector>,
        exchanger: Arc<dyn TokenExchanger>,
        transports: Arc<dyn MailTransportFactory>,
    ) -> Arc<Self> {
        let provider = Arc::new(MailClientProvider::new(exchanger, transports));
        let dispatcher = NotificationDispatcher::new(provider, settings.notification.clone());

        Arc::new(Self {
            gateway: PersistenceGateway::new(connector),
            dispatcher,
            settings,
        })
    }

    /// Create a context backed by MongoDB, Google OAuth2 and SMTP
    pub fn from_env() -> Arc<Self> {
        let settings = IntakeSettings::from_env();

        let connector = Arc::new(MongoConnector::new(settings.store.clone()));
        let exchanger = Arc::new(GoogleTokenExchanger::new(settings.oauth.token_url.clone()));
        let transports = Arc::new(SmtpTransportFactory::new(settings.oauth.smtp_relay.clone()));

        Self::new(settings, connector, exchanger, transports)
    }
}
