/// Service modules
pub mod config;
pub mod mailer;
pub mod notification;
pub mod oauth;
pub mod store;

pub use mailer::{
    MailClientProvider, MailTransport, MailTransportFactory, SmtpMailTransport,
    SmtpTransportFactory,
};
pub use notification::{DispatchReport, NotificationDispatcher};
pub use oauth::{AccessToken, GoogleTokenExchanger, TokenExchanger};
pub use store::{
    InMemoryStore, MongoConnector, PersistenceGateway, StoreConnector, SubmissionCollection,
};
