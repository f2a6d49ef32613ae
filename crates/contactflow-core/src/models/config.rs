/// Configuration models
use crate::constants::{
    DEFAULT_ALLOWED_ORIGIN, DEFAULT_CORS_ALLOW_METHODS, DEFAULT_MONGO_COLLECTION,
    DEFAULT_MONGO_DATABASE, DEFAULT_OAUTH_TOKEN_URL, DEFAULT_SIGNATURE_NAME, DEFAULT_SMTP_RELAY,
    ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_EMAIL_TO, ENV_EMAIL_USER, ENV_MONGO_URI,
    ENV_REFRESH_TOKEN,
};
use crate::error::IntakeError;
use std::fmt;

/// Process configuration, loaded once per cold start.
///
/// Required values stay optional here; `require` is evaluated on every
/// request so a misconfigured deployment answers with the list of absent
/// keys instead of failing to boot.
#[derive(Debug, Clone, Default)]
pub struct IntakeSettings {
    pub mongo_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub email_user: Option<String>,
    pub email_to: Option<String>,
    pub cors: CorsSettings,
    pub notification: NotificationSettings,
    pub store: StoreSettings,
    pub oauth: OAuthSettings,
}

impl IntakeSettings {
    /// Required keys that are absent, in reporting order
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            (ENV_MONGO_URI, &self.mongo_uri),
            (ENV_CLIENT_ID, &self.client_id),
            (ENV_CLIENT_SECRET, &self.client_secret),
            (ENV_REFRESH_TOKEN, &self.refresh_token),
            (ENV_EMAIL_USER, &self.email_user),
            (ENV_EMAIL_TO, &self.email_to),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(key, _)| key)
        .collect()
    }

    /// Resolves every required value or reports all absent keys at once
    pub fn require(&self) -> Result<RequiredConfig, IntakeError> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(IntakeError::ServerMisconfigured(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        let value = |v: &Option<String>| v.clone().unwrap_or_default();

        Ok(RequiredConfig {
            mongo_uri: value(&self.mongo_uri),
            credentials: OAuthCredentials {
                client_id: value(&self.client_id),
                client_secret: value(&self.client_secret),
                refresh_token: value(&self.refresh_token),
                user: value(&self.email_user),
            },
            sender: value(&self.email_user),
            recipient: value(&self.email_to),
        })
    }
}

/// Required configuration, all present
#[derive(Debug, Clone)]
pub struct RequiredConfig {
    pub mongo_uri: String,
    pub credentials: OAuthCredentials,
    pub sender: String,
    pub recipient: String,
}

/// Material for the OAuth2 refresh flow and the SMTP login
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub user: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origin: String,
    /// Upper-case method names, e.g. `["GET", "POST", "OPTIONS"]`
    pub allow_methods: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            allow_methods: parse_methods(DEFAULT_CORS_ALLOW_METHODS),
        }
    }
}

impl CorsSettings {
    /// Header value for `Access-Control-Allow-Methods`
    pub fn allow_methods_header(&self) -> String {
        self.allow_methods.join(", ")
    }
}

/// Parses a comma separated method list
pub fn parse_methods(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().to_ascii_uppercase())
        .filter(|m| !m.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Also send a confirmation to the submitter
    pub send_confirmation: bool,
    pub site_url: Option<String>,
    pub signature_name: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            send_confirmation: false,
            site_url: None,
            signature_name: DEFAULT_SIGNATURE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Used only when the connection URI names no database
    pub database: String,
    pub collection: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: DEFAULT_MONGO_DATABASE.to_string(),
            collection: DEFAULT_MONGO_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub token_url: String,
    pub smtp_relay: String,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_OAUTH_TOKEN_URL.to_string(),
            smtp_relay: DEFAULT_SMTP_RELAY.to_string(),
        }
    }
}
