/// OAuth2 refresh-token exchange
use crate::constants::{DEFAULT_TOKEN_LIFETIME_SECONDS, TOKEN_EXPIRY_SKEW_SECONDS};
use crate::error::IntakeError;
use crate::models::OAuthCredentials;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error, warn};

/// Short-lived access token obtained from a refresh token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Lifetimes that do not fit a timestamp fall back to the default
    pub fn new(secret: impl Into<String>, lifetime_seconds: i64) -> Self {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(lifetime_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or_else(|| {
                warn!(
                    expires_in = lifetime_seconds,
                    "Token lifetime out of range, using default"
                );
                now + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS)
            });

        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// Usable at `now` with the expiry skew applied
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_SKEW_SECONDS) < self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchanges the long-lived refresh token for an access token
    async fn exchange(&self, credentials: &OAuthCredentials) -> Result<AccessToken, IntakeError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Google OAuth2 token endpoint client
pub struct GoogleTokenExchanger {
    client: reqwest::Client,
    token_url: String,
}

impl GoogleTokenExchanger {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), token_url)
    }

    pub fn with_client(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }
}

#[async_trait]
impl TokenExchanger for GoogleTokenExchanger {
    async fn exchange(&self, credentials: &OAuthCredentials) -> Result<AccessToken, IntakeError> {
        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        debug!(
            client_id = %credentials.client_id,
            token_url = %self.token_url,
            "Refreshing access token"
        );

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send token refresh request");
                IntakeError::Credential(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                status = %status,
                error = %error_text,
                "Token refresh failed - check the refresh token and client credentials"
            );
            return Err(IntakeError::Credential(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let token_response = response.json::<TokenResponse>().await.map_err(|e| {
            IntakeError::Credential(format!("Invalid token response: {}", e))
        })?;

        let secret = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| IntakeError::Credential("Failed to get access token".to_string()))?;

        let lifetime = token_response
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS);

        debug!(expires_in = lifetime, "Access token obtained");
        Ok(AccessToken::new(secret, lifetime))
    }
}
