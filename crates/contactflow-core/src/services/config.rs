/// Configuration loading from environment variables
use crate::constants::*;
use crate::models::{
    CorsSettings, IntakeSettings, NotificationSettings, OAuthSettings, StoreSettings,
    parse_methods,
};
use crate::utils::validation::{is_truthy, non_empty};

impl IntakeSettings {
    /// Reads settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let defaults = IntakeSettings::default();

        let settings = Self {
            mongo_uri: get(ENV_MONGO_URI),
            client_id: get(ENV_CLIENT_ID),
            client_secret: get(ENV_CLIENT_SECRET),
            refresh_token: get(ENV_REFRESH_TOKEN),
            email_user: get(ENV_EMAIL_USER),
            email_to: get(ENV_EMAIL_TO),
            cors: CorsSettings {
                allowed_origin: get(ENV_ALLOWED_ORIGIN).unwrap_or(defaults.cors.allowed_origin),
                allow_methods: get(ENV_CORS_ALLOW_METHODS)
                    .map(|raw| parse_methods(&raw))
                    .filter(|methods| !methods.is_empty())
                    .unwrap_or(defaults.cors.allow_methods),
            },
            notification: NotificationSettings {
                send_confirmation: get(ENV_SEND_CONFIRMATION)
                    .map(|v| is_truthy(&v))
                    .unwrap_or(defaults.notification.send_confirmation),
                site_url: get(ENV_SITE_URL),
                signature_name: get(ENV_SIGNATURE_NAME)
                    .unwrap_or(defaults.notification.signature_name),
            },
            store: StoreSettings {
                database: get(ENV_MONGO_DATABASE).unwrap_or(defaults.store.database),
                collection: get(ENV_MONGO_COLLECTION).unwrap_or(defaults.store.collection),
            },
            oauth: OAuthSettings {
                token_url: get(ENV_OAUTH_TOKEN_URL).unwrap_or(defaults.oauth.token_url),
                smtp_relay: get(ENV_SMTP_RELAY).unwrap_or(defaults.oauth.smtp_relay),
            },
        };

        let missing = settings.missing_keys();
        if missing.is_empty() {
            tracing::info!(
                confirmation = settings.notification.send_confirmation,
                allowed_origin = %settings.cors.allowed_origin,
                allow_methods = %settings.cors.allow_methods_header(),
                "Configuration loaded"
            );
        } else {
            tracing::warn!(
                missing = ?missing,
                "Configuration incomplete, contact requests will be rejected"
            );
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let settings = IntakeSettings::from_lookup(lookup(&[]));

        assert_eq!(settings.missing_keys().len(), 6);
        assert_eq!(settings.cors.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert_eq!(settings.cors.allow_methods_header(), "GET, POST, OPTIONS");
        assert!(!settings.notification.send_confirmation);
        assert_eq!(settings.store.collection, "contacts");
        assert_eq!(settings.oauth.smtp_relay, "smtp.gmail.com");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let settings = IntakeSettings::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://db/site"),
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "secret"),
            ("REFRESH_TOKEN", "refresh"),
            ("EMAIL_USER", "owner@example.com"),
            ("EMAIL_TO", "inbox@example.com"),
            ("ALLOWED_ORIGIN", "https://example.com"),
            ("CORS_ALLOW_METHODS", "POST, OPTIONS"),
            ("SEND_CONFIRMATION", "true"),
            ("SITE_URL", "https://example.com"),
        ]));

        assert!(settings.missing_keys().is_empty());
        assert_eq!(settings.cors.allowed_origin, "https://example.com");
        assert_eq!(settings.cors.allow_methods, vec!["POST", "OPTIONS"]);
        assert!(settings.notification.send_confirmation);
        assert_eq!(
            settings.notification.site_url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_empty_values_are_missing() {
        let settings = IntakeSettings::from_lookup(lookup(&[
            ("MONGO_URI", ""),
            ("CORS_ALLOW_METHODS", " , "),
        ]));

        assert!(settings.missing_keys().contains(&"MONGO_URI"));
        assert_eq!(settings.cors.allow_methods_header(), "GET, POST, OPTIONS");
    }

    #[test]
    fn test_from_env_missing_vars() {
        unsafe {
            std::env::remove_var("MONGO_URI");
        }

        let settings = IntakeSettings::from_env();
        assert!(settings.missing_keys().contains(&"MONGO_URI"));
    }
}
