/// Application constants
///
/// Environment keys, defaults and the fixed response messages of the
/// contact endpoint, grouped by concern.
// ============================================================================
// Required Environment Keys
// ============================================================================
/// Document store connection URI
pub const ENV_MONGO_URI: &str = "MONGO_URI";

/// OAuth2 client id
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";

/// OAuth2 client secret
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";

/// Long-lived OAuth2 refresh token
pub const ENV_REFRESH_TOKEN: &str = "REFRESH_TOKEN";

/// Sender address, also the SMTP user
pub const ENV_EMAIL_USER: &str = "EMAIL_USER";

/// Site owner address receiving notifications
pub const ENV_EMAIL_TO: &str = "EMAIL_TO";

/// Required keys in the order they are reported when missing
pub const REQUIRED_ENV_KEYS: [&str; 6] = [
    ENV_MONGO_URI,
    ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
    ENV_REFRESH_TOKEN,
    ENV_EMAIL_USER,
    ENV_EMAIL_TO,
];

// ============================================================================
// Optional Environment Keys
// ============================================================================

pub const ENV_ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
pub const ENV_CORS_ALLOW_METHODS: &str = "CORS_ALLOW_METHODS";
pub const ENV_SEND_CONFIRMATION: &str = "SEND_CONFIRMATION";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_SIGNATURE_NAME: &str = "SIGNATURE_NAME";
pub const ENV_MONGO_DATABASE: &str = "MONGO_DATABASE";
pub const ENV_MONGO_COLLECTION: &str = "MONGO_COLLECTION";
pub const ENV_OAUTH_TOKEN_URL: &str = "OAUTH_TOKEN_URL";
pub const ENV_SMTP_RELAY: &str = "SMTP_RELAY";

// ============================================================================
// Defaults
// ============================================================================

/// Origin allowed to post the contact form
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://victor-hernandez-vivanco.github.io";

/// Methods advertised in `Access-Control-Allow-Methods`
pub const DEFAULT_CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Database used when the URI names none
pub const DEFAULT_MONGO_DATABASE: &str = "contactflow";

/// Collection holding submissions
pub const DEFAULT_MONGO_COLLECTION: &str = "contacts";

/// Google OAuth2 token endpoint
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Gmail SMTP relay
pub const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";

/// Signature used in confirmation emails
pub const DEFAULT_SIGNATURE_NAME: &str = "The team";

// ============================================================================
// Timing Constants
// ============================================================================

/// A cached access token is replaced this many seconds before it expires
pub const TOKEN_EXPIRY_SKEW_SECONDS: i64 = 60;

/// Token lifetime assumed when the token endpoint reports none (1 hour)
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

// ============================================================================
// Response Messages
// ============================================================================

pub const MSG_SUCCESS: &str = "Message sent successfully!";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MSG_MISSING_FIELDS: &str = "All fields are required";
pub const MSG_SERVER_MISCONFIGURED: &str = "Server configuration error";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
