//! Protocol constants
//!
//! Centralized location for the paths, defaults and fallback codes used when
//! talking to the remote platform.

// Authentication
pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
pub const PASSWORD_GRANT_TYPE: &str = "password";
pub const TOKEN_ENDPOINT_PATH: &str = "/services/oauth2/token";

// REST data API
pub const DEFAULT_API_VERSION: &str = "62.0";
pub const DATA_PATH_PREFIX: &str = "/services/data/v";

// Lifetimes and timeouts
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Session lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 7200;

// Error fallbacks
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";
pub const AUTHENTICATION_FAILED_CODE: &str = "AUTHENTICATION_FAILED";
pub const CONFIG_ERROR_CODE: &str = "CONFIG_ERROR";
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred.";
pub const DEFAULT_AUTH_ERROR_MESSAGE: &str = "Authentication failed";
