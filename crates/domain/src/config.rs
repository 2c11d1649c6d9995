//! Client configuration

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_LOGIN_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_LIFETIME_SECS, PASSWORD_GRANT_TYPE,
};
use crate::errors::{ApiError, Result};

/// OAuth2 password-grant credentials.
///
/// Secrets are skipped on serialization and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
}

impl Credentials {
    /// Credentials against the default login host using the password grant.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            login_url: default_login_url(),
            grant_type: default_grant_type(),
        }
    }

    /// Override the login host (e.g. `https://test.salesforce.com` for
    /// sandboxes).
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = grant_type.into();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("login_url", &self.login_url)
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

/// Everything needed to build a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub credentials: Credentials,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Lifetime assumed for tokens whose response carries no `expires_in`.
    #[serde(default = "default_token_lifetime_secs")]
    pub default_token_lifetime_secs: u64,
}

impl ClientConfig {
    /// Configuration with default API version, timeout and token lifetime.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            default_token_lifetime_secs: default_token_lifetime_secs(),
        }
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_default_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.default_token_lifetime_secs = secs;
        self
    }

    /// Check the configuration before any network call is attempted.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if:
    /// - client id, username or API version is empty
    /// - the login URL is not an absolute http(s) URL
    /// - the grant type is anything other than `password`
    /// - the request timeout is zero
    pub fn validate(&self) -> Result<()> {
        let creds = &self.credentials;

        if creds.client_id.trim().is_empty() {
            return Err(ApiError::config("client_id must not be empty"));
        }
        if creds.username.trim().is_empty() {
            return Err(ApiError::config("username must not be empty"));
        }
        if creds.grant_type != PASSWORD_GRANT_TYPE {
            return Err(ApiError::config(format!(
                "Unsupported grant type '{}': only '{}' is supported",
                creds.grant_type, PASSWORD_GRANT_TYPE
            )));
        }

        let login_url = Url::parse(&creds.login_url)
            .map_err(|e| ApiError::config(format!("Invalid login URL '{}': {e}", creds.login_url)))?;
        if !matches!(login_url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "Login URL must use http or https, got '{}'",
                login_url.scheme()
            )));
        }

        if self.api_version.trim().is_empty() {
            return Err(ApiError::config("api_version must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ApiError::config("request_timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_grant_type() -> String {
    PASSWORD_GRANT_TYPE.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_token_lifetime_secs() -> u64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}
