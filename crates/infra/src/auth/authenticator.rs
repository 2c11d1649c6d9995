//! Password-grant token exchange

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use sfclient_domain::constants::{
    AUTHENTICATION_FAILED_CODE, DEFAULT_TOKEN_LIFETIME_SECS, TOKEN_ENDPOINT_PATH,
};
use sfclient_domain::{ApiError, AuthResponse, ClientConfig, Credentials, Result};
use tracing::{info, instrument, warn};

use crate::errors::{authentication_error, into_authentication_failure};
use crate::http::HttpClient;

/// Trait for obtaining a fresh access token
///
/// This trait allows dependency injection and testing with mock providers.
/// Implementations perform one exchange per call and cache nothing.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Perform one token exchange.
    ///
    /// # Errors
    /// Returns `ApiError::AuthenticationFailed` on transport failure, non-2xx
    /// response, or a response missing `access_token` / `instance_url`.
    async fn authenticate(&self) -> Result<AuthResponse>;
}

/// Raw token endpoint body. Every field is optional so that a 2xx response
/// with missing data is reported as an authentication failure rather than a
/// parse error.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    instance_url: Option<String>,
    expires_in: Option<Value>,
}

/// OAuth2 resource-owner password grant against `{login_url}/services/oauth2/token`.
pub struct PasswordGrantAuthenticator {
    http_client: HttpClient,
    credentials: Credentials,
    token_url: String,
    default_lifetime_secs: u64,
}

impl PasswordGrantAuthenticator {
    /// Create an authenticator for `credentials`
    ///
    /// Tokens whose response omits `expires_in` are assumed to live for
    /// [`DEFAULT_TOKEN_LIFETIME_SECS`].
    pub fn new(credentials: Credentials, http_client: HttpClient) -> Self {
        let token_url =
            format!("{}{}", credentials.login_url.trim_end_matches('/'), TOKEN_ENDPOINT_PATH);

        Self {
            http_client,
            credentials,
            token_url,
            default_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
        }
    }

    /// Create an authenticator from a full client configuration
    pub fn from_config(config: &ClientConfig, http_client: HttpClient) -> Self {
        Self::new(config.credentials.clone(), http_client)
            .with_default_lifetime_secs(config.default_token_lifetime_secs)
    }

    /// Lifetime assumed when the token response omits `expires_in`
    #[must_use]
    pub fn with_default_lifetime_secs(mut self, secs: u64) -> Self {
        self.default_lifetime_secs = secs;
        self
    }

    /// Fully-qualified token endpoint URL
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn form_params(&self) -> [(&'static str, &str); 5] {
        [
            ("grant_type", self.credentials.grant_type.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ]
    }

    fn interpret(&self, body: &str) -> Result<AuthResponse> {
        let parsed: TokenEndpointResponse = serde_json::from_str(body).map_err(|e| {
            ApiError::authentication(
                format!("Invalid authentication response: {e}"),
                AUTHENTICATION_FAILED_CODE,
            )
        })?;

        let (Some(access_token), Some(instance_url)) =
            (non_empty(parsed.access_token), non_empty(parsed.instance_url))
        else {
            return Err(ApiError::authentication(
                "Invalid authentication response: Missing token data",
                AUTHENTICATION_FAILED_CODE,
            ));
        };

        let expires_in =
            parsed.expires_in.as_ref().and_then(lifetime_secs).unwrap_or(self.default_lifetime_secs);

        Ok(AuthResponse { access_token, instance_url, expires_in })
    }
}

#[async_trait]
impl Authenticator for PasswordGrantAuthenticator {
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn authenticate(&self) -> Result<AuthResponse> {
        let request =
            self.http_client.request(Method::POST, &self.token_url).form(&self.form_params());

        let response = self.http_client.send(request).await.map_err(into_authentication_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ApiError::authentication(
                format!("Failed to read token response: {e}"),
                AUTHENTICATION_FAILED_CODE,
            )
        })?;

        if !status.is_success() {
            let err = authentication_error(status, &body);
            warn!(%status, code = err.code(), "token endpoint rejected authentication");
            return Err(err);
        }

        let auth = self.interpret(&body)?;
        info!(instance_url = %auth.instance_url, expires_in = auth.expires_in, "authenticated");
        Ok(auth)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `expires_in` arrives as a number from most providers and as a string from
/// some. Fractional seconds are truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lifetime_secs(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64().filter(|secs| secs.is_finite() && *secs >= 0.0).map(|secs| secs as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
