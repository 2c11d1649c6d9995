//! Query / create / update / delete against the data API

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sfclient_common::time::{Clock, SystemClock};
use sfclient_domain::constants::DATA_PATH_PREFIX;
use sfclient_domain::{ApiError, ClientConfig, Result, TokenState};
use tracing::{debug, info, instrument, warn};

use crate::auth::{Authenticator, PasswordGrantAuthenticator, TokenManager};
use crate::errors::{request_error, transport_error, unexpected_status_error};
use crate::http::HttpClient;

/// Authenticated client for the CRM REST API
///
/// Cheap to share behind an `Arc`; all methods take `&self` and concurrent
/// calls share a single cached token.
pub struct SalesforceClient {
    http_client: HttpClient,
    tokens: Arc<TokenManager>,
    api_version: String,
}

impl SalesforceClient {
    /// Create a client authenticating with the password grant
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid or the HTTP
    /// client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a builder for injecting an authenticator, clock, or transport
    pub fn builder() -> SalesforceClientBuilder {
        SalesforceClientBuilder::default()
    }

    /// Run a SOQL query
    ///
    /// `soql` is sent verbatim as the `q` parameter.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` if a token could not be obtained,
    /// `RequestFailed` on a non-2xx status, `TransportFailed` if no response
    /// arrived
    #[instrument(skip(self, soql))]
    pub async fn query(&self, soql: &str) -> Result<Value> {
        let request = self.authorized(Method::GET, "/query").await?.query(&[("q", soql)]);
        let response = self.execute(request).await?;
        let body = read_json(response).await?;

        info!("query succeeded");
        Ok(body)
    }

    /// Run a SOQL query and deserialize the body into `R`
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query), plus `RequestFailed` if the body does not
    /// match `R`
    pub async fn query_as<R: DeserializeOwned>(&self, soql: &str) -> Result<R> {
        let body = self.query(soql).await?;
        serde_json::from_value(body).map_err(|e| {
            ApiError::request(
                StatusCode::OK.as_u16(),
                format!("Failed to decode query response: {e}"),
                StatusCode::OK.as_u16().to_string(),
            )
        })
    }

    /// Create a record of `object_type`
    ///
    /// Returns the response body unchanged (typically `{id, success, errors}`).
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query)
    #[instrument(skip(self, data), fields(object_type = %object_type))]
    pub async fn create<T>(&self, object_type: &str, data: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let path = format!("/sobjects/{object_type}");
        let request = self.authorized(Method::POST, &path).await?.json(data);
        let response = self.execute(request).await?;
        let body = read_json(response).await?;

        info!("record created");
        Ok(body)
    }

    /// Update fields of an existing record
    ///
    /// # Returns
    ///
    /// `true` when the API answers `204 No Content`. Any other status is an
    /// error, never `false`.
    ///
    /// # Errors
    ///
    /// `RequestFailed` on any status other than 204, otherwise see
    /// [`query`](Self::query)
    #[instrument(skip(self, data), fields(object_type = %object_type, id = %id))]
    pub async fn update<T>(&self, object_type: &str, id: &str, data: &T) -> Result<bool>
    where
        T: Serialize + ?Sized,
    {
        let path = format!("/sobjects/{object_type}/{id}");
        let request = self.authorized(Method::PATCH, &path).await?.json(data);
        let response = self.execute(request).await?;

        expect_no_content(&response)?;
        info!("record updated");
        Ok(true)
    }

    /// Delete a record
    ///
    /// # Errors
    ///
    /// `RequestFailed` on any status other than 204, otherwise see
    /// [`query`](Self::query)
    #[instrument(skip(self), fields(object_type = %object_type, id = %id))]
    pub async fn delete(&self, object_type: &str, id: &str) -> Result<bool> {
        let path = format!("/sobjects/{object_type}/{id}");
        let request = self.authorized(Method::DELETE, &path).await?;
        let response = self.execute(request).await?;

        expect_no_content(&response)?;
        info!("record deleted");
        Ok(true)
    }

    /// State of the cached token right now
    pub async fn token_state(&self) -> TokenState {
        self.tokens.state().await
    }

    /// Instance URL of the cached token, `None` before the first authentication
    pub async fn instance_url(&self) -> Option<String> {
        self.tokens.current_token().await.map(|token| token.instance_url)
    }

    /// API version used in every data path, e.g. `62.0`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Token cache shared by all calls on this client
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Ensure a token and start a request to `path` under the data API root
    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.tokens.ensure_token().await?;
        let url = format!(
            "{}{}{}{}",
            token.instance_url.trim_end_matches('/'),
            DATA_PATH_PREFIX,
            self.api_version,
            path
        );

        debug!(%method, %path, "issuing data request");
        Ok(self.http_client.request(method, url).bearer_auth(&token.access_token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.http_client.send(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = request_error(status, &body);
        warn!(%status, code = err.code(), "data request failed");
        Err(err)
    }
}

/// Parse a 2xx body as JSON; 204/205 carry no body and yield `null`.
async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return Ok(Value::Null);
    }

    let text = response.text().await.map_err(|e| transport_error(&e))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        ApiError::request(
            status.as_u16(),
            format!("Failed to parse response body: {e}"),
            status.as_u16().to_string(),
        )
    })
}

fn expect_no_content(response: &Response) -> Result<()> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(());
    }

    warn!(%status, "expected 204 No Content");
    Err(unexpected_status_error(status))
}

fn json_accept_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Builder for [`SalesforceClient`]
#[derive(Default)]
pub struct SalesforceClientBuilder {
    config: Option<ClientConfig>,
    authenticator: Option<Arc<dyn Authenticator>>,
    clock: Option<Arc<dyn Clock>>,
    http_client: Option<HttpClient>,
}

impl SalesforceClientBuilder {
    /// Set the client configuration (required)
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the password-grant authenticator
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Clock used for token expiry
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// HTTP transport shared by the authenticator and the data calls
    pub fn http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if no configuration was set, it fails
    /// validation, or the HTTP client cannot be built
    pub fn build(self) -> Result<SalesforceClient> {
        let config =
            self.config.ok_or_else(|| ApiError::config("Client configuration not set"))?;
        config.validate()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .default_headers(json_accept_headers())
                .build()?,
        };

        let authenticator: Arc<dyn Authenticator> = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(PasswordGrantAuthenticator::from_config(&config, http_client.clone())),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        debug!(
            api_version = %config.api_version,
            login_url = %config.credentials.login_url,
            "building client"
        );

        Ok(SalesforceClient {
            http_client,
            tokens: Arc::new(TokenManager::with_clock(authenticator, clock)),
            api_version: config.api_version,
        })
    }
}
