//! Token manager with on-demand refresh
//!
//! Holds at most one [`CachedToken`]. Every data call goes through
//! [`TokenManager::ensure_token`], which returns the cached token while it is
//! valid and otherwise performs exactly one authentication, however many
//! callers are waiting for it.

use std::sync::Arc;

use sfclient_common::time::{Clock, SystemClock};
use sfclient_domain::{CachedToken, Result, TokenState};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::authenticator::Authenticator;
use crate::errors::into_authentication_failure;

/// Single-slot token cache in front of an [`Authenticator`]
pub struct TokenManager {
    authenticator: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<CachedToken>>,
    /// Serialises authentication so concurrent callers share one exchange
    refresh_gate: Mutex<()>,
}

impl TokenManager {
    /// Create a token manager using the system clock
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_clock(authenticator, Arc::new(SystemClock))
    }

    /// Create a token manager with an explicit clock
    pub fn with_clock(authenticator: Arc<dyn Authenticator>, clock: Arc<dyn Clock>) -> Self {
        Self { authenticator, clock, current: RwLock::new(None), refresh_gate: Mutex::new(()) }
    }

    /// Get a valid token, authenticating first if the slot is absent or expired
    ///
    /// # Errors
    /// Returns `ApiError::AuthenticationFailed` if authentication was needed and
    /// failed. The cached token, if any, is left exactly as it was.
    pub async fn ensure_token(&self) -> Result<CachedToken> {
        if let Some(token) = self.valid_token().await {
            return Ok(token);
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited on the gate.
        if let Some(token) = self.valid_token().await {
            debug!("token refreshed by concurrent caller");
            return Ok(token);
        }

        let previous = self.state().await;
        debug!(state = %previous, "authenticating");

        let response = match self.authenticator.authenticate().await {
            Ok(response) => response,
            Err(err) => {
                let err = into_authentication_failure(err);
                warn!(code = err.code(), error = %err, "authentication failed");
                return Err(err);
            }
        };

        let token = CachedToken::from_response(response, self.clock.millis_since_epoch());
        *self.current.write().await = Some(token.clone());

        info!(
            instance_url = %token.instance_url,
            expires_in = token.expires_in,
            "access token cached"
        );

        Ok(token)
    }

    /// Current token without triggering authentication
    pub async fn current_token(&self) -> Option<CachedToken> {
        self.current.read().await.clone()
    }

    /// Classify the slot at the clock's current time
    pub async fn state(&self) -> TokenState {
        let now = self.clock.millis_since_epoch();
        TokenState::of(self.current.read().await.as_ref(), now)
    }

    /// Drop the cached token so that the next call authenticates
    pub async fn clear(&self) {
        *self.current.write().await = None;
        debug!("cached token cleared");
    }

    async fn valid_token(&self) -> Option<CachedToken> {
        let now = self.clock.millis_since_epoch();
        let current = self.current.read().await;
        if TokenState::of(current.as_ref(), now).needs_authentication() {
            return None;
        }
        current.clone()
    }
}
