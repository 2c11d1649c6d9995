//! Token types shared between the authenticator and the client

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_label_conversions;

/// Result of one successful password-grant exchange
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub instance_url: String,
    /// Declared token lifetime in seconds
    pub expires_in: u64,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"<redacted>")
            .field("instance_url", &self.instance_url)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Bearer token held by the client between calls.
///
/// Always fully populated; a refresh produces a new value rather than
/// patching an old one. `created_at_ms` is the local wall clock at the moment
/// the token was cached, not the issue time reported upstream.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub instance_url: String,
    pub expires_in: u64,
    pub created_at_ms: u64,
}

impl CachedToken {
    /// Cache an authentication response acquired at `now_ms`.
    #[must_use]
    pub fn from_response(response: AuthResponse, now_ms: u64) -> Self {
        Self {
            access_token: response.access_token,
            instance_url: response.instance_url,
            expires_in: response.expires_in,
            created_at_ms: now_ms,
        }
    }

    /// Epoch milliseconds at which the token stops being usable.
    #[must_use]
    pub fn expires_at_ms(&self) -> u64 {
        self.created_at_ms.saturating_add(self.expires_in.saturating_mul(1000))
    }

    /// `true` once `now_ms >= created_at + expires_in * 1000`.
    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms()
    }

    /// Milliseconds left before expiry, zero if already expired.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms().saturating_sub(now_ms)
    }

    /// Expiry as a UTC timestamp, `None` if it overflows chrono's range.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.expires_at_ms()).ok().and_then(DateTime::from_timestamp_millis)
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("instance_url", &self.instance_url)
            .field("expires_in", &self.expires_in)
            .field("created_at_ms", &self.created_at_ms)
            .finish()
    }
}

/// State of the single token slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    /// No successful authentication yet
    Absent,
    /// A token is cached and has not reached its expiry instant
    Valid,
    /// A token is cached but must be renewed before the next request
    Expired,
}

impl_label_conversions!(TokenState {
    Absent => "absent",
    Valid => "valid",
    Expired => "expired",
});

impl TokenState {
    /// Classify a slot's content at `now_ms`.
    #[must_use]
    pub fn of(token: Option<&CachedToken>, now_ms: u64) -> Self {
        match token {
            None => Self::Absent,
            Some(token) if token.is_expired(now_ms) => Self::Expired,
            Some(_) => Self::Valid,
        }
    }

    /// Whether an authentication call is required before the next request.
    #[must_use]
    pub fn needs_authentication(self) -> bool {
        !matches!(self, Self::Valid)
    }
}
