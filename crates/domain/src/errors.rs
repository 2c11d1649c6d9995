//! Error types surfaced by every client operation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CONFIG_ERROR_CODE, UNKNOWN_ERROR_CODE};
use crate::impl_label_conversions;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Token endpoint rejected the credentials, was unreachable, or answered
    /// without the required fields.
    AuthenticationFailed,
    /// Data endpoint answered with a status other than the expected success.
    RequestFailed,
    /// No HTTP response was received (DNS, connect, timeout, reset).
    TransportFailed,
    /// Client could not be constructed from the supplied configuration.
    Config,
}

impl_label_conversions!(ApiErrorKind {
    AuthenticationFailed => "authentication_failed",
    RequestFailed => "request_failed",
    TransportFailed => "transport_failed",
    Config => "config",
});

/// Main error type for sfclient operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    #[error("Authentication failed: {message} ({code})")]
    AuthenticationFailed { message: String, code: String },

    #[error("Request failed with status {status}: {message} ({code})")]
    RequestFailed { status: u16, message: String, code: String },

    #[error("Transport failed: {message} ({code})")]
    TransportFailed { message: String, code: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ApiError {
    /// Authentication failure with an explicit provider code.
    pub fn authentication(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into(), code: code.into() }
    }

    /// Non-success response from a data endpoint.
    pub fn request(status: u16, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::RequestFailed { status, message: message.into(), code: code.into() }
    }

    /// Transport failure; always carries [`UNKNOWN_ERROR_CODE`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailed { message: message.into(), code: UNKNOWN_ERROR_CODE.to_string() }
    }

    /// Configuration could not be loaded or failed validation.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Get the kind of this error
    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::AuthenticationFailed { .. } => ApiErrorKind::AuthenticationFailed,
            Self::RequestFailed { .. } => ApiErrorKind::RequestFailed,
            Self::TransportFailed { .. } => ApiErrorKind::TransportFailed,
            Self::Config { .. } => ApiErrorKind::Config,
        }
    }

    /// Human-readable message, upstream-supplied when available.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed { message, .. }
            | Self::RequestFailed { message, .. }
            | Self::TransportFailed { message, .. }
            | Self::Config { message } => message,
        }
    }

    /// Provider error code, or the fallback chosen when none was supplied.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::AuthenticationFailed { code, .. }
            | Self::RequestFailed { code, .. }
            | Self::TransportFailed { code, .. } => code,
            Self::Config { .. } => CONFIG_ERROR_CODE,
        }
    }

    /// HTTP status of the failed data call, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Flat `{message, errorcode}` shape handed to callers that only care
    /// about the wire representation.
    #[must_use]
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload { message: self.message().to_string(), errorcode: self.code().to_string() }
    }
}

/// Caller-facing error shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub errorcode: String,
}

impl From<ApiError> for ErrorPayload {
    fn from(err: ApiError) -> Self {
        err.to_payload()
    }
}

/// Result type alias for sfclient operations
pub type Result<T> = std::result::Result<T, ApiError>;
