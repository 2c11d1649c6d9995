//! # sfclient Infrastructure
//!
//! Everything that touches the network or the filesystem.
//!
//! This crate contains:
//! - HTTP transport wrapper around `reqwest`
//! - OAuth2 password-grant authenticator and the cached-token manager
//! - The REST client (query / create / update / delete)
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Data types and the error taxonomy come from `sfclient-domain`
//! - The wall clock comes from `sfclient-common` so expiry is testable
//! - Every `ApiError` describing an HTTP outcome is built in [`errors`]

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{SalesforceClient, SalesforceClientBuilder};
pub use auth::{Authenticator, PasswordGrantAuthenticator, TokenManager};
pub use http::{HttpClient, HttpClientBuilder};
