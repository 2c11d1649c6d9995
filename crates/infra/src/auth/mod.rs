//! OAuth2 password-grant authentication and bearer-token lifecycle
//!
//! ```text
//! ┌──────────────────┐
//! │  TokenManager    │  single cached token, expiry check, single-flight refresh
//! └────────┬─────────┘
//!          │
//!          └──► Authenticator (trait)
//!                    │
//!                    └──► PasswordGrantAuthenticator  (POST {login_url}/services/oauth2/token)
//! ```
//!
//! The authenticator never caches; the token manager never talks HTTP.

pub mod authenticator;
pub mod token_manager;

pub use authenticator::{Authenticator, PasswordGrantAuthenticator};
pub use token_manager::TokenManager;
