//! # sfclient Domain
//!
//! Data types shared by every sfclient crate.
//!
//! This crate contains:
//! - Credential and client configuration structures
//! - The cached bearer-token model and its expiry rules
//! - The error taxonomy and `Result` alias
//! - Protocol constants (paths, default URLs, fallback codes)
//!
//! ## Architecture
//! - No dependencies on other sfclient crates
//! - No I/O: everything here is pure data and pure functions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
