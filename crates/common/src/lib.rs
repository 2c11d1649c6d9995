//! Common utilities shared across sfclient crates.
//!
//! # Modules
//!
//! - [`time`]: wall-clock abstraction so token expiry can be tested without
//!   waiting
//! - [`observability`]: tracing subscriber setup (`observability` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

#[cfg(feature = "observability")]
pub mod observability;

// Re-export commonly used types and traits for convenience
pub use time::{Clock, MockClock, SystemClock};
