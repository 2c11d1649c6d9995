//! Time utilities and abstractions
//!
//! Token expiry is computed against wall-clock milliseconds since the UNIX
//! epoch. Everything that reads "now" goes through [`Clock`] so tests can
//! substitute a [`MockClock`].
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use sfclient_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::at_millis(0);
//! clock.advance(Duration::from_secs(3000));
//! assert_eq!(clock.millis_since_epoch(), 3_000_000);
//! ```

pub mod clock;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
