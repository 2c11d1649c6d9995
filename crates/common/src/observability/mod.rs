//! Observability primitives
//!
//! The library itself only emits `tracing` events. Applications embedding it
//! call [`init_tracing`] (or install their own subscriber) to see them.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LoggingConfig};
