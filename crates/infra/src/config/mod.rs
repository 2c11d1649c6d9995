//! Configuration loading
//!
//! Builds a validated [`ClientConfig`](sfclient_domain::ClientConfig) from
//! environment variables or a JSON / TOML file.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_from_env, load_from_file, load_from_lookup, parse_config, probe_config_paths,
};
