//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a required variable is unset, falls back to loading from file;
//!    invalid values in a complete environment are reported, not skipped
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SFCLIENT_CLIENT_ID`: OAuth client id (required)
//! - `SFCLIENT_CLIENT_SECRET`: OAuth client secret (required)
//! - `SFCLIENT_USERNAME`: API user (required)
//! - `SFCLIENT_PASSWORD`: API user password, security token appended if the
//!   org requires one (required)
//! - `SFCLIENT_LOGIN_URL`: Login host, defaults to `https://login.salesforce.com`
//! - `SFCLIENT_GRANT_TYPE`: Defaults to `password`
//! - `SFCLIENT_API_VERSION`: Defaults to `62.0`
//! - `SFCLIENT_REQUEST_TIMEOUT_SECS`: Per-request timeout, defaults to 30
//! - `SFCLIENT_DEFAULT_TOKEN_LIFETIME_SECS`: Assumed lifetime when the token
//!   response omits `expires_in`, defaults to 7200
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./sfclient.{json,toml}` or `./config.{json,toml}` (current working
//!    directory)
//! 2. `../` and `../../` of the current working directory
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};

use sfclient_domain::{ApiError, ClientConfig, Credentials, Result};

pub const ENV_CLIENT_ID: &str = "SFCLIENT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SFCLIENT_CLIENT_SECRET";
pub const ENV_USERNAME: &str = "SFCLIENT_USERNAME";
pub const ENV_PASSWORD: &str = "SFCLIENT_PASSWORD";
pub const ENV_LOGIN_URL: &str = "SFCLIENT_LOGIN_URL";
pub const ENV_GRANT_TYPE: &str = "SFCLIENT_GRANT_TYPE";
pub const ENV_API_VERSION: &str = "SFCLIENT_API_VERSION";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SFCLIENT_REQUEST_TIMEOUT_SECS";
pub const ENV_DEFAULT_TOKEN_LIFETIME_SECS: &str = "SFCLIENT_DEFAULT_TOKEN_LIFETIME_SECS";

const REQUIRED_ENV_VARS: [&str; 4] =
    [ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_USERNAME, ENV_PASSWORD];

const CONFIG_FILE_NAMES: [&str; 4] =
    ["sfclient.json", "sfclient.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file. When all
/// required variables are present, the environment is authoritative and its
/// parse or validation errors are returned as-is.
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - Configuration cannot be loaded from either source
/// - An environment value or the file format is invalid
/// - Validation fails
pub fn load() -> Result<ClientConfig> {
    load_with(|key| std::env::var(key).ok())
}

fn load_with<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(missing) = first_missing_required(&lookup) {
        tracing::debug!(variable = missing, "Required environment variable not set, trying file");
        return load_from_file(None);
    }

    let config = load_from_lookup(lookup)?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `ApiError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary key lookup
///
/// Same rules as [`load_from_env`]; lets callers (and tests) supply variables
/// without touching the process environment.
///
/// # Errors
/// Returns `ApiError::Config` if required keys are missing or have invalid
/// values.
pub fn load_from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).filter(|value| !value.is_empty()).ok_or_else(|| {
            ApiError::config(format!("Missing required environment variable: {key}"))
        })
    };

    let mut credentials = Credentials::new(
        required(ENV_CLIENT_ID)?,
        required(ENV_CLIENT_SECRET)?,
        required(ENV_USERNAME)?,
        required(ENV_PASSWORD)?,
    );
    if let Some(login_url) = lookup(ENV_LOGIN_URL) {
        credentials = credentials.with_login_url(login_url);
    }
    if let Some(grant_type) = lookup(ENV_GRANT_TYPE) {
        credentials = credentials.with_grant_type(grant_type);
    }

    let mut config = ClientConfig::new(credentials);
    if let Some(api_version) = lookup(ENV_API_VERSION) {
        config = config.with_api_version(api_version);
    }
    if let Some(secs) = parse_secs(&lookup, ENV_REQUEST_TIMEOUT_SECS)? {
        config = config.with_request_timeout_secs(secs);
    }
    if let Some(secs) = parse_secs(&lookup, ENV_DEFAULT_TOKEN_LIFETIME_SECS)? {
        config = config.with_default_token_lifetime_secs(secs);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ApiError::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ApiError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ApiError::config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a path without
/// an extension is read as JSON.
///
/// # Errors
/// Returns `ApiError::Config` if the format is unsupported or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ApiError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ApiError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(ApiError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn first_missing_required<F>(lookup: &F) -> Option<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_ENV_VARS.into_iter().find(|key| !lookup(key).is_some_and(|value| !value.is_empty()))
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| ApiError::config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
