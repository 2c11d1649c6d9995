//! REST client for the CRM data API
//!
//! [`SalesforceClient`] ensures a valid bearer token through the
//! [`TokenManager`](crate::auth::TokenManager) before every call and then
//! issues exactly one request under `{instance_url}/services/data/v{version}`.

pub mod client;

pub use client::{SalesforceClient, SalesforceClientBuilder};
