//! Conversion of HTTP outcomes into [`sfclient_domain::ApiError`]

pub mod conversions;

pub use conversions::{
    authentication_error, into_authentication_failure, request_error, transport_error,
    unexpected_status_error, ErrorBody,
};
