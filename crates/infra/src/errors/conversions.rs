//! Conversions from HTTP responses and transport failures into domain errors.
//!
//! These functions are the only place an `ApiError` describing an HTTP
//! outcome is constructed; the authenticator and the REST client both
//! delegate here.

use reqwest::{Error as HttpError, StatusCode};
use serde_json::Value;
use sfclient_domain::constants::{
    AUTHENTICATION_FAILED_CODE, DEFAULT_AUTH_ERROR_MESSAGE, DEFAULT_ERROR_MESSAGE,
};
use sfclient_domain::{ApiError, ApiErrorKind};

/// `message` / `errorCode` pair extracted from an error response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parse a data API error body.
    ///
    /// The REST API answers with an array of `{message, errorCode}` objects;
    /// only the first element is used. Bodies that are not JSON, or lack the
    /// fields, yield an empty `ErrorBody`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_value(&first_element(text), "message", "errorCode")
    }

    /// Parse a token endpoint error body.
    ///
    /// Accepts the data API shape as well as the OAuth2 `{error,
    /// error_description}` shape.
    #[must_use]
    pub fn parse_oauth(text: &str) -> Self {
        let value = first_element(text);
        let data_shape = Self::from_value(&value, "message", "errorCode");
        let oauth_shape = Self::from_value(&value, "error_description", "error");

        Self {
            message: data_shape.message.or(oauth_shape.message),
            code: data_shape.code.or(oauth_shape.code),
        }
    }

    fn from_value(value: &Value, message_key: &str, code_key: &str) -> Self {
        Self { message: string_field(value, message_key), code: string_field(value, code_key) }
    }
}

fn first_element(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items.into_iter().next().unwrap_or(Value::Null),
        Ok(value) => value,
        Err(_) => Value::Null,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/* -------------------------------------------------------------------------- */
/* HTTP responses → ApiError */
/* -------------------------------------------------------------------------- */

/// Non-success response from a data endpoint.
#[must_use]
pub fn request_error(status: StatusCode, body: &str) -> ApiError {
    let parsed = ErrorBody::parse(body);
    ApiError::request(
        status.as_u16(),
        parsed.message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        parsed.code.unwrap_or_else(|| status.as_u16().to_string()),
    )
}

/// A 2xx response where only `204 No Content` counts as success.
#[must_use]
pub fn unexpected_status_error(status: StatusCode) -> ApiError {
    ApiError::request(
        status.as_u16(),
        format!("Expected 204 No Content, received {status}"),
        status.as_u16().to_string(),
    )
}

/// Non-success response from the token endpoint.
#[must_use]
pub fn authentication_error(status: StatusCode, body: &str) -> ApiError {
    let parsed = ErrorBody::parse_oauth(body);
    let message = parsed
        .message
        .unwrap_or_else(|| format!("{DEFAULT_AUTH_ERROR_MESSAGE} (status {})", status.as_u16()));
    ApiError::authentication(
        message,
        parsed.code.unwrap_or_else(|| AUTHENTICATION_FAILED_CODE.to_string()),
    )
}

/// Re-label any failure raised while authenticating as `AuthenticationFailed`.
///
/// Errors that already carry that kind pass through untouched.
#[must_use]
pub fn into_authentication_failure(err: ApiError) -> ApiError {
    if err.kind() == ApiErrorKind::AuthenticationFailed {
        return err;
    }
    ApiError::authentication(err.message(), AUTHENTICATION_FAILED_CODE)
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

/// Failure where no HTTP response was received.
#[must_use]
pub fn transport_error(err: &HttpError) -> ApiError {
    if err.is_timeout() {
        return ApiError::transport(format!("HTTP request timed out: {err}"));
    }

    if err.is_connect() {
        return ApiError::transport(format!("HTTP connection failure: {err}"));
    }

    ApiError::transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_body_uses_first_element() {
        let body = r#"[{"message":"LIMIT_EXCEEDED","errorCode":"REQUEST_LIMIT_EXCEEDED"},
                      {"message":"second","errorCode":"IGNORED"}]"#;

        let parsed = ErrorBody::parse(body);

        assert_eq!(parsed.message.as_deref(), Some("LIMIT_EXCEEDED"));
        assert_eq!(parsed.code.as_deref(), Some("REQUEST_LIMIT_EXCEEDED"));
    }

    #[test]
    fn test_parse_object_body() {
        let parsed = ErrorBody::parse(r#"{"message":"Bad field","errorCode":"INVALID_FIELD"}"#);

        assert_eq!(parsed.message.as_deref(), Some("Bad field"));
        assert_eq!(parsed.code.as_deref(), Some("INVALID_FIELD"));
    }

    #[test]
    fn test_parse_garbage_and_empty_bodies() {
        assert_eq!(ErrorBody::parse("<html>oops</html>"), ErrorBody::default());
        assert_eq!(ErrorBody::parse(""), ErrorBody::default());
        assert_eq!(ErrorBody::parse("[]"), ErrorBody::default());
        assert_eq!(ErrorBody::parse(r#"[{"message":""}]"#), ErrorBody::default());
    }

    #[test]
    fn test_request_error_falls_back_to_status() {
        let err = request_error(StatusCode::BAD_GATEWAY, "upstream down");

        assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
        assert_eq!(err.message(), "An unexpected error occurred.");
        assert_eq!(err.code(), "502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_request_error_prefers_body_fields() {
        let err = request_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"[{"message":"LIMIT_EXCEEDED","errorCode":"REQUEST_LIMIT_EXCEEDED"}]"#,
        );

        assert_eq!(err.message(), "LIMIT_EXCEEDED");
        assert_eq!(err.code(), "REQUEST_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_data_parse_ignores_oauth_fields() {
        let parsed = ErrorBody::parse(r#"{"error":"invalid_grant"}"#);
        assert_eq!(parsed, ErrorBody::default());
    }

    #[test]
    fn test_authentication_error_reads_oauth_shape() {
        let err = authentication_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"authentication failure"}"#,
        );

        assert_eq!(err.kind(), ApiErrorKind::AuthenticationFailed);
        assert_eq!(err.message(), "authentication failure");
        assert_eq!(err.code(), "invalid_grant");
    }

    #[test]
    fn test_authentication_error_fallbacks() {
        let err = authentication_error(StatusCode::SERVICE_UNAVAILABLE, "");

        assert_eq!(err.code(), "AUTHENTICATION_FAILED");
        assert!(err.message().starts_with("Authentication failed"));
        assert!(err.message().contains("503"));
    }

    #[test]
    fn test_unexpected_status_error() {
        let err = unexpected_status_error(StatusCode::OK);

        assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
        assert_eq!(err.code(), "200");
        assert!(err.message().contains("204"));
    }

    #[test]
    fn test_into_authentication_failure() {
        let relabelled = into_authentication_failure(ApiError::transport("dns failure"));
        assert_eq!(relabelled.kind(), ApiErrorKind::AuthenticationFailed);
        assert_eq!(relabelled.message(), "dns failure");
        assert_eq!(relabelled.code(), "AUTHENTICATION_FAILED");

        let original = ApiError::authentication("locked out", "INVALID_LOGIN");
        assert_eq!(into_authentication_failure(original.clone()), original);
    }
}
