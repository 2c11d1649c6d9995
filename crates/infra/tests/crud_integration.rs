//! Data operations against a mocked instance, authenticated with the real
//! password-grant flow.

use serde_json::json;
use sfclient_common::time::MockClock;
use sfclient_domain::{ApiErrorKind, ErrorPayload};
use sfclient_infra::SalesforceClient;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "support.rs"]
mod support;

use support::{client_for, mount_token_once};

const SOBJECTS: &str = "/services/data/v62.0/sobjects";

async fn authenticated_server() -> (MockServer, SalesforceClient) {
    let server = MockServer::start().await;
    mount_token_once(&server, "T1", 3600).await;
    let client = client_for(&server, &MockClock::at_millis(0));
    (server, client)
}

#[tokio::test]
async fn query_passes_soql_verbatim_with_bearer_token() {
    let (server, client) = authenticated_server().await;
    let soql = "SELECT Id, Name FROM Account WHERE CreatedDate > 2024-01-01T00:00:00Z LIMIT 5";

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .and(query_param("q", soql))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{"attributes": {"type": "Account"}, "Id": "001xx", "Name": "Acme"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client.query(soql).await.unwrap();

    assert_eq!(body["done"], true);
    assert_eq!(body["records"][0]["Id"], "001xx");
}

#[tokio::test]
async fn server_error_array_body_is_unwrapped() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!([
            {"message": "LIMIT_EXCEEDED", "errorCode": "REQUEST_LIMIT_EXCEEDED"}
        ])))
        .mount(&server)
        .await;

    let err = client.query("SELECT Id FROM Account").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
    assert_eq!(err.message(), "LIMIT_EXCEEDED");
    assert_eq!(err.code(), "REQUEST_LIMIT_EXCEEDED");
    assert_eq!(err.status(), Some(500));

    let payload = ErrorPayload::from(err);
    assert_eq!(payload.message, "LIMIT_EXCEEDED");
    assert_eq!(payload.errorcode, "REQUEST_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn error_without_body_falls_back_to_status() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>Service Unavailable</html>"))
        .mount(&server)
        .await;

    let err = client.query("SELECT Id FROM Account").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
    assert_eq!(err.message(), "An unexpected error occurred.");
    assert_eq!(err.code(), "503");
}

#[tokio::test]
async fn create_returns_body_unchanged() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("POST"))
        .and(path(format!("{SOBJECTS}/Account")))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({"Name": "Acme"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "001xx", "success": true, "errors": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = client.create("Account", &json!({"Name": "Acme"})).await.unwrap();

    assert_eq!(body, json!({"id": "001xx", "success": true, "errors": []}));
}

#[tokio::test]
async fn create_accepts_typed_records() {
    #[derive(serde::Serialize)]
    struct Contact<'a> {
        #[serde(rename = "LastName")]
        last_name: &'a str,
        #[serde(rename = "Email")]
        email: &'a str,
    }

    let (server, client) = authenticated_server().await;
    Mock::given(method("POST"))
        .and(path(format!("{SOBJECTS}/Contact")))
        .and(body_json(json!({"LastName": "Lovelace", "Email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "003xx"})))
        .mount(&server)
        .await;

    let record = Contact { last_name: "Lovelace", email: "ada@example.com" };
    let body = client.create("Contact", &record).await.unwrap();

    assert_eq!(body["id"], "003xx");
}

#[tokio::test]
async fn create_validation_error_is_request_failure() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("POST"))
        .and(path(format!("{SOBJECTS}/Account")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
            "message": "Required fields are missing: [Name]",
            "errorCode": "REQUIRED_FIELD_MISSING",
            "fields": ["Name"]
        }])))
        .mount(&server)
        .await;

    let err = client.create("Account", &json!({})).await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
    assert_eq!(err.code(), "REQUIRED_FIELD_MISSING");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn update_and_delete_succeed_on_no_content() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{SOBJECTS}/Account/001xx")))
        .and(body_json(json!({"Name": "Acme Corp"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{SOBJECTS}/Account/001xx")))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.update("Account", "001xx", &json!({"Name": "Acme Corp"})).await.unwrap());
    assert!(client.delete("Account", "001xx").await.unwrap());
}

#[tokio::test]
async fn other_success_statuses_raise_instead_of_false() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "001xx"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let err = client.update("Account", "001xx", &json!({"Name": "x"})).await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
    assert_eq!(err.code(), "200");

    let err = client.delete("Account", "001xx").await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::RequestFailed);
    assert_eq!(err.code(), "202");
}

#[tokio::test]
async fn delete_missing_record_is_request_failure() {
    let (server, client) = authenticated_server().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!([{
            "errorCode": "NOT_FOUND",
            "message": "The requested resource does not exist"
        }])))
        .mount(&server)
        .await;

    let err = client.delete("Account", "001missing").await.unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.message(), "The requested resource does not exist");
}

#[tokio::test]
async fn unreachable_instance_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(support::TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(support::token_body(
                "T1",
                &support::closed_port_url(),
                3600,
            )),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &MockClock::at_millis(0));
    let err = client.query("SELECT Id FROM Account").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::TransportFailed);
    assert_eq!(err.code(), "UNKNOWN_ERROR");
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn api_version_comes_from_configuration() {
    let server = MockServer::start().await;
    mount_token_once(&server, "T1", 3600).await;
    Mock::given(method("GET"))
        .and(path("/services/data/v59.0/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SalesforceClient::builder()
        .config(support::test_config(&server.uri()).with_api_version("59.0"))
        .http_client(support::local_http())
        .build()
        .unwrap();

    assert_eq!(client.api_version(), "59.0");
    client.query("SELECT Id FROM Account").await.unwrap();
}
