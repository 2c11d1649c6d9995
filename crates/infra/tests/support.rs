#![allow(dead_code)]

use std::io;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use serde_json::json;
use sfclient_common::time::MockClock;
use sfclient_domain::{ClientConfig, Credentials};
use sfclient_infra::{HttpClient, SalesforceClient};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const CLIENT_SECRET: &str = "very-secret-client-value";
pub const PASSWORD: &str = "hunter2-and-security-token";

/// Credentials pointing the login host at `login_url`.
pub fn test_config(login_url: &str) -> ClientConfig {
    ClientConfig::new(
        Credentials::new("test-client-id", CLIENT_SECRET, "api@example.com", PASSWORD)
            .with_login_url(login_url),
    )
}

/// HTTP client that ignores proxy settings so requests reach the mock server.
pub fn local_http() -> HttpClient {
    HttpClient::builder().no_proxy().build().expect("http client should build")
}

/// Client using the real password-grant authenticator against `server`.
pub fn client_for(server: &MockServer, clock: &MockClock) -> SalesforceClient {
    SalesforceClient::builder()
        .config(test_config(&server.uri()))
        .http_client(local_http())
        .clock(Arc::new(clock.clone()))
        .build()
        .expect("client should build")
}

/// Token response body whose `instance_url` is `instance_url`.
pub fn token_body(access_token: &str, instance_url: &str, expires_in: u64) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "instance_url": instance_url,
        "id": "https://login.example.com/id/00Dxx/005xx",
        "token_type": "Bearer",
        "issued_at": "1700000000000",
        "signature": "c2lnbmF0dXJl",
        "expires_in": expires_in
    })
}

/// Answer the next password grant with `access_token`; later grants fall
/// through to mocks mounted afterwards.
pub async fn mount_token_once(server: &MockServer, access_token: &str, expires_in: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body(
                access_token,
                &server.uri(),
                expires_in,
            )),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// `http://127.0.0.1:<port>` where nothing is listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Number of requests `server` received on `request_path`.
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

/// In-memory sink for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a thread-local subscriber writing into this capture.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(self.buffer.clone())
    }
}
