/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for linkflow-adapter tests

use std::net::TcpListener;

use linkflow_adapter::{ClientConfig, LinkflowClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> LinkflowClient {
    LinkflowClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Base URL on a local port nothing is listening on
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Mock session token for testing
pub fn mock_session_token() -> String {
    "tok_test_session".to_string()
}
