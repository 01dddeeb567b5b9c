/*
[INPUT]:  HTTP configuration (base URL, endpoint paths, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::http::{Result, TransportError};

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client configuration
///
/// Only the connect phase has a deadline by default; an unreachable backend
/// is detected by the connection failure, not by a request timeout.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Endpoint paths relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub submit_task: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/api/auth/login".to_string(),
            register: "/api/auth/register".to_string(),
            submit_task: "/api/process".to_string(),
        }
    }
}

/// HTTP implementation of the linkflow backend
#[derive(Debug, Clone)]
pub struct LinkflowClient {
    http_client: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl LinkflowClient {
    /// Create a new client against the default local backend
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client with custom configuration and base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let mut builder = Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| TransportError::Config(format!("Failed to build HTTP client: {e}")))?;

        // a trailing slash keeps any path prefix of the base when joining endpoints
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
            endpoints: Endpoints::default(),
        })
    }

    /// Override the endpoint paths
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build request builder for an endpoint path.
    ///
    /// Endpoint paths resolve under the base URL's path, with or without a
    /// leading `/`.
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body from a 2xx response.
    ///
    /// Non-2xx responses become [`TransportError::Application`] carrying the
    /// backend's `detail`. An empty 2xx body decodes as `{}`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "backend returned error status");
            return Err(TransportError::from_error_body(status, &bytes));
        }

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body).map_err(|e| {
            TransportError::InvalidResponse(format!("Failed to decode response body: {e}"))
        })
    }

    /// Send a request whose successful response body is ignored
    pub(crate) async fn send_unit(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        Err(TransportError::from_error_body(status, &bytes))
    }
}
