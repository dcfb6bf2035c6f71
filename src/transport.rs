//! The seam between the client and the network.
//!
//! The client hands a fully signed [`http::Request`] to a [`Transport`] and
//! gets the raw [`http::Response`] back. Connection pooling, TLS, proxies and
//! any retry policy belong to the transport.

use crate::config::ClientConfig;
use crate::error::{IamError, Result};

/// Sends signed requests to IAM.
///
/// Implementations must return `Err` only when no HTTP response was
/// obtained; non-2xx responses are returned as `Ok` and classified by the
/// client.
pub trait Transport: Send + Sync {
    /// Sends one request and waits for the complete response.
    fn send(&self, request: http::Request<String>) -> Result<http::Response<String>>;
}

/// Blocking transport backed by [`reqwest::blocking::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport using the timeouts in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| IamError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Wraps an already configured reqwest client.
    pub fn from_client(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: http::Request<String>) -> Result<http::Response<String>> {
        let (parts, body) = request.into_parts();

        let response = self
            .http
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text()?;

        let mut out = http::Response::new(text);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
