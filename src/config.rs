use std::time::Duration;

use http::Uri;

use crate::error::{IamError, Result};

/// Configuration for the IAM client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// IAM API endpoint URL.
    pub endpoint: String,

    /// Region used in the signing scope. IAM is global and signs with
    /// `us-east-1` outside of partitioned regions.
    pub region: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// Value of the `User-Agent` header.
    pub user_agent: String,

    /// Signing name of the service (always "iam").
    pub(crate) service: &'static str,

    /// API version (always "2010-05-08").
    pub(crate) api_version: &'static str,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://iam.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            service: "iam",
            api_version: "2010-05-08",
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the API version sent with every request.
    pub fn api_version(&self) -> &str {
        self.api_version
    }

    /// Checks that the endpoint is an absolute `http`/`https` URI with a host
    /// and that the region is set.
    pub fn validate(&self) -> Result<()> {
        self.endpoint_uri()?;
        if self.region.is_empty() {
            return Err(IamError::Config("region must not be empty".into()));
        }
        Ok(())
    }

    pub(crate) fn endpoint_uri(&self) -> Result<Uri> {
        let uri: Uri = self
            .endpoint
            .parse()
            .map_err(|e| IamError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e)))?;
        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(IamError::Config(format!(
                    "endpoint '{}' must use http or https",
                    self.endpoint
                )));
            }
        }
        if uri.host().is_none() {
            return Err(IamError::Config(format!(
                "endpoint '{}' has no host",
                self.endpoint
            )));
        }
        Ok(uri)
    }
}
