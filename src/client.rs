use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credential::{Credential, CredentialProvider, StaticProvider};
use crate::error::Result;
use crate::exec::handle_response;
use crate::metrics::{MetricsCollector, RequestMetrics};
use crate::operation::Operation;
use crate::request::{QueryParams, build_signed_request};
use crate::response::{ResponseMetadata, request_id};
use crate::transport::{ReqwestTransport, Transport};

/// Per-call state threaded through dispatch.
struct ExecutionContext {
    operation: &'static str,
    invocation_id: String,
    started: Instant,
    status: Option<u16>,
    request_id: Option<String>,
}

impl ExecutionContext {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            invocation_id: uuid::Uuid::new_v4().to_string(),
            started: Instant::now(),
            status: None,
            request_id: None,
        }
    }
}

/// Blocking client for the AWS IAM API.
///
/// Cheap to clone; clones share the transport and credential provider.
/// Every operation method blocks the calling thread for the full round trip.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn Transport>,
    metrics: Option<Arc<dyn MetricsCollector>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with an explicit credential.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new client with an explicit credential and custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        Self::with_provider(StaticProvider::new(credential), config)
    }

    /// Creates a new client that asks `provider` for credentials on every call.
    pub fn with_provider(
        provider: impl CredentialProvider + 'static,
        config: ClientConfig,
    ) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(provider, config, transport)
    }

    /// Creates a new client sending requests through `transport`.
    pub fn with_transport(
        provider: impl CredentialProvider + 'static,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            credentials: Arc::new(provider),
            transport: Arc::new(transport),
            metrics: None,
        })
    }

    /// Reports one [`RequestMetrics`] per call to `collector`.
    pub fn with_metrics(mut self, collector: impl MetricsCollector + 'static) -> Self {
        self.metrics = Some(Arc::new(collector));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends any [`Operation`] and returns its typed result.
    ///
    /// All generated operation methods go through here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IamError::Service`] when IAM rejected the request and
    /// one of the client-side variants when no usable response was obtained.
    pub fn invoke<O: Operation>(&self, operation: O) -> Result<O::Output> {
        self.invoke_with_metadata(operation).map(|(output, _)| output)
    }

    /// Like [`Client::invoke`], also returning the request id IAM assigned
    /// to the call.
    ///
    /// ```no_run
    /// use rs_aws_iam::{Client, GetUserRequest};
    ///
    /// # fn example(client: &Client) -> rs_aws_iam::Result<()> {
    /// let (resp, meta) = client.invoke_with_metadata(GetUserRequest::new("bob"))?;
    /// println!("{} (request {:?})", resp.user.arn, meta.request_id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn invoke_with_metadata<O: Operation>(
        &self,
        operation: O,
    ) -> Result<(O::Output, ResponseMetadata)> {
        let mut ctx = ExecutionContext::new(O::NAME);
        let span = tracing::debug_span!(
            "iam_request",
            operation = ctx.operation,
            invocation_id = %ctx.invocation_id,
        );
        let _enter = span.enter();

        let result = self.dispatch(&operation, &mut ctx);
        let elapsed = ctx.started.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;

        match &result {
            Ok(_) => debug!(
                status = ?ctx.status,
                request_id = ?ctx.request_id,
                elapsed_ms,
                "request completed"
            ),
            Err(err) if err.is_service_error() => warn!(
                code = err.error_code().unwrap_or_default(),
                status = ?ctx.status,
                request_id = ?err.request_id(),
                elapsed_ms,
                "service rejected request"
            ),
            Err(err) => warn!(error = %err, elapsed_ms, "request failed on the client side"),
        }

        if let Some(metrics) = &self.metrics {
            let (request_id, error_code, client_error) = match &result {
                Ok(_) => (ctx.request_id.clone(), None, false),
                Err(err) => (
                    err.request_id().map(str::to_string),
                    err.error_code().map(str::to_string),
                    err.is_client_error(),
                ),
            };
            metrics.record(&RequestMetrics {
                operation: ctx.operation,
                invocation_id: ctx.invocation_id.clone(),
                elapsed,
                status: ctx.status,
                request_id,
                error_code,
                client_error,
            });
        }

        result.map(|output| {
            (
                output,
                ResponseMetadata {
                    request_id: ctx.request_id,
                    invocation_id: ctx.invocation_id,
                },
            )
        })
    }

    fn dispatch<O: Operation>(&self, operation: &O, ctx: &mut ExecutionContext) -> Result<O::Output> {
        let resolved;
        let credential = match operation.credentials() {
            Some(credential) => credential,
            None => {
                resolved = self.credentials.resolve()?;
                &resolved
            }
        };

        let mut params = QueryParams::new(O::NAME, self.config.api_version());
        operation.marshal(&mut params)?;

        let request = build_signed_request(
            &params,
            credential,
            &self.config,
            &ctx.invocation_id,
            Utc::now(),
        )?;
        debug!(body_len = request.body().len(), "sending request");

        let response = self.transport.send(request)?;
        ctx.status = Some(response.status().as_u16());

        let body = handle_response(response)?;
        ctx.request_id = request_id(&body);
        O::unmarshal(&body)
    }
}
