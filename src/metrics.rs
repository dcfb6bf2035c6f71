use std::time::Duration;

/// Timing and outcome of one operation call.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Remote operation name, e.g. `CreateUser`.
    pub operation: &'static str,
    /// Value sent in the `amz-sdk-invocation-id` header.
    pub invocation_id: String,
    /// Wall time from dispatch start to result.
    pub elapsed: Duration,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// IAM request id, from the success body or the error response.
    pub request_id: Option<String>,
    /// Service error code, for rejected calls.
    pub error_code: Option<String>,
    /// `true` when the call failed before or outside the service.
    pub client_error: bool,
}

impl RequestMetrics {
    /// Returns `true` if the call produced a result.
    pub fn is_success(&self) -> bool {
        self.error_code.is_none() && !self.client_error
    }
}

/// Receives one [`RequestMetrics`] per completed call.
///
/// Collectors run on the calling thread after the response is handled and
/// must not fail the call.
pub trait MetricsCollector: Send + Sync {
    fn record(&self, metrics: &RequestMetrics);
}

impl<F> MetricsCollector for F
where
    F: Fn(&RequestMetrics) + Send + Sync,
{
    fn record(&self, metrics: &RequestMetrics) {
        self(metrics)
    }
}
