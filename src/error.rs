use std::fmt;

use thiserror::Error;

/// Maximum characters to include in error message body for debugging.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when using the IAM SDK.
///
/// Variants fall into two disjoint families. [`IamError::Service`] means the
/// service processed the request and rejected it. Every other variant means
/// the call never reached the service or could not be completed locally.
#[derive(Debug, Error)]
pub enum IamError {
    /// HTTP/network layer error from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The HTTP request could not be assembled.
    #[error("invalid HTTP request: {0}")]
    InvalidRequest(#[from] http::Error),

    /// IAM returned an error response.
    #[error(transparent)]
    Service(ServiceError),

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),

    /// Credential not found or invalid.
    #[error("credential error: {0}")]
    Credential(String),

    /// Malformed XML in a response body.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Response deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] quick_xml::DeError),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Validation error for request parameters.
    #[error("validation error: {0}")]
    Validation(String),
}

impl IamError {
    /// Returns `true` if the service processed and rejected the request.
    pub fn is_service_error(&self) -> bool {
        matches!(self, IamError::Service(_))
    }

    /// Returns `true` if the request never reached the service or its
    /// response could not be handled locally.
    pub fn is_client_error(&self) -> bool {
        !self.is_service_error()
    }

    /// Returns `true` if the error is potentially recoverable by retrying.
    ///
    /// Retryable errors include:
    /// - Network/HTTP errors from the transport
    /// - `ServiceFailure`, throttling and 5xx responses
    ///
    /// Non-retryable errors include:
    /// - Credential, signing and validation errors
    /// - Every other service rejection
    pub fn is_retryable(&self) -> bool {
        match self {
            IamError::HttpClient(_) => true,
            IamError::Service(err) => {
                err.kind == ServiceErrorKind::ServiceFailure
                    || err.code == "Throttling"
                    || err.status >= 500
            }
            IamError::InvalidRequest(_)
            | IamError::Signature(_)
            | IamError::Credential(_)
            | IamError::Xml(_)
            | IamError::Deserialize(_)
            | IamError::Config(_)
            | IamError::Validation(_) => false,
        }
    }

    /// Returns the request ID if this is a service error that carried one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            IamError::Service(err) => err.request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the wire error code if this is a service error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            IamError::Service(err) => Some(&err.code),
            _ => None,
        }
    }

    /// Returns the classified kind if this is a service error.
    pub fn service_error_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            IamError::Service(err) => Some(err.kind),
            _ => None,
        }
    }
}

impl From<ServiceError> for IamError {
    fn from(err: ServiceError) -> Self {
        IamError::Service(err)
    }
}

/// A specialized Result type for IAM operations.
pub type Result<T> = std::result::Result<T, IamError>;

/// Typed classification of an IAM error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ServiceErrorKind {
    ConcurrentModification,
    CredentialReportExpired,
    CredentialReportNotPresent,
    CredentialReportNotReady,
    DeleteConflict,
    DuplicateCertificate,
    DuplicateSshPublicKey,
    EntityAlreadyExists,
    EntityTemporarilyUnmodifiable,
    InvalidAuthenticationCode,
    InvalidCertificate,
    InvalidInput,
    InvalidPublicKey,
    InvalidUserType,
    KeyPairMismatch,
    LimitExceeded,
    MalformedCertificate,
    MalformedPolicyDocument,
    NoSuchEntity,
    PasswordPolicyViolation,
    PolicyEvaluation,
    PolicyNotAttachable,
    ReportGenerationLimitExceeded,
    ServiceFailure,
    ServiceNotSupported,
    UnmodifiableEntity,
    UnrecognizedPublicKeyEncoding,
    /// The code did not match any known kind.
    Unknown,
}

/// Error-code matchers, consulted in order. First match wins.
const ERROR_CODES: &[(&str, ServiceErrorKind)] = &[
    ("ConcurrentModification", ServiceErrorKind::ConcurrentModification),
    ("ReportExpired", ServiceErrorKind::CredentialReportExpired),
    ("ReportNotPresent", ServiceErrorKind::CredentialReportNotPresent),
    ("ReportInProgress", ServiceErrorKind::CredentialReportNotReady),
    ("DeleteConflict", ServiceErrorKind::DeleteConflict),
    ("DuplicateCertificate", ServiceErrorKind::DuplicateCertificate),
    ("DuplicateSSHPublicKey", ServiceErrorKind::DuplicateSshPublicKey),
    ("EntityAlreadyExists", ServiceErrorKind::EntityAlreadyExists),
    (
        "EntityTemporarilyUnmodifiable",
        ServiceErrorKind::EntityTemporarilyUnmodifiable,
    ),
    ("InvalidAuthenticationCode", ServiceErrorKind::InvalidAuthenticationCode),
    ("InvalidCertificate", ServiceErrorKind::InvalidCertificate),
    ("InvalidInput", ServiceErrorKind::InvalidInput),
    ("InvalidPublicKey", ServiceErrorKind::InvalidPublicKey),
    ("InvalidUserType", ServiceErrorKind::InvalidUserType),
    ("KeyPairMismatch", ServiceErrorKind::KeyPairMismatch),
    ("LimitExceeded", ServiceErrorKind::LimitExceeded),
    ("MalformedCertificate", ServiceErrorKind::MalformedCertificate),
    ("MalformedPolicyDocument", ServiceErrorKind::MalformedPolicyDocument),
    ("NoSuchEntity", ServiceErrorKind::NoSuchEntity),
    ("PasswordPolicyViolation", ServiceErrorKind::PasswordPolicyViolation),
    ("PolicyEvaluation", ServiceErrorKind::PolicyEvaluation),
    ("PolicyNotAttachable", ServiceErrorKind::PolicyNotAttachable),
    (
        "ReportGenerationLimitExceeded",
        ServiceErrorKind::ReportGenerationLimitExceeded,
    ),
    ("ServiceFailure", ServiceErrorKind::ServiceFailure),
    ("NotSupportedService", ServiceErrorKind::ServiceNotSupported),
    ("UnmodifiableEntity", ServiceErrorKind::UnmodifiableEntity),
    (
        "UnrecognizedPublicKeyEncoding",
        ServiceErrorKind::UnrecognizedPublicKeyEncoding,
    ),
];

impl ServiceErrorKind {
    /// Classifies a wire error code.
    pub fn from_code(code: &str) -> Self {
        ERROR_CODES
            .iter()
            .find(|(wire, _)| *wire == code)
            .map_or(ServiceErrorKind::Unknown, |(_, kind)| *kind)
    }

    /// Returns the wire code for this kind, or `None` for [`ServiceErrorKind::Unknown`].
    pub fn code(self) -> Option<&'static str> {
        ERROR_CODES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(wire, _)| *wire)
    }
}

/// Which side of the exchange the service blames for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorType {
    /// The request was at fault (`Sender`).
    Sender,
    /// The service was at fault (`Receiver`).
    Receiver,
    #[default]
    Unknown,
}

impl ErrorType {
    pub(crate) fn parse(value: Option<&str>) -> Self {
        match value {
            Some("Sender") => ErrorType::Sender,
            Some("Receiver") => ErrorType::Receiver,
            _ => ErrorType::Unknown,
        }
    }
}

/// An error response returned by IAM.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// Classified kind of `code`.
    pub kind: ServiceErrorKind,
    /// Error code exactly as returned by the service.
    pub code: String,
    /// Human readable message from the service.
    pub message: String,
    /// HTTP status code of the response.
    pub status: u16,
    /// Request ID assigned by the service, when present.
    pub request_id: Option<String>,
    /// `Sender` or `Receiver`, when present.
    pub error_type: ErrorType,
}

impl ServiceError {
    /// Creates a service error, classifying `code`.
    pub fn new(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        let code = code.into();
        Self {
            kind: ServiceErrorKind::from_code(&code),
            code,
            message: message.into(),
            status,
            request_id,
            error_type: ErrorType::Unknown,
        }
    }

    pub(crate) fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service error (HTTP {}", self.status)?;
        if let Some(request_id) = &self.request_id {
            write!(f, ", RequestId: {request_id}")?;
        }
        write!(f, "): [{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ConcurrentModification", ServiceErrorKind::ConcurrentModification)]
    #[case("ReportExpired", ServiceErrorKind::CredentialReportExpired)]
    #[case("ReportNotPresent", ServiceErrorKind::CredentialReportNotPresent)]
    #[case("ReportInProgress", ServiceErrorKind::CredentialReportNotReady)]
    #[case("DeleteConflict", ServiceErrorKind::DeleteConflict)]
    #[case("DuplicateCertificate", ServiceErrorKind::DuplicateCertificate)]
    #[case("DuplicateSSHPublicKey", ServiceErrorKind::DuplicateSshPublicKey)]
    #[case("EntityAlreadyExists", ServiceErrorKind::EntityAlreadyExists)]
    #[case(
        "EntityTemporarilyUnmodifiable",
        ServiceErrorKind::EntityTemporarilyUnmodifiable
    )]
    #[case("InvalidAuthenticationCode", ServiceErrorKind::InvalidAuthenticationCode)]
    #[case("InvalidCertificate", ServiceErrorKind::InvalidCertificate)]
    #[case("InvalidInput", ServiceErrorKind::InvalidInput)]
    #[case("InvalidPublicKey", ServiceErrorKind::InvalidPublicKey)]
    #[case("InvalidUserType", ServiceErrorKind::InvalidUserType)]
    #[case("KeyPairMismatch", ServiceErrorKind::KeyPairMismatch)]
    #[case("LimitExceeded", ServiceErrorKind::LimitExceeded)]
    #[case("MalformedCertificate", ServiceErrorKind::MalformedCertificate)]
    #[case("MalformedPolicyDocument", ServiceErrorKind::MalformedPolicyDocument)]
    #[case("NoSuchEntity", ServiceErrorKind::NoSuchEntity)]
    #[case("PasswordPolicyViolation", ServiceErrorKind::PasswordPolicyViolation)]
    #[case("PolicyEvaluation", ServiceErrorKind::PolicyEvaluation)]
    #[case("PolicyNotAttachable", ServiceErrorKind::PolicyNotAttachable)]
    #[case(
        "ReportGenerationLimitExceeded",
        ServiceErrorKind::ReportGenerationLimitExceeded
    )]
    #[case("ServiceFailure", ServiceErrorKind::ServiceFailure)]
    #[case("NotSupportedService", ServiceErrorKind::ServiceNotSupported)]
    #[case("UnmodifiableEntity", ServiceErrorKind::UnmodifiableEntity)]
    #[case(
        "UnrecognizedPublicKeyEncoding",
        ServiceErrorKind::UnrecognizedPublicKeyEncoding
    )]
    fn classifies_known_code(#[case] code: &str, #[case] expected: ServiceErrorKind) {
        assert_eq!(ServiceErrorKind::from_code(code), expected);
        assert_eq!(expected.code(), Some(code));
    }

    #[rstest]
    #[case("Throttling")]
    #[case("noSuchEntity")]
    #[case("NoSuchEntityException")]
    #[case("")]
    fn unknown_code_falls_back(#[case] code: &str) {
        assert_eq!(ServiceErrorKind::from_code(code), ServiceErrorKind::Unknown);
    }

    #[test]
    fn unknown_kind_has_no_code() {
        assert_eq!(ServiceErrorKind::Unknown.code(), None);
    }

    #[test]
    fn error_code_table_has_no_duplicates() {
        for (idx, (code, kind)) in ERROR_CODES.iter().enumerate() {
            for (other_code, other_kind) in &ERROR_CODES[idx + 1..] {
                assert_ne!(code, other_code);
                assert_ne!(kind, other_kind);
            }
        }
    }

    #[test]
    fn unknown_service_error_keeps_code_and_message() {
        let err = ServiceError::new(400, "OptInRequired", "Opt in first.", None);
        assert_eq!(err.kind, ServiceErrorKind::Unknown);
        assert_eq!(err.code, "OptInRequired");
        assert_eq!(err.message, "Opt in first.");
        assert_eq!(err.status, 400);
    }

    #[test]
    fn service_error_display() {
        let err = IamError::from(ServiceError::new(
            404,
            "NoSuchEntity",
            "The user with name bob cannot be found.",
            Some("req-123".to_string()),
        ));
        let msg = err.to_string();
        assert!(msg.contains("HTTP 404"));
        assert!(msg.contains("req-123"));
        assert!(msg.contains("[NoSuchEntity]"));
        assert!(msg.contains("The user with name bob cannot be found."));
    }

    #[test]
    fn families_are_disjoint() {
        let service = IamError::from(ServiceError::new(409, "EntityAlreadyExists", "", None));
        assert!(service.is_service_error());
        assert!(!service.is_client_error());
        assert_eq!(
            service.service_error_kind(),
            Some(ServiceErrorKind::EntityAlreadyExists)
        );

        let client = IamError::Validation("UserName is required".to_string());
        assert!(client.is_client_error());
        assert!(!client.is_service_error());
        assert_eq!(client.service_error_kind(), None);
        assert_eq!(client.error_code(), None);
    }

    #[test]
    fn retryable_service_errors() {
        let failure = IamError::from(ServiceError::new(500, "ServiceFailure", "", None));
        assert!(failure.is_retryable());

        let throttled = IamError::from(ServiceError::new(400, "Throttling", "", None));
        assert!(throttled.is_retryable());

        let missing = IamError::from(ServiceError::new(404, "NoSuchEntity", "", None));
        assert!(!missing.is_retryable());

        assert!(!IamError::Credential("none".into()).is_retryable());
    }

    #[test]
    fn error_type_parse() {
        assert_eq!(ErrorType::parse(Some("Sender")), ErrorType::Sender);
        assert_eq!(ErrorType::parse(Some("Receiver")), ErrorType::Receiver);
        assert_eq!(ErrorType::parse(None), ErrorType::Unknown);
    }

    #[test]
    fn credential_error_display() {
        let err = IamError::Credential("no credential found".to_string());
        assert_eq!(err.to_string(), "credential error: no credential found");
    }

    #[test]
    fn truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_str_multibyte() {
        let s = "中文测试数据";
        assert_eq!(truncate_str(s, 4), "中文测试");
    }
}
