//! Response handling shared by every operation.

use http::{Response, StatusCode};

use crate::error::{ErrorType, IamError, MAX_ERROR_BODY_CHARS, Result, ServiceError, truncate_str};
use crate::response::ErrorResponse;

/// Request id header set by IAM on every response.
const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

fn header_request_id(response: &Response<String>) -> Option<String> {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Parses an error response body and returns the classified service error.
pub(crate) fn parse_error_response(
    status: StatusCode,
    text: &str,
    header_request_id: Option<String>,
) -> IamError {
    match quick_xml::de::from_str::<ErrorResponse>(text) {
        Ok(envelope) => ServiceError::new(
            status.as_u16(),
            envelope.error.code,
            envelope.error.message.unwrap_or_default(),
            envelope.request_id.or(header_request_id),
        )
        .with_error_type(ErrorType::parse(envelope.error.error_type.as_deref()))
        .into(),
        Err(_) => ServiceError::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            format!(
                "HTTP {} with body: {}",
                status,
                truncate_str(text, MAX_ERROR_BODY_CHARS)
            ),
            header_request_id,
        )
        .into(),
    }
}

/// Returns the body of a successful response, or the service error.
pub(crate) fn handle_response(response: Response<String>) -> Result<String> {
    let status = response.status();
    let request_id = header_request_id(&response);
    let text = response.into_body();

    if status.is_success() {
        Ok(text)
    } else {
        Err(parse_error_response(status, &text, request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceErrorKind;

    fn response(status: u16, body: &str) -> Response<String> {
        Response::builder()
            .status(status)
            .header("x-amzn-RequestId", "header-req-id")
            .body(body.to_string())
            .unwrap()
    }

    #[test]
    fn success_returns_body() {
        let body = handle_response(response(200, "<ok/>")).unwrap();
        assert_eq!(body, "<ok/>");
    }

    #[test]
    fn success_accepts_empty_body() {
        let body = handle_response(response(200, "")).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn error_envelope_is_classified() {
        let xml = r#"<ErrorResponse>
  <Error>
    <Type>Sender</Type>
    <Code>EntityAlreadyExists</Code>
    <Message>User with name bob already exists.</Message>
  </Error>
  <RequestId>body-req-id</RequestId>
</ErrorResponse>"#;
        let err = handle_response(response(409, xml)).unwrap_err();
        match err {
            IamError::Service(err) => {
                assert_eq!(err.kind, ServiceErrorKind::EntityAlreadyExists);
                assert_eq!(err.code, "EntityAlreadyExists");
                assert_eq!(err.message, "User with name bob already exists.");
                assert_eq!(err.status, 409);
                assert_eq!(err.request_id.as_deref(), Some("body-req-id"));
                assert_eq!(err.error_type, ErrorType::Sender);
            }
            other => panic!("expected IamError::Service, got: {:?}", other),
        }
    }

    #[test]
    fn request_id_falls_back_to_header() {
        let xml = "<ErrorResponse><Error><Code>ServiceFailure</Code></Error></ErrorResponse>";
        let err = handle_response(response(500, xml)).unwrap_err();
        assert_eq!(err.request_id(), Some("header-req-id"));
        assert_eq!(err.service_error_kind(), Some(ServiceErrorKind::ServiceFailure));
    }

    #[test]
    fn unparseable_error_body_is_still_service_error() {
        let err = handle_response(response(502, "Bad Gateway")).unwrap_err();
        assert!(err.is_service_error());
        match err {
            IamError::Service(err) => {
                assert_eq!(err.kind, ServiceErrorKind::Unknown);
                assert_eq!(err.code, "Bad Gateway");
                assert_eq!(err.status, 502);
                assert!(err.message.contains("Bad Gateway"));
            }
            other => panic!("expected IamError::Service, got: {:?}", other),
        }
    }

    #[test]
    fn long_error_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = handle_response(response(503, &body)).unwrap_err();
        match err {
            IamError::Service(err) => assert!(err.message.len() < 300),
            other => panic!("expected IamError::Service, got: {:?}", other),
        }
    }
}
