//! XML envelopes of the IAM Query protocol.
//!
//! A successful call answers with
//! `<{Op}Response><{Op}Result>…</{Op}Result><ResponseMetadata>…</ResponseMetadata></{Op}Response>`,
//! a failed one with `<ErrorResponse><Error>…</Error><RequestId>…</RequestId></ErrorResponse>`.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{IamError, Result};

/// IAM error response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorDetail {
    #[serde(rename = "Type")]
    pub error_type: Option<String>,
    pub code: String,
    pub message: Option<String>,
}

/// Metadata of a successful call, returned by [`crate::Client::invoke_with_metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// `ResponseMetadata/RequestId` from the response body. Quote it when
    /// contacting AWS support about a call.
    pub request_id: Option<String>,
    /// Value sent in the `amz-sdk-invocation-id` header.
    pub invocation_id: String,
}

/// Returns the raw inner XML of the first element whose local name is `name`.
fn element_inner<'a>(body: &'a str, name: &str) -> Result<Option<Cow<'a, str>>> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event()? {
            Event::Start(start) if start.local_name().as_ref() == name.as_bytes() => {
                return Ok(Some(reader.read_text(start.name())?));
            }
            Event::Empty(start) if start.local_name().as_ref() == name.as_bytes() => {
                return Ok(Some(Cow::Borrowed("")));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Decodes the `<{operation}Result>` element of a successful response.
///
/// Use this from [`crate::Operation::unmarshal`] when implementing an
/// operation outside the built-in table.
pub fn unmarshal_result<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    let element = format!("{}Result", operation);
    let inner = element_inner(body, &element)?.ok_or_else(|| {
        IamError::Deserialize(quick_xml::DeError::Custom(format!(
            "response has no <{}> element",
            element
        )))
    })?;
    let wrapped = format!("<{0}>{1}</{0}>", element, inner);
    Ok(quick_xml::de::from_str(&wrapped)?)
}

/// Extracts `ResponseMetadata/RequestId` from a response body, if present.
pub(crate) fn request_id(body: &str) -> Option<String> {
    element_inner(body, "RequestId")
        .ok()
        .flatten()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct UserFields {
        user_name: String,
        path: Option<String>,
    }

    #[test]
    fn unmarshal_result_element() {
        let xml = r#"<GetUserResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetUserResult>
    <UserName>bob &amp; alice</UserName>
    <Path>/</Path>
  </GetUserResult>
  <ResponseMetadata>
    <RequestId>7a62c49f-347e-4fc4-9331-6e8eEXAMPLE</RequestId>
  </ResponseMetadata>
</GetUserResponse>"#;
        let fields: UserFields = unmarshal_result("GetUser", xml).unwrap();
        assert_eq!(fields.user_name, "bob & alice");
        assert_eq!(fields.path.as_deref(), Some("/"));
        assert_eq!(
            request_id(xml).as_deref(),
            Some("7a62c49f-347e-4fc4-9331-6e8eEXAMPLE")
        );
    }

    #[test]
    fn missing_result_element_is_deserialize_error() {
        let xml = "<GetUserResponse><ResponseMetadata/></GetUserResponse>";
        let err = unmarshal_result::<UserFields>("GetUser", xml).unwrap_err();
        assert!(matches!(err, IamError::Deserialize(_)));
        assert!(err.to_string().contains("<GetUserResult>"));
    }

    #[test]
    fn request_id_absent() {
        assert_eq!(request_id("<DeleteUserResponse/>"), None);
        assert_eq!(request_id(""), None);
    }

    #[test]
    fn deserialize_error_response() {
        let xml = r#"<ErrorResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <Error>
    <Type>Sender</Type>
    <Code>NoSuchEntity</Code>
    <Message>The user with name bob cannot be found.</Message>
  </Error>
  <RequestId>err-req-001</RequestId>
</ErrorResponse>"#;
        let resp: ErrorResponse = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(resp.error.code, "NoSuchEntity");
        assert_eq!(resp.error.error_type.as_deref(), Some("Sender"));
        assert_eq!(
            resp.error.message.as_deref(),
            Some("The user with name bob cannot be found.")
        );
        assert_eq!(resp.request_id.as_deref(), Some("err-req-001"));
    }
}
