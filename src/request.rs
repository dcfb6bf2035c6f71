//! Query-protocol marshalling and request signing for the IAM API.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, USER_AGENT};
use regex::Regex;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{IamError, Result};
use crate::sign::{CanonicalRequest, SigningScope, authorization_header, percent_encode, sha256_hex};

pub(crate) const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Cached regex for managed policy ARN validation.
///
/// ARN format: `arn:{partition}:iam::{account-id|aws}:policy/{path}{name}`
static POLICY_ARN_REGEX: OnceLock<Regex> = OnceLock::new();

fn policy_arn_regex() -> &'static Regex {
    POLICY_ARN_REGEX.get_or_init(|| {
        Regex::new(r"^arn:aws[a-z-]*:iam::(\d{12}|aws):policy/[\w+=,.@/-]{1,512}$")
            .expect("Invalid POLICY_ARN_REGEX pattern")
    })
}

/// Validates a managed policy ARN format.
pub(crate) fn validate_policy_arn(arn: &str) -> Result<()> {
    if !policy_arn_regex().is_match(arn) {
        return Err(IamError::Validation(format!(
            "Invalid PolicyArn format '{}'. Expected: arn:aws:iam::{{12 digit account id|aws}}:policy/{{name}}",
            arn
        )));
    }
    Ok(())
}

/// Flattened parameters of one Query-protocol request.
///
/// Lists are encoded as `Key.member.N` (1-based), nested structures as
/// `Key.member.N.Field`.
#[derive(Debug, Clone)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

/// A structure that can be flattened into list members of a request.
pub trait QueryEntry {
    /// Writes this entry's fields under `prefix` (e.g. `Tags.member.1`).
    fn marshal(&self, prefix: &str, params: &mut QueryParams) -> Result<()>;
}

impl QueryParams {
    pub(crate) fn new(action: &str, version: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), version.to_string());
        Self { params }
    }

    /// Inserts a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Inserts a parameter that the operation cannot do without.
    pub fn required(&mut self, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(IamError::Validation(format!("{} is required", key)));
        }
        self.insert(key, value);
        Ok(())
    }

    /// Inserts a parameter only when it is set.
    pub fn optional<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Inserts the `Marker`/`MaxItems` pagination pair.
    pub fn paging(&mut self, marker: Option<&str>, max_items: Option<i32>) -> Result<()> {
        if let Some(max_items) = max_items
            && !(1..=1000).contains(&max_items)
        {
            return Err(IamError::Validation(format!(
                "MaxItems must be between 1 and 1000, got {}",
                max_items
            )));
        }
        self.optional("Marker", marker);
        self.optional("MaxItems", max_items);
        Ok(())
    }

    /// Inserts a list of scalars as `key.member.N`.
    pub fn list(&mut self, key: &str, values: &[String]) {
        for (idx, value) in values.iter().enumerate() {
            self.insert(format!("{}.member.{}", key, idx + 1), value.as_str());
        }
    }

    /// Inserts a list of scalars that must have at least one member.
    pub fn required_list(&mut self, key: &str, values: &[String]) -> Result<()> {
        if values.is_empty() {
            return Err(IamError::Validation(format!(
                "{} requires at least one member",
                key
            )));
        }
        self.list(key, values);
        Ok(())
    }

    /// Inserts a list of structures as `key.member.N.Field`.
    pub fn entries<T: QueryEntry>(&mut self, key: &str, items: &[T]) -> Result<()> {
        for (idx, item) in items.iter().enumerate() {
            item.marshal(&format!("{}.member.{}", key, idx + 1), self)?;
        }
        Ok(())
    }

    /// Returns the value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the operation name.
    pub fn action(&self) -> &str {
        self.get("Action").unwrap_or_default()
    }

    /// Encodes the parameters as an `application/x-www-form-urlencoded` body.
    pub(crate) fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builds a SigV4-signed `POST` request for the IAM API.
///
/// This function:
/// 1. Encodes `params` as the form body
/// 2. Computes the SigV4 signature over content type, host, date and
///    (for temporary credentials) the session token
/// 3. Returns the request ready for a [`crate::transport::Transport`]
///
/// # Errors
///
/// Returns [`IamError`] if:
///   - The configured endpoint is invalid
///   - Signature computation fails
///   - A header value cannot be represented
pub(crate) fn build_signed_request(
    params: &QueryParams,
    credential: &Credential,
    config: &ClientConfig,
    invocation_id: &str,
    now: DateTime<Utc>,
) -> Result<http::Request<String>> {
    let uri = config.endpoint_uri()?;
    let host = uri
        .authority()
        .map(|authority| authority.as_str().to_string())
        .ok_or_else(|| IamError::Config(format!("endpoint '{}' has no host", config.endpoint)))?;
    let path = match uri.path() {
        "" => "/",
        path => path,
    };

    let body = params.encode();
    let payload_hash = sha256_hex(body.as_bytes());
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

    let mut signed_headers = vec![
        ("content-type".to_string(), CONTENT_TYPE.to_string()),
        ("host".to_string(), host),
        ("x-amz-date".to_string(), amz_date.clone()),
    ];
    if let Some(token) = &credential.session_token {
        signed_headers.push(("x-amz-security-token".to_string(), token.trim().to_string()));
    }
    signed_headers.sort();

    let canonical = CanonicalRequest {
        method: "POST",
        path,
        query: "",
        headers: &signed_headers,
        payload_hash: &payload_hash,
    };
    let scope = SigningScope {
        amz_date: &amz_date,
        region: &config.region,
        service: config.service,
    };
    let authorization = authorization_header(
        &canonical,
        &scope,
        &credential.access_key_id,
        &credential.secret_access_key,
    )?;

    let mut builder = http::Request::builder()
        .method(http::Method::POST)
        .uri(config.endpoint.as_str());
    for (name, value) in &signed_headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let request = builder
        .header(AUTHORIZATION, authorization)
        .header(USER_AGENT, config.user_agent.as_str())
        .header("amz-sdk-invocation-id", invocation_id)
        .body(body)?;

    Ok(request)
}
