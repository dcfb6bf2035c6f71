use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{entries, members};
use crate::error::{IamError, Result};
use crate::request::QueryParams;

string_enum! {
    /// Progress of a credential report generation.
    ReportStateType {
        Started => "STARTED",
        InProgress => "INPROGRESS",
        Complete => "COMPLETE",
    }
}

string_enum! {
    /// Encoding of the credential report content.
    ReportFormat {
        TextCsv => "text/csv",
    }
}

/// Request parameters for the GetAccountSummary API.
#[derive(Debug, Clone, Default)]
pub struct GetAccountSummaryRequest;

impl GetAccountSummaryRequest {
    pub(crate) fn to_params(&self, _params: &mut QueryParams) -> Result<()> {
        Ok(())
    }
}

/// Entity usage and quotas, keyed by names such as `Users` or `UsersQuota`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetAccountSummaryResult {
    #[serde(default, deserialize_with = "entries")]
    pub summary_map: BTreeMap<String, i64>,
}

impl GetAccountSummaryResult {
    /// Returns the value of one summary entry.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.summary_map.get(key).copied()
    }
}

/// Request parameters for the CreateAccountAlias API.
#[derive(Debug, Clone, Default)]
pub struct CreateAccountAliasRequest {
    /// Lowercase letters, digits and single hyphens, 3 to 63 characters.
    pub account_alias: String,
}

impl CreateAccountAliasRequest {
    pub fn new(account_alias: impl Into<String>) -> Self {
        Self {
            account_alias: account_alias.into(),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("AccountAlias", &self.account_alias)
    }
}

/// Request parameters for the DeleteAccountAlias API.
#[derive(Debug, Clone, Default)]
pub struct DeleteAccountAliasRequest {
    pub account_alias: String,
}

impl DeleteAccountAliasRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("AccountAlias", &self.account_alias)
    }
}

/// Request parameters for the ListAccountAliases API.
#[derive(Debug, Clone, Default)]
pub struct ListAccountAliasesRequest {
    /// `marker` of the previous truncated page.
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListAccountAliasesRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListAccountAliases API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListAccountAliasesResult {
    #[serde(default, deserialize_with = "members")]
    pub account_aliases: Vec<String>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the GenerateCredentialReport API.
#[derive(Debug, Clone, Default)]
pub struct GenerateCredentialReportRequest;

impl GenerateCredentialReportRequest {
    pub(crate) fn to_params(&self, _params: &mut QueryParams) -> Result<()> {
        Ok(())
    }
}

/// Response from the GenerateCredentialReport API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateCredentialReportResult {
    /// `COMPLETE` once the report can be fetched.
    pub state: Option<ReportStateType>,
    pub description: Option<String>,
}

/// Request parameters for the GetCredentialReport API.
#[derive(Debug, Clone, Default)]
pub struct GetCredentialReportRequest;

impl GetCredentialReportRequest {
    pub(crate) fn to_params(&self, _params: &mut QueryParams) -> Result<()> {
        Ok(())
    }
}

/// The most recent credential report. `content` is base64 on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCredentialReportResult {
    pub content: Option<String>,
    pub report_format: Option<ReportFormat>,
    pub generated_time: Option<DateTime<Utc>>,
}

impl GetCredentialReportResult {
    /// Decodes the report body, CSV for `text/csv`.
    pub fn decoded_content(&self) -> Result<Vec<u8>> {
        let Some(content) = &self.content else {
            return Ok(Vec::new());
        };
        let compact: String = content.split_whitespace().collect();
        BASE64.decode(compact).map_err(|e| {
            IamError::Deserialize(quick_xml::DeError::Custom(format!(
                "credential report content is not valid base64: {}",
                e
            )))
        })
    }
}
