use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Tag, decode_policy_document, members};
use crate::error::Result;
use crate::request::{QueryParams, validate_policy_arn};

string_enum! {
    /// Which managed policies a listing covers.
    PolicyScopeType {
        All => "All",
        Aws => "AWS",
        Local => "Local",
    }
}

/// A managed policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    pub policy_name: String,
    pub policy_id: String,
    pub arn: String,
    pub path: String,
    pub default_version_id: String,
    #[serde(default)]
    pub attachment_count: i32,
    #[serde(default)]
    pub permissions_boundary_usage_count: i32,
    #[serde(default)]
    pub is_attachable: bool,
    pub description: Option<String>,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "members")]
    pub tags: Vec<Tag>,
}

/// One version of a managed policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyVersion {
    /// URL-encoded policy JSON. Only present on `GetPolicyVersion`.
    pub document: Option<String>,
    pub version_id: String,
    #[serde(default)]
    pub is_default_version: bool,
    pub create_date: DateTime<Utc>,
}

impl PolicyVersion {
    /// Returns the decoded policy JSON.
    pub fn decoded_document(&self) -> Option<String> {
        self.document.as_deref().map(decode_policy_document)
    }
}

/// A managed policy attached to a user, group or role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachedPolicy {
    pub policy_name: String,
    pub policy_arn: String,
}

/// The managed policy limiting a user's or role's permissions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachedPermissionsBoundary {
    pub permissions_boundary_type: Option<String>,
    pub permissions_boundary_arn: String,
}

/// Request parameters for the CreatePolicy API.
#[derive(Debug, Clone, Default)]
pub struct CreatePolicyRequest {
    pub policy_name: String,
    /// Policy JSON.
    pub policy_document: String,
    pub path: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreatePolicyRequest {
    pub fn new(policy_name: impl Into<String>, policy_document: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            policy_document: policy_document.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("PolicyName", &self.policy_name)?;
        params.required("PolicyDocument", &self.policy_document)?;
        params.optional("Path", self.path.as_deref());
        params.optional("Description", self.description.as_deref());
        params.entries("Tags", &self.tags)
    }
}

/// Response from the CreatePolicy API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePolicyResult {
    pub policy: Policy,
}

/// Request parameters for the GetPolicy API.
#[derive(Debug, Clone, Default)]
pub struct GetPolicyRequest {
    pub policy_arn: String,
}

impl GetPolicyRequest {
    pub fn new(policy_arn: impl Into<String>) -> Self {
        Self {
            policy_arn: policy_arn.into(),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        policy_arn(params, &self.policy_arn)
    }
}

/// Response from the GetPolicy API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPolicyResult {
    pub policy: Policy,
}

/// Request parameters for the DeletePolicy API.
#[derive(Debug, Clone, Default)]
pub struct DeletePolicyRequest {
    pub policy_arn: String,
}

impl DeletePolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        policy_arn(params, &self.policy_arn)
    }
}

/// Request parameters for the ListPolicies API.
#[derive(Debug, Clone, Default)]
pub struct ListPoliciesRequest {
    pub scope: Option<PolicyScopeType>,
    pub only_attached: Option<bool>,
    pub path_prefix: Option<String>,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListPoliciesRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.optional("Scope", self.scope.as_ref());
        params.optional("OnlyAttached", self.only_attached);
        params.optional("PathPrefix", self.path_prefix.as_deref());
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListPolicies API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPoliciesResult {
    #[serde(default, deserialize_with = "members")]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the CreatePolicyVersion API.
#[derive(Debug, Clone, Default)]
pub struct CreatePolicyVersionRequest {
    pub policy_arn: String,
    pub policy_document: String,
    pub set_as_default: Option<bool>,
}

impl CreatePolicyVersionRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        policy_arn(params, &self.policy_arn)?;
        params.required("PolicyDocument", &self.policy_document)?;
        params.optional("SetAsDefault", self.set_as_default);
        Ok(())
    }
}

/// Response from the CreatePolicyVersion API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePolicyVersionResult {
    pub policy_version: PolicyVersion,
}

/// Request parameters for the GetPolicyVersion API.
#[derive(Debug, Clone, Default)]
pub struct GetPolicyVersionRequest {
    pub policy_arn: String,
    /// e.g. `v2`
    pub version_id: String,
}

impl GetPolicyVersionRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        policy_arn(params, &self.policy_arn)?;
        params.required("VersionId", &self.version_id)
    }
}

/// Response from the GetPolicyVersion API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPolicyVersionResult {
    pub policy_version: PolicyVersion,
}

fn policy_arn(params: &mut QueryParams, arn: &str) -> Result<()> {
    params.required("PolicyArn", arn)?;
    validate_policy_arn(arn)
}

/// Declares the attach/detach request for one principal kind.
macro_rules! policy_attachment {
    ($($request:ident($action:literal), $field:ident => $key:literal;)+) => {
        $(
            #[doc = concat!("Request parameters for the ", $action, " API.")]
            #[derive(Debug, Clone, Default)]
            pub struct $request {
                pub $field: String,
                pub policy_arn: String,
            }

            impl $request {
                pub fn new($field: impl Into<String>, policy_arn: impl Into<String>) -> Self {
                    Self {
                        $field: $field.into(),
                        policy_arn: policy_arn.into(),
                    }
                }

                pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
                    params.required($key, &self.$field)?;
                    policy_arn(params, &self.policy_arn)
                }
            }
        )+
    };
}

policy_attachment! {
    AttachUserPolicyRequest("AttachUserPolicy"), user_name => "UserName";
    AttachGroupPolicyRequest("AttachGroupPolicy"), group_name => "GroupName";
    AttachRolePolicyRequest("AttachRolePolicy"), role_name => "RoleName";
    DetachUserPolicyRequest("DetachUserPolicy"), user_name => "UserName";
    DetachGroupPolicyRequest("DetachGroupPolicy"), group_name => "GroupName";
    DetachRolePolicyRequest("DetachRolePolicy"), role_name => "RoleName";
}

/// Request parameters for the ListAttachedRolePolicies API.
#[derive(Debug, Clone, Default)]
pub struct ListAttachedRolePoliciesRequest {
    pub role_name: String,
    pub path_prefix: Option<String>,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListAttachedRolePoliciesRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.optional("PathPrefix", self.path_prefix.as_deref());
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListAttachedRolePolicies API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListAttachedRolePoliciesResult {
    #[serde(default, deserialize_with = "members")]
    pub attached_policies: Vec<AttachedPolicy>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the PutRolePolicy API.
#[derive(Debug, Clone, Default)]
pub struct PutRolePolicyRequest {
    pub role_name: String,
    pub policy_name: String,
    pub policy_document: String,
}

impl PutRolePolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required("PolicyName", &self.policy_name)?;
        params.required("PolicyDocument", &self.policy_document)
    }
}

/// Request parameters for the GetRolePolicy API.
#[derive(Debug, Clone, Default)]
pub struct GetRolePolicyRequest {
    pub role_name: String,
    pub policy_name: String,
}

impl GetRolePolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required("PolicyName", &self.policy_name)
    }
}

/// Response from the GetRolePolicy API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRolePolicyResult {
    pub role_name: String,
    pub policy_name: String,
    /// URL-encoded policy JSON.
    pub policy_document: String,
}

impl GetRolePolicyResult {
    pub fn decoded_document(&self) -> String {
        decode_policy_document(&self.policy_document)
    }
}

/// Request parameters for the DeleteRolePolicy API.
#[derive(Debug, Clone, Default)]
pub struct DeleteRolePolicyRequest {
    pub role_name: String,
    pub policy_name: String,
}

impl DeleteRolePolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required("PolicyName", &self.policy_name)
    }
}

/// Request parameters for the PutUserPolicy API.
#[derive(Debug, Clone, Default)]
pub struct PutUserPolicyRequest {
    pub user_name: String,
    pub policy_name: String,
    pub policy_document: String,
}

impl PutUserPolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.required("PolicyName", &self.policy_name)?;
        params.required("PolicyDocument", &self.policy_document)
    }
}
