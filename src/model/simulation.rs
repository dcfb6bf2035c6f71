//! Policy simulation.
//!
//! Both simulate operations share [`SimulatePolicyResult`]. Evaluation is
//! per action and resource pair; the decision of each pair is in
//! [`EvaluationResult::eval_decision`].

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{entries, members};
use crate::error::Result;
use crate::request::{QueryEntry, QueryParams};

string_enum! {
    /// Type of the values in a [`ContextEntry`].
    ContextKeyType {
        String => "string",
        StringList => "stringList",
        Numeric => "numeric",
        NumericList => "numericList",
        Boolean => "boolean",
        BooleanList => "booleanList",
        Ip => "ip",
        IpList => "ipList",
        Binary => "binary",
        BinaryList => "binaryList",
        Date => "date",
        DateList => "dateList",
    }
}

string_enum! {
    /// Result of evaluating an action.
    PolicyEvaluationDecision {
        Allowed => "allowed",
        ExplicitDeny => "explicitDeny",
        ImplicitDeny => "implicitDeny",
    }
}

/// A condition key value supplied to a simulation, e.g. `aws:CurrentTime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub context_key_name: String,
    pub context_key_values: Vec<String>,
    pub context_key_type: ContextKeyType,
}

impl ContextEntry {
    pub fn new(
        context_key_name: impl Into<String>,
        context_key_type: ContextKeyType,
        context_key_values: Vec<String>,
    ) -> Self {
        Self {
            context_key_name: context_key_name.into(),
            context_key_values,
            context_key_type,
        }
    }
}

impl QueryEntry for ContextEntry {
    fn marshal(&self, prefix: &str, params: &mut QueryParams) -> Result<()> {
        params.required(&format!("{}.ContextKeyName", prefix), &self.context_key_name)?;
        params.list(&format!("{}.ContextKeyValues", prefix), &self.context_key_values);
        params.insert(
            format!("{}.ContextKeyType", prefix),
            self.context_key_type.as_str(),
        );
        Ok(())
    }
}

/// Line and column in a policy document, both 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub line: i32,
    pub column: i32,
}

/// A policy statement that matched during evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub source_policy_id: Option<String>,
    pub source_policy_type: Option<String>,
    pub start_position: Option<Position>,
    pub end_position: Option<Position>,
}

/// Whether an AWS Organizations SCP allows the action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationsDecisionDetail {
    #[serde(default)]
    pub allowed_by_organizations: bool,
}

/// Whether the principal's permissions boundary allows the action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionsBoundaryDecisionDetail {
    #[serde(default)]
    pub allowed_by_permissions_boundary: bool,
}

/// Outcome of one action against one specific resource ARN.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSpecificResult {
    pub eval_resource_name: String,
    pub eval_resource_decision: PolicyEvaluationDecision,
    #[serde(default, deserialize_with = "members")]
    pub matched_statements: Vec<Statement>,
    #[serde(default, deserialize_with = "members")]
    pub missing_context_values: Vec<String>,
    #[serde(default, deserialize_with = "entries")]
    pub eval_decision_details: BTreeMap<String, PolicyEvaluationDecision>,
    pub permissions_boundary_decision_detail: Option<PermissionsBoundaryDecisionDetail>,
}

/// Outcome of simulating one action against one resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvaluationResult {
    pub eval_action_name: String,
    pub eval_resource_name: Option<String>,
    pub eval_decision: PolicyEvaluationDecision,
    #[serde(default, deserialize_with = "members")]
    pub matched_statements: Vec<Statement>,
    #[serde(default, deserialize_with = "members")]
    pub missing_context_values: Vec<String>,
    pub organizations_decision_detail: Option<OrganizationsDecisionDetail>,
    pub permissions_boundary_decision_detail: Option<PermissionsBoundaryDecisionDetail>,
    /// Decision per policy type, e.g. `IAM Policy`.
    #[serde(default, deserialize_with = "entries")]
    pub eval_decision_details: BTreeMap<String, PolicyEvaluationDecision>,
    #[serde(default, deserialize_with = "members")]
    pub resource_specific_results: Vec<ResourceSpecificResult>,
}

impl EvaluationResult {
    pub fn is_allowed(&self) -> bool {
        self.eval_decision == PolicyEvaluationDecision::Allowed
    }
}

/// Parameters shared by both simulate operations.
#[allow(clippy::too_many_arguments)]
fn simulation_params(
    params: &mut QueryParams,
    permissions_boundary_policy_input_list: &[String],
    action_names: &[String],
    resource_arns: &[String],
    resource_policy: Option<&str>,
    resource_owner: Option<&str>,
    caller_arn: Option<&str>,
    context_entries: &[ContextEntry],
    resource_handling_option: Option<&str>,
    marker: Option<&str>,
    max_items: Option<i32>,
) -> Result<()> {
    params.list(
        "PermissionsBoundaryPolicyInputList",
        permissions_boundary_policy_input_list,
    );
    params.required_list("ActionNames", action_names)?;
    params.list("ResourceArns", resource_arns);
    params.optional("ResourcePolicy", resource_policy);
    params.optional("ResourceOwner", resource_owner);
    params.optional("CallerArn", caller_arn);
    params.entries("ContextEntries", context_entries)?;
    params.optional("ResourceHandlingOption", resource_handling_option);
    params.paging(marker, max_items)
}

/// Request parameters for the SimulatePrincipalPolicy API.
#[derive(Debug, Clone, Default)]
pub struct SimulatePrincipalPolicyRequest {
    /// ARN of the user, group or role whose policies are simulated.
    pub policy_source_arn: String,
    /// Extra policy documents to include.
    pub policy_input_list: Vec<String>,
    pub permissions_boundary_policy_input_list: Vec<String>,
    /// At least one, e.g. `s3:GetObject`.
    pub action_names: Vec<String>,
    pub resource_arns: Vec<String>,
    pub resource_policy: Option<String>,
    pub resource_owner: Option<String>,
    pub caller_arn: Option<String>,
    pub context_entries: Vec<ContextEntry>,
    pub resource_handling_option: Option<String>,
    pub max_items: Option<i32>,
    pub marker: Option<String>,
}

impl SimulatePrincipalPolicyRequest {
    pub fn new(policy_source_arn: impl Into<String>, action_names: Vec<String>) -> Self {
        Self {
            policy_source_arn: policy_source_arn.into(),
            action_names,
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("PolicySourceArn", &self.policy_source_arn)?;
        params.list("PolicyInputList", &self.policy_input_list);
        simulation_params(
            params,
            &self.permissions_boundary_policy_input_list,
            &self.action_names,
            &self.resource_arns,
            self.resource_policy.as_deref(),
            self.resource_owner.as_deref(),
            self.caller_arn.as_deref(),
            &self.context_entries,
            self.resource_handling_option.as_deref(),
            self.marker.as_deref(),
            self.max_items,
        )
    }
}

/// Request parameters for the SimulateCustomPolicy API.
#[derive(Debug, Clone, Default)]
pub struct SimulateCustomPolicyRequest {
    /// Policy documents to simulate. At least one.
    pub policy_input_list: Vec<String>,
    pub permissions_boundary_policy_input_list: Vec<String>,
    pub action_names: Vec<String>,
    pub resource_arns: Vec<String>,
    pub resource_policy: Option<String>,
    pub resource_owner: Option<String>,
    pub caller_arn: Option<String>,
    pub context_entries: Vec<ContextEntry>,
    pub resource_handling_option: Option<String>,
    pub max_items: Option<i32>,
    pub marker: Option<String>,
}

impl SimulateCustomPolicyRequest {
    pub fn new(policy_input_list: Vec<String>, action_names: Vec<String>) -> Self {
        Self {
            policy_input_list,
            action_names,
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required_list("PolicyInputList", &self.policy_input_list)?;
        simulation_params(
            params,
            &self.permissions_boundary_policy_input_list,
            &self.action_names,
            &self.resource_arns,
            self.resource_policy.as_deref(),
            self.resource_owner.as_deref(),
            self.caller_arn.as_deref(),
            &self.context_entries,
            self.resource_handling_option.as_deref(),
            self.marker.as_deref(),
            self.max_items,
        )
    }
}

/// Response from the SimulatePrincipalPolicy and SimulateCustomPolicy APIs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulatePolicyResult {
    #[serde(default, deserialize_with = "members")]
    pub evaluation_results: Vec<EvaluationResult>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the GetContextKeysForPrincipalPolicy API.
#[derive(Debug, Clone, Default)]
pub struct GetContextKeysForPrincipalPolicyRequest {
    /// ARN of the user, group or role whose policies are inspected.
    pub policy_source_arn: String,
    /// Extra policy documents to inspect alongside the principal's.
    pub policy_input_list: Vec<String>,
}

impl GetContextKeysForPrincipalPolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("PolicySourceArn", &self.policy_source_arn)?;
        params.list("PolicyInputList", &self.policy_input_list);
        Ok(())
    }
}

/// Response from the GetContextKeysForPrincipalPolicy API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetContextKeysForPolicyResult {
    #[serde(default, deserialize_with = "members")]
    pub context_key_names: Vec<String>,
}
