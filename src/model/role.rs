use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{AttachedPermissionsBoundary, Tag, decode_policy_document, members};
use crate::error::{IamError, Result};
use crate::request::{QueryParams, validate_policy_arn};

/// An IAM role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub path: String,
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    /// URL-encoded trust policy. See [`Role::trust_policy`].
    pub assume_role_policy_document: Option<String>,
    pub description: Option<String>,
    /// Seconds.
    pub max_session_duration: Option<i32>,
    pub permissions_boundary: Option<AttachedPermissionsBoundary>,
    #[serde(default, deserialize_with = "members")]
    pub tags: Vec<Tag>,
    pub role_last_used: Option<RoleLastUsed>,
}

impl Role {
    /// Returns the decoded trust policy JSON.
    pub fn trust_policy(&self) -> Option<String> {
        self.assume_role_policy_document
            .as_deref()
            .map(decode_policy_document)
    }
}

/// When and where a role was last assumed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleLastUsed {
    pub last_used_date: Option<DateTime<Utc>>,
    pub region: Option<String>,
}

/// An instance profile and the roles it carries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceProfile {
    pub path: String,
    pub instance_profile_name: String,
    pub instance_profile_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "members")]
    pub roles: Vec<Role>,
}

/// Request parameters for the CreateRole API.
#[derive(Debug, Clone, Default)]
pub struct CreateRoleRequest {
    pub role_name: String,
    /// Trust policy JSON.
    pub assume_role_policy_document: String,
    pub path: Option<String>,
    pub description: Option<String>,
    /// Range 3600 to 43200 seconds.
    pub max_session_duration: Option<i32>,
    pub permissions_boundary: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreateRoleRequest {
    pub fn new(role_name: impl Into<String>, assume_role_policy_document: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            assume_role_policy_document: assume_role_policy_document.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required("AssumeRolePolicyDocument", &self.assume_role_policy_document)?;
        params.optional("Path", self.path.as_deref());
        params.optional("Description", self.description.as_deref());
        if let Some(duration) = self.max_session_duration
            && !(3600..=43200).contains(&duration)
        {
            return Err(IamError::Validation(format!(
                "MaxSessionDuration must be between 3600 and 43200 seconds, got {}",
                duration
            )));
        }
        params.optional("MaxSessionDuration", self.max_session_duration);
        if let Some(boundary) = &self.permissions_boundary {
            validate_policy_arn(boundary)?;
            params.insert("PermissionsBoundary", boundary.as_str());
        }
        params.entries("Tags", &self.tags)
    }
}

/// Response from the CreateRole API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRoleResult {
    pub role: Role,
}

/// Request parameters for the GetRole API.
#[derive(Debug, Clone, Default)]
pub struct GetRoleRequest {
    pub role_name: String,
}

impl GetRoleRequest {
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)
    }
}

/// Response from the GetRole API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRoleResult {
    pub role: Role,
}

/// Request parameters for the DeleteRole API.
#[derive(Debug, Clone, Default)]
pub struct DeleteRoleRequest {
    pub role_name: String,
}

impl DeleteRoleRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)
    }
}

/// Request parameters for the ListRoles API.
#[derive(Debug, Clone, Default)]
pub struct ListRolesRequest {
    pub path_prefix: Option<String>,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListRolesRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.optional("PathPrefix", self.path_prefix.as_deref());
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListRoles API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListRolesResult {
    #[serde(default, deserialize_with = "members")]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the UpdateAssumeRolePolicy API.
#[derive(Debug, Clone, Default)]
pub struct UpdateAssumeRolePolicyRequest {
    pub role_name: String,
    pub policy_document: String,
}

impl UpdateAssumeRolePolicyRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required("PolicyDocument", &self.policy_document)
    }
}

/// Request parameters for the TagRole API.
#[derive(Debug, Clone, Default)]
pub struct TagRoleRequest {
    pub role_name: String,
    pub tags: Vec<Tag>,
}

impl TagRoleRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        if self.tags.is_empty() {
            return Err(IamError::Validation("Tags requires at least one member".into()));
        }
        params.entries("Tags", &self.tags)
    }
}

/// Request parameters for the UntagRole API.
#[derive(Debug, Clone, Default)]
pub struct UntagRoleRequest {
    pub role_name: String,
    pub tag_keys: Vec<String>,
}

impl UntagRoleRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.required_list("TagKeys", &self.tag_keys)
    }
}

/// Request parameters for the ListRoleTags API.
#[derive(Debug, Clone, Default)]
pub struct ListRoleTagsRequest {
    pub role_name: String,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListRoleTagsRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("RoleName", &self.role_name)?;
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListRoleTags API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListRoleTagsResult {
    #[serde(default, deserialize_with = "members")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the CreateInstanceProfile API.
#[derive(Debug, Clone, Default)]
pub struct CreateInstanceProfileRequest {
    pub instance_profile_name: String,
    pub path: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreateInstanceProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("InstanceProfileName", &self.instance_profile_name)?;
        params.optional("Path", self.path.as_deref());
        params.entries("Tags", &self.tags)
    }
}

/// Response from the CreateInstanceProfile API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateInstanceProfileResult {
    pub instance_profile: InstanceProfile,
}

/// Request parameters for the DeleteInstanceProfile API.
#[derive(Debug, Clone, Default)]
pub struct DeleteInstanceProfileRequest {
    pub instance_profile_name: String,
}

impl DeleteInstanceProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("InstanceProfileName", &self.instance_profile_name)
    }
}

/// Request parameters for the AddRoleToInstanceProfile API.
#[derive(Debug, Clone, Default)]
pub struct AddRoleToInstanceProfileRequest {
    pub instance_profile_name: String,
    pub role_name: String,
}

impl AddRoleToInstanceProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("InstanceProfileName", &self.instance_profile_name)?;
        params.required("RoleName", &self.role_name)
    }
}

/// Request parameters for the RemoveRoleFromInstanceProfile API.
#[derive(Debug, Clone, Default)]
pub struct RemoveRoleFromInstanceProfileRequest {
    pub instance_profile_name: String,
    pub role_name: String,
}

impl RemoveRoleFromInstanceProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("InstanceProfileName", &self.instance_profile_name)?;
        params.required("RoleName", &self.role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::unmarshal_result;
    use rstest::rstest;

    const TRUST_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Principal":{"Service":"ec2.amazonaws.com"},"Action":"sts:AssumeRole"}]}"#;

    #[test]
    fn create_role_params() {
        let request = CreateRoleRequest {
            description: Some("web tier".into()),
            max_session_duration: Some(7200),
            permissions_boundary: Some("arn:aws:iam::aws:policy/PowerUserAccess".into()),
            tags: vec![Tag::new("env", "prod")],
            ..CreateRoleRequest::new("web", TRUST_POLICY)
        };
        let mut params = QueryParams::new("CreateRole", "2010-05-08");
        request.to_params(&mut params).unwrap();
        assert_eq!(params.get("RoleName"), Some("web"));
        assert_eq!(params.get("AssumeRolePolicyDocument"), Some(TRUST_POLICY));
        assert_eq!(params.get("MaxSessionDuration"), Some("7200"));
        assert_eq!(
            params.get("PermissionsBoundary"),
            Some("arn:aws:iam::aws:policy/PowerUserAccess")
        );
        assert_eq!(params.get("Tags.member.1.Key"), Some("env"));
    }

    #[rstest]
    #[case(3599)]
    #[case(43201)]
    fn create_role_rejects_session_duration_out_of_range(#[case] duration: i32) {
        let request = CreateRoleRequest {
            max_session_duration: Some(duration),
            ..CreateRoleRequest::new("web", TRUST_POLICY)
        };
        let mut params = QueryParams::new("CreateRole", "2010-05-08");
        assert!(matches!(
            request.to_params(&mut params),
            Err(IamError::Validation(_))
        ));
    }

    #[test]
    fn create_role_rejects_bad_boundary_arn() {
        let request = CreateRoleRequest {
            permissions_boundary: Some("PowerUserAccess".into()),
            ..CreateRoleRequest::new("web", TRUST_POLICY)
        };
        let mut params = QueryParams::new("CreateRole", "2010-05-08");
        assert!(request.to_params(&mut params).is_err());
    }

    #[test]
    fn deserialize_get_role_result() {
        let xml = r#"<GetRoleResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetRoleResult>
    <Role>
      <Path>/application_abc/component_xyz/</Path>
      <Arn>arn:aws:iam::123456789012:role/application_abc/component_xyz/S3Access</Arn>
      <RoleName>S3Access</RoleName>
      <AssumeRolePolicyDocument>%7B%22Version%22%3A%222012-10-17%22%7D</AssumeRolePolicyDocument>
      <CreateDate>2012-05-08T23:34:01Z</CreateDate>
      <RoleId>AROADBQP57FF2AEXAMPLE</RoleId>
      <MaxSessionDuration>3600</MaxSessionDuration>
      <RoleLastUsed>
        <LastUsedDate>2019-11-18T05:28:11Z</LastUsedDate>
        <Region>us-east-1</Region>
      </RoleLastUsed>
    </Role>
  </GetRoleResult>
  <ResponseMetadata>
    <RequestId>df37e965-9967-11e1-a4c3-270EXAMPLE04</RequestId>
  </ResponseMetadata>
</GetRoleResponse>"#;
        let result: GetRoleResult = unmarshal_result("GetRole", xml).unwrap();
        let role = result.role;
        assert_eq!(role.role_name, "S3Access");
        assert_eq!(role.max_session_duration, Some(3600));
        assert_eq!(role.trust_policy().as_deref(), Some(r#"{"Version":"2012-10-17"}"#));
        let last_used = role.role_last_used.unwrap();
        assert_eq!(last_used.region.as_deref(), Some("us-east-1"));
        assert!(role.tags.is_empty());
    }

    #[test]
    fn deserialize_instance_profile_with_roles() {
        let xml = r#"<CreateInstanceProfileResponse>
  <CreateInstanceProfileResult>
    <InstanceProfile>
      <InstanceProfileId>AIPAD5ARO2C5EXAMPLE3G</InstanceProfileId>
      <Roles/>
      <InstanceProfileName>Webserver</InstanceProfileName>
      <Path>/application_abc/component_xyz/</Path>
      <Arn>arn:aws:iam::123456789012:instance-profile/application_abc/component_xyz/Webserver</Arn>
      <CreateDate>2012-05-09T16:11:10.222Z</CreateDate>
    </InstanceProfile>
  </CreateInstanceProfileResult>
</CreateInstanceProfileResponse>"#;
        let result: CreateInstanceProfileResult =
            unmarshal_result("CreateInstanceProfile", xml).unwrap();
        assert_eq!(result.instance_profile.instance_profile_name, "Webserver");
        assert!(result.instance_profile.roles.is_empty());
    }
}
