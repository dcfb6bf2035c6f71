use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{AttachedPermissionsBoundary, Tag, members};
use crate::error::{IamError, Result};
use crate::request::{QueryParams, validate_policy_arn};

/// An IAM user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub path: String,
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    pub password_last_used: Option<DateTime<Utc>>,
    pub permissions_boundary: Option<AttachedPermissionsBoundary>,
    #[serde(default, deserialize_with = "members")]
    pub tags: Vec<Tag>,
}

/// A user's console password settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginProfile {
    pub user_name: String,
    pub create_date: DateTime<Utc>,
    #[serde(default)]
    pub password_reset_required: bool,
}

/// Request parameters for the CreateUser API.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub user_name: String,
    /// Path for the user name, `/` when unset.
    pub path: Option<String>,
    /// ARN of the managed policy used as permissions boundary.
    pub permissions_boundary: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreateUserRequest {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.optional("Path", self.path.as_deref());
        if let Some(boundary) = &self.permissions_boundary {
            validate_policy_arn(boundary)?;
            params.insert("PermissionsBoundary", boundary.as_str());
        }
        params.entries("Tags", &self.tags)
    }
}

/// Response from the CreateUser API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserResult {
    pub user: User,
}

/// Request parameters for the GetUser API.
#[derive(Debug, Clone, Default)]
pub struct GetUserRequest {
    /// User to retrieve. The calling user when unset.
    pub user_name: Option<String>,
}

impl GetUserRequest {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.optional("UserName", self.user_name.as_deref());
        Ok(())
    }
}

/// Response from the GetUser API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserResult {
    pub user: User,
}

/// Request parameters for the UpdateUser API.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub user_name: String,
    pub new_path: Option<String>,
    pub new_user_name: Option<String>,
}

impl UpdateUserRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.optional("NewPath", self.new_path.as_deref());
        params.optional("NewUserName", self.new_user_name.as_deref());
        Ok(())
    }
}

/// Request parameters for the DeleteUser API.
#[derive(Debug, Clone, Default)]
pub struct DeleteUserRequest {
    pub user_name: String,
}

impl DeleteUserRequest {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)
    }
}

/// Request parameters for the ListUsers API.
#[derive(Debug, Clone, Default)]
pub struct ListUsersRequest {
    pub path_prefix: Option<String>,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListUsersRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.optional("PathPrefix", self.path_prefix.as_deref());
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListUsers API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUsersResult {
    #[serde(default, deserialize_with = "members")]
    pub users: Vec<User>,
    #[serde(default)]
    pub is_truncated: bool,
    /// Pass as `marker` to fetch the next page.
    pub marker: Option<String>,
}

/// Request parameters for the TagUser API.
#[derive(Debug, Clone, Default)]
pub struct TagUserRequest {
    pub user_name: String,
    pub tags: Vec<Tag>,
}

impl TagUserRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        if self.tags.is_empty() {
            return Err(IamError::Validation("Tags requires at least one member".into()));
        }
        params.entries("Tags", &self.tags)
    }
}

/// Request parameters for the UntagUser API.
#[derive(Debug, Clone, Default)]
pub struct UntagUserRequest {
    pub user_name: String,
    pub tag_keys: Vec<String>,
}

impl UntagUserRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.required_list("TagKeys", &self.tag_keys)
    }
}

/// Request parameters for the ListUserTags API.
#[derive(Debug, Clone, Default)]
pub struct ListUserTagsRequest {
    pub user_name: String,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListUserTagsRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListUserTags API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUserTagsResult {
    #[serde(default, deserialize_with = "members")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the CreateLoginProfile API.
///
/// The `Debug` implementation redacts `password`.
#[derive(Clone, Default)]
pub struct CreateLoginProfileRequest {
    pub user_name: String,
    pub password: String,
    pub password_reset_required: Option<bool>,
}

impl std::fmt::Debug for CreateLoginProfileRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateLoginProfileRequest")
            .field("user_name", &self.user_name)
            .field("password", &"****")
            .field("password_reset_required", &self.password_reset_required)
            .finish()
    }
}

impl CreateLoginProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.required("Password", &self.password)?;
        params.optional("PasswordResetRequired", self.password_reset_required);
        Ok(())
    }
}

/// Response from the CreateLoginProfile API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateLoginProfileResult {
    pub login_profile: LoginProfile,
}

/// Request parameters for the DeleteLoginProfile API.
#[derive(Debug, Clone, Default)]
pub struct DeleteLoginProfileRequest {
    pub user_name: String,
}

impl DeleteLoginProfileRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)
    }
}

/// Request parameters for the ChangePassword API.
///
/// The `Debug` implementation redacts both passwords.
#[derive(Clone, Default)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("old_password", &"****")
            .field("new_password", &"****")
            .finish()
    }
}

impl ChangePasswordRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("OldPassword", &self.old_password)?;
        params.required("NewPassword", &self.new_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::unmarshal_result;

    fn params(action: &str) -> QueryParams {
        QueryParams::new(action, "2010-05-08")
    }

    #[test]
    fn create_user_params() {
        let request = CreateUserRequest {
            user_name: "bob".into(),
            path: Some("/engineering/".into()),
            permissions_boundary: None,
            tags: vec![Tag::new("team", "iam")],
        };
        let mut p = params("CreateUser");
        request.to_params(&mut p).unwrap();
        assert_eq!(p.get("UserName"), Some("bob"));
        assert_eq!(p.get("Path"), Some("/engineering/"));
        assert_eq!(p.get("PermissionsBoundary"), None);
        assert_eq!(p.get("Tags.member.1.Key"), Some("team"));
        assert_eq!(p.get("Tags.member.1.Value"), Some("iam"));
    }

    #[test]
    fn get_user_without_name_sends_no_user_name() {
        let mut p = params("GetUser");
        GetUserRequest::default().to_params(&mut p).unwrap();
        assert_eq!(p.get("UserName"), None);
    }

    #[test]
    fn tag_user_requires_tags() {
        let request = TagUserRequest {
            user_name: "bob".into(),
            tags: vec![],
        };
        assert!(request.to_params(&mut params("TagUser")).is_err());
    }

    #[test]
    fn password_requests_redact_debug() {
        let create = CreateLoginProfileRequest {
            user_name: "bob".into(),
            password: "hunter2!".into(),
            password_reset_required: Some(true),
        };
        let change = ChangePasswordRequest {
            old_password: "hunter2!".into(),
            new_password: "correct-horse".into(),
        };
        let debug = format!("{:?} {:?}", create, change);
        assert!(debug.contains("bob"));
        assert!(!debug.contains("hunter2!"));
        assert!(!debug.contains("correct-horse"));
    }

    #[test]
    fn create_login_profile_params() {
        let request = CreateLoginProfileRequest {
            user_name: "bob".into(),
            password: "p@ss word".into(),
            password_reset_required: Some(true),
        };
        let mut p = params("CreateLoginProfile");
        request.to_params(&mut p).unwrap();
        assert_eq!(p.get("Password"), Some("p@ss word"));
        assert_eq!(p.get("PasswordResetRequired"), Some("true"));
    }

    #[test]
    fn deserialize_list_users_result() {
        let xml = r#"<ListUsersResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <ListUsersResult>
    <Users>
      <member>
        <UserId>AID2MAB8DPLSRHEXAMPLE</UserId>
        <Path>/division_abc/subdivision_xyz/engineering/</Path>
        <UserName>Andrew</UserName>
        <Arn>arn:aws:iam::123456789012:user/division_abc/subdivision_xyz/engineering/Andrew</Arn>
        <CreateDate>2012-09-05T19:38:48Z</CreateDate>
        <PasswordLastUsed>2014-09-08T21:47:36Z</PasswordLastUsed>
      </member>
      <member>
        <UserId>AIDIODR4TAW7CSEXAMPLE</UserId>
        <Path>/division_abc/subdivision_xyz/engineering/</Path>
        <UserName>Jackie</UserName>
        <Arn>arn:aws:iam::123456789012:user/division_abc/subdivision_xyz/engineering/Jackie</Arn>
        <CreateDate>2014-04-09T15:43:45Z</CreateDate>
      </member>
    </Users>
    <IsTruncated>false</IsTruncated>
  </ListUsersResult>
  <ResponseMetadata>
    <RequestId>7a62c49f-347e-4fc4-9331-6e8eEXAMPLE</RequestId>
  </ResponseMetadata>
</ListUsersResponse>"#;
        let result: ListUsersResult = unmarshal_result("ListUsers", xml).unwrap();
        assert_eq!(result.users.len(), 2);
        assert_eq!(result.users[0].user_name, "Andrew");
        assert!(result.users[0].password_last_used.is_some());
        assert_eq!(result.users[1].user_id, "AIDIODR4TAW7CSEXAMPLE");
        assert!(result.users[1].password_last_used.is_none());
        assert!(!result.is_truncated);
        assert!(result.marker.is_none());
    }

    #[test]
    fn deserialize_create_user_result_with_tags() {
        let xml = r#"<CreateUserResponse>
  <CreateUserResult>
    <User>
      <Path>/</Path>
      <UserName>Bob</UserName>
      <UserId>AIDGPMS9RO4H3FEXAMPLE</UserId>
      <Arn>arn:aws:iam::123456789012:user/Bob</Arn>
      <CreateDate>2013-06-06T19:21:14Z</CreateDate>
      <Tags>
        <member><Key>team</Key><Value>iam</Value></member>
      </Tags>
    </User>
  </CreateUserResult>
</CreateUserResponse>"#;
        let result: CreateUserResult = unmarshal_result("CreateUser", xml).unwrap();
        assert_eq!(result.user.user_name, "Bob");
        assert_eq!(result.user.arn, "arn:aws:iam::123456789012:user/Bob");
        assert_eq!(result.user.create_date.to_rfc3339(), "2013-06-06T19:21:14+00:00");
        assert_eq!(result.user.tags, vec![Tag::new("team", "iam")]);
    }
}
