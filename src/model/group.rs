use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{User, members};
use crate::error::Result;
use crate::request::QueryParams;

/// An IAM group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    /// Path the group was created under, `/` by default.
    pub path: String,
    pub group_name: String,
    /// Stable unique id, starting with `AGPA`.
    pub group_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
}

/// Request parameters for the CreateGroup API.
#[derive(Debug, Clone, Default)]
pub struct CreateGroupRequest {
    pub group_name: String,
    /// Path for the group name, `/` when unset.
    pub path: Option<String>,
}

impl CreateGroupRequest {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            path: None,
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("GroupName", &self.group_name)?;
        params.optional("Path", self.path.as_deref());
        Ok(())
    }
}

/// Response from the CreateGroup API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateGroupResult {
    pub group: Group,
}

/// Request parameters for the GetGroup API.
#[derive(Debug, Clone, Default)]
pub struct GetGroupRequest {
    pub group_name: String,
    /// `marker` of the previous truncated page.
    pub marker: Option<String>,
    /// Page size, 1 to 1000.
    pub max_items: Option<i32>,
}

impl GetGroupRequest {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("GroupName", &self.group_name)?;
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// A group and one page of its members.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetGroupResult {
    pub group: Group,
    #[serde(default, deserialize_with = "members")]
    pub users: Vec<User>,
    /// More members follow; pass `marker` to fetch them.
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the DeleteGroup API.
#[derive(Debug, Clone, Default)]
pub struct DeleteGroupRequest {
    pub group_name: String,
}

impl DeleteGroupRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("GroupName", &self.group_name)
    }
}

/// Request parameters for the ListGroups API.
#[derive(Debug, Clone, Default)]
pub struct ListGroupsRequest {
    /// Only groups whose path starts with this prefix.
    pub path_prefix: Option<String>,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListGroupsRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.optional("PathPrefix", self.path_prefix.as_deref());
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListGroups API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListGroupsResult {
    #[serde(default, deserialize_with = "members")]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// Request parameters for the AddUserToGroup API.
#[derive(Debug, Clone, Default)]
pub struct AddUserToGroupRequest {
    pub group_name: String,
    pub user_name: String,
}

impl AddUserToGroupRequest {
    pub fn new(group_name: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            user_name: user_name.into(),
        }
    }

    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("GroupName", &self.group_name)?;
        params.required("UserName", &self.user_name)
    }
}

/// Request parameters for the RemoveUserFromGroup API.
#[derive(Debug, Clone, Default)]
pub struct RemoveUserFromGroupRequest {
    pub group_name: String,
    pub user_name: String,
}

impl RemoveUserFromGroupRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("GroupName", &self.group_name)?;
        params.required("UserName", &self.user_name)
    }
}

/// Request parameters for the ListGroupsForUser API.
#[derive(Debug, Clone, Default)]
pub struct ListGroupsForUserRequest {
    pub user_name: String,
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl ListGroupsForUserRequest {
    pub(crate) fn to_params(&self, params: &mut QueryParams) -> Result<()> {
        params.required("UserName", &self.user_name)?;
        params.paging(self.marker.as_deref(), self.max_items)
    }
}

/// Response from the ListGroupsForUser API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListGroupsForUserResult {
    #[serde(default, deserialize_with = "members")]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub is_truncated: bool,
    pub marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::unmarshal_result;

    #[test]
    fn add_user_to_group_requires_both_names() {
        let mut params = QueryParams::new("AddUserToGroup", "2010-05-08");
        AddUserToGroupRequest::new("Admins", "bob")
            .to_params(&mut params)
            .unwrap();
        assert_eq!(params.get("GroupName"), Some("Admins"));
        assert_eq!(params.get("UserName"), Some("bob"));

        let mut params = QueryParams::new("AddUserToGroup", "2010-05-08");
        assert!(
            AddUserToGroupRequest::new("Admins", "")
                .to_params(&mut params)
                .is_err()
        );
    }

    #[test]
    fn deserialize_get_group_result() {
        let xml = r#"<GetGroupResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetGroupResult>
    <Group>
      <Path>/</Path>
      <GroupName>Admins</GroupName>
      <GroupId>AGPACKCEVSQ6C2EXAMPLE</GroupId>
      <Arn>arn:aws:iam::123456789012:group/Admins</Arn>
      <CreateDate>2016-11-24T20:48:31Z</CreateDate>
    </Group>
    <Users>
      <member>
        <Path>/</Path>
        <UserName>Bob</UserName>
        <UserId>AIDACKCEVSQ6C2EXAMPLE</UserId>
        <Arn>arn:aws:iam::123456789012:user/Bob</Arn>
        <CreateDate>2016-11-24T20:48:31Z</CreateDate>
      </member>
    </Users>
    <IsTruncated>true</IsTruncated>
    <Marker>next-page</Marker>
  </GetGroupResult>
</GetGroupResponse>"#;
        let result: GetGroupResult = unmarshal_result("GetGroup", xml).unwrap();
        assert_eq!(result.group.group_name, "Admins");
        assert_eq!(result.users.len(), 1);
        assert_eq!(result.users[0].user_name, "Bob");
        assert!(result.is_truncated);
        assert_eq!(result.marker.as_deref(), Some("next-page"));
    }
}
