//! The operation table.
//!
//! Every remote operation is one row: wire name, request type and, for
//! operations that return data, result type. The `operations!` macro turns
//! each row into an [`Operation`] impl plus a blocking method on [`Client`]
//! that hands the request to [`Client::invoke`].

use crate::client::Client;
use crate::credential::Credential;
use crate::error::Result;
use crate::model::*;
use crate::request::QueryParams;
use crate::response::unmarshal_result;

/// One remote IAM operation.
///
/// Implementors supply the wire name, the marshaller for their parameters
/// and the unmarshaller for the success payload. Void operations use
/// `Output = ()` and ignore the body.
pub trait Operation {
    /// Typed result of a successful call.
    type Output;

    /// Remote operation name, sent as `Action`.
    const NAME: &'static str;

    /// Writes the operation parameters. `Action` and `Version` are already set.
    fn marshal(&self, params: &mut QueryParams) -> Result<()>;

    /// Decodes a successful response body.
    fn unmarshal(body: &str) -> Result<Self::Output>;

    /// Credentials to use instead of the client's provider.
    fn credentials(&self) -> Option<&Credential> {
        None
    }

    /// Sends this request with `credential` instead of the client's provider.
    fn with_credentials(self, credential: Credential) -> WithCredentials<Self>
    where
        Self: Sized,
    {
        WithCredentials {
            operation: self,
            credential,
        }
    }
}

/// An operation carrying a per-call credential override.
#[derive(Debug, Clone)]
pub struct WithCredentials<O> {
    operation: O,
    credential: Credential,
}

impl<O> WithCredentials<O> {
    /// Returns the wrapped request.
    pub fn into_inner(self) -> O {
        self.operation
    }
}

impl<O: Operation> Operation for WithCredentials<O> {
    type Output = O::Output;

    const NAME: &'static str = O::NAME;

    fn marshal(&self, params: &mut QueryParams) -> Result<()> {
        self.operation.marshal(params)
    }

    fn unmarshal(body: &str) -> Result<Self::Output> {
        O::unmarshal(body)
    }

    fn credentials(&self) -> Option<&Credential> {
        Some(&self.credential)
    }
}

macro_rules! operations {
    (@output) => { () };
    (@output $output:ty) => { $output };

    (@operation $name:ident, $request:ty) => {
        impl Operation for $request {
            type Output = ();

            const NAME: &'static str = stringify!($name);

            fn marshal(&self, params: &mut QueryParams) -> Result<()> {
                self.to_params(params)
            }

            fn unmarshal(_body: &str) -> Result<()> {
                Ok(())
            }
        }
    };
    (@operation $name:ident, $request:ty, $output:ty) => {
        impl Operation for $request {
            type Output = $output;

            const NAME: &'static str = stringify!($name);

            fn marshal(&self, params: &mut QueryParams) -> Result<()> {
                self.to_params(params)
            }

            fn unmarshal(body: &str) -> Result<$output> {
                unmarshal_result(Self::NAME, body)
            }
        }
    };

    ($(
        $(#[$doc:meta])*
        $method:ident => $name:ident($request:ty) $(-> $output:ty)?;
    )*) => {
        $(
            operations!(@operation $name, $request $(, $output)?);
        )*

        /// One method per remote operation.
        impl Client {
            $(
                $(#[$doc])*
                pub fn $method(&self, request: $request) -> Result<operations!(@output $($output)?)> {
                    self.invoke(request)
                }
            )*
        }

        /// Wire names of every operation in the table, in table order.
        pub const OPERATION_NAMES: &[&str] = &[$(stringify!($name)),*];
    };
}

operations! {
    // Users
    /// Creates a new IAM user.
    create_user => CreateUser(CreateUserRequest) -> CreateUserResult;
    /// Retrieves a user. Without a user name, the caller's own user.
    get_user => GetUser(GetUserRequest) -> GetUserResult;
    /// Renames a user or moves it to another path.
    update_user => UpdateUser(UpdateUserRequest);
    /// Deletes a user that has no attached resources left.
    delete_user => DeleteUser(DeleteUserRequest);
    /// Lists users, optionally under a path prefix.
    list_users => ListUsers(ListUsersRequest) -> ListUsersResult;
    /// Adds or overwrites tags on a user.
    tag_user => TagUser(TagUserRequest);
    /// Removes tags from a user.
    untag_user => UntagUser(UntagUserRequest);
    /// Lists the tags attached to a user.
    list_user_tags => ListUserTags(ListUserTagsRequest) -> ListUserTagsResult;
    /// Gives a user a console password.
    create_login_profile => CreateLoginProfile(CreateLoginProfileRequest) -> CreateLoginProfileResult;
    /// Removes a user's console password.
    delete_login_profile => DeleteLoginProfile(DeleteLoginProfileRequest);
    /// Changes the calling user's own password.
    change_password => ChangePassword(ChangePasswordRequest);

    // Groups
    /// Creates a new group.
    create_group => CreateGroup(CreateGroupRequest) -> CreateGroupResult;
    /// Retrieves a group and its members.
    get_group => GetGroup(GetGroupRequest) -> GetGroupResult;
    /// Deletes an empty group.
    delete_group => DeleteGroup(DeleteGroupRequest);
    /// Lists groups, optionally under a path prefix.
    list_groups => ListGroups(ListGroupsRequest) -> ListGroupsResult;
    /// Adds a user to a group.
    add_user_to_group => AddUserToGroup(AddUserToGroupRequest);
    /// Removes a user from a group.
    remove_user_from_group => RemoveUserFromGroup(RemoveUserFromGroupRequest);
    /// Lists the groups a user belongs to.
    list_groups_for_user => ListGroupsForUser(ListGroupsForUserRequest) -> ListGroupsForUserResult;

    // Roles
    /// Creates a new role.
    create_role => CreateRole(CreateRoleRequest) -> CreateRoleResult;
    /// Retrieves a role, including its trust policy.
    get_role => GetRole(GetRoleRequest) -> GetRoleResult;
    /// Deletes a role.
    delete_role => DeleteRole(DeleteRoleRequest);
    /// Lists roles, optionally under a path prefix.
    list_roles => ListRoles(ListRolesRequest) -> ListRolesResult;
    /// Replaces the trust policy of a role.
    update_assume_role_policy => UpdateAssumeRolePolicy(UpdateAssumeRolePolicyRequest);
    /// Adds or overwrites tags on a role.
    tag_role => TagRole(TagRoleRequest);
    /// Removes tags from a role.
    untag_role => UntagRole(UntagRoleRequest);
    /// Lists the tags attached to a role.
    list_role_tags => ListRoleTags(ListRoleTagsRequest) -> ListRoleTagsResult;

    // Instance profiles
    /// Creates an instance profile.
    create_instance_profile => CreateInstanceProfile(CreateInstanceProfileRequest) -> CreateInstanceProfileResult;
    /// Deletes an instance profile.
    delete_instance_profile => DeleteInstanceProfile(DeleteInstanceProfileRequest);
    /// Adds a role to an instance profile.
    add_role_to_instance_profile => AddRoleToInstanceProfile(AddRoleToInstanceProfileRequest);
    /// Removes a role from an instance profile.
    remove_role_from_instance_profile => RemoveRoleFromInstanceProfile(RemoveRoleFromInstanceProfileRequest);

    // Managed policies
    /// Creates a customer managed policy.
    create_policy => CreatePolicy(CreatePolicyRequest) -> CreatePolicyResult;
    /// Retrieves a managed policy.
    get_policy => GetPolicy(GetPolicyRequest) -> GetPolicyResult;
    /// Deletes a customer managed policy.
    delete_policy => DeletePolicy(DeletePolicyRequest);
    /// Lists managed policies.
    list_policies => ListPolicies(ListPoliciesRequest) -> ListPoliciesResult;
    /// Adds a version to a customer managed policy.
    create_policy_version => CreatePolicyVersion(CreatePolicyVersionRequest) -> CreatePolicyVersionResult;
    /// Retrieves one version of a managed policy, including its document.
    get_policy_version => GetPolicyVersion(GetPolicyVersionRequest) -> GetPolicyVersionResult;
    /// Attaches a managed policy to a user.
    attach_user_policy => AttachUserPolicy(AttachUserPolicyRequest);
    /// Attaches a managed policy to a group.
    attach_group_policy => AttachGroupPolicy(AttachGroupPolicyRequest);
    /// Attaches a managed policy to a role.
    attach_role_policy => AttachRolePolicy(AttachRolePolicyRequest);
    /// Detaches a managed policy from a user.
    detach_user_policy => DetachUserPolicy(DetachUserPolicyRequest);
    /// Detaches a managed policy from a group.
    detach_group_policy => DetachGroupPolicy(DetachGroupPolicyRequest);
    /// Detaches a managed policy from a role.
    detach_role_policy => DetachRolePolicy(DetachRolePolicyRequest);
    /// Lists the managed policies attached to a role.
    list_attached_role_policies => ListAttachedRolePolicies(ListAttachedRolePoliciesRequest) -> ListAttachedRolePoliciesResult;

    // Inline policies
    /// Adds or replaces an inline policy on a role.
    put_role_policy => PutRolePolicy(PutRolePolicyRequest);
    /// Retrieves an inline policy of a role.
    get_role_policy => GetRolePolicy(GetRolePolicyRequest) -> GetRolePolicyResult;
    /// Deletes an inline policy of a role.
    delete_role_policy => DeleteRolePolicy(DeleteRolePolicyRequest);
    /// Adds or replaces an inline policy on a user.
    put_user_policy => PutUserPolicy(PutUserPolicyRequest);

    // Keys
    /// Creates an access key. The secret is only ever returned here.
    create_access_key => CreateAccessKey(CreateAccessKeyRequest) -> CreateAccessKeyResult;
    /// Deletes an access key.
    delete_access_key => DeleteAccessKey(DeleteAccessKeyRequest);
    /// Activates or deactivates an access key.
    update_access_key => UpdateAccessKey(UpdateAccessKeyRequest);
    /// Lists access key metadata for a user.
    list_access_keys => ListAccessKeys(ListAccessKeysRequest) -> ListAccessKeysResult;
    /// Uploads an SSH public key for CodeCommit.
    upload_ssh_public_key => UploadSSHPublicKey(UploadSshPublicKeyRequest) -> UploadSshPublicKeyResult;
    /// Deletes an SSH public key.
    delete_ssh_public_key => DeleteSSHPublicKey(DeleteSshPublicKeyRequest);

    // Account
    /// Retrieves entity usage and quotas for the account.
    get_account_summary => GetAccountSummary(GetAccountSummaryRequest) -> GetAccountSummaryResult;
    /// Creates the account alias.
    create_account_alias => CreateAccountAlias(CreateAccountAliasRequest);
    /// Deletes the account alias.
    delete_account_alias => DeleteAccountAlias(DeleteAccountAliasRequest);
    /// Lists the account alias.
    list_account_aliases => ListAccountAliases(ListAccountAliasesRequest) -> ListAccountAliasesResult;
    /// Starts generating a credential report.
    generate_credential_report => GenerateCredentialReport(GenerateCredentialReportRequest) -> GenerateCredentialReportResult;
    /// Retrieves the most recent credential report.
    get_credential_report => GetCredentialReport(GetCredentialReportRequest) -> GetCredentialReportResult;

    // Simulation
    /// Simulates the policies attached to a user, group or role.
    simulate_principal_policy => SimulatePrincipalPolicy(SimulatePrincipalPolicyRequest) -> SimulatePolicyResult;
    /// Simulates policy documents passed in the request.
    simulate_custom_policy => SimulateCustomPolicy(SimulateCustomPolicyRequest) -> SimulatePolicyResult;
    /// Lists the condition context keys referenced by a principal's policies.
    get_context_keys_for_principal_policy => GetContextKeysForPrincipalPolicy(GetContextKeysForPrincipalPolicyRequest) -> GetContextKeysForPolicyResult;
}
