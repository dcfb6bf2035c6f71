use crate::error::{IamError, Result};

/// AWS access key credential, optionally with a session token.
///
/// The `Debug` implementation redacts `secret_access_key` and
/// `session_token` to prevent accidental leakage in logs.
#[derive(Clone)]
pub struct Credential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credential {
    /// Creates a long-term credential.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attaches a session token, for temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Supplies a [`Credential`] on demand.
///
/// The client calls [`CredentialProvider::resolve`] once per request that
/// does not carry its own credentials, so refreshing providers can hand
/// out a new credential each time.
pub trait CredentialProvider: Send + Sync {
    /// Attempt to resolve a credential from this provider.
    fn resolve(&self) -> Result<Credential>;
}

/// Provides a credential from explicitly specified values.
pub struct StaticProvider {
    credential: Credential,
}

impl StaticProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

impl From<Credential> for StaticProvider {
    fn from(credential: Credential) -> Self {
        Self::new(credential)
    }
}

impl CredentialProvider for StaticProvider {
    fn resolve(&self) -> Result<Credential> {
        if self.credential.access_key_id.is_empty() || self.credential.secret_access_key.is_empty()
        {
            return Err(IamError::Credential(
                "access key id or secret access key is empty".into(),
            ));
        }
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_returns_credential() {
        let provider = StaticProvider::new(Credential::new("test-id", "test-secret"));
        let cred = provider.resolve().unwrap();
        assert_eq!(cred.access_key_id, "test-id");
        assert_eq!(cred.secret_access_key, "test-secret");
        assert!(cred.session_token.is_none());
    }

    #[test]
    fn static_provider_rejects_empty_secret() {
        let provider = StaticProvider::from(Credential::new("test-id", ""));
        let err = provider.resolve().unwrap_err();
        assert!(matches!(err, IamError::Credential(_)));
    }

    #[test]
    fn credential_debug_redacts_secret() {
        let cred = Credential::new("AKIDEXAMPLE", "super-secret-value")
            .with_session_token("super-secret-token");
        let debug = format!("{:?}", cred);
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(debug.contains("****"));
        assert!(!debug.contains("super-secret-value"));
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn credential_debug_without_token() {
        let cred = Credential::new("AKIDEXAMPLE", "secret");
        let debug = format!("{:?}", cred);
        assert!(debug.contains("session_token: None"));
    }
}
