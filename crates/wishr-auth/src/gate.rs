use wishr_core::error::WishrError;
use wishr_core::models::session::{Role, Session};

use crate::{secret_key, CredentialStore};

/// Maps a submitted secret to a role.
///
/// Holds the owner and viewer secrets and nothing else. Secrets are never
/// logged; the `Debug` output is redacted.
pub struct RoleGate {
    owner_secret: String,
    viewer_secret: String,
}

impl std::fmt::Debug for RoleGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleGate")
            .field("owner_secret", &"<redacted>")
            .field("viewer_secret", &"<redacted>")
            .finish()
    }
}

impl RoleGate {
    /// Both secrets must be non-empty and different from each other.
    pub fn new(
        owner_secret: impl Into<String>,
        viewer_secret: impl Into<String>,
    ) -> Result<Self, WishrError> {
        let owner_secret = owner_secret.into();
        let viewer_secret = viewer_secret.into();
        if owner_secret.is_empty() || viewer_secret.is_empty() {
            return Err(WishrError::Config {
                message: "owner and viewer secrets must not be empty".into(),
            });
        }
        if owner_secret == viewer_secret {
            return Err(WishrError::Config {
                message: "owner and viewer secrets must differ".into(),
            });
        }
        Ok(Self {
            owner_secret,
            viewer_secret,
        })
    }

    /// Build the gate from the first store that holds each secret.
    pub fn from_stores(stores: &[&dyn CredentialStore]) -> Result<Self, WishrError> {
        let owner = lookup(stores, Role::Owner)?;
        let viewer = lookup(stores, Role::Viewer)?;
        Self::new(owner, viewer)
    }

    pub fn authenticate(&self, secret: &str) -> Result<Role, WishrError> {
        let is_owner = secrets_equal(secret, &self.owner_secret);
        let is_viewer = secrets_equal(secret, &self.viewer_secret);
        match (is_owner, is_viewer) {
            (true, _) => Ok(Role::Owner),
            (false, true) => Ok(Role::Viewer),
            (false, false) => {
                tracing::warn!("rejected credential");
                Err(WishrError::InvalidCredential)
            }
        }
    }

    /// Authenticate and wrap the role in a request-scoped session.
    pub fn open_session(
        &self,
        secret: &str,
        user_label: Option<String>,
    ) -> Result<Session, WishrError> {
        let role = self.authenticate(secret)?;
        tracing::debug!(%role, "session opened");
        Ok(Session::new(role, user_label))
    }
}

fn lookup(stores: &[&dyn CredentialStore], role: Role) -> Result<String, WishrError> {
    let key = secret_key(role);
    for store in stores {
        if let Some(secret) = store.get(key)? {
            return Ok(secret);
        }
    }
    Err(WishrError::Config {
        message: format!("missing secret: {key}"),
    })
}

/// Compares without short-circuiting on the first differing byte.
fn secrets_equal(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn gate() -> RoleGate {
        RoleGate::new("owner-pw", "family-pw").unwrap()
    }

    #[test]
    fn test_authenticate_roles() {
        let gate = gate();
        assert_eq!(gate.authenticate("owner-pw").unwrap(), Role::Owner);
        assert_eq!(gate.authenticate("family-pw").unwrap(), Role::Viewer);
        for wrong in ["", "owner", "owner-pw ", "FAMILY-PW"] {
            assert!(matches!(
                gate.authenticate(wrong),
                Err(WishrError::InvalidCredential)
            ));
        }
    }

    #[test]
    fn test_open_session_carries_label() {
        let session = gate().open_session("family-pw", Some("Bob".into())).unwrap();
        assert_eq!(session.role, Role::Viewer);
        assert_eq!(session.user_label.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(matches!(
            RoleGate::new("", "x"),
            Err(WishrError::Config { .. })
        ));
        assert!(matches!(
            RoleGate::new("same", "same"),
            Err(WishrError::Config { .. })
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let out = format!("{:?}", gate());
        assert!(!out.contains("owner-pw"));
        assert!(!out.contains("family-pw"));
    }

    #[test]
    fn test_from_stores_uses_first_match() {
        let env = MemoryStore::new();
        let keychain = MemoryStore::new();
        env.store("owner", "from-env").unwrap();
        keychain.store("owner", "from-keychain").unwrap();
        keychain.store("viewer", "family").unwrap();

        let gate = RoleGate::from_stores(&[&env, &keychain]).unwrap();
        assert_eq!(gate.authenticate("from-env").unwrap(), Role::Owner);
        assert!(gate.authenticate("from-keychain").is_err());
        assert_eq!(gate.authenticate("family").unwrap(), Role::Viewer);
    }

    #[test]
    fn test_from_stores_missing_secret() {
        let store = MemoryStore::new();
        store.store("owner", "pw").unwrap();
        let err = RoleGate::from_stores(&[&store]).unwrap_err();
        assert!(err.to_string().contains("viewer"));
    }
}
