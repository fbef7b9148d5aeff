pub mod gate;

use wishr_core::error::WishrError;
use wishr_core::models::session::Role;

pub use gate::RoleGate;

/// Key under which the secret for `role` is provisioned.
pub fn secret_key(role: Role) -> &'static str {
    match role {
        Role::Owner => "owner",
        Role::Viewer => "viewer",
    }
}

/// Trait for secret storage backends.
pub trait CredentialStore: Send + Sync {
    /// Store a secret under the given key.
    fn store(&self, key: &str, secret: &str) -> Result<(), WishrError>;

    /// Retrieve a secret by key.
    fn get(&self, key: &str) -> Result<Option<String>, WishrError>;

    /// Delete a stored secret.
    fn delete(&self, key: &str) -> Result<(), WishrError>;
}

/// OS keychain-backed credential store using the `keyring` crate.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: "wishr".to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, WishrError> {
        keyring::Entry::new(&self.service, key).map_err(credential_error)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

fn credential_error(e: keyring::Error) -> WishrError {
    WishrError::CredentialError {
        message: e.to_string(),
    }
}

impl CredentialStore for KeyringStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), WishrError> {
        self.entry(key)?
            .set_password(secret)
            .map_err(credential_error)
    }

    fn get(&self, key: &str) -> Result<Option<String>, WishrError> {
        match self.entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(credential_error(e)),
        }
    }

    fn delete(&self, key: &str) -> Result<(), WishrError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(credential_error(e)),
        }
    }
}

/// Read-only store over environment variables named `{PREFIX}_{KEY}_SECRET`.
pub struct EnvStore {
    prefix: String,
}

impl EnvStore {
    pub fn new() -> Self {
        Self::with_prefix("WISHR")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}_SECRET", self.prefix, key.to_uppercase())
    }
}

impl Default for EnvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for EnvStore {
    fn store(&self, key: &str, _secret: &str) -> Result<(), WishrError> {
        Err(WishrError::CredentialError {
            message: format!("cannot write {}: environment is read-only", self.var_name(key)),
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>, WishrError> {
        Ok(std::env::var(self.var_name(key))
            .ok()
            .filter(|v| !v.is_empty()))
    }

    fn delete(&self, key: &str) -> Result<(), WishrError> {
        Err(WishrError::CredentialError {
            message: format!("cannot unset {}: environment is read-only", self.var_name(key)),
        })
    }
}

/// In-memory credential store for testing.
pub struct MemoryStore {
    store: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            store: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    fn secrets(&self) -> std::sync::MutexGuard<'_, std::collections::HashMap<String, String>> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    fn store(&self, key: &str, secret: &str) -> Result<(), WishrError> {
        self.secrets().insert(key.to_string(), secret.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, WishrError> {
        Ok(self.secrets().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), WishrError> {
        self.secrets().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("owner").unwrap(), None);
        store.store("owner", "s3cret").unwrap();
        assert_eq!(store.get("owner").unwrap(), Some("s3cret".to_string()));
        store.delete("owner").unwrap();
        assert_eq!(store.get("owner").unwrap(), None);
    }

    #[test]
    fn test_memory_store_delete_nonexistent() {
        let store = MemoryStore::new();
        store.delete("no-such-key").unwrap();
    }

    #[test]
    fn test_env_store_reads_prefixed_vars() {
        let store = EnvStore::with_prefix("WISHR_AUTH_TEST");
        assert_eq!(store.var_name("viewer"), "WISHR_AUTH_TEST_VIEWER_SECRET");
        std::env::set_var("WISHR_AUTH_TEST_VIEWER_SECRET", "family");
        std::env::set_var("WISHR_AUTH_TEST_OWNER_SECRET", "");
        assert_eq!(store.get("viewer").unwrap(), Some("family".to_string()));
        assert_eq!(store.get("owner").unwrap(), None);
        assert!(store.store("owner", "x").is_err());
    }
}
