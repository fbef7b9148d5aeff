use clap::Subcommand;
use wishr_auth::{secret_key, CredentialStore, KeyringStore};
use wishr_core::models::session::Role;

use super::prompt_secret;

#[derive(Subcommand)]
pub enum SecretAction {
    /// Store the secret for a role in the OS keychain
    Set {
        /// Role the secret grants (owner or viewer)
        role: Role,
        /// Secret value (will prompt if not provided)
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove the secret for a role from the OS keychain
    Clear {
        /// Role whose secret to remove
        role: Role,
    },
}

pub fn run(action: SecretAction) -> anyhow::Result<()> {
    let keychain = KeyringStore::new();
    match action {
        SecretAction::Set { role, value } => {
            let value = match value {
                Some(v) => v,
                None => prompt_secret(&format!("New {role} secret: "))?,
            };
            if value.is_empty() {
                anyhow::bail!("Secret cannot be empty");
            }

            let other = match role {
                Role::Owner => Role::Viewer,
                Role::Viewer => Role::Owner,
            };
            if keychain.get(secret_key(other))?.as_deref() == Some(value.as_str()) {
                anyhow::bail!("The {role} secret must differ from the {other} secret");
            }

            keychain.store(secret_key(role), &value)?;
            println!("Stored {role} secret in OS keychain as '{}'", secret_key(role));
            Ok(())
        }
        SecretAction::Clear { role } => {
            keychain.delete(secret_key(role))?;
            println!("Removed {role} secret");
            Ok(())
        }
    }
}
