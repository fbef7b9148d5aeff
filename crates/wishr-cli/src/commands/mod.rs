pub mod add;
pub mod buy;
pub mod config;
pub mod list;
pub mod login;
pub mod remove;
pub mod secret;

use clap::Subcommand;
use console::Term;
use wishr_auth::{CredentialStore, EnvStore, KeyringStore, RoleGate};
use wishr_core::config::WishrConfig;
use wishr_core::models::session::Session;
use wishr_core::store::Store;
use wishr_core::Wishlist;

#[derive(Subcommand)]
pub enum Command {
    /// Initialize and show wishr configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
    /// Provision the owner and viewer secrets in the OS keychain
    Secret {
        #[command(subcommand)]
        action: secret::SecretAction,
    },
    /// Check a secret and show which role it grants
    Login,
    /// Show the wishlist
    List,
    /// Add a wish (owner)
    Add(add::AddArgs),
    /// Remove a wish (owner)
    Remove(remove::RemoveArgs),
    /// Mark a wish as bought (viewer)
    Buy(buy::BuyArgs),
}

/// Per-invocation caller input, turned into a [`Session`] on demand.
pub struct Context {
    pub secret: Option<String>,
    pub name: Option<String>,
}

impl Context {
    /// Authenticate against the provisioned secrets.
    pub fn session(&self) -> anyhow::Result<Session> {
        let env = EnvStore::new();
        let keychain = KeyringStore::new();
        let stores: [&dyn CredentialStore; 2] = [&env, &keychain];
        let gate = RoleGate::from_stores(&stores)?;

        let secret = match &self.secret {
            Some(s) => s.clone(),
            None => prompt_secret("Password: ")?,
        };
        Ok(gate.open_session(&secret, self.name.clone())?)
    }
}

/// Read a secret from the terminal without echoing it.
pub fn prompt_secret(prompt: &str) -> std::io::Result<String> {
    let term = Term::stderr();
    term.write_str(prompt)?;
    term.read_secure_line()
}

/// Read a line from the terminal; an empty answer yields `default`.
pub fn prompt_line(prompt: &str, default: Option<&str>) -> std::io::Result<String> {
    let term = Term::stderr();
    match default {
        Some(d) => term.write_str(&format!("{prompt} [{d}]: "))?,
        None => term.write_str(&format!("{prompt}: "))?,
    }
    let answer = term.read_line()?;
    let answer = answer.trim();
    Ok(match (answer.is_empty(), default) {
        (true, Some(d)) => d.to_string(),
        _ => answer.to_string(),
    })
}

/// Open the configured store and load the wishlist.
pub fn open_wishlist() -> anyhow::Result<(WishrConfig, Wishlist<Box<dyn Store>>)> {
    let config = WishrConfig::load()?;
    let store = wishr_db::open_store(&config)?;
    tracing::debug!(backend = %config.backend, "store opened");
    let wishlist = Wishlist::open(store)?;
    Ok((config, wishlist))
}

pub fn run(cmd: Command, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        Command::Config { action } => config::run(action),
        Command::Secret { action } => secret::run(action),
        Command::Login => login::run(ctx),
        Command::List => list::run(ctx),
        Command::Add(args) => add::run(args, ctx),
        Command::Remove(args) => remove::run(args, ctx),
        Command::Buy(args) => buy::run(args, ctx),
    }
}
