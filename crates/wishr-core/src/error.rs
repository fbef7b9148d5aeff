use std::path::PathBuf;

use crate::models::session::Role;

/// Central error type for the wishr system.
#[derive(Debug, thiserror::Error)]
pub enum WishrError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("item not found: {id}")]
    NotFound { id: String },

    #[error("item {id} was already bought by {bought_by}")]
    AlreadyBought { id: String, bought_by: String },

    #[error("id prefix '{prefix}' matches {matches} items")]
    AmbiguousId { prefix: String, matches: usize },

    #[error("role {role} may not {action}")]
    Forbidden { role: Role, action: &'static str },

    #[error("invalid credential")]
    InvalidCredential,

    #[error("corrupt store at {path}: {message}")]
    CorruptStore { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("credential error: {message}")]
    CredentialError { message: String },
}

impl WishrError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        WishrError::Validation {
            field,
            message: message.into(),
        }
    }
}
