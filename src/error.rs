//! Error types shared by the session, configuration, and client layers.
//!
//! ERROR HANDLING
//! ==============
//! `Display` on `IdentityError` is the user-facing text: login and register
//! forms show it inline and the session store pushes the same string as an
//! error notification.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failures reported by the external identity backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("An account with this email already exists.")]
    DuplicateAccount,
    #[error("{0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Something went wrong: {0}")]
    Unknown(String),
}

/// Failures returned from session store operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// A session operation issued later already completed.
    #[error("superseded by a newer session request")]
    Superseded,
    /// The session command loop is not running (server render or torn down).
    #[error("session service unavailable")]
    Unavailable,
}

/// Failures loading or validating `StorefrontConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
