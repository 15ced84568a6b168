use thiserror::Error;

/// Failures surfaced to whoever drives sign-in. Messages are meant for the
/// user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists: {email}")]
    Conflict { email: String },

    #[error("Invalid email or password")]
    Auth,

    #[error("Session storage unavailable: {0}")]
    Storage(String),
}

impl SessionError {
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
