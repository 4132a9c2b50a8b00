//! Custom error types for the authentication service

use common::StorageError;
use thiserror::Error;

/// Custom error type for account and session operations
///
/// Field-level validation problems are not errors in this sense; they are
/// reported as [`crate::validation::FieldError`] values and never abort with
/// an `AuthError`.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The key-value store failed to read or write
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored collection exists but cannot be decoded, so it must not be rewritten
    #[error("Corrupt collection stored under {0}")]
    CorruptCollection(String),

    /// The credential encoder failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// Markup could not be rendered
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A flow's state lock was poisoned by a panicking submission
    #[error("Flow state lock poisoned")]
    LockPoisoned,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
