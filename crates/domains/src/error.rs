//! # DomainError
//!
//! Centralized error handling for the forum core.
//! Every rejected transition surfaces as exactly one of these kinds and
//! leaves all entities untouched.

use thiserror::Error;

/// The primary error type for every domain and service operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The actor is not allowed to perform the action (self-vote, throttled,
    /// closed topic, insufficient points, foreign resource, ...)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The resource is not in a state that allows the action
    #[error("conflict: {0}")]
    Conflict(String),

    /// Entity or token request missing (or expired)
    #[error("not found: {0}")]
    NotFound(String),

    /// Secret key mismatch
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed field content, detected before any transition runs
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure reported by an adapter
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
