//! Error types for the team-mixing service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific mixing scenarios.
///
/// Bad player listings are not errors: the command layer answers them with
/// canned chat replies instead. Errors are reserved for failures of the
/// service itself.
#[derive(Debug, thiserror::Error)]
pub enum MixerError {
    #[error("Mix session not found: {mix_id}")]
    SessionNotFound { mix_id: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
