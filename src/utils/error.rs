use thiserror::Error;

/// Failures that end a cleanup run.
///
/// Setup failures happen before the store can be read (credential or
/// connection problems). Runtime failures happen after a successful connect.
/// Neither tier is retried.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid credential file '{path}': {reason}")]
    InvalidCredential { path: String, reason: String },

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Failed to read collection '{collection}': {reason}")]
    Read { collection: String, reason: String },

    #[error("Failed to commit {staged} staged update(s) to '{collection}': {reason}")]
    Commit {
        collection: String,
        staged: usize,
        reason: String,
    },
}

impl CleanupError {
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            CleanupError::MissingCredential(_)
                | CleanupError::InvalidCredential { .. }
                | CleanupError::Connection(_)
        )
    }

    /// Process exit status for this failure. Both tiers share the same code.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
