//! Error taxonomy for migration building
//!
//! Every failure aborts payload construction: callers never receive a
//! partially built multicall.

use thiserror::Error;

/// Result alias used across the crate
pub type MigrationResult<T> = std::result::Result<T, MigrationError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// A pool or gauge id could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// A pool tree is missing data required to build steps
    #[error("Invalid pool: {0}")]
    InvalidPool(String),

    /// Arguments that cannot produce a valid call (length mismatches, empty balance...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Multicall return data had an unexpected shape
    #[error("Failed to decode relayer result: {0}")]
    DecodeError(String),

    /// An external collaborator (RPC, repository backend) failed
    #[error("Provider error: {0}")]
    Provider(String),
}

impl MigrationError {
    pub fn pool_data_missing(which: &str) -> Self {
        MigrationError::InvalidPool(format!("{} pool data is missing", which))
    }
}
