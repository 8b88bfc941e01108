//! Error types for browser operations

use crate::providers::StoreError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// A required path argument was missing or empty
    #[error("{0}")]
    InvalidArgument(String),

    /// The object store rejected or failed a call
    #[error("{0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("operation timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl BrowserError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
