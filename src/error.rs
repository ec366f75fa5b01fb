//! Error types for the settlement pipeline.
//!
//! The allocator, aggregator, merger and simplifier are infallible by
//! contract. Errors come from configuration (pairings, groups), expense
//! construction, and the I/O around snapshots.

use crate::allocation::split::UnknownSplitPolicy;
use crate::core::expense::ExpenseError;
use crate::core::group::GroupId;
use crate::core::pairing::PairingError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while computing a settlement.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Pairing configuration is invalid
    #[error("invalid pairing configuration: {0}")]
    Pairing(#[from] PairingError),

    /// An expense or settlement record is malformed
    #[error("invalid expense: {0}")]
    Expense(#[from] ExpenseError),

    /// The requested group does not exist in the snapshot
    #[error("unknown group '{0}'")]
    UnknownGroup(GroupId),

    /// Split policy name could not be parsed
    #[error(transparent)]
    SplitPolicy(#[from] UnknownSplitPolicy),

    /// A command-line argument is missing or malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to read or write a snapshot file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
