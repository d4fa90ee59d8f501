//! Contract error types for the commerce store

use super::model::UnitState;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by repositories and units of work
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested identifier does not exist at read or delete time
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (product, order, ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Stale version token on update; re-read and retry in a new unit
    #[error("{entity} {id} was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrencyConflict {
        entity: &'static str,
        id: String,
        /// Version carried by the staged entity
        expected: i64,
        /// Version currently stored
        actual: i64,
    },

    /// Entity rejected before it was staged
    #[error("invalid {entity}: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },

    /// Operation not allowed in the unit's current state
    #[error("cannot {operation} in a unit of work that is {state}")]
    InvalidState {
        state: UnitState,
        operation: &'static str,
    },

    /// The owning unit of work has been disposed
    #[error("unit of work has been disposed")]
    Disposed,

    /// Commit aborted by request cancellation; nothing was applied
    #[error("commit cancelled")]
    Cancelled,

    /// Stored row could not be mapped back to a record
    #[error("failed to decode {entity}: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },

    /// Underlying store failure (connectivity, constraint violation, ...)
    #[error("persistence error: {0}")]
    Persistence(#[from] DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the caller can recover by re-reading and retrying in a new unit
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
