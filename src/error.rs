use thiserror::Error;

use crate::models::DishId;

#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Menu set not found: {0}")]
    SetNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Another writer holds the ledger; the batch was not applied and may be retried.
    #[error("Concurrent update conflict while cooking dish {dish_id}: {reason}")]
    Contention { dish_id: DishId, reason: String },

    /// The JSON state file stayed locked by another process; safe to retry.
    #[error("Kitchen state file is locked by another process: {0}")]
    StateLocked(String),

    #[error("Ledger lock poisoned: {0}")]
    LockPoisoned(String),
}

impl KitchenError {
    /// Whether the caller may safely resubmit the same operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            KitchenError::Contention { .. } | KitchenError::StateLocked(_) => true,
            KitchenError::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, KitchenError>;
