use std::fmt;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which step of a transaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxStage::Begin => "begin",
            TxStage::Commit => "commit",
            TxStage::Rollback => "roll back",
        })
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database connection unavailable: {0}")]
    Connection(#[source] BoxError),

    #[error("failed to {op}: {source}")]
    Query {
        op: String,
        #[source]
        source: BoxError,
    },

    /// A rollback failure leaves the store in an unknown state and is
    /// reported in place of the error that triggered it.
    #[error("failed to {stage} transaction for {op}: {source}")]
    Transaction {
        op: String,
        stage: TxStage,
        #[source]
        source: BoxError,
    },

    #[error("{op} cancelled before completion")]
    Cancelled { op: String },
}

impl StorageError {
    pub fn query(op: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::Query {
            op: op.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = StorageError::NotFound {
            entity: "order",
            id: 42,
        };
        assert_eq!(err.to_string(), "order with id 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn query_error_keeps_operation_context() {
        let err = StorageError::query("insert order item 1 of order 7", "boom");
        assert_eq!(
            err.to_string(),
            "failed to insert order item 1 of order 7: boom"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn transaction_error_names_stage() {
        let err = StorageError::Transaction {
            op: "create order".to_string(),
            stage: TxStage::Rollback,
            source: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to roll back transaction for create order: connection reset"
        );
    }
}
