use sea_orm::DbErr;
use thiserror::Error;

/// Failures when reading base tables or replacing a table in the store
#[derive(Debug, Error)]
pub enum DataError {
    #[error("table '{table}' is not available in the store")]
    InputUnavailable { table: String },

    #[error("table '{table}' has no column '{column}'")]
    SchemaMismatch { table: String, column: String },

    #[error("row {row} of table '{table}' has {found} values, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("table '{table}' must have at least one column")]
    NoColumns { table: String },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
