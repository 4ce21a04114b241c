//! Error types for tabstore-db

use tabstore_core::CoreError;
use thiserror::Error;

/// Table store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Table already exists (D001)
    #[error("[D001] Table \"{table}\" already exists")]
    AlreadyExists { table: String },

    /// Table not found (D002)
    #[error("[D002] Table \"{table}\" does not exist")]
    NotFound { table: String },

    /// Reflected column type has no logical counterpart (D003)
    #[error("[D003] Column \"{column}\" of table \"{table}\" has unsupported type {data_type}")]
    UnsupportedColumnType {
        table: String,
        column: String,
        data_type: String,
    },

    /// Input row arity differs from the table's field count (D004)
    #[error("[D004] Row {row} has {found} values but the table has {expected} fields")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Keyed row names a field the table does not have (D005)
    #[error("[D005] Table \"{table}\" has no field \"{field}\"")]
    UnknownField { table: String, field: String },

    /// Transaction management error (D006)
    #[error("[D006] Transaction failed: {0}")]
    Transaction(String),

    /// Descriptor or value error from tabstore-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// DuckDB driver error with preserved source chain (D007)
    #[error("[D007] DuckDB error: {0}")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// True for unsupported types on either side of the mapping: a
    /// descriptor type outside the vocabulary or an unmappable column.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(
            self,
            StoreError::UnsupportedColumnType { .. }
                | StoreError::Core(CoreError::UnsupportedType { .. })
        )
    }

    /// True when a value could not be converted to its field's type.
    pub fn is_type_coercion(&self) -> bool {
        matches!(self, StoreError::Core(CoreError::TypeCoercion { .. }))
    }
}

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}
