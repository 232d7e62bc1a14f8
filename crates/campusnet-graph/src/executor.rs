//! The query-execution seam between graph operations and a store.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::statement::{AccessMode, Statement};

/// One result row: column name to value.
pub type Row = serde_json::Map<String, Value>;

/// Runs a statement and returns every row, or fails without returning any.
///
/// Implementations acquire whatever session or transaction they need on
/// entry and release it on every exit path.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        statement: &Statement,
        mode: AccessMode,
    ) -> Result<Vec<Row>, StoreError>;
}

/// Decode a single column of a row.
pub(crate) fn column<T: DeserializeOwned>(row: &Row, name: &str) -> Result<T, StoreError> {
    let value = row.get(name).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| StoreError::Decode {
        column: name.to_string(),
        message: e.to_string(),
    })
}

/// Decode a whole row whose column names match the fields of `T`.
pub(crate) fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| StoreError::Decode {
        column: "*".to_string(),
        message: e.to_string(),
    })
}

/// Decode one column across every row.
pub(crate) fn collect_column<T: DeserializeOwned>(
    rows: &[Row],
    name: &str,
) -> Result<Vec<T>, StoreError> {
    rows.iter().map(|row| column(row, name)).collect()
}
