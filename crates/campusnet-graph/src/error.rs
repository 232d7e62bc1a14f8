//! Errors from the store and from graph operations.

use campusnet_core::{RelationKind, ValidationError};

/// Failures raised by a [`QueryExecutor`](crate::QueryExecutor).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Failed to decode column `{column}`: {message}")]
    Decode { column: String, message: String },

    #[error("Statement `{statement}` returned no rows")]
    EmptyResult { statement: &'static str },

    #[error("Statement `{statement}` is not supported by this store")]
    Unsupported { statement: &'static str },
}

/// Errors from entity, relationship, traversal, and schema operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{label} not found: {key}")]
    NotFound { label: &'static str, key: String },

    #[error("Cannot create {relationship}: no match for {from} -> {to}")]
    EndpointNotFound {
        relationship: RelationKind,
        from: String,
        to: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GraphError {
    /// Whether the failure was caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
