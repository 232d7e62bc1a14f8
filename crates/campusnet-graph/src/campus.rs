//! The operation layer over an injected executor.

use std::sync::Arc;

use campusnet_core::RelationPolicy;

use crate::error::{GraphError, StoreError};
use crate::executor::{QueryExecutor, Row};
use crate::statement::Statement;

/// Entry point for every campus graph operation.
///
/// Holds no state between calls beyond the executor handle and the
/// relationship policy. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct CampusGraph {
    executor: Arc<dyn QueryExecutor>,
    policy: RelationPolicy,
}

impl CampusGraph {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            policy: RelationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RelationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RelationPolicy {
        self.policy
    }

    /// Check that the store answers a trivial statement.
    pub async fn ping(&self) -> Result<(), GraphError> {
        self.run(Statement::Ping).await.map(|_| ())
    }

    /// Execute a statement in the access mode it declares.
    pub(crate) async fn run(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        self.try_run(&statement).await.map_err(GraphError::from)
    }

    /// Like [`run`](Self::run) but hands back the raw store error so callers
    /// can decide whether a failure is fatal.
    pub(crate) async fn try_run(&self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        let mode = statement.access_mode();
        tracing::debug!(statement = statement.name(), ?mode, "Executing statement");

        match self.executor.execute(statement, mode).await {
            Ok(rows) => {
                tracing::debug!(
                    statement = statement.name(),
                    rows = rows.len(),
                    "Statement complete"
                );
                Ok(rows)
            }
            Err(e) => {
                tracing::error!(statement = statement.name(), error = %e, "Statement failed");
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::memory_graph;

    #[tokio::test]
    async fn ping_memory_store() {
        memory_graph().ping().await.unwrap();
    }
}
