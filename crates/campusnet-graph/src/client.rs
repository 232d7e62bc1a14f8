//! Neo4j connection management and the Neo4j-backed executor.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::executor::{QueryExecutor, Row};
use crate::statement::{AccessMode, Column, ColumnKind, Statement};

/// Node properties exposed in results. Anything else stays in the store.
const VISIBLE_PROPERTIES: &[&str] = &[
    "name",
    "student_id",
    "code",
    "description",
    "content",
    "author_id",
];

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Every `execute` call borrows a pooled connection for the duration of
/// the statement only. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, StoreError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, user = %config.user, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Run a query in an auto-commit transaction and collect all rows.
    async fn read_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, StoreError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a query in an explicit transaction: commit after every row has
    /// been read, roll back on any failure.
    async fn write_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, StoreError> {
        let mut txn = self.graph.start_txn().await?;

        let collected = async {
            let mut stream = txn.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next(txn.handle()).await? {
                rows.push(row);
            }
            Ok::<_, neo4rs::Error>(rows)
        }
        .await;

        match collected {
            Ok(rows) => {
                txn.commit().await?;
                Ok(rows)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl QueryExecutor for GraphClient {
    async fn execute(
        &self,
        statement: &Statement,
        mode: AccessMode,
    ) -> Result<Vec<Row>, StoreError> {
        let query = statement.to_query();
        let raw = match mode {
            AccessMode::Read => self.read_rows(query).await?,
            AccessMode::Write => self.write_rows(query).await?,
        };

        raw.iter()
            .map(|row| decode_row(row, statement.columns()))
            .collect()
    }
}

fn decode_row(row: &neo4rs::Row, columns: &[Column]) -> Result<Row, StoreError> {
    let mut out = Row::new();
    for column in columns {
        out.insert(column.name.to_string(), decode_column(row, column)?);
    }
    Ok(out)
}

fn decode_column(row: &neo4rs::Row, column: &Column) -> Result<Value, StoreError> {
    let name = column.name;
    let decode_err = |e| decode_error(name, e);

    let value = match column.kind {
        ColumnKind::Node => {
            let node: neo4rs::Node = row.get(name).map_err(decode_err)?;
            node_properties(&node)
        }
        ColumnKind::Str => Value::String(row.get::<String>(name).map_err(decode_err)?),
        ColumnKind::OptStr => row
            .get::<Option<String>>(name)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
        ColumnKind::Int => Value::from(row.get::<i64>(name).map_err(decode_err)?),
        ColumnKind::StrList => Value::from(row.get::<Vec<String>>(name).map_err(decode_err)?),
        ColumnKind::OptStrList => row
            .get::<Option<Vec<String>>>(name)
            .ok()
            .flatten()
            .map(Value::from)
            .unwrap_or(Value::Null),
    };
    Ok(value)
}

fn decode_error(column: &str, e: neo4rs::DeError) -> StoreError {
    StoreError::Decode {
        column: column.to_string(),
        message: e.to_string(),
    }
}

/// Project a neo4rs::Node to an object of its visible string properties.
fn node_properties(node: &neo4rs::Node) -> Value {
    let mut props = serde_json::Map::new();
    for key in VISIBLE_PROPERTIES {
        if let Ok(v) = node.get::<String>(key) {
            props.insert((*key).to_string(), Value::String(v));
        }
    }
    Value::Object(props)
}
