//! Schema and statistics introspection.
//!
//! Label and relationship-type names are read from the store's catalog and
//! wrapped as [`Ident`]s before being spliced into the per-label and
//! per-type queries. Those fan-out queries run concurrently.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use serde::Serialize;

use crate::campus::CampusGraph;
use crate::error::{GraphError, StoreError};
use crate::executor::{collect_column, column, Row};
use crate::statement::{Ident, Statement};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub nodes: BTreeMap<String, LabelSummary>,
    pub relationships: BTreeMap<String, RelationshipSummary>,
    pub constraints: Vec<CatalogEntry>,
    pub indexes: Vec<CatalogEntry>,
    pub statistics: SchemaStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelSummary {
    /// Union of property keys across nodes with this label, sorted.
    pub properties: Vec<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipSummary {
    pub patterns: Vec<RelationshipPattern>,
    pub total_count: i64,
}

/// Source label → target label with the number of edges between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipPattern {
    pub from: Option<String>,
    pub to: Option<String>,
    pub count: i64,
}

/// A constraint or index as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub labels_or_types: Vec<String>,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaStatistics {
    pub total_nodes: i64,
    pub total_relationships: i64,
    pub node_types: usize,
    pub relationship_types: usize,
}

/// Schema reduced to what a graph diagram needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisualSchema {
    pub nodes: Vec<VisualNode>,
    pub relationships: Vec<VisualRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualNode {
    pub label: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualRelationship {
    pub source: Option<String>,
    pub target: Option<String>,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub count: i64,
}

impl CampusGraph {
    /// Labels, relationship types, per-label properties and counts,
    /// per-type patterns, constraints, indexes, and totals.
    ///
    /// Constraint and index listings degrade to empty lists when the store
    /// cannot provide them.
    pub async fn schema_summary(&self) -> Result<SchemaSummary, GraphError> {
        let labels = self.catalog_idents(Statement::Labels, "label").await?;
        let rel_types = self
            .catalog_idents(Statement::RelationshipTypes, "rel_type")
            .await?;

        let (label_summaries, rel_summaries) = tokio::try_join!(
            try_join_all(labels.iter().cloned().map(|l| self.label_summary(l))),
            try_join_all(rel_types.iter().cloned().map(|t| self.relationship_summary(t))),
        )?;

        let constraints = self.catalog_listing(Statement::Constraints).await;
        let indexes = self.catalog_listing(Statement::Indexes).await;

        let rows = self.run(Statement::Statistics).await?;
        let (total_nodes, total_relationships) = match rows.first() {
            Some(row) => (column(row, "total_nodes")?, column(row, "total_relationships")?),
            None => (0, 0),
        };

        Ok(SchemaSummary {
            nodes: label_summaries.into_iter().collect(),
            relationships: rel_summaries.into_iter().collect(),
            constraints,
            indexes,
            statistics: SchemaStatistics {
                total_nodes,
                total_relationships,
                node_types: labels.len(),
                relationship_types: rel_types.len(),
            },
        })
    }

    /// Node counts per label and edge counts per (source, type, target).
    pub async fn visual_schema(&self) -> Result<VisualSchema, GraphError> {
        let (node_rows, rel_rows) = tokio::try_join!(
            self.run(Statement::VisualNodes),
            self.run(Statement::VisualRelationships),
        )?;

        let mut nodes = Vec::with_capacity(node_rows.len());
        for row in &node_rows {
            nodes.push(VisualNode {
                label: column(row, "label")?,
                count: column(row, "count")?,
            });
        }

        let mut relationships = Vec::with_capacity(rel_rows.len());
        for row in &rel_rows {
            relationships.push(VisualRelationship {
                source: column(row, "source")?,
                target: column(row, "target")?,
                rel_type: column(row, "rel_type")?,
                count: column(row, "count")?,
            });
        }

        Ok(VisualSchema {
            nodes,
            relationships,
        })
    }

    /// Enumerate label or relationship-type names as [`Ident`]s.
    ///
    /// A store without the catalog procedure yields nothing. Any other
    /// failure is returned.
    async fn catalog_idents(
        &self,
        statement: Statement,
        name_column: &str,
    ) -> Result<Vec<Ident>, GraphError> {
        let rows = match self.try_run(&statement).await {
            Ok(rows) => rows,
            Err(StoreError::Unsupported { statement }) => {
                tracing::warn!(statement, "Catalog enumeration unavailable");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let names: Vec<String> = collect_column(&rows, name_column)?;

        Ok(names
            .into_iter()
            .filter_map(|name| {
                let ident = Ident::from_catalog(&name);
                if ident.is_none() {
                    tracing::warn!(%name, "Skipping catalog name that is not a plain identifier");
                }
                ident
            })
            .collect())
    }

    async fn label_summary(&self, label: Ident) -> Result<(String, LabelSummary), GraphError> {
        let (key_rows, count_rows) = tokio::try_join!(
            self.run(Statement::LabelProperties {
                label: label.clone()
            }),
            self.run(Statement::LabelCount {
                label: label.clone()
            }),
        )?;

        let properties = collect_column(&key_rows, "key")?;
        let count = match count_rows.first() {
            Some(row) => column(row, "count")?,
            None => 0,
        };

        Ok((label.as_str().to_string(), LabelSummary { properties, count }))
    }

    async fn relationship_summary(
        &self,
        rel_type: Ident,
    ) -> Result<(String, RelationshipSummary), GraphError> {
        let rows = self
            .run(Statement::RelationshipPatterns {
                rel_type: rel_type.clone(),
            })
            .await?;

        let mut patterns = Vec::with_capacity(rows.len());
        for row in &rows {
            patterns.push(RelationshipPattern {
                from: column(row, "from_label")?,
                to: column(row, "to_label")?,
                count: column(row, "count")?,
            });
        }
        let total_count = patterns.iter().map(|p| p.count).sum();

        Ok((
            rel_type.as_str().to_string(),
            RelationshipSummary {
                patterns,
                total_count,
            },
        ))
    }

    /// List constraints or indexes, or nothing if the store can't.
    async fn catalog_listing(&self, statement: Statement) -> Vec<CatalogEntry> {
        let decoded: Result<Vec<CatalogEntry>, StoreError> = match self.try_run(&statement).await {
            Ok(rows) => rows.iter().map(catalog_entry).collect(),
            Err(e) => Err(e),
        };

        decoded.unwrap_or_else(|e| {
            tracing::warn!(statement = statement.name(), error = %e, "Catalog listing unavailable");
            Vec::new()
        })
    }
}

fn catalog_entry(row: &Row) -> Result<CatalogEntry, StoreError> {
    let list = |name: &str| -> Result<Vec<String>, StoreError> {
        Ok(column::<Option<Vec<String>>>(row, name)?.unwrap_or_default())
    };

    Ok(CatalogEntry {
        name: column(row, "name")?,
        kind: column(row, "type")?,
        labels_or_types: list("labelsOrTypes")?,
        properties: list("properties")?,
        state: column(row, "state").unwrap_or(None),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::campus::testing::{memory_graph, seeded};
    use crate::executor::QueryExecutor;
    use crate::statement::AccessMode;

    /// Answers catalog statements from fixed rows and records every query text.
    struct ScriptedCatalog {
        labels: Option<Vec<&'static str>>,
        rel_types: Vec<&'static str>,
        executed: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        fn new(labels: Option<Vec<&'static str>>, rel_types: Vec<&'static str>) -> Self {
            Self {
                labels,
                rel_types,
                executed: Mutex::new(Vec::new()),
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect()
    }

    #[async_trait]
    impl QueryExecutor for ScriptedCatalog {
        async fn execute(
            &self,
            statement: &Statement,
            _mode: AccessMode,
        ) -> Result<Vec<Row>, StoreError> {
            self.executed.lock().unwrap().push(statement.cypher());
            let unsupported = StoreError::Unsupported {
                statement: statement.name(),
            };
            let values = match statement {
                Statement::Labels => match &self.labels {
                    Some(labels) => labels.iter().map(|l| json!({ "label": l })).collect(),
                    None => return Err(unsupported),
                },
                Statement::RelationshipTypes => {
                    let types = self.rel_types.iter();
                    types.map(|t| json!({ "rel_type": t })).collect()
                }
                Statement::LabelProperties { .. } => vec![json!({ "key": "name" })],
                Statement::LabelCount { .. } => vec![json!({ "count": 2 })],
                Statement::RelationshipPatterns { .. } => vec![json!({
                    "from_label": "Student",
                    "to_label": "Student",
                    "count": 1,
                })],
                Statement::Statistics => {
                    vec![json!({ "total_nodes": 2, "total_relationships": 1 })]
                }
                _ => return Err(unsupported),
            };
            Ok(rows(values))
        }
    }

    #[tokio::test]
    async fn catalog_names_outside_the_allow_list_are_skipped() {
        let store = Arc::new(ScriptedCatalog::new(
            Some(vec!["Student", "Bad Label", "Club`) DETACH DELETE (n"]),
            vec!["FOLLOWS", "HAS-MEMBER"],
        ));
        let graph = CampusGraph::new(store.clone());

        let summary = graph.schema_summary().await.unwrap();

        assert_eq!(summary.nodes.keys().collect::<Vec<_>>(), vec!["Student"]);
        assert_eq!(summary.nodes["Student"].count, 2);
        let rel_types: Vec<&String> = summary.relationships.keys().collect();
        assert_eq!(rel_types, vec!["FOLLOWS"]);
        assert_eq!(summary.statistics.node_types, 1);
        assert_eq!(summary.statistics.relationship_types, 1);

        let executed = store.executed();
        assert!(executed.iter().any(|q| q.contains("`Student`")));
        assert!(executed.iter().all(|q| !q.contains("Bad Label")));
        assert!(executed.iter().all(|q| !q.contains("DETACH DELETE")));
        assert!(executed.iter().all(|q| !q.contains("HAS-MEMBER")));
    }

    #[tokio::test]
    async fn unsupported_label_catalog_degrades_to_empty() {
        let store = Arc::new(ScriptedCatalog::new(None, vec!["FOLLOWS"]));
        let graph = CampusGraph::new(store);

        let summary = graph.schema_summary().await.unwrap();

        assert!(summary.nodes.is_empty());
        assert_eq!(summary.statistics.node_types, 0);
        assert_eq!(summary.statistics.relationship_types, 1);
        assert_eq!(summary.statistics.total_nodes, 2);
        assert!(summary.constraints.is_empty());
    }

    #[tokio::test]
    async fn summary_of_empty_store() {
        let summary = memory_graph().schema_summary().await.unwrap();
        assert!(summary.nodes.is_empty());
        assert!(summary.relationships.is_empty());
        assert!(summary.constraints.is_empty());
        assert!(summary.indexes.is_empty());
        assert_eq!(summary.statistics, SchemaStatistics::default());
    }

    #[tokio::test]
    async fn summary_describes_labels_and_relationships() {
        let graph = seeded().await;
        graph.follow("S1", "S2").await.unwrap();
        graph.follow("S2", "S3").await.unwrap();
        graph.enroll("S1", "CS101").await.unwrap();

        let summary = graph.schema_summary().await.unwrap();

        let student = &summary.nodes["Student"];
        assert_eq!(student.count, 4);
        assert_eq!(student.properties, vec!["name", "student_id"]);
        assert_eq!(summary.nodes["Club"].properties, vec!["description", "name"]);

        let follows = &summary.relationships["FOLLOWS"];
        assert_eq!(follows.total_count, 2);
        assert_eq!(
            follows.patterns,
            vec![RelationshipPattern {
                from: Some("Student".to_string()),
                to: Some("Student".to_string()),
                count: 2,
            }]
        );

        assert_eq!(summary.statistics.total_nodes, 8);
        assert_eq!(summary.statistics.total_relationships, 3);
        assert_eq!(summary.statistics.node_types, 3);
        assert_eq!(summary.statistics.relationship_types, 2);

        // The in-memory store has no constraint or index catalog.
        assert!(summary.constraints.is_empty());
        assert!(summary.indexes.is_empty());
    }

    #[tokio::test]
    async fn visual_schema_orders_by_count() {
        let graph = seeded().await;
        graph.enroll("S1", "CS101").await.unwrap();
        graph.enroll("S2", "CS101").await.unwrap();
        graph.join_club("S1", "Chess").await.unwrap();

        let visual = graph.visual_schema().await.unwrap();
        let json = serde_json::to_value(&visual).unwrap();
        assert_eq!(json["nodes"][0], json!({"label": "Student", "count": 4}));
        assert_eq!(
            json["relationships"][0],
            json!({"source": "Student", "target": "Course", "type": "ENROLLED_IN", "count": 2})
        );
        assert_eq!(visual.relationships.len(), 2);
    }

    #[test]
    fn catalog_entry_tolerates_null_lists() {
        let row = match json!({
            "name": "index_343aff4e",
            "type": "LOOKUP",
            "labelsOrTypes": null,
            "properties": null,
            "state": "ONLINE",
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let entry = catalog_entry(&row).unwrap();
        assert!(entry.labels_or_types.is_empty());
        assert_eq!(entry.state.as_deref(), Some("ONLINE"));
    }
}
