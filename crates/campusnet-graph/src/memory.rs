//! In-memory executor.
//!
//! Interprets each [`Statement`] variant directly over a node/edge store
//! guarded by `tokio::sync::RwLock`, producing the same row shapes as the
//! Neo4j executor. Node keys are not unique, parallel edges are kept, and
//! deletes detach incident edges, matching the graph store's behaviour.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use campusnet_core::{NodeLabel, RelationKind};

use crate::error::StoreError;
use crate::executor::{QueryExecutor, Row};
use crate::statement::{AccessMode, Ident, Statement};

type NodeId = i64;

#[derive(Debug, Clone)]
struct MemNode {
    label: NodeLabel,
    props: BTreeMap<&'static str, String>,
}

impl MemNode {
    fn prop(&self, key: &str) -> &str {
        self.props.get(key).map(String::as_str).unwrap_or_default()
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.props
                .iter()
                .map(|(k, v)| ((*k).to_string(), Value::String(v.clone())))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct MemEdge {
    kind: RelationKind,
    from: NodeId,
    to: NodeId,
}

#[derive(Debug, Default)]
struct Store {
    next_id: NodeId,
    nodes: BTreeMap<NodeId, MemNode>,
    edges: Vec<MemEdge>,
}

/// In-memory implementation of [`QueryExecutor`].
#[derive(Debug, Default)]
pub struct MemoryGraph {
    store: RwLock<Store>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryExecutor for MemoryGraph {
    async fn execute(
        &self,
        statement: &Statement,
        mode: AccessMode,
    ) -> Result<Vec<Row>, StoreError> {
        match mode {
            AccessMode::Write => self.store.write().await.apply(statement),
            AccessMode::Read => {
                if statement.access_mode() == AccessMode::Write {
                    return Err(StoreError::Unsupported {
                        statement: statement.name(),
                    });
                }
                self.store.read().await.read(statement)
            }
        }
    }
}

impl Store {
    // ── Writes ───────────────────────────────────────────────────

    fn apply(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        match statement {
            Statement::CreateStudent { name, student_id } => {
                let id = self.insert(
                    NodeLabel::Student,
                    [("name", name), ("student_id", student_id)],
                );
                Ok(vec![self.node_row("s", id)])
            }
            Statement::CreateCourse { name, code } => {
                let id = self.insert(NodeLabel::Course, [("name", name), ("code", code)]);
                Ok(vec![self.node_row("c", id)])
            }
            Statement::CreateClub { name, description } => {
                let id = self.insert(
                    NodeLabel::Club,
                    [("name", name), ("description", description)],
                );
                Ok(vec![self.node_row("c", id)])
            }
            Statement::CreatePost { content, author_id } => {
                let id = self.insert(
                    NodeLabel::Post,
                    [("content", content), ("author_id", author_id)],
                );
                let mut r = self.node_row("p", id);
                r.insert("post_id".to_string(), Value::from(id));
                Ok(vec![r])
            }
            Statement::DeleteStudent { student_id } => {
                let ids = self.find(NodeLabel::Student, student_id);
                Ok(vec![deleted_row(self.detach_delete(&ids))])
            }
            Statement::DeletePost { post_id } => {
                let ids: Vec<NodeId> = self
                    .nodes
                    .get(post_id)
                    .filter(|n| n.label == NodeLabel::Post)
                    .map(|_| vec![*post_id])
                    .unwrap_or_default();
                Ok(vec![deleted_row(self.detach_delete(&ids))])
            }
            Statement::Link {
                kind,
                from,
                to,
                merge,
            } => Ok(self.link(*kind, from, to, *merge)),
            other => self.read(other),
        }
    }

    fn insert<const N: usize>(
        &mut self,
        label: NodeLabel,
        props: [(&'static str, &String); N],
    ) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        let props = props.into_iter().map(|(k, v)| (k, v.clone())).collect();
        self.nodes.insert(id, MemNode { label, props });
        id
    }

    fn detach_delete(&mut self, ids: &[NodeId]) -> i64 {
        self.edges
            .retain(|e| !ids.contains(&e.from) && !ids.contains(&e.to));
        ids.iter()
            .filter(|id| self.nodes.remove(*id).is_some())
            .count() as i64
    }

    fn link(&mut self, kind: RelationKind, from: &str, to: &str, merge: bool) -> Vec<Row> {
        let sources = self.find(kind.source(), from);
        let targets = self.find(kind.target(), to);
        let mut rows = Vec::new();
        for &a in &sources {
            for &b in &targets {
                let exists = self
                    .edges
                    .iter()
                    .any(|e| e.kind == kind && e.from == a && e.to == b);
                if !(merge && exists) {
                    self.edges.push(MemEdge {
                        kind,
                        from: a,
                        to: b,
                    });
                }
                rows.push(row(json!({
                    "from_key": self.key_of(a),
                    "to_key": self.key_of(b),
                })));
            }
        }
        rows
    }

    // ── Reads ────────────────────────────────────────────────────

    fn read(&self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        let rows = match statement {
            Statement::GetStudent { student_id } => self
                .find(NodeLabel::Student, student_id)
                .into_iter()
                .map(|id| self.node_row("s", id))
                .collect(),
            Statement::PostsByAuthor { author_id } => self
                .nodes
                .iter()
                .filter(|(_, n)| {
                    n.label == NodeLabel::Post && n.prop("author_id") == author_id.as_str()
                })
                .map(|(&id, _)| {
                    let mut r = self.node_row("p", id);
                    r.insert("post_id".to_string(), Value::from(id));
                    r
                })
                .collect(),
            Statement::Following { student_id } => {
                let starts = self.find(NodeLabel::Student, student_id);
                let found = self.step(&starts, RelationKind::Follows, Direction::Out);
                self.student_rows("followed", found)
            }
            Statement::Followers { student_id } => {
                let starts = self.find(NodeLabel::Student, student_id);
                let found = self.step(&starts, RelationKind::Follows, Direction::In);
                self.student_rows("follower", found)
            }
            Statement::CourseStudents { code } => {
                let courses = self.find(NodeLabel::Course, code);
                let found = self.step(&courses, RelationKind::EnrolledIn, Direction::In);
                self.student_rows("s", found)
            }
            Statement::ClubMembers { name } => {
                let clubs = self.find(NodeLabel::Club, name);
                let found = self.step(&clubs, RelationKind::MemberOf, Direction::In);
                self.student_rows("s", found)
            }
            Statement::SuggestedFriends { student_id } => self.suggested_friends(student_id),
            Statement::CommonInterests { student_id } => self.common_interests(student_id),
            Statement::PopularCourses { limit } => self.popular_courses(*limit),
            Statement::Labels => self
                .labels()
                .into_iter()
                .map(|label| row(json!({ "label": label })))
                .collect(),
            Statement::RelationshipTypes => self
                .edges
                .iter()
                .map(|e| e.kind.as_cypher())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|t| row(json!({ "rel_type": t })))
                .collect(),
            Statement::LabelProperties { label } => self
                .labelled(label)
                .flat_map(|n| n.props.keys().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|key| row(json!({ "key": key })))
                .collect(),
            Statement::LabelCount { label } => {
                vec![row(json!({ "count": self.labelled(label).count() as i64 }))]
            }
            Statement::RelationshipPatterns { rel_type } => self.patterns(Some(rel_type)),
            Statement::Statistics => vec![row(json!({
                "total_nodes": self.nodes.len() as i64,
                "total_relationships": self.edges.len() as i64,
            }))],
            Statement::VisualNodes => {
                let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
                for node in self.nodes.values() {
                    *counts.entry(node.label.as_str()).or_default() += 1;
                }
                let mut entries: Vec<_> = counts.into_iter().collect();
                entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
                entries
                    .into_iter()
                    .map(|(label, count)| row(json!({ "label": label, "count": count })))
                    .collect()
            }
            Statement::VisualRelationships => self.patterns(None),
            Statement::Ping => vec![row(json!({ "ok": 1 }))],
            Statement::Constraints | Statement::Indexes => {
                return Err(StoreError::Unsupported {
                    statement: statement.name(),
                })
            }
            Statement::CreateStudent { .. }
            | Statement::CreateCourse { .. }
            | Statement::CreateClub { .. }
            | Statement::CreatePost { .. }
            | Statement::DeleteStudent { .. }
            | Statement::DeletePost { .. }
            | Statement::Link { .. } => {
                return Err(StoreError::Unsupported {
                    statement: statement.name(),
                })
            }
        };
        Ok(rows)
    }

    fn suggested_friends(&self, student_id: &str) -> Vec<Row> {
        let mut found = BTreeSet::new();
        for s in self.find(NodeLabel::Student, student_id) {
            let direct = self.step(&[s], RelationKind::Follows, Direction::Out);
            let second = self.step(&direct, RelationKind::Follows, Direction::Out);
            found.extend(
                second
                    .into_iter()
                    .filter(|c| *c != s && !self.has_edge(RelationKind::Follows, s, *c)),
            );
        }
        self.student_rows("suggested", found.into_iter().collect())
    }

    fn common_interests(&self, student_id: &str) -> Vec<Row> {
        let mut results = Vec::new();
        for s in self.find(NodeLabel::Student, student_id) {
            for (&other, node) in &self.nodes {
                if other == s || node.label != NodeLabel::Student {
                    continue;
                }
                let courses = self.shared(s, other, RelationKind::EnrolledIn);
                let clubs = self.shared(s, other, RelationKind::MemberOf);
                if courses.is_empty() && clubs.is_empty() {
                    continue;
                }
                let total = (courses.len() + clubs.len()) as i64;
                let student_id = node.prop("student_id");
                let r = row(json!({
                    "student_name": node.prop("name"),
                    "student_id": student_id,
                    "common_courses": courses,
                    "common_clubs": clubs,
                    "total_common_interests": total,
                }));
                results.push((total, student_id.to_string(), r));
            }
        }
        results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        results.into_iter().map(|(_, _, r)| r).collect()
    }

    fn popular_courses(&self, limit: i64) -> Vec<Row> {
        let mut counts: BTreeMap<NodeId, i64> = BTreeMap::new();
        for edge in &self.edges {
            if edge.kind == RelationKind::EnrolledIn && self.is(edge.to, NodeLabel::Course) {
                *counts.entry(edge.to).or_default() += 1;
            }
        }
        let mut entries: Vec<_> = counts.into_iter().collect();
        let code = |id: &NodeId| self.nodes[id].prop("code");
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| code(&a.0).cmp(code(&b.0))));
        entries
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(id, count)| {
                let mut r = self.node_row("c", id);
                r.insert("student_count".to_string(), Value::from(count));
                r
            })
            .collect()
    }

    /// Group edges by (source label, type, target label), optionally for one type.
    fn patterns(&self, rel_type: Option<&Ident>) -> Vec<Row> {
        let mut counts: BTreeMap<(&str, &str, &str), i64> = BTreeMap::new();
        for edge in &self.edges {
            if rel_type.is_some_and(|t| t.as_str() != edge.kind.as_cypher()) {
                continue;
            }
            let from = self.nodes[&edge.from].label.as_str();
            let to = self.nodes[&edge.to].label.as_str();
            *counts.entry((from, edge.kind.as_cypher(), to)).or_default() += 1;
        }
        let mut entries: Vec<_> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
            .into_iter()
            .map(|((from, kind, to), count)| match rel_type {
                Some(_) => row(json!({ "from_label": from, "to_label": to, "count": count })),
                None => row(json!({
                    "source": from,
                    "rel_type": kind,
                    "target": to,
                    "count": count,
                })),
            })
            .collect()
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn find(&self, label: NodeLabel, key: &str) -> Vec<NodeId> {
        let Some(property) = label.key_property() else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|(_, n)| n.label == label && n.prop(property) == key)
            .map(|(&id, _)| id)
            .collect()
    }

    fn step(&self, from: &[NodeId], kind: RelationKind, direction: Direction) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| match direction {
                Direction::Out if from.contains(&e.from) => Some(e.to),
                Direction::In if from.contains(&e.to) => Some(e.from),
                _ => None,
            })
            .collect()
    }

    fn has_edge(&self, kind: RelationKind, from: NodeId, to: NodeId) -> bool {
        self.edges
            .iter()
            .any(|e| e.kind == kind && e.from == from && e.to == to)
    }

    /// Names of targets of `kind` reachable from both students.
    fn shared(&self, a: NodeId, b: NodeId, kind: RelationKind) -> Vec<String> {
        let mine: BTreeSet<NodeId> = self.step(&[a], kind, Direction::Out).into_iter().collect();
        let theirs: BTreeSet<NodeId> = self.step(&[b], kind, Direction::Out).into_iter().collect();
        mine.intersection(&theirs)
            .map(|id| self.nodes[id].prop("name").to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn is(&self, id: NodeId, label: NodeLabel) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.label == label)
    }

    fn key_of(&self, id: NodeId) -> &str {
        let node = &self.nodes[&id];
        node.label
            .key_property()
            .map(|k| node.prop(k))
            .unwrap_or_default()
    }

    fn labels(&self) -> BTreeSet<&'static str> {
        self.nodes.values().map(|n| n.label.as_str()).collect()
    }

    fn labelled<'a>(&'a self, label: &'a Ident) -> impl Iterator<Item = &'a MemNode> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.label.as_str() == label.as_str())
    }

    fn node_row(&self, column: &str, id: NodeId) -> Row {
        let mut r = Row::new();
        r.insert(column.to_string(), self.nodes[&id].to_value());
        r
    }

    /// DISTINCT students ordered by student_id.
    fn student_rows(&self, column: &str, ids: Vec<NodeId>) -> Vec<Row> {
        let mut unique: Vec<NodeId> = ids
            .into_iter()
            .filter(|id| self.is(*id, NodeLabel::Student))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        unique.sort_by_key(|id| self.nodes[id].prop("student_id"));
        unique.into_iter().map(|id| self.node_row(column, id)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Out,
    In,
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn deleted_row(count: i64) -> Row {
    row(json!({ "deleted_count": count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write(graph: &MemoryGraph, statement: Statement) -> Vec<Row> {
        graph.execute(&statement, AccessMode::Write).await.unwrap()
    }

    async fn read(graph: &MemoryGraph, statement: Statement) -> Vec<Row> {
        graph.execute(&statement, AccessMode::Read).await.unwrap()
    }

    fn student(name: &str, id: &str) -> Statement {
        Statement::CreateStudent {
            name: name.to_string(),
            student_id: id.to_string(),
        }
    }

    fn follow(from: &str, to: &str) -> Statement {
        Statement::Link {
            kind: RelationKind::Follows,
            from: from.to_string(),
            to: to.to_string(),
            merge: false,
        }
    }

    #[tokio::test]
    async fn create_returns_node_properties() {
        let graph = MemoryGraph::new();
        let rows = write(&graph, student("Alice", "S1")).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["s"], json!({"name": "Alice", "student_id": "S1"}));
    }

    #[tokio::test]
    async fn write_statement_in_read_mode_is_rejected() {
        let graph = MemoryGraph::new();
        let err = graph
            .execute(&student("Alice", "S1"), AccessMode::Read)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Unsupported {
                statement: "create_student",
            }
        ));
    }

    #[tokio::test]
    async fn link_with_missing_endpoint_creates_nothing() {
        let graph = MemoryGraph::new();
        write(&graph, student("Alice", "S1")).await;
        let rows = write(&graph, follow("S1", "S404")).await;
        assert!(rows.is_empty());
        let stats = read(&graph, Statement::Statistics).await;
        assert_eq!(stats[0]["total_relationships"], json!(0));
    }

    #[tokio::test]
    async fn merge_keeps_one_edge() {
        let graph = MemoryGraph::new();
        write(&graph, student("Alice", "S1")).await;
        write(&graph, student("Bob", "S2")).await;
        let merge = Statement::Link {
            kind: RelationKind::Follows,
            from: "S1".to_string(),
            to: "S2".to_string(),
            merge: true,
        };
        assert_eq!(write(&graph, merge.clone()).await.len(), 1);
        assert_eq!(write(&graph, merge).await.len(), 1);
        let stats = read(&graph, Statement::Statistics).await;
        assert_eq!(stats[0]["total_relationships"], json!(1));
    }

    #[tokio::test]
    async fn detach_delete_removes_incident_edges() {
        let graph = MemoryGraph::new();
        write(&graph, student("Alice", "S1")).await;
        write(&graph, student("Bob", "S2")).await;
        write(&graph, follow("S1", "S2")).await;
        write(&graph, follow("S2", "S1")).await;

        let rows = write(
            &graph,
            Statement::DeleteStudent {
                student_id: "S2".to_string(),
            },
        )
        .await;
        assert_eq!(rows[0]["deleted_count"], json!(1));

        let stats = read(&graph, Statement::Statistics).await;
        assert_eq!(stats[0]["total_nodes"], json!(1));
        assert_eq!(stats[0]["total_relationships"], json!(0));
    }

    #[tokio::test]
    async fn catalog_listing_is_unsupported() {
        let graph = MemoryGraph::new();
        let err = graph
            .execute(&Statement::Constraints, AccessMode::Read)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { statement: "constraints" }));
    }

    #[tokio::test]
    async fn relationship_patterns_group_by_labels() {
        let graph = MemoryGraph::new();
        write(&graph, student("Alice", "S1")).await;
        write(&graph, student("Bob", "S2")).await;
        write(
            &graph,
            Statement::CreateCourse {
                name: "Algorithms".to_string(),
                code: "CS101".to_string(),
            },
        )
        .await;
        write(&graph, follow("S1", "S2")).await;
        write(
            &graph,
            Statement::Link {
                kind: RelationKind::EnrolledIn,
                from: "S1".to_string(),
                to: "CS101".to_string(),
                merge: false,
            },
        )
        .await;

        let follows = Ident::from_catalog("FOLLOWS").unwrap();
        let rows = read(&graph, Statement::RelationshipPatterns { rel_type: follows }).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(
            Value::Object(rows[0].clone()),
            json!({"from_label": "Student", "to_label": "Student", "count": 1})
        );

        let visual = read(&graph, Statement::VisualRelationships).await;
        assert_eq!(visual.len(), 2);
    }
}
