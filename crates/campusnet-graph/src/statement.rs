//! Typed Cypher statements.
//!
//! Each graph operation is a [`Statement`] variant. The variant carries the
//! request values, which are always bound as parameters. The only text
//! spliced into a query is static schema vocabulary and catalog-sourced
//! [`Ident`]s.

use neo4rs::Query;

use campusnet_core::{NodeLabel, RelationKind};

/// Whether a statement needs a write transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// How a result column is decoded into a row value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A node, projected to an object of its visible properties.
    Node,
    Str,
    /// A string that may be null (e.g. `labels(n)[0]` on an unlabeled node).
    OptStr,
    Int,
    StrList,
    OptStrList,
}

/// A named result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// A `Column` literal, so column lists are promoted to `'static`.
macro_rules! col {
    ($name:literal, $kind:ident) => {
        Column {
            name: $name,
            kind: ColumnKind::$kind,
        }
    };
}

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Str(String),
    Int(i64),
}

/// A label or relationship-type name read from the store's catalog.
///
/// Only constructible inside this crate, from catalog enumeration results,
/// so request input can never be spliced into query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*`; anything else is rejected.
    pub(crate) fn from_catalog(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    // ── Entities ──────────────────────────────────────────────────
    CreateStudent { name: String, student_id: String },
    GetStudent { student_id: String },
    DeleteStudent { student_id: String },
    CreateCourse { name: String, code: String },
    CreateClub { name: String, description: String },
    CreatePost { content: String, author_id: String },
    PostsByAuthor { author_id: String },
    DeletePost { post_id: i64 },

    // ── Relationships ─────────────────────────────────────────────
    /// Link a student to the target of `kind`. `merge` selects MERGE over CREATE.
    Link {
        kind: RelationKind,
        from: String,
        to: String,
        merge: bool,
    },

    // ── Traversals ────────────────────────────────────────────────
    Following { student_id: String },
    Followers { student_id: String },
    CourseStudents { code: String },
    ClubMembers { name: String },
    SuggestedFriends { student_id: String },
    CommonInterests { student_id: String },
    PopularCourses { limit: i64 },

    // ── Catalog ───────────────────────────────────────────────────
    Labels,
    RelationshipTypes,
    LabelProperties { label: Ident },
    LabelCount { label: Ident },
    RelationshipPatterns { rel_type: Ident },
    Constraints,
    Indexes,
    Statistics,
    VisualNodes,
    VisualRelationships,
    Ping,
}

impl Statement {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateStudent { .. } => "create_student",
            Self::GetStudent { .. } => "get_student",
            Self::DeleteStudent { .. } => "delete_student",
            Self::CreateCourse { .. } => "create_course",
            Self::CreateClub { .. } => "create_club",
            Self::CreatePost { .. } => "create_post",
            Self::PostsByAuthor { .. } => "posts_by_author",
            Self::DeletePost { .. } => "delete_post",
            Self::Link { .. } => "link",
            Self::Following { .. } => "following",
            Self::Followers { .. } => "followers",
            Self::CourseStudents { .. } => "course_students",
            Self::ClubMembers { .. } => "club_members",
            Self::SuggestedFriends { .. } => "suggested_friends",
            Self::CommonInterests { .. } => "common_interests",
            Self::PopularCourses { .. } => "popular_courses",
            Self::Labels => "labels",
            Self::RelationshipTypes => "relationship_types",
            Self::LabelProperties { .. } => "label_properties",
            Self::LabelCount { .. } => "label_count",
            Self::RelationshipPatterns { .. } => "relationship_patterns",
            Self::Constraints => "constraints",
            Self::Indexes => "indexes",
            Self::Statistics => "statistics",
            Self::VisualNodes => "visual_nodes",
            Self::VisualRelationships => "visual_relationships",
            Self::Ping => "ping",
        }
    }

    pub fn access_mode(&self) -> AccessMode {
        match self {
            Self::CreateStudent { .. }
            | Self::DeleteStudent { .. }
            | Self::CreateCourse { .. }
            | Self::CreateClub { .. }
            | Self::CreatePost { .. }
            | Self::DeletePost { .. }
            | Self::Link { .. } => AccessMode::Write,
            _ => AccessMode::Read,
        }
    }

    /// Render the Cypher text.
    pub fn cypher(&self) -> String {
        match self {
            Self::CreateStudent { .. } => {
                "CREATE (s:Student {name: $name, student_id: $student_id})
                 RETURN s"
                    .to_string()
            }
            Self::GetStudent { .. } => "MATCH (s:Student {student_id: $student_id})
                 RETURN s"
                .to_string(),
            Self::DeleteStudent { .. } => "MATCH (s:Student {student_id: $student_id})
                 DETACH DELETE s
                 RETURN count(s) AS deleted_count"
                .to_string(),
            Self::CreateCourse { .. } => "CREATE (c:Course {name: $name, code: $code})
                 RETURN c"
                .to_string(),
            Self::CreateClub { .. } => "CREATE (c:Club {name: $name, description: $description})
                 RETURN c"
                .to_string(),
            Self::CreatePost { .. } => {
                "CREATE (p:Post {content: $content, author_id: $author_id})
                 RETURN p, id(p) AS post_id"
                    .to_string()
            }
            Self::PostsByAuthor { .. } => "MATCH (p:Post {author_id: $author_id})
                 RETURN p, id(p) AS post_id
                 ORDER BY post_id"
                .to_string(),
            Self::DeletePost { .. } => "MATCH (p:Post)
                 WHERE id(p) = $post_id
                 DETACH DELETE p
                 RETURN count(p) AS deleted_count"
                .to_string(),
            Self::Link { kind, merge, .. } => link_cypher(*kind, *merge),
            Self::Following { .. } => {
                "MATCH (s:Student {student_id: $student_id})-[:FOLLOWS]->(followed:Student)
                 RETURN DISTINCT followed
                 ORDER BY followed.student_id"
                    .to_string()
            }
            Self::Followers { .. } => {
                "MATCH (follower:Student)-[:FOLLOWS]->(s:Student {student_id: $student_id})
                 RETURN DISTINCT follower
                 ORDER BY follower.student_id"
                    .to_string()
            }
            Self::CourseStudents { .. } => {
                "MATCH (s:Student)-[:ENROLLED_IN]->(c:Course {code: $code})
                 RETURN DISTINCT s
                 ORDER BY s.student_id"
                    .to_string()
            }
            Self::ClubMembers { .. } => "MATCH (s:Student)-[:MEMBER_OF]->(c:Club {name: $name})
                 RETURN DISTINCT s
                 ORDER BY s.student_id"
                .to_string(),
            Self::SuggestedFriends { .. } => {
                "MATCH (s:Student {student_id: $student_id})-[:FOLLOWS]->(:Student)-[:FOLLOWS]->(suggested:Student)
                 WHERE NOT (s)-[:FOLLOWS]->(suggested) AND s <> suggested
                 RETURN DISTINCT suggested
                 ORDER BY suggested.student_id"
                    .to_string()
            }
            Self::CommonInterests { .. } => "MATCH (s:Student {student_id: $student_id})
                 MATCH (other:Student)
                 WHERE s <> other
                 OPTIONAL MATCH (s)-[:ENROLLED_IN]->(course:Course)<-[:ENROLLED_IN]-(other)
                 WITH s, other, collect(DISTINCT course.name) AS common_courses
                 OPTIONAL MATCH (s)-[:MEMBER_OF]->(club:Club)<-[:MEMBER_OF]-(other)
                 WITH s, other, common_courses, collect(DISTINCT club.name) AS common_clubs
                 WHERE size(common_courses) > 0 OR size(common_clubs) > 0
                 RETURN other.name AS student_name,
                        other.student_id AS student_id,
                        common_courses,
                        common_clubs,
                        size(common_courses) + size(common_clubs) AS total_common_interests
                 ORDER BY total_common_interests DESC, student_id ASC"
                .to_string(),
            Self::PopularCourses { .. } => "MATCH (s:Student)-[:ENROLLED_IN]->(c:Course)
                 RETURN c, count(s) AS student_count
                 ORDER BY student_count DESC, c.code ASC
                 LIMIT $limit"
                .to_string(),
            Self::Labels => "CALL db.labels() YIELD label
                 RETURN label
                 ORDER BY label"
                .to_string(),
            Self::RelationshipTypes => "CALL db.relationshipTypes() YIELD relationshipType
                 RETURN relationshipType AS rel_type
                 ORDER BY rel_type"
                .to_string(),
            Self::LabelProperties { label } => format!(
                "MATCH (n:{})
                 UNWIND keys(n) AS key
                 RETURN DISTINCT key
                 ORDER BY key",
                label.quoted()
            ),
            Self::LabelCount { label } => format!(
                "MATCH (n:{})
                 RETURN count(n) AS count",
                label.quoted()
            ),
            Self::RelationshipPatterns { rel_type } => format!(
                "MATCH (a)-[r:{}]->(b)
                 WITH labels(a)[0] AS from_label, labels(b)[0] AS to_label, count(r) AS count
                 RETURN from_label, to_label, count
                 ORDER BY count DESC, from_label, to_label",
                rel_type.quoted()
            ),
            Self::Constraints => "SHOW CONSTRAINTS YIELD name, type, labelsOrTypes, properties
                 RETURN name, type, labelsOrTypes, properties"
                .to_string(),
            Self::Indexes => "SHOW INDEXES YIELD name, type, labelsOrTypes, properties, state
                 RETURN name, type, labelsOrTypes, properties, state"
                .to_string(),
            Self::Statistics => "MATCH (n)
                 WITH count(n) AS total_nodes
                 OPTIONAL MATCH ()-[r]->()
                 RETURN total_nodes, count(r) AS total_relationships"
                .to_string(),
            Self::VisualNodes => "MATCH (n)
                 WITH labels(n)[0] AS label, count(n) AS count
                 RETURN label, count
                 ORDER BY count DESC, label"
                .to_string(),
            Self::VisualRelationships => "MATCH (a)-[r]->(b)
                 WITH labels(a)[0] AS source, type(r) AS rel_type, labels(b)[0] AS target, count(r) AS count
                 RETURN source, rel_type, target, count
                 ORDER BY count DESC, source, rel_type, target"
                .to_string(),
            Self::Ping => "RETURN 1 AS ok".to_string(),
        }
    }

    /// Named parameters bound to the query.
    pub fn params(&self) -> Vec<(&'static str, Param)> {
        let s = |v: &String| Param::Str(v.clone());
        match self {
            Self::CreateStudent { name, student_id } => {
                vec![("name", s(name)), ("student_id", s(student_id))]
            }
            Self::GetStudent { student_id }
            | Self::DeleteStudent { student_id }
            | Self::Following { student_id }
            | Self::Followers { student_id }
            | Self::SuggestedFriends { student_id }
            | Self::CommonInterests { student_id } => vec![("student_id", s(student_id))],
            Self::CreateCourse { name, code } => vec![("name", s(name)), ("code", s(code))],
            Self::CreateClub { name, description } => {
                vec![("name", s(name)), ("description", s(description))]
            }
            Self::CreatePost { content, author_id } => {
                vec![("content", s(content)), ("author_id", s(author_id))]
            }
            Self::PostsByAuthor { author_id } => vec![("author_id", s(author_id))],
            Self::DeletePost { post_id } => vec![("post_id", Param::Int(*post_id))],
            Self::Link { from, to, .. } => vec![("from", s(from)), ("to", s(to))],
            Self::CourseStudents { code } => vec![("code", s(code))],
            Self::ClubMembers { name } => vec![("name", s(name))],
            Self::PopularCourses { limit } => vec![("limit", Param::Int(*limit))],
            Self::Labels
            | Self::RelationshipTypes
            | Self::LabelProperties { .. }
            | Self::LabelCount { .. }
            | Self::RelationshipPatterns { .. }
            | Self::Constraints
            | Self::Indexes
            | Self::Statistics
            | Self::VisualNodes
            | Self::VisualRelationships
            | Self::Ping => Vec::new(),
        }
    }

    /// Result columns, in RETURN order.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::CreateStudent { .. } | Self::GetStudent { .. } => &[col!("s", Node)],
            Self::DeleteStudent { .. } | Self::DeletePost { .. } => &[col!("deleted_count", Int)],
            Self::CreateCourse { .. } | Self::CreateClub { .. } => &[col!("c", Node)],
            Self::CreatePost { .. } | Self::PostsByAuthor { .. } => {
                &[col!("p", Node), col!("post_id", Int)]
            }
            Self::Link { .. } => &[col!("from_key", Str), col!("to_key", Str)],
            Self::Following { .. } => &[col!("followed", Node)],
            Self::Followers { .. } => &[col!("follower", Node)],
            Self::CourseStudents { .. } | Self::ClubMembers { .. } => &[col!("s", Node)],
            Self::SuggestedFriends { .. } => &[col!("suggested", Node)],
            Self::CommonInterests { .. } => &[
                col!("student_name", Str),
                col!("student_id", Str),
                col!("common_courses", StrList),
                col!("common_clubs", StrList),
                col!("total_common_interests", Int),
            ],
            Self::PopularCourses { .. } => &[col!("c", Node), col!("student_count", Int)],
            Self::Labels => &[col!("label", Str)],
            Self::RelationshipTypes => &[col!("rel_type", Str)],
            Self::LabelProperties { .. } => &[col!("key", Str)],
            Self::LabelCount { .. } => &[col!("count", Int)],
            Self::RelationshipPatterns { .. } => &[
                col!("from_label", OptStr),
                col!("to_label", OptStr),
                col!("count", Int),
            ],
            Self::Constraints => &[
                col!("name", Str),
                col!("type", Str),
                col!("labelsOrTypes", OptStrList),
                col!("properties", OptStrList),
            ],
            Self::Indexes => &[
                col!("name", Str),
                col!("type", Str),
                col!("labelsOrTypes", OptStrList),
                col!("properties", OptStrList),
                col!("state", OptStr),
            ],
            Self::Statistics => &[col!("total_nodes", Int), col!("total_relationships", Int)],
            Self::VisualNodes => &[col!("label", OptStr), col!("count", Int)],
            Self::VisualRelationships => &[
                col!("source", OptStr),
                col!("rel_type", Str),
                col!("target", OptStr),
                col!("count", Int),
            ],
            Self::Ping => &[col!("ok", Int)],
        }
    }

    /// Build the neo4rs query with all parameters bound.
    pub fn to_query(&self) -> Query {
        self.params()
            .into_iter()
            .fold(neo4rs::query(&self.cypher()), |q, (key, value)| match value {
                Param::Str(v) => q.param(key, v),
                Param::Int(v) => q.param(key, v),
            })
    }
}

fn link_cypher(kind: RelationKind, merge: bool) -> String {
    let source = kind.source();
    let target = kind.target();
    let source_key = key_of(source);
    let target_key = key_of(target);
    let verb = if merge { "MERGE" } else { "CREATE" };
    format!(
        "MATCH (a:{source} {{{source_key}: $from}})
         MATCH (b:{target} {{{target_key}: $to}})
         {verb} (a)-[:{rel}]->(b)
         RETURN a.{source_key} AS from_key, b.{target_key} AS to_key",
        rel = kind.as_cypher(),
    )
}

fn key_of(label: NodeLabel) -> &'static str {
    // Relationship endpoints are always keyed labels.
    label.key_property().unwrap_or("name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_accepts_only_plain_names() {
        assert!(Ident::from_catalog("Student").is_some());
        assert!(Ident::from_catalog("ENROLLED_IN").is_some());
        assert!(Ident::from_catalog("_private2").is_some());
        assert!(Ident::from_catalog("").is_none());
        assert!(Ident::from_catalog("2fast").is_none());
        assert!(Ident::from_catalog("Student) DETACH DELETE (n").is_none());
        assert!(Ident::from_catalog("a`b").is_none());
    }

    #[test]
    fn catalog_idents_are_quoted() {
        let label = Ident::from_catalog("Course").unwrap();
        let cypher = Statement::LabelCount { label }.cypher();
        assert!(cypher.contains("MATCH (n:`Course`)"));
    }

    #[test]
    fn follow_uses_two_independent_matches() {
        let stmt = Statement::Link {
            kind: RelationKind::Follows,
            from: "S1".to_string(),
            to: "S2".to_string(),
            merge: false,
        };
        let cypher = stmt.cypher();
        assert!(cypher.contains("MATCH (a:Student {student_id: $from})"));
        assert!(cypher.contains("MATCH (b:Student {student_id: $to})"));
        assert!(cypher.contains("CREATE (a)-[:FOLLOWS]->(b)"));
        assert_eq!(stmt.access_mode(), AccessMode::Write);
    }

    #[test]
    fn link_targets_use_natural_keys() {
        let enroll = Statement::Link {
            kind: RelationKind::EnrolledIn,
            from: "S1".to_string(),
            to: "CS101".to_string(),
            merge: true,
        }
        .cypher();
        assert!(enroll.contains("MATCH (b:Course {code: $to})"));
        assert!(enroll.contains("MERGE (a)-[:ENROLLED_IN]->(b)"));

        let join = Statement::Link {
            kind: RelationKind::MemberOf,
            from: "S1".to_string(),
            to: "Chess".to_string(),
            merge: false,
        }
        .cypher();
        assert!(join.contains("MATCH (b:Club {name: $to})"));
    }

    #[test]
    fn request_values_are_parameters_not_text() {
        let stmt = Statement::GetStudent {
            student_id: "S1' OR 1=1".to_string(),
        };
        assert!(!stmt.cypher().contains("S1'"));
        assert_eq!(
            stmt.params(),
            vec![("student_id", Param::Str("S1' OR 1=1".to_string()))]
        );
    }

    #[test]
    fn columns_follow_return_order() {
        let columns: &'static [Column] = Statement::CommonInterests {
            student_id: "S1".to_string(),
        }
        .columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "student_name",
                "student_id",
                "common_courses",
                "common_clubs",
                "total_common_interests",
            ]
        );
        assert_eq!(columns[2].kind, ColumnKind::StrList);

        assert_eq!(
            Statement::Ping.columns(),
            &[Column {
                name: "ok",
                kind: ColumnKind::Int,
            }]
        );
    }

    #[test]
    fn suggested_friends_excludes_direct_follows_and_self() {
        let cypher = Statement::SuggestedFriends {
            student_id: "S1".to_string(),
        }
        .cypher();
        assert!(cypher.contains("WHERE NOT (s)-[:FOLLOWS]->(suggested) AND s <> suggested"));
        assert!(cypher.contains("RETURN DISTINCT suggested"));
    }

    #[test]
    fn detach_delete_for_students_and_posts() {
        let student = Statement::DeleteStudent {
            student_id: "S1".to_string(),
        };
        assert!(student.cypher().contains("DETACH DELETE s"));
        let post = Statement::DeletePost { post_id: 7 };
        assert!(post.cypher().contains("WHERE id(p) = $post_id"));
        assert_eq!(post.params(), vec![("post_id", Param::Int(7))]);
    }

    #[test]
    fn read_statements_are_read_mode() {
        assert_eq!(Statement::Labels.access_mode(), AccessMode::Read);
        assert_eq!(
            Statement::PopularCourses { limit: 3 }.access_mode(),
            AccessMode::Read
        );
    }

    #[test]
    fn columns_match_return_clause() {
        let stmt = Statement::CommonInterests {
            student_id: "S1".to_string(),
        };
        let cypher = stmt.cypher();
        for column in stmt.columns() {
            assert!(cypher.contains(column.name), "missing {}", column.name);
        }
    }
}
