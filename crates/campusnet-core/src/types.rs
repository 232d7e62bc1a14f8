//! Core domain types for the campus social graph.
//!
//! Students, courses, clubs, and posts are graph nodes keyed by natural
//! identifiers. Relationships carry no properties.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Node Types ────────────────────────────────────────────────────

/// A registered student. `student_id` is the natural key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Student {
    pub name: String,
    pub student_id: String,
}

/// A course, keyed by its code (e.g. "CS101").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Course {
    pub name: String,
    pub code: String,
}

/// A student club, keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Club {
    pub name: String,
    pub description: String,
}

/// A post written by a student.
///
/// Posts have no natural key; `post_id` is the identifier assigned by the
/// graph store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub post_id: i64,
    pub content: String,
    pub author_id: String,
}

/// Node labels of the fixed schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeLabel {
    Student,
    Course,
    Club,
    Post,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Course => "Course",
            Self::Club => "Club",
            Self::Post => "Post",
        }
    }

    /// The property used to look a node up, if the label has a natural key.
    pub fn key_property(&self) -> Option<&'static str> {
        match self {
            Self::Student => Some("student_id"),
            Self::Course => Some("code"),
            Self::Club => Some("name"),
            Self::Post => None,
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Relationship Types ────────────────────────────────────────────

/// Directed relationship types. All start at a Student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Follows,
    EnrolledIn,
    MemberOf,
}

impl RelationKind {
    /// The Cypher relationship type name.
    pub fn as_cypher(&self) -> &'static str {
        match self {
            Self::Follows => "FOLLOWS",
            Self::EnrolledIn => "ENROLLED_IN",
            Self::MemberOf => "MEMBER_OF",
        }
    }

    pub fn source(&self) -> NodeLabel {
        NodeLabel::Student
    }

    pub fn target(&self) -> NodeLabel {
        match self {
            Self::Follows => NodeLabel::Student,
            Self::EnrolledIn => NodeLabel::Course,
            Self::MemberOf => NodeLabel::Club,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cypher())
    }
}
