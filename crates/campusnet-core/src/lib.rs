//! campusnet-core: Shared types and policy for the campus social graph.
//!
//! This crate provides the foundational types used across all campusnet components:
//! - Node types (Student, Course, Club, Post) stored in the graph
//! - Relationship kinds (FOLLOWS, ENROLLED_IN, MEMBER_OF)
//! - Relationship-creation policy (endpoint strictness, duplicate handling)
//! - Input validation errors

pub mod config;
pub mod error;
pub mod types;

pub use config::{DuplicatePolicy, EndpointPolicy, RelationPolicy};
pub use error::{require, ValidationError};
pub use types::{Club, Course, NodeLabel, Post, RelationKind, Student};
