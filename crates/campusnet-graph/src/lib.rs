//! CampusNet Graph: query construction and traversal for the campus social graph.
//!
//! Every operation is expressed as a typed [`Statement`] and handed to a
//! [`QueryExecutor`]. [`GraphClient`] executes against Neo4j; [`MemoryGraph`]
//! interprets the same statements in process. [`CampusGraph`] owns an
//! executor and exposes the entity, relationship, traversal, and schema
//! operations.

pub mod campus;
pub mod client;
pub mod entities;
pub mod error;
pub mod executor;
pub mod memory;
pub mod relations;
pub mod schema;
pub mod statement;
pub mod traversal;

pub use campus::CampusGraph;
pub use client::{GraphClient, GraphConfig};
pub use error::{GraphError, StoreError};
pub use executor::{QueryExecutor, Row};
pub use memory::MemoryGraph;
pub use relations::LinkOutcome;
pub use schema::{SchemaSummary, VisualSchema};
pub use statement::{AccessMode, Statement};
pub use traversal::{CommonInterest, CourseEnrollment};
