//! Route handlers.

pub mod clubs;
pub mod courses;
pub mod health;
pub mod posts;
pub mod relations;
pub mod schema;
pub mod students;

/// A body field that was omitted reads as empty, which validation rejects.
fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
