//! Relationship-creation policy.
//!
//! Loaded from the `[relations]` section of `campusnet.toml` or
//! `CAMPUSNET__RELATIONS__*` environment variables. The defaults reproduce
//! the historical behaviour: silent no-op on missing endpoints and
//! unbounded parallel edges.

use serde::Deserialize;

/// What to do when a relationship endpoint does not resolve to a node.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointPolicy {
    /// Create nothing and report success with zero links.
    #[default]
    Lenient,
    /// Fail with a not-found error.
    Strict,
}

/// How repeated relationship creation between the same pair behaves.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// `CREATE`: every call adds another parallel edge.
    #[default]
    Allow,
    /// `MERGE`: at most one edge per pair and type.
    Merge,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct RelationPolicy {
    #[serde(default)]
    pub endpoints: EndpointPolicy,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl RelationPolicy {
    pub fn strict() -> Self {
        Self {
            endpoints: EndpointPolicy::Strict,
            ..Default::default()
        }
    }

    pub fn merging() -> Self {
        Self {
            duplicates: DuplicatePolicy::Merge,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient_and_allows_duplicates() {
        let policy = RelationPolicy::default();
        assert_eq!(policy.endpoints, EndpointPolicy::Lenient);
        assert_eq!(policy.duplicates, DuplicatePolicy::Allow);
    }

    #[test]
    fn deserializes_lowercase_names() {
        let policy: RelationPolicy =
            serde_json::from_str(r#"{"endpoints": "strict", "duplicates": "merge"}"#).unwrap();
        assert_eq!(policy.endpoints, EndpointPolicy::Strict);
        assert_eq!(policy.duplicates, DuplicatePolicy::Merge);

        let partial: RelationPolicy = serde_json::from_str(r#"{"duplicates": "merge"}"#).unwrap();
        assert_eq!(partial, RelationPolicy::merging());
    }
}
