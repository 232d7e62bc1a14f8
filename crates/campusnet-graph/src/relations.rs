//! Relationship builder: FOLLOWS, ENROLLED_IN, and MEMBER_OF edges.
//!
//! Both endpoints are matched independently. If either does not resolve
//! the match is empty and nothing is created; the [`RelationPolicy`]
//! decides whether that is a no-op or a not-found error, and whether
//! repeated calls add parallel edges or merge into one.

use serde::Serialize;

use campusnet_core::{require, DuplicatePolicy, EndpointPolicy, RelationKind, RelationPolicy};

use crate::campus::CampusGraph;
use crate::error::GraphError;
use crate::statement::Statement;

/// Result of a relationship-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub relationship: RelationKind,
    pub from: String,
    pub to: String,
    /// Endpoint pairs that matched. Zero means nothing was created.
    pub linked: usize,
}

impl CampusGraph {
    /// `student1_id` follows `student2_id`.
    pub async fn follow(
        &self,
        student1_id: &str,
        student2_id: &str,
    ) -> Result<LinkOutcome, GraphError> {
        let from = require("student1_id", student1_id)?;
        let to = require("student2_id", student2_id)?;
        self.link(RelationKind::Follows, from, to).await
    }

    pub async fn enroll(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<LinkOutcome, GraphError> {
        let from = require("student_id", student_id)?;
        let to = require("course_code", course_code)?;
        self.link(RelationKind::EnrolledIn, from, to).await
    }

    pub async fn join_club(
        &self,
        student_id: &str,
        club_name: &str,
    ) -> Result<LinkOutcome, GraphError> {
        let from = require("student_id", student_id)?;
        let to = require("club_name", club_name)?;
        self.link(RelationKind::MemberOf, from, to).await
    }

    async fn link(
        &self,
        kind: RelationKind,
        from: String,
        to: String,
    ) -> Result<LinkOutcome, GraphError> {
        let policy = self.policy();
        let rows = self
            .run(Statement::Link {
                kind,
                from: from.clone(),
                to: to.clone(),
                merge: policy.duplicates == DuplicatePolicy::Merge,
            })
            .await?;

        let outcome = LinkOutcome {
            relationship: kind,
            from,
            to,
            linked: rows.len(),
        };

        if outcome.linked == 0 {
            return no_match(outcome, policy);
        }

        tracing::info!(
            relationship = %kind,
            from = %outcome.from,
            to = %outcome.to,
            linked = outcome.linked,
            "Created relationship"
        );
        Ok(outcome)
    }
}

fn no_match(outcome: LinkOutcome, policy: RelationPolicy) -> Result<LinkOutcome, GraphError> {
    match policy.endpoints {
        EndpointPolicy::Lenient => {
            tracing::info!(
                relationship = %outcome.relationship,
                from = %outcome.from,
                to = %outcome.to,
                "Relationship endpoints did not resolve, nothing created"
            );
            Ok(outcome)
        }
        EndpointPolicy::Strict => Err(GraphError::EndpointNotFound {
            relationship: outcome.relationship,
            from: outcome.from,
            to: outcome.to,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campus::testing::seeded;

    #[tokio::test]
    async fn follow_then_traverse_both_directions() {
        let graph = seeded().await;
        let outcome = graph.follow("S1", "S2").await.unwrap();
        assert_eq!(outcome.linked, 1);
        assert_eq!(outcome.relationship, RelationKind::Follows);

        let following = graph.following("S1").await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].student_id, "S2");

        let followers = graph.followers("S2").await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].student_id, "S1");
    }

    #[tokio::test]
    async fn lenient_missing_endpoint_is_a_noop() {
        let graph = seeded().await;
        let outcome = graph.enroll("S1", "NOPE").await.unwrap();
        assert_eq!(outcome.linked, 0);
        assert!(graph.popular_courses().await.unwrap().is_empty());

        let outcome = graph.follow("S404", "S1").await.unwrap();
        assert_eq!(outcome.linked, 0);
        assert!(graph.followers("S1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn strict_missing_endpoint_is_not_found() {
        let graph = seeded().await.with_policy(RelationPolicy::strict());
        let err = graph.join_club("S1", "Fencing").await.unwrap_err();
        assert!(matches!(
            err,
            GraphError::EndpointNotFound {
                relationship: RelationKind::MemberOf,
                ..
            }
        ));
        assert!(err.is_client_error());

        // Resolving endpoints still link under the strict policy.
        assert_eq!(graph.join_club("S1", "Chess").await.unwrap().linked, 1);
    }

    #[tokio::test]
    async fn duplicates_allowed_by_default() {
        let graph = seeded().await;
        graph.enroll("S1", "CS101").await.unwrap();
        graph.enroll("S1", "CS101").await.unwrap();

        // Parallel edges both count toward popularity.
        let popular = graph.popular_courses().await.unwrap();
        assert_eq!(popular[0].student_count, 2);
        // Traversals stay distinct.
        assert_eq!(graph.enrolled_students("CS101").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn merge_policy_keeps_single_edge() {
        let graph = seeded().await.with_policy(RelationPolicy::merging());
        graph.enroll("S1", "CS101").await.unwrap();
        let again = graph.enroll("S1", "CS101").await.unwrap();
        assert_eq!(again.linked, 1);

        let popular = graph.popular_courses().await.unwrap();
        assert_eq!(popular[0].student_count, 1);
    }

    #[tokio::test]
    async fn validates_field_names() {
        let graph = seeded().await;
        let err = graph.follow("S1", "").await.unwrap_err();
        assert_eq!(err.to_string(), "student2_id is required");
        let err = graph.enroll("S1", "").await.unwrap_err();
        assert_eq!(err.to_string(), "course_code is required");
        let err = graph.join_club("", "Chess").await.unwrap_err();
        assert_eq!(err.to_string(), "student_id is required");
    }
}
