//! Traversal and analytics over the social graph.

use serde::{Deserialize, Serialize};

use campusnet_core::{require, Course, Student};

use crate::campus::CampusGraph;
use crate::error::GraphError;
use crate::executor::{collect_column, column, from_row};
use crate::statement::Statement;

/// Number of courses returned by [`CampusGraph::popular_courses`].
pub const POPULAR_COURSE_LIMIT: i64 = 3;

/// Another student and what they share with the subject student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonInterest {
    pub student_name: String,
    pub student_id: String,
    pub common_courses: Vec<String>,
    pub common_clubs: Vec<String>,
    /// Always `common_courses.len() + common_clubs.len()`.
    pub total_common_interests: i64,
}

/// A course and the number of enrollment edges pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseEnrollment {
    pub course: Course,
    pub student_count: i64,
}

impl CampusGraph {
    // ── Single hop ───────────────────────────────────────────────

    /// Students this student follows.
    pub async fn following(&self, student_id: &str) -> Result<Vec<Student>, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self.run(Statement::Following { student_id }).await?;
        Ok(collect_column(&rows, "followed")?)
    }

    /// Students who follow this student.
    pub async fn followers(&self, student_id: &str) -> Result<Vec<Student>, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self.run(Statement::Followers { student_id }).await?;
        Ok(collect_column(&rows, "follower")?)
    }

    pub async fn enrolled_students(&self, course_code: &str) -> Result<Vec<Student>, GraphError> {
        let code = require("course_code", course_code)?;
        let rows = self.run(Statement::CourseStudents { code }).await?;
        Ok(collect_column(&rows, "s")?)
    }

    pub async fn club_members(&self, club_name: &str) -> Result<Vec<Student>, GraphError> {
        let name = require("club_name", club_name)?;
        let rows = self.run(Statement::ClubMembers { name }).await?;
        Ok(collect_column(&rows, "s")?)
    }

    // ── Multi hop ────────────────────────────────────────────────

    /// Friends of friends, minus the student and anyone already followed.
    ///
    /// A candidate reachable through several friends appears once.
    pub async fn suggested_friends(&self, student_id: &str) -> Result<Vec<Student>, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self
            .run(Statement::SuggestedFriends {
                student_id: student_id.clone(),
            })
            .await?;
        let suggestions: Vec<Student> = collect_column(&rows, "suggested")?;
        tracing::debug!(%student_id, count = suggestions.len(), "Suggested friends");
        Ok(suggestions)
    }

    /// Other students sharing at least one course or club.
    ///
    /// Ordered by total shared interests descending, then student_id
    /// ascending. Shared name lists are sorted.
    pub async fn common_interests(
        &self,
        student_id: &str,
    ) -> Result<Vec<CommonInterest>, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self.run(Statement::CommonInterests { student_id }).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let mut interest: CommonInterest = from_row(row)?;
            interest.common_courses.sort();
            interest.common_clubs.sort();
            results.push(interest);
        }
        Ok(results)
    }

    /// The top courses by enrollment count, ties broken by course code.
    pub async fn popular_courses(&self) -> Result<Vec<CourseEnrollment>, GraphError> {
        let rows = self
            .run(Statement::PopularCourses {
                limit: POPULAR_COURSE_LIMIT,
            })
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(CourseEnrollment {
                course: column(row, "c")?,
                student_count: column(row, "student_count")?,
            });
        }
        Ok(results)
    }
}
