//! Entity repository: create, read, and delete nodes by natural key.
//!
//! Creates are unconditional; nothing checks for an existing node with the
//! same key unless the store itself declares a uniqueness constraint.

use campusnet_core::{require, Club, Course, Post, Student, ValidationError};

use crate::campus::CampusGraph;
use crate::error::{GraphError, StoreError};
use crate::executor::{column, Row};
use crate::statement::Statement;

impl CampusGraph {
    // ── Students ─────────────────────────────────────────────────

    pub async fn create_student(
        &self,
        name: &str,
        student_id: &str,
    ) -> Result<Student, GraphError> {
        let statement = Statement::CreateStudent {
            name: require("name", name)?,
            student_id: require("student_id", student_id)?,
        };
        let rows = self.run(statement).await?;
        let student: Student = column(first(&rows, "create_student")?, "s")?;
        tracing::info!(student_id = %student.student_id, "Created student");
        Ok(student)
    }

    /// Fetch a student by id. With duplicate ids the first match wins.
    pub async fn get_student(&self, student_id: &str) -> Result<Student, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self
            .run(Statement::GetStudent {
                student_id: student_id.clone(),
            })
            .await?;

        match rows.first() {
            Some(row) => Ok(column(row, "s")?),
            None => Err(GraphError::NotFound {
                label: "Student",
                key: student_id,
            }),
        }
    }

    /// Detach-delete every student with this id. Returns how many were removed.
    pub async fn delete_student(&self, student_id: &str) -> Result<i64, GraphError> {
        let student_id = require("student_id", student_id)?;
        let rows = self
            .run(Statement::DeleteStudent {
                student_id: student_id.clone(),
            })
            .await?;
        let deleted: i64 = column(first(&rows, "delete_student")?, "deleted_count")?;
        tracing::info!(%student_id, deleted, "Deleted student");
        Ok(deleted)
    }

    // ── Courses & Clubs ──────────────────────────────────────────

    pub async fn create_course(&self, name: &str, code: &str) -> Result<Course, GraphError> {
        let statement = Statement::CreateCourse {
            name: require("name", name)?,
            code: require("code", code)?,
        };
        let rows = self.run(statement).await?;
        let course: Course = column(first(&rows, "create_course")?, "c")?;
        tracing::info!(code = %course.code, "Created course");
        Ok(course)
    }

    pub async fn create_club(&self, name: &str, description: &str) -> Result<Club, GraphError> {
        let statement = Statement::CreateClub {
            name: require("name", name)?,
            description: require("description", description)?,
        };
        let rows = self.run(statement).await?;
        let club: Club = column(first(&rows, "create_club")?, "c")?;
        tracing::info!(name = %club.name, "Created club");
        Ok(club)
    }

    // ── Posts ────────────────────────────────────────────────────

    pub async fn create_post(&self, content: &str, author_id: &str) -> Result<Post, GraphError> {
        let statement = Statement::CreatePost {
            content: require("content", content)?,
            author_id: require("author_id", author_id)?,
        };
        let rows = self.run(statement).await?;
        let post = post_from_row(first(&rows, "create_post")?)?;
        tracing::info!(post_id = post.post_id, author_id = %post.author_id, "Created post");
        Ok(post)
    }

    /// All posts by an author, oldest id first.
    pub async fn get_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>, GraphError> {
        let author_id = require("author_id", author_id)?;
        let rows = self.run(Statement::PostsByAuthor { author_id }).await?;
        rows.iter()
            .map(|row| post_from_row(row).map_err(GraphError::from))
            .collect()
    }

    /// Detach-delete a post by its store-assigned id.
    pub async fn delete_post(&self, post_id: &str) -> Result<i64, GraphError> {
        let post_id = parse_post_id(post_id)?;
        let rows = self.run(Statement::DeletePost { post_id }).await?;
        let deleted: i64 = column(first(&rows, "delete_post")?, "deleted_count")?;
        tracing::info!(post_id, deleted, "Deleted post");
        Ok(deleted)
    }
}

fn first<'a>(rows: &'a [Row], statement: &'static str) -> Result<&'a Row, StoreError> {
    rows.first().ok_or(StoreError::EmptyResult { statement })
}

fn post_from_row(row: &Row) -> Result<Post, StoreError> {
    #[derive(serde::Deserialize)]
    struct PostProps {
        content: String,
        author_id: String,
    }

    let props: PostProps = column(row, "p")?;
    Ok(Post {
        post_id: column(row, "post_id")?,
        content: props.content,
        author_id: props.author_id,
    })
}

fn parse_post_id(raw: &str) -> Result<i64, ValidationError> {
    let raw = require("post_id", raw)?;
    raw.parse().map_err(|_| ValidationError::InvalidField {
        field: "post_id",
        reason: format!("expected an integer, got {raw:?}"),
    })
}
