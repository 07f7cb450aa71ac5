//! Domain service for courses, whose rows are replicated per locale.
//!
//! Activation changes and deletions are properties of the whole locale family,
//! not of the addressed row: updating one variant's `is_active` or deleting one
//! variant applies to every row sharing its base slug, in one transaction.
//!
//! Two admins mutating overlapping families concurrently race; the last commit
//! wins. There is no version check.

use thiserror::Error;

use crate::db::{Course, CourseInput, FamilySync};
use crate::domain::CourseId;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Slug already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ContentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// A course update and the family-wide activation sync it caused.
#[derive(Debug, Clone)]
pub struct CourseUpdate {
    pub course: Course,
    pub family: FamilySync,
}

#[async_trait::async_trait]
pub trait CourseService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Course>, ContentError>;

    async fn list_active(&self, locale: Option<&str>) -> Result<Vec<Course>, ContentError>;

    async fn get_by_slug(&self, slug: &str, locale: Option<&str>)
    -> Result<Course, ContentError>;

    /// # Errors
    ///
    /// - [`ContentError::Validation`] if the locale is not a recognized code
    /// - [`ContentError::Conflict`] if the slug is already used by any row
    async fn create(&self, input: CourseInput) -> Result<Course, ContentError>;

    /// Replaces the course's fields and sets `is_active` across its locale family.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] before touching any row if `id` does not exist.
    async fn update(&self, id: CourseId, input: CourseInput)
    -> Result<CourseUpdate, ContentError>;

    /// Deletes every locale variant of the course's family.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] if `id` does not exist.
    async fn delete(&self, id: CourseId) -> Result<FamilySync, ContentError>;
}
