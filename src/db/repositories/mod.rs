pub mod admin;
pub mod application;
pub mod blog;
pub mod contact;
pub mod course;
pub mod partner;
pub mod review;
pub mod teacher;
pub mod track_step;

use sea_orm::{DbErr, SqlErr};

/// Outcome of a write addressed by id or guarded by a unique slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Done(T),
    NotFound,
    SlugTaken,
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
