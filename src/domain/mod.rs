//! Domain types for the content backend.
//!
//! Newtype IDs keep course IDs from being mixed up with other row IDs, and
//! [`locale`] holds the locale-family derivation used by cascading admin
//! mutations.

pub mod locale;

pub use locale::{LocaleFamilyResolver, LocaleSet, SuffixFamilyResolver};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a course row (one locale variant).
///
/// ```rust
/// use eduhub::domain::CourseId;
///
/// let id = CourseId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CourseId(i32);

impl CourseId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CourseId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<CourseId> for i32 {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

/// Processing state of a public course application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    New,
    InProgress,
    Contacted,
    Enrolled,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Contacted => "contacted",
            Self::Enrolled => "enrolled",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "contacted" => Ok(Self::Contacted),
            "enrolled" => Ok(Self::Enrolled),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown application status: {other}")),
        }
    }
}
