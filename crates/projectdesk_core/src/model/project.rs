//! Project entity and DTO.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - Name uniqueness is not enforced; blank names are only rejected on patch.
//! - Membership lives in the `project_members` join table, not on this type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable project identifier.
pub type ProjectId = Uuid;

/// Stored project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Unix epoch milliseconds taken from the SQLite clock on first insert.
    /// Rows inserted within the same millisecond share a value.
    pub created_at: i64,
}

impl Project {
    /// Creates a new project with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: 0,
        }
    }
}

/// Transport-facing projection exposing only `id` and `name`.
///
/// Both fields are optional so the same shape serves create, replace and
/// patch inputs as well as outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProjectDto {
    /// Input DTO carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: Some(project.name.clone()),
        }
    }
}

impl From<Project> for ProjectDto {
    fn from(project: Project) -> Self {
        Self {
            id: Some(project.id),
            name: Some(project.name),
        }
    }
}
