//! User entity and DTO.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier.
pub type UserId = Uuid;

/// Stored user record. Project membership is kept in the join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Unix epoch milliseconds taken from the SQLite clock on first insert.
    /// Rows inserted within the same millisecond share a value.
    pub created_at: i64,
}

impl User {
    /// Creates a new user with a generated id.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at: 0,
        }
    }
}

/// Boundary projection of [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserDto {
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            username: Some(user.username),
        }
    }
}
