//! Core domain logic for projectdesk: projects, users, tasks, and the
//! assignment of tasks to project members.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::Settings;
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::project::{Project, ProjectDto, ProjectId};
pub use model::task::{Task, TaskDto, TaskId};
pub use model::user::{User, UserDto, UserId};
pub use repo::project_repo::{ProjectStore, SqliteProjectStore};
pub use repo::task_repo::{SqliteTaskStore, TaskStore};
pub use repo::user_repo::SqliteUserStore;
pub use repo::{Page, PageRequest, RepoError, RepoResult, Sort, SortDirection, Store};
pub use service::error::{ServiceError, ServiceResult};
pub use service::project_service::{ProjectPageQuery, ProjectService, ProjectsPage};
pub use service::response::{ApiResponse, ResponseBody, StatusCode};
pub use service::task_service::TaskService;
pub use service::user_service::UserService;

use rusqlite::Connection;

/// Project service wired against SQLite stores sharing one connection.
pub type SqliteProjectService<'conn> =
    ProjectService<SqliteProjectStore<'conn>, SqliteUserStore<'conn>, SqliteTaskStore<'conn>>;
pub type SqliteUserService<'conn> = UserService<SqliteUserStore<'conn>, SqliteTaskStore<'conn>>;
pub type SqliteTaskService<'conn> = TaskService<SqliteTaskStore<'conn>, SqliteProjectStore<'conn>>;

/// Builds the project service over `conn`.
pub fn project_service(conn: &Connection) -> SqliteProjectService<'_> {
    ProjectService::new(
        SqliteProjectStore::new(conn),
        SqliteUserStore::new(conn),
        SqliteTaskStore::new(conn),
    )
}

pub fn user_service(conn: &Connection) -> SqliteUserService<'_> {
    UserService::new(SqliteUserStore::new(conn), SqliteTaskStore::new(conn))
}

pub fn task_service(conn: &Connection) -> SqliteTaskService<'_> {
    TaskService::new(SqliteTaskStore::new(conn), SqliteProjectStore::new(conn))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
