//! Task store over the `tasks` table.
//!
//! # Invariants
//! - `user_id` and `project_id` must reference existing rows when set;
//!   foreign keys reject dangling references on write.

use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId};
use crate::model::user::UserId;
use crate::repo::paging::{Page, PageRequest};
use crate::repo::{parse_optional_uuid, parse_uuid, RepoError, RepoResult, Store};
use rusqlite::{params, params_from_iter, Connection, Row, Rows};

const TASK_SELECT_SQL: &str = "SELECT id, title, project_id, user_id, created_at FROM tasks";

const TASK_SORTABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("createdAt", "created_at"),
    ("created_at", "created_at"),
];

/// Task persistence beyond the generic store capability.
pub trait TaskStore: Store<Task, TaskId> {
    fn list_by_assignee(&self, user_id: UserId) -> RepoResult<Vec<Task>>;
    fn list_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task store.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn list_where(&self, column: &'static str, id: uuid::Uuid) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE {column} = ?1 ORDER BY rowid ASC;"
        ))?;
        let rows = stmt.query([id.to_string()])?;
        collect_tasks(rows)
    }
}

impl Store<Task, TaskId> for SqliteTaskStore<'_> {
    fn get(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn exists(&self, id: TaskId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_tasks(rows)
    }

    fn save(&self, task: &Task) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, project_id, user_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                project_id = excluded.project_id,
                user_id = excluded.user_id;",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.project_id.map(|id| id.to_string()),
                task.user_id.map(|id| id.to_string()),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "Task", id });
        }
        Ok(())
    }

    fn list_page(&self, page: &PageRequest) -> RepoResult<Page<Task>> {
        let total_items: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;

        let mut bind_values = Vec::new();
        let tail = page.sql_tail(TASK_SORTABLE, &mut bind_values)?;
        let mut stmt = self.conn.prepare(&format!("{TASK_SELECT_SQL}{tail};"))?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        let items = collect_tasks(rows)?;

        Ok(Page {
            items,
            page_index: page.page_index(),
            page_size: page.page_size(),
            total_items: u64::try_from(total_items).unwrap_or_default(),
        })
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn list_by_assignee(&self, user_id: UserId) -> RepoResult<Vec<Task>> {
        self.list_where("user_id", user_id)
    }

    fn list_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        self.list_where("project_id", project_id)
    }
}

fn collect_tasks(mut rows: Rows<'_>) -> RepoResult<Vec<Task>> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        project_id: parse_optional_uuid(row.get("project_id")?, "tasks.project_id")?,
        user_id: parse_optional_uuid(row.get("user_id")?, "tasks.user_id")?,
        created_at: row.get("created_at")?,
    })
}
