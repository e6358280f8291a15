//! Project store contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD and paging over the `projects` table.
//! - Case-insensitive name lookup with paging.
//! - Own the `project_members` join relation.
//!
//! # Invariants
//! - Name lookup is exact equality after Unicode lowercasing (`casefold`).
//! - Deleting a project cascades to its membership rows and detaches its tasks.

use crate::db::functions::CASEFOLD;
use crate::model::project::{Project, ProjectId};
use crate::model::user::UserId;
use crate::repo::paging::{Page, PageRequest};
use crate::repo::{parse_uuid, RepoError, RepoResult, Store};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT id, name, created_at FROM projects";

const PROJECT_SORTABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("createdAt", "created_at"),
    ("created_at", "created_at"),
];

/// Project persistence beyond the generic store capability.
pub trait ProjectStore: Store<Project, ProjectId> {
    /// Projects whose name equals `name` ignoring case, sorted and paged.
    fn find_by_name_ignore_case(&self, name: &str, page: &PageRequest) -> RepoResult<Vec<Project>>;
    /// Adds a membership row. Adding an existing member is a no-op.
    fn add_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<()>;
    /// Removes a membership row, returning whether one existed.
    fn remove_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<bool>;
    fn member_ids(&self, project_id: ProjectId) -> RepoResult<Vec<UserId>>;
    fn is_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed project store.
pub struct SqliteProjectStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Store<Project, ProjectId> for SqliteProjectStore<'_> {
    fn get(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn exists(&self, id: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_projects(rows)
    }

    fn save(&self, project: &Project) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO projects (id, name)
             VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name;",
            params![project.id.to_string(), project.name.as_str()],
        )?;
        Ok(())
    }

    fn delete(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "Project",
                id,
            });
        }
        Ok(())
    }

    fn list_page(&self, page: &PageRequest) -> RepoResult<Page<Project>> {
        let total_items: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))?;

        let mut bind_values = Vec::new();
        let tail = page.sql_tail(PROJECT_SORTABLE, &mut bind_values)?;
        let mut stmt = self.conn.prepare(&format!("{PROJECT_SELECT_SQL}{tail};"))?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        let items = collect_projects(rows)?;

        Ok(Page {
            items,
            page_index: page.page_index(),
            page_size: page.page_size(),
            total_items: u64::try_from(total_items).unwrap_or_default(),
        })
    }
}

impl ProjectStore for SqliteProjectStore<'_> {
    fn find_by_name_ignore_case(&self, name: &str, page: &PageRequest) -> RepoResult<Vec<Project>> {
        let mut bind_values = vec![Value::Text(name.to_string())];
        let tail = page.sql_tail(PROJECT_SORTABLE, &mut bind_values)?;
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE {CASEFOLD}(name) = {CASEFOLD}(?){tail};"
        ))?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        collect_projects(rows)
    }

    fn add_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?1, ?2);",
            params![project_id.to_string(), user_id.to_string()],
        )?;
        Ok(())
    }

    fn remove_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM project_members WHERE project_id = ?1 AND user_id = ?2;",
            params![project_id.to_string(), user_id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn member_ids(&self, project_id: ProjectId) -> RepoResult<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT pm.user_id
             FROM project_members pm
             INNER JOIN users u ON u.id = pm.user_id
             WHERE pm.project_id = ?1
             ORDER BY u.rowid ASC;",
        )?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            ids.push(parse_uuid(&text, "project_members.user_id")?);
        }
        Ok(ids)
    }

    fn is_member(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM project_members WHERE project_id = ?1 AND user_id = ?2
            );",
            params![project_id.to_string(), user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn collect_projects(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Project>> {
    let mut projects = Vec::new();
    while let Some(row) = rows.next()? {
        projects.push(parse_project_row(row)?);
    }
    Ok(projects)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id_text: String = row.get("id")?;
    Ok(Project {
        id: parse_uuid(&id_text, "projects.id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
