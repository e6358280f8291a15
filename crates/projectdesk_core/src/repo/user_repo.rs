//! User store over the `users` table.
//!
//! # Invariants
//! - Deleting a user cascades to membership rows and unassigns its tasks.

use crate::model::user::{User, UserId};
use crate::repo::paging::{Page, PageRequest};
use crate::repo::{parse_uuid, RepoError, RepoResult, Store};
use rusqlite::{params, params_from_iter, Connection, Row, Rows};

const USER_SELECT_SQL: &str = "SELECT id, username, created_at FROM users";

const USER_SORTABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("username", "username"),
    ("createdAt", "created_at"),
    ("created_at", "created_at"),
];

/// SQLite-backed user store.
pub struct SqliteUserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Store<User, UserId> for SqliteUserStore<'_> {
    fn get(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn exists(&self, id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_users(rows)
    }

    fn save(&self, user: &User) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, username)
             VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username;",
            params![user.id.to_string(), user.username.as_str()],
        )?;
        Ok(())
    }

    fn delete(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "User", id });
        }
        Ok(())
    }

    fn list_page(&self, page: &PageRequest) -> RepoResult<Page<User>> {
        let total_items: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;

        let mut bind_values = Vec::new();
        let tail = page.sql_tail(USER_SORTABLE, &mut bind_values)?;
        let mut stmt = self.conn.prepare(&format!("{USER_SELECT_SQL}{tail};"))?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        let items = collect_users(rows)?;

        Ok(Page {
            items,
            page_index: page.page_index(),
            page_size: page.page_size(),
            total_items: u64::try_from(total_items).unwrap_or_default(),
        })
    }
}

fn collect_users(mut rows: Rows<'_>) -> RepoResult<Vec<User>> {
    let mut users = Vec::new();
    while let Some(row) = rows.next()? {
        users.push(parse_user_row(row)?);
    }
    Ok(users)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get(0)?;
    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        username: row.get(1)?,
        created_at: row.get(2)?,
    })
}
