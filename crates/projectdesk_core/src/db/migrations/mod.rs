//! Embedded, forward-only schema migrations.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one.
//! - Each migration commits together with its `PRAGMA user_version` bump, so
//!   a failed script leaves the database at the previous version.
//! - A database stamped with a version above [`latest_version`] is refused.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init_projects_users_tasks",
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Versions that [`apply_migrations`] would run on `conn`, in order.
pub fn pending_versions(conn: &Connection) -> DbResult<Vec<u32>> {
    let current = checked_user_version(conn, MIGRATIONS)?;
    Ok(MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current)
        .map(|migration| migration.version)
        .collect())
}

/// Brings `conn` up to [`latest_version`]. Returns how many migrations ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    apply_registry(conn, MIGRATIONS)
}

fn apply_registry(conn: &mut Connection, registry: &[Migration]) -> DbResult<usize> {
    let current = checked_user_version(conn, registry)?;
    let mut applied = 0;

    for migration in registry.iter().filter(|m| m.version > current) {
        let started_at = Instant::now();
        if let Err(source) = run_one(conn, migration) {
            error!(
                "event=db_migrate module=db status=error version={} name={} duration_ms={} error={source}",
                migration.version,
                migration.name,
                started_at.elapsed().as_millis()
            );
            return Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            });
        }
        info!(
            "event=db_migrate module=db status=ok version={} name={} duration_ms={}",
            migration.version,
            migration.name,
            started_at.elapsed().as_millis()
        );
        applied += 1;
    }

    Ok(applied)
}

fn run_one(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)?;
    tx.commit()
}

fn checked_user_version(conn: &Connection, registry: &[Migration]) -> DbResult<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = registry.last().map_or(0, |migration| migration.version);
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::{apply_registry, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    fn user_version(conn: &Connection) -> u32 {
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn registry_versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
    }

    #[test]
    fn failing_migration_keeps_earlier_versions_and_names_the_culprit() {
        let registry = [
            Migration {
                version: 1,
                name: "create_widgets",
                sql: "CREATE TABLE widgets (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                name: "broken",
                sql: "CREATE TABLE gadgets (id INTEGER PRIMARY KEY); SELECT * FROM missing_table;",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();

        let err = apply_registry(&mut conn, &registry).unwrap_err();

        match err {
            DbError::Migration { version, name, .. } => {
                assert_eq!(version, 2);
                assert_eq!(name, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(user_version(&conn), 1);
        let gadgets: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'gadgets';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(gadgets, 0);
    }

    #[test]
    fn reapplying_registry_runs_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(apply_registry(&mut conn, MIGRATIONS).unwrap(), MIGRATIONS.len());
        assert_eq!(apply_registry(&mut conn, MIGRATIONS).unwrap(), 0);
    }
}
