//! Application SQL functions registered on every connection.
//!
//! `casefold(text)` lowercases with Unicode rules, so `Élan` and `élan`
//! compare equal. SQLite's built-in `NOCASE` and `lower()` only fold ASCII.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the Unicode case-folding scalar function.
pub const CASEFOLD: &str = "casefold";

pub(crate) fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        CASEFOLD,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::register_functions;
    use rusqlite::Connection;

    fn fold(conn: &Connection, value: Option<&str>) -> Option<String> {
        conn.query_row("SELECT casefold(?1);", [value], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn casefold_lowercases_non_ascii_letters() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        assert_eq!(fold(&conn, Some("ÉLAN")).as_deref(), Some("élan"));
        assert_eq!(fold(&conn, Some("Über")).as_deref(), Some("über"));
        assert_eq!(fold(&conn, Some("plain")).as_deref(), Some("plain"));
    }

    #[test]
    fn casefold_passes_null_through() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        assert_eq!(fold(&conn, None), None);
    }
}
