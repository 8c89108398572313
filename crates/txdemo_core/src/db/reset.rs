//! Destructive schema reset.

use super::DbResult;
use log::info;
use rusqlite::Connection;

/// Drops every user table, index, view and trigger and zeroes `user_version`.
///
/// Returns `true` when anything existed before the reset.
///
/// # Side effects
/// - Destroys all stored data irreversibly.
pub fn ensure_deleted(conn: &mut Connection) -> DbResult<bool> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let objects = user_objects(conn)?;

    if objects.is_empty() && version == 0 {
        info!("event=db_reset module=db status=ok existed=false dropped=0");
        return Ok(false);
    }

    let tx = conn.transaction()?;
    // Views and triggers first; dropping a table takes its indexes with it.
    for (kind, name) in &objects {
        if kind == "view" || kind == "trigger" {
            tx.execute_batch(&format!(
                "DROP {} IF EXISTS {};",
                kind.to_ascii_uppercase(),
                quote_ident(name)
            ))?;
        }
    }
    for (kind, name) in &objects {
        if kind == "table" {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(name)))?;
        }
    }
    for (kind, name) in &objects {
        if kind == "index" {
            tx.execute_batch(&format!("DROP INDEX IF EXISTS {};", quote_ident(name)))?;
        }
    }
    tx.execute_batch("PRAGMA user_version = 0;")?;
    tx.commit()?;

    info!(
        "event=db_reset module=db status=ok existed=true dropped={}",
        objects.len()
    );
    Ok(true)
}

fn user_objects(conn: &Connection) -> DbResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT type, name
         FROM sqlite_master
         WHERE type IN ('table', 'index', 'view', 'trigger')
           AND name NOT LIKE 'sqlite_%'
         ORDER BY name ASC;",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    let mut objects = Vec::new();
    for row in rows {
        objects.push(row?);
    }
    Ok(objects)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::{ensure_deleted, quote_ident};
    use rusqlite::Connection;

    #[test]
    fn quote_ident_escapes_double_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn empty_database_reports_nothing_deleted() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(!ensure_deleted(&mut conn).unwrap());
    }

    #[test]
    fn drops_tables_views_and_triggers() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE legacy (id INTEGER PRIMARY KEY, label TEXT);
             CREATE INDEX legacy_label ON legacy(label);
             CREATE VIEW legacy_view AS SELECT label FROM legacy;
             CREATE TRIGGER legacy_trg AFTER INSERT ON legacy BEGIN SELECT 1; END;
             PRAGMA user_version = 7;",
        )
        .unwrap();

        assert!(ensure_deleted(&mut conn).unwrap());

        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name NOT LIKE 'sqlite_%';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 0);
    }
}
