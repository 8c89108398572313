use rusqlite::Connection;
use txdemo_core::db::migrations::{current_user_version, latest_version};
use txdemo_core::db::{connect, ensure_deleted, migrate, open_db, open_db_in_memory, DbError};
use txdemo_core::StoreConfig;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_object_exists(&conn, "table", "transaction_reversals");
    assert_object_exists(&conn, "table", "payments");
    assert_object_exists(&conn, "index", "ix_transaction_reversals_reference");
}

#[test]
fn connect_leaves_schema_untouched() {
    let conn = connect(&StoreConfig::in_memory()).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), 0);

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("txdemo.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let mut conn_second = open_db(&path).unwrap();
    migrate(&mut conn_second).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reset_then_migrate_recovers_from_future_schema_and_destroys_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");

    let mut conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO payments (batch_id) VALUES ('OLD-BATCH');",
        [],
    )
    .unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let mut conn = connect(&StoreConfig::file(&path)).unwrap();
    assert!(ensure_deleted(&mut conn).unwrap());
    migrate(&mut conn).unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let payments: i64 = conn
        .query_row("SELECT COUNT(*) FROM payments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(payments, 0);
}

#[test]
fn schema_enforces_length_limits() {
    let conn = open_db_in_memory().unwrap();

    let too_long_reference = "R".repeat(51);
    assert!(conn
        .execute(
            "INSERT INTO transaction_reversals (reference, name) VALUES (?1, NULL);",
            [too_long_reference.as_str()],
        )
        .is_err());

    let too_long_name = "n".repeat(101);
    assert!(conn
        .execute(
            "INSERT INTO transaction_reversals (reference, name) VALUES ('TRX1', ?1);",
            [too_long_name.as_str()],
        )
        .is_err());

    let too_long_batch = "B".repeat(51);
    assert!(conn
        .execute(
            "INSERT INTO payments (batch_id) VALUES (?1);",
            [too_long_batch.as_str()],
        )
        .is_err());
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
