use huddle_core::db::migrations::latest_version;
use huddle_core::db::{open_db, open_db_in_memory};
use huddle_core::store::ROSTER_KEY;
use huddle_core::{KeyValueStore, RosterSession, SessionConfig, SqliteStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huddle.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        SqliteStore::open(&path),
        Err(StoreError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn sqlite_store_upserts_and_removes() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(store.is_empty().unwrap());

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    assert_eq!(store.len().unwrap(), 1);

    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn roster_survives_reopening_profile_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.sqlite3");

    let expected = {
        let store = SqliteStore::open(&path).unwrap();
        let mut session = RosterSession::open(store, SessionConfig::default());
        session.add_member("Ada").unwrap();
        session.add_member("Bo").unwrap();
        session.flush();
        session.members().to_vec()
    };

    let store = SqliteStore::open(&path).unwrap();
    assert!(store.get(ROSTER_KEY).unwrap().is_some());
    let session = RosterSession::open(store, SessionConfig::default());
    assert_eq!(session.members(), expected);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
