use rusqlite::Connection;
use taskboard_core::db::migrations::latest_version;
use taskboard_core::db::{open_db, open_db_in_memory, DbError};
use taskboard_core::{KeyValueStorage, SqliteStorage};

#[test]
fn fresh_database_gets_kv_store_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn, "kv_store"),
        vec!["key", "value", "updated_at"]
    );
}

#[test]
fn reopened_file_keeps_task_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteStorage::new(&conn).set_item("tasks", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        SqliteStorage::new(&conn).get_item("tasks").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 999)
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(
        matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported }
                if latest_supported == latest_version()
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn unreachable_path_reports_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.db");

    let err = open_db(&path).unwrap_err();
    let DbError::Open { path: reported, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(reported, &path);
    assert!(err.to_string().contains("dir.db"));
}

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
