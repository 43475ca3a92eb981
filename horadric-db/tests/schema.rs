use horadric_catalog::ItemKind;
use horadric_db::schema::{CURRENT_VERSION, SchemaError, create_schema, get_schema_version};
use horadric_db::{open_database, open_memory, table_name};
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
    let rows: i32 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    let mut tables = vec!["schema_version", "stat_codes", "item_properties", "import_log"];
    tables.extend(ItemKind::ALL.iter().map(|k| table_name(*k)));
    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn reopen_file_database() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute("INSERT INTO runes (name, code) VALUES ('El Rune', 'r01')", [])
            .unwrap();
    }
    let conn = open_database(&path).unwrap();
    let name: String = conn
        .query_row("SELECT name FROM runes WHERE code = 'r01'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "El Rune");
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn newer_schema_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("future.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION + 1],
        )
        .unwrap();
    }
    assert!(matches!(
        open_database(&path),
        Err(SchemaError::VersionMismatch { found, .. }) if found == CURRENT_VERSION + 1
    ));
}
