//! Integration tests for the table store against file-backed and in-memory
//! DuckDB databases, driven through the public API and on-disk descriptors.

use duckdb::Connection;
use std::collections::HashMap;
use tabstore_core::{row, Row, Schema, StoreConfig, Value};
use tabstore_db::{StoreError, TableStore};

// ── Helpers ────────────────────────────────────────────────────────────

const PEOPLE: &str =
    r#"{"fields":[{"name":"id","type":"integer"},{"name":"name","type":"string"}]}"#;

/// Multiset view of a row list: rows rendered as JSON mapped to counts.
fn multiset(rows: &[Row]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts
            .entry(serde_json::to_string(row).unwrap())
            .or_insert(0) += 1;
    }
    counts
}

// ── Properties ─────────────────────────────────────────────────────────

#[test]
fn people_example() {
    let conn = Connection::open_in_memory().unwrap();
    let mut store = TableStore::new(&conn);
    store
        .create_table("people", &Schema::from_json(PEOPLE).unwrap())
        .unwrap();
    store
        .write_table("people", &[row![1, "Ann"], row![2, "Bo"]])
        .unwrap();

    assert_eq!(
        multiset(&store.read_table("people").unwrap()),
        multiset(&[row![1, "Ann"], row![2, "Bo"]])
    );
}

#[test]
fn describe_returns_created_descriptor() {
    let conn = Connection::open_in_memory().unwrap();
    let mut store = TableStore::new(&conn);
    let descriptor = Schema::from_json(
        r#"{"fields":[
            {"name":"flag","type":"boolean"},
            {"name":"label","type":"string"},
            {"name":"score","type":"number"},
            {"name":"count","type":"integer"}
        ]}"#,
    )
    .unwrap();

    store.create_table("metrics", &descriptor).unwrap();
    assert_eq!(store.describe_table("metrics").unwrap(), descriptor);
}

#[test]
fn duplicate_rows_survive_roundtrip() {
    let conn = Connection::open_in_memory().unwrap();
    let mut store = TableStore::new(&conn);
    store
        .create_table("people", &Schema::from_json(PEOPLE).unwrap())
        .unwrap();

    let rows = vec![row![1, "Ann"], row![1, "Ann"], row![3, "Cy"]];
    store.write_table("people", &rows).unwrap();
    assert_eq!(multiset(&store.read_table("people").unwrap()), multiset(&rows));
}

#[test]
fn create_delete_lifecycle() {
    let conn = Connection::open_in_memory().unwrap();
    let mut store = TableStore::new(&conn);
    let schema = Schema::from_json(PEOPLE).unwrap();

    store.create_table("people", &schema).unwrap();
    assert!(matches!(
        store.create_table("people", &schema),
        Err(StoreError::AlreadyExists { .. })
    ));

    store.delete_table("people").unwrap();
    assert!(matches!(
        store.delete_table("people"),
        Err(StoreError::NotFound { .. })
    ));

    // The name is free again once dropped.
    store.create_table("people", &schema).unwrap();
}

#[test]
fn two_prefixed_stores_share_a_namespace() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = Schema::from_json(PEOPLE).unwrap();

    let mut left = TableStore::new(&conn).with_prefix("x_");
    let mut right = TableStore::new(&conn).with_prefix("y_");
    left.create_table("people", &schema).unwrap();
    left.create_table("pets", &schema).unwrap();
    right.create_table("people", &schema).unwrap();

    let left_names: Vec<String> = left.list_tables().unwrap().into_iter().collect();
    assert_eq!(left_names, vec!["people".to_string(), "pets".to_string()]);
    let right_names: Vec<String> = right.list_tables().unwrap().into_iter().collect();
    assert_eq!(right_names, vec!["people".to_string()]);

    let raw: Vec<String> = conn
        .prepare("SELECT table_name FROM information_schema.tables ORDER BY table_name")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(raw, vec!["x_people", "x_pets", "y_people"]);
}

// ── Configuration & persistence ────────────────────────────────────────

#[test]
fn configured_store_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("tabstore.yml");
    std::fs::write(
        &config_path,
        "schema: warehouse\nprefix: \"t_\"\nbatch_size: 2\natomic_writes: true\n",
    )
    .unwrap();
    let descriptor_path = dir.path().join("people.yml");
    std::fs::write(
        &descriptor_path,
        "fields:\n  - name: id\n    type: integer\n  - name: name\n    type: string\n",
    )
    .unwrap();
    let db_path = dir.path().join("store.duckdb");

    {
        let conn = Connection::open(&db_path).unwrap();
        let config = StoreConfig::load(&config_path).unwrap();
        let mut store = TableStore::with_config(&conn, config);
        assert_eq!(store.namespace(), Some("warehouse"));
        assert_eq!(store.physical_name("people"), "t_people");

        store
            .create_table("people", &Schema::load(&descriptor_path).unwrap())
            .unwrap();
        let rows: Vec<Row> = vec![
            vec![Value::from("1"), Value::from("Ann")],
            vec![Value::from("2"), Value::from("Bo")],
            vec![Value::from("3"), Value::from("Cy")],
        ];
        assert_eq!(store.write_table("people", &rows).unwrap(), 3);
    }

    let conn = Connection::open(&db_path).unwrap();
    let config = StoreConfig::load(&config_path).unwrap();
    let store = TableStore::with_config(&conn, config);
    assert!(store.table_exists("people").unwrap());
    assert_eq!(
        multiset(&store.read_table("people").unwrap()),
        multiset(&[row![1, "Ann"], row![2, "Bo"], row![3, "Cy"]])
    );
}

#[test]
fn driver_errors_pass_through() {
    let conn = Connection::open_in_memory().unwrap();
    // Same physical name, different prefix split: the store sees "people"
    // under "x_" while another store creates "x_people" first.
    let mut direct = TableStore::new(&conn);
    let mut prefixed = TableStore::new(&conn).with_prefix("x_");
    let schema = Schema::from_json(PEOPLE).unwrap();

    assert!(!prefixed.table_exists("people").unwrap());
    direct.create_table("x_people", &schema).unwrap();

    // The prefixed store's cached listing is stale, so the existence check
    // passes and DuckDB rejects the CREATE.
    let err = prefixed.create_table("people", &schema).unwrap_err();
    assert!(matches!(err, StoreError::DuckDb(_)), "unexpected error: {err}");
}
