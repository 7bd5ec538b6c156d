use callbook_store::SqliteBackend;

#[test]
fn migrate_sets_schema_version_once() {
    let backend = SqliteBackend::open_in_memory().expect("open in memory");
    assert_eq!(backend.schema_version().expect("version"), 0);

    backend.migrate().expect("migrate");
    assert_eq!(backend.schema_version().expect("version"), 1);

    backend.migrate().expect("migrate again");
    assert_eq!(backend.schema_version().expect("version"), 1);
}

#[test]
fn migrate_rejects_newer_database() {
    let backend = SqliteBackend::open_in_memory().expect("open in memory");
    backend.migrate().expect("migrate");
    backend
        .connection()
        .execute("UPDATE callbook_schema SET version = 99;", [])
        .expect("bump version");

    let err = backend.migrate().unwrap_err();
    assert!(err.to_string().contains("newer than available migrations"));
}

#[test]
fn duration_column_enforces_range() {
    let backend = SqliteBackend::open_in_memory().expect("open in memory");
    backend.migrate().expect("migrate");
    let result = backend.connection().execute(
        "INSERT INTO calls (id, customer_name, customer_phone, customer_email, call_status, duration_minutes, agent_name, created_at)
         VALUES ('x', 'Ada', '5551-2345', 'ada@gmail.com', 'open', 61, 'Grace', 1);",
        [],
    );
    assert!(result.is_err());
}
