//! Database schema definitions

use rusqlite::Connection;

/// SQL to create the parcel table
pub const CREATE_PARCEL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS parcel (
    number INTEGER PRIMARY KEY AUTOINCREMENT,
    client INTEGER,
    status TEXT,
    address TEXT,
    created_at TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_parcel_client ON parcel(client)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_PARCEL_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Create the parcel table and its indexes on `conn`. Idempotent.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    for stmt in all_schema_statements() {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

/// Whether `conn` already has the parcel table
pub fn has_parcel_table(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'parcel'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
