//! Database schema definitions

use rusqlite::Connection;
use tracing::info;

use crate::error::IntensityError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), IntensityError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new inventory schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!("Migrating schema from v{} to v{}", current_version, SCHEMA_VERSION);
        migrate_schema(conn, current_version)?;
    } else {
        info!("Inventory schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &Connection) -> Result<i32, IntensityError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), IntensityError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<(), IntensityError> {
    conn.execute_batch(INVENTORY_SCHEMA)?;
    conn.execute_batch(EXCHANGES_SCHEMA)?;
    conn.execute_batch(METHOD_SCHEMA)?;
    Ok(())
}

fn migrate_schema(conn: &Connection, from_version: i32) -> Result<(), IntensityError> {
    let tx = conn.unchecked_transaction()?;

    if from_version < 2 {
        // v2: exchanges reference flows; a line pointing at an unknown flow
        // fails the copy and the whole migration rolls back
        tx.execute_batch("ALTER TABLE exchanges RENAME TO exchanges_v1;")?;
        tx.execute_batch(EXCHANGES_SCHEMA)?;
        tx.execute_batch(
            r#"
            INSERT INTO exchanges (process_id, internal_id, flow_id, is_input, amount, unit, property)
            SELECT process_id, internal_id, flow_id, is_input, amount, unit, property FROM exchanges_v1;
            DROP TABLE exchanges_v1;
            CREATE INDEX IF NOT EXISTS idx_exchanges_process ON exchanges(process_id);
            "#,
        )?;
    }

    set_schema_version(&tx, SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Flows, categories, processes and their exchanges
const INVENTORY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    parent_id TEXT
);

-- category_json holds the category path, root first
CREATE TABLE IF NOT EXISTS flows (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    category_json TEXT NOT NULL DEFAULT '[]',
    property TEXT NOT NULL,
    unit TEXT NOT NULL,
    flow_type TEXT NOT NULL DEFAULT 'ELEMENTARY_FLOW'
);

CREATE TABLE IF NOT EXISTS processes (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    category TEXT,
    location TEXT,
    quantitative_reference INTEGER
);

CREATE INDEX IF NOT EXISTS idx_flows_name ON flows(name);
CREATE INDEX IF NOT EXISTS idx_processes_name ON processes(name);
"#;

/// Exchange lines; every line must reference a known flow
const EXCHANGES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS exchanges (
    process_id TEXT NOT NULL,
    internal_id INTEGER NOT NULL,
    flow_id TEXT NOT NULL,
    is_input INTEGER NOT NULL,
    amount REAL NOT NULL,
    unit TEXT NOT NULL,
    property TEXT NOT NULL,
    PRIMARY KEY (process_id, internal_id),
    FOREIGN KEY (process_id) REFERENCES processes(id) ON DELETE CASCADE,
    FOREIGN KEY (flow_id) REFERENCES flows(id)
);

CREATE INDEX IF NOT EXISTS idx_exchanges_process ON exchanges(process_id);
"#;

/// Impact methods materialized by the importer
const METHOD_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS impact_methods (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    version TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS impact_categories (
    id TEXT PRIMARY KEY NOT NULL,
    method_id TEXT NOT NULL,
    name TEXT NOT NULL,
    reference_unit TEXT NOT NULL,
    position INTEGER NOT NULL,
    FOREIGN KEY (method_id) REFERENCES impact_methods(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS impact_factors (
    category_id TEXT NOT NULL,
    flow_id TEXT NOT NULL,
    value REAL NOT NULL,
    unit TEXT NOT NULL,
    FOREIGN KEY (category_id) REFERENCES impact_categories(id) ON DELETE CASCADE
);
"#;
