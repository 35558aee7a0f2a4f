//! Process rows and their exchanges
//!
//! A process is always read and written as one record: updating a process
//! replaces every exchange row it owns inside a single transaction.

use std::collections::HashMap;

use rusqlite::{params, Connection, Transaction};
use tracing::debug;

use super::flows::parse_category_path;
use crate::error::IntensityError;
use crate::model::{Exchange, FlowRef, Process, ReferenceProperty};

const EXCHANGE_SELECT: &str = r#"
    SELECT e.process_id, e.internal_id, e.flow_id, f.name, f.category_json,
           e.is_input, e.amount, e.unit, e.property
    FROM exchanges e
    LEFT JOIN flows f ON f.id = e.flow_id
"#;

struct ExchangeRow {
    process_id: String,
    internal_id: u32,
    flow_id: String,
    /// `None` when the exchange points at a flow that is not stored
    flow_name: Option<String>,
    category_json: Option<String>,
    is_input: bool,
    amount: f64,
    unit: String,
    property: String,
}

impl ExchangeRow {
    fn into_exchange(self) -> Result<(String, Exchange), IntensityError> {
        let (Some(flow_name), Some(category_json)) = (self.flow_name, self.category_json) else {
            return Err(IntensityError::NotFound(format!(
                "flow {} of exchange {} in process {}",
                self.flow_id, self.internal_id, self.process_id
            )));
        };
        let exchange = Exchange {
            internal_id: self.internal_id,
            flow: FlowRef {
                id: self.flow_id,
                name: flow_name,
                category: parse_category_path(&category_json)?,
            },
            is_input: self.is_input,
            amount: self.amount,
            unit: self.unit,
            property: ReferenceProperty::parse(&self.property),
        };
        Ok((self.process_id, exchange))
    }
}

fn load_exchanges(
    conn: &Connection,
    process_name: Option<&str>,
) -> Result<HashMap<String, Vec<Exchange>>, IntensityError> {
    let sql = match process_name {
        Some(_) => format!(
            "{} JOIN processes p ON p.id = e.process_id WHERE p.name = ? ORDER BY e.rowid",
            EXCHANGE_SELECT
        ),
        None => format!("{} ORDER BY e.rowid", EXCHANGE_SELECT),
    };

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |row: &rusqlite::Row| -> Result<ExchangeRow, rusqlite::Error> {
        Ok(ExchangeRow {
            process_id: row.get(0)?,
            internal_id: row.get(1)?,
            flow_id: row.get(2)?,
            flow_name: row.get(3)?,
            category_json: row.get(4)?,
            is_input: row.get(5)?,
            amount: row.get(6)?,
            unit: row.get(7)?,
            property: row.get(8)?,
        })
    };

    let rows = match process_name {
        Some(name) => stmt.query_map(params![name], map_row)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };

    let mut by_process: HashMap<String, Vec<Exchange>> = HashMap::new();
    for row in rows {
        let (process_id, exchange) = row.into_exchange()?;
        by_process.entry(process_id).or_default().push(exchange);
    }
    Ok(by_process)
}

fn load_processes(conn: &Connection, name: Option<&str>) -> Result<Vec<Process>, IntensityError> {
    let mut exchanges = load_exchanges(conn, name)?;

    let sql = match name {
        Some(_) => "SELECT id, name, category, location, quantitative_reference FROM processes WHERE name = ? ORDER BY rowid",
        None => "SELECT id, name, category, location, quantitative_reference FROM processes ORDER BY rowid",
    };
    let mut stmt = conn.prepare(sql)?;
    let map_row = |row: &rusqlite::Row| -> Result<Process, rusqlite::Error> {
        Ok(Process {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            location: row.get(3)?,
            quantitative_reference: row.get(4)?,
            exchanges: Vec::new(),
        })
    };

    let mut processes = match name {
        Some(name) => stmt.query_map(params![name], map_row)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };

    for process in &mut processes {
        process.exchanges = exchanges.remove(&process.id).unwrap_or_default();
    }
    Ok(processes)
}

/// All processes with their exchanges, in insertion order
pub fn list_processes(conn: &Connection) -> Result<Vec<Process>, IntensityError> {
    load_processes(conn, None)
}

/// Processes with exactly this name (one per location, typically)
pub fn processes_for_name(conn: &Connection, name: &str) -> Result<Vec<Process>, IntensityError> {
    load_processes(conn, Some(name))
}

fn write_exchanges(tx: &Transaction, process: &Process) -> Result<(), IntensityError> {
    let mut stmt = tx.prepare(
        r#"
        INSERT INTO exchanges (process_id, internal_id, flow_id, is_input, amount, unit, property)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;
    for exchange in &process.exchanges {
        stmt.execute(params![
            process.id,
            exchange.internal_id,
            exchange.flow.id,
            exchange.is_input,
            exchange.amount,
            exchange.unit,
            exchange.property.as_str(),
        ])?;
    }
    Ok(())
}

pub fn insert_process(conn: &mut Connection, process: &Process) -> Result<(), IntensityError> {
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        INSERT INTO processes (id, name, category, location, quantitative_reference)
        VALUES (?, ?, ?, ?, ?)
        "#,
        params![
            process.id,
            process.name,
            process.category,
            process.location,
            process.quantitative_reference,
        ],
    )?;
    write_exchanges(&tx, process)?;
    tx.commit()?;
    Ok(())
}

/// Rewrite a process record and all of its exchanges
pub fn update_process(conn: &mut Connection, process: &Process) -> Result<(), IntensityError> {
    let tx = conn.transaction()?;
    let changed = tx.execute(
        r#"
        UPDATE processes
        SET name = ?, category = ?, location = ?, quantitative_reference = ?
        WHERE id = ?
        "#,
        params![
            process.name,
            process.category,
            process.location,
            process.quantitative_reference,
            process.id,
        ],
    )?;
    if changed == 0 {
        return Err(IntensityError::NotFound(format!("process {}", process.id)));
    }

    tx.execute("DELETE FROM exchanges WHERE process_id = ?", params![process.id])?;
    write_exchanges(&tx, process)?;
    tx.commit()?;

    debug!(process = %process.name, exchanges = process.exchanges.len(), "Process updated");
    Ok(())
}
