//! Inventory store
//!
//! The gap-filling rules only need record-at-a-time access to the host
//! inventory: list everything, look up by exact name, insert, and rewrite a
//! whole process. [`InventoryStore`] captures that surface; [`InventoryDb`]
//! implements it on top of SQLite.
//!
//! ## Tables
//!
//! - `flows` - Elementary/product/waste flows (category path as JSON)
//! - `categories` - Category tree used for process classification
//! - `processes` / `exchanges` - Process records and their inventory lines
//! - `impact_methods` / `impact_categories` / `impact_factors` - Imported LCIA methods

pub mod flows;
pub mod methods;
pub mod processes;
pub mod schema;

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::IntensityError;
use crate::model::{Category, Flow, ImpactMethodRecord, Process};

/// Repository surface of the host inventory database.
///
/// Reads return snapshots; writes are persisted immediately and are not
/// batched, so an interrupted run leaves every completed write in place.
pub trait InventoryStore {
    fn flows(&self) -> Result<Vec<Flow>, IntensityError>;

    /// Flows whose name equals `name` exactly
    fn flows_for_name(&self, name: &str) -> Result<Vec<Flow>, IntensityError>;

    fn insert_flow(&mut self, flow: &Flow) -> Result<(), IntensityError>;

    fn processes(&self) -> Result<Vec<Process>, IntensityError>;

    /// Processes whose name equals `name` exactly (usually one per location)
    fn processes_for_name(&self, name: &str) -> Result<Vec<Process>, IntensityError>;

    fn insert_process(&mut self, process: &Process) -> Result<(), IntensityError>;

    /// Persist the whole process record, exchanges included
    fn update_process(&mut self, process: &Process) -> Result<(), IntensityError>;

    fn categories(&self) -> Result<Vec<Category>, IntensityError>;

    fn insert_category(&mut self, category: &Category) -> Result<(), IntensityError>;

    fn impact_methods(&self) -> Result<Vec<ImpactMethodRecord>, IntensityError>;

    fn insert_impact_method(&mut self, method: &ImpactMethodRecord) -> Result<(), IntensityError>;

    /// Returns whether a method with this id existed
    fn delete_impact_method(&mut self, id: &str) -> Result<bool, IntensityError>;
}

/// SQLite-backed inventory database
pub struct InventoryDb {
    conn: Connection,
}

impl InventoryDb {
    /// Open or create the inventory database file
    pub fn open(path: &Path) -> Result<Self, IntensityError> {
        info!("Opening inventory database at {:?}", path);

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")?;

        let db = Self { conn };
        schema::init_schema(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, IntensityError> {
        debug!("Opening in-memory inventory database");

        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self { conn };
        schema::init_schema(&db.conn)?;
        Ok(db)
    }
}

impl InventoryStore for InventoryDb {
    fn flows(&self) -> Result<Vec<Flow>, IntensityError> {
        flows::list_flows(&self.conn)
    }

    fn flows_for_name(&self, name: &str) -> Result<Vec<Flow>, IntensityError> {
        flows::flows_for_name(&self.conn, name)
    }

    fn insert_flow(&mut self, flow: &Flow) -> Result<(), IntensityError> {
        flows::insert_flow(&self.conn, flow)
    }

    fn processes(&self) -> Result<Vec<Process>, IntensityError> {
        processes::list_processes(&self.conn)
    }

    fn processes_for_name(&self, name: &str) -> Result<Vec<Process>, IntensityError> {
        processes::processes_for_name(&self.conn, name)
    }

    fn insert_process(&mut self, process: &Process) -> Result<(), IntensityError> {
        processes::insert_process(&mut self.conn, process)
    }

    fn update_process(&mut self, process: &Process) -> Result<(), IntensityError> {
        processes::update_process(&mut self.conn, process)
    }

    fn categories(&self) -> Result<Vec<Category>, IntensityError> {
        flows::list_categories(&self.conn)
    }

    fn insert_category(&mut self, category: &Category) -> Result<(), IntensityError> {
        flows::insert_category(&self.conn, category)
    }

    fn impact_methods(&self) -> Result<Vec<ImpactMethodRecord>, IntensityError> {
        methods::list_methods(&self.conn)
    }

    fn insert_impact_method(&mut self, method: &ImpactMethodRecord) -> Result<(), IntensityError> {
        methods::insert_method(&mut self.conn, method)
    }

    fn delete_impact_method(&mut self, id: &str) -> Result<bool, IntensityError> {
        methods::delete_method(&mut self.conn, id)
    }
}
