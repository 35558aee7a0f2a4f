//! Process exchange resolver
//!
//! `set_or_insert` is the single write path every gap-filling rule goes
//! through. Within one process there is at most one input exchange per
//! synthetic flow: an existing line is updated in place, otherwise a new one
//! is appended with an internal id above every id already in use.

use tracing::debug;

use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Exchange, Flow, Process};

/// What `set_or_insert` did to the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
    /// Exchange already carried this amount (and unit); nothing was persisted
    Unchanged,
}

/// Set the input exchange of `flow` on `process` to `amount`.
///
/// `unit` replaces the unit of an existing exchange only when given; new
/// exchanges use it, or the flow's reference unit. The process is persisted
/// as a whole whenever it changed.
pub fn set_or_insert(
    store: &mut dyn InventoryStore,
    process: &mut Process,
    flow: &Flow,
    amount: f64,
    unit: Option<&str>,
) -> Result<Upsert, IntensityError> {
    let outcome = apply(process, flow, amount, unit);

    if outcome != Upsert::Unchanged {
        store.update_process(process)?;
        debug!(
            process = %process.name,
            location = %process.location_name(),
            flow = %flow.name,
            amount,
            ?outcome,
            "Exchange written"
        );
    }
    Ok(outcome)
}

/// In-memory half of [`set_or_insert`]
pub fn apply(process: &mut Process, flow: &Flow, amount: f64, unit: Option<&str>) -> Upsert {
    let mut max_id = 0;
    let mut existing = None;
    for (idx, exchange) in process.exchanges.iter().enumerate() {
        max_id = max_id.max(exchange.internal_id);
        if existing.is_none() && exchange.is_input && exchange.flow.name == flow.name {
            existing = Some(idx);
        }
    }

    match existing {
        Some(idx) => {
            let exchange = &mut process.exchanges[idx];
            let unit_changed = unit.is_some_and(|u| u != exchange.unit);
            if exchange.amount == amount && !unit_changed {
                return Upsert::Unchanged;
            }
            exchange.amount = amount;
            if let Some(u) = unit {
                exchange.unit = u.to_string();
            }
            Upsert::Updated
        }
        None => {
            process.exchanges.push(Exchange {
                internal_id: max_id + 1,
                flow: flow.to_ref(),
                is_input: true,
                amount,
                unit: unit.unwrap_or(&flow.unit).to_string(),
                property: flow.property,
            });
            Upsert::Inserted
        }
    }
}

/// Tally of resolver outcomes for one rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct UpsertCounts {
    pub inserted: u64,
    pub updated: u64,
    pub unchanged: u64,
}

impl UpsertCounts {
    pub fn record(&mut self, outcome: Upsert) {
        match outcome {
            Upsert::Inserted => self.inserted += 1,
            Upsert::Updated => self.updated += 1,
            Upsert::Unchanged => self.unchanged += 1,
        }
    }

    pub fn merge(&mut self, other: UpsertCounts) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
    }

    pub fn touched(&self) -> u64 {
        self.inserted + self.updated + self.unchanged
    }
}
