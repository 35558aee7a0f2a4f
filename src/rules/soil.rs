//! Moved and compacted soil from field operations and forest roads
//!
//! Amounts are kg per hectare of worked field. The operation lists match
//! process names by substring; every non-market process containing the
//! substring receives the amount, whatever its location.

use tracing::{info, warn};

use super::{RuleContext, RuleOutcome};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Flow, Process};
use crate::resolver::set_or_insert;

/// Bulk density of soil: 1.4 g/cm3 in kg/m3
pub const SOIL_DENSITY: f64 = 1.4 / 1000.0 * 100.0 * 100.0 * 100.0;

const HECTARE: f64 = 10000.0;
const TIRE_WIDTH: f64 = 0.7;
const TIRES: f64 = 2.0;
const COMPACTION_DEPTH: f64 = 0.2;

const ROAD_TIRE_WIDTH: f64 = 0.85;
const ROAD_WIDTH: f64 = 4.0;
const ROAD_COMPACTION_DEPTH: f64 = 0.6;

pub const LOGGING_CATEGORY: &str = "0220:Logging";
pub const ROAD_TRANSFORMATION_FLOW: &str = "Transformation, from traffic area, rail/road embankment";

/// Soil moved by a tillage operation reaching `depth` metres
pub fn tillage(depth: f64) -> f64 {
    depth * HECTARE * SOIL_DENSITY
}

/// Soil compacted while working one hectare with machinery of width `width` (m)
pub fn compacting(width: f64) -> f64 {
    let driven_length = HECTARE / width;
    let compacted_section = COMPACTION_DEPTH * TIRES * TIRE_WIDTH;
    driven_length * compacted_section * SOIL_DENSITY
}

/// Soil compacted per m2 of new forest road (kg/m2): the tire tracks' share
/// of the road width, compacted to road depth.
pub fn road_area_factor() -> f64 {
    (TIRES * ROAD_TIRE_WIDTH / ROAD_WIDTH) * ROAD_COMPACTION_DEPTH * SOIL_DENSITY
}

/// Tillage operations and their working depth (m)
pub const TILLAGE_OPERATIONS: [(&str, f64); 3] = [
    ("tillage, harrowing, ", 0.15),
    ("tillage, ploughing | tillage, ploughing |", 0.2),
    (
        "tillage, subsoiling, by subsoiler plow | tillage, subsoiling, by subsoiler plow |",
        0.3,
    ),
];

/// Field operations and the working width (m) of their machinery
pub const COMPACTING_OPERATIONS: [(&str, f64); 28] = [
    (
        "application of plant protection product, by field sprayer | application of plant protection product, by field sprayer",
        7.0,
    ),
    ("combine harvesting | combine harvesting |", 7.0),
    ("harvesting, by complete harvester, beets | harvesting, by complete harvester, beets |", 7.0),
    (
        "harvesting, by complete harvester, ground crops | harvesting, by complete harvester, ground crops |",
        7.0,
    ),
    ("harvesting, sugarcane | harvesting, sugarcane |", 7.0),
    ("chopping, maize | chopping, maize |", 7.0),
    ("fertilising, by broadcaster | fertilising, by broadcaster |", 5.0),
    (
        "fertilising, by rig fertiliser, sugarcane | fertilising, by rig fertiliser, sugarcane |",
        10.0,
    ),
    ("haying, by rotary tedder | haying, by rotary tedder |", 5.0),
    ("hoeing | hoeing |", 3.0),
    ("mowing, by motor mower | mowing, by motor mower |", 7.0),
    ("mulching | mulching |", 2.5),
    ("planting | planting |", 2.5),
    ("planting, potato | potato planting |", 3.7),
    ("planting, sugarcane | planting, sugarcane |", 3.7),
    ("potato haulm cutting | potato haulm cutting |", 2.0),
    ("sowing | sowing |", 3.0),
    ("swath, by rotary windrower | swath, by rotary windrower |", 4.0),
    ("tillage, cultivating, chiselling | tillage, cultivating, chiselling |", 3.4),
    ("tillage, currying, by weeder | tillage, currying, by weeder |", 6.0),
    (
        "tillage, harrowing, by offset disc harrow | tillage, harrowing, by offset disc harrow |",
        7.0,
    ),
    (
        "tillage, harrowing, by offset leveling disc harrow | tillage, harrowing, by offset leveling disc harrow |",
        7.0,
    ),
    ("tillage, harrowing, by rotary harrow | tillage, harrowing, by rotary harrow |", 7.0),
    (
        "tillage, hoeing and earthing-up, potatoes | tillage, hoeing and earthing-up, potatoes",
        7.0,
    ),
    (
        "tillage, harrowing, by spring tine harrow | tillage, harrowing, by spring tine harrow |",
        3.0,
    ),
    ("tillage, ploughing | tillage, ploughing |", 7.0),
    ("tillage, rolling | tillage, rolling |", 3.0),
    ("tillage, rotary cultivator | tillage, rotary cultivator |", 7.8),
];

/// Fresh copy of `process`; a pass may already have written to it.
fn reload(store: &dyn InventoryStore, process: &Process) -> Result<Process, IntensityError> {
    store
        .processes_for_name(&process.name)?
        .into_iter()
        .find(|p| p.id == process.id)
        .ok_or_else(|| IntensityError::NotFound(format!("process {}", process.id)))
}

/// Set `flow` to `amount` on every non-market process whose name contains `needle`
fn fill_by_name(
    store: &mut dyn InventoryStore,
    processes: &[Process],
    needle: &str,
    flow: &Flow,
    amount: f64,
    outcome: &mut RuleOutcome,
) -> Result<(), IntensityError> {
    let mut found = false;
    for process in processes.iter().filter(|p| p.name.contains(needle) && !p.is_market()) {
        found = true;
        let mut current = reload(store, process)?;
        let result = set_or_insert(store, &mut current, flow, amount, Some("kg"))?;
        outcome.counts.record(result);
    }

    if !found {
        warn!(operation = needle, flow = %flow.name, "No process for field operation");
        outcome.unresolved.push(format!("{}: {}", flow.name, needle));
    }
    Ok(())
}

/// `Soil, moved` for tillage operations.
pub fn fill_tillage(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let processes = store.processes()?;
    let mut outcome = RuleOutcome::default();

    for (needle, depth) in TILLAGE_OPERATIONS {
        fill_by_name(store, &processes, needle, &ctx.flows.soil_moved, tillage(depth), &mut outcome)?;
    }

    info!(touched = outcome.counts.touched(), "Tillage soil filled");
    Ok(outcome)
}

/// `Soil, compacted` for field operations and for logging processes that
/// open new forest roads.
pub fn fill_compacting(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let processes = store.processes()?;
    let mut outcome = RuleOutcome::default();

    for (needle, width) in COMPACTING_OPERATIONS {
        fill_by_name(store, &processes, needle, &ctx.flows.soil_compacted, compacting(width), &mut outcome)?;
    }

    let factor = road_area_factor();
    let mut roads = 0usize;
    for process in processes.iter().filter(|p| p.category_name() == LOGGING_CATEGORY) {
        let road_area: Vec<f64> = process
            .exchanges
            .iter()
            .filter(|e| e.is_input && e.flow.name == ROAD_TRANSFORMATION_FLOW)
            .map(|e| e.amount)
            .collect();
        if road_area.is_empty() {
            continue;
        }
        roads += 1;
        let amount = road_area.iter().sum::<f64>() * factor;
        let mut current = reload(store, process)?;
        let result = set_or_insert(store, &mut current, &ctx.flows.soil_compacted, amount, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(touched = outcome.counts.touched(), roads, "Compacted soil filled");
    Ok(outcome)
}
