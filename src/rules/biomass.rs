//! Used and unused biomass
//!
//! Used biomass comes from one of three mutually exclusive passes chosen by
//! process category: crops (reference output already is biomass), forestry
//! (energy content over wood energy density) and everything else carrying a
//! gross calorific value (energy over an average biomass energy density).
//! Unused biomass is then derived from used biomass with a residue ratio.

use tracing::{info, warn};

use super::{RuleContext, RuleOutcome};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Category, Process};
use crate::registry::{BIOMASS_UNUSED, BIOMASS_USED};
use crate::resolver::set_or_insert;
use crate::stats::mean;

pub const CROP_CATEGORIES: [&str; 15] = [
    "0111:Growing of cereals (except rice), leguminous crops and oil seeds",
    "0112:Growing of rice",
    "0113:Growing of vegetables and melons, roots and tubers",
    "0114:Growing of sugar cane",
    "0116:Growing of fibre crops",
    "0119:Growing of other non-perennial crops",
    "0121:Growing of grapes",
    "0122:Growing of tropical and subtropical fruits",
    "0123:Growing of citrus fruits",
    "0124:Growing of pome fruits and stone fruits",
    "0125:Growing of other tree and bush fruits and nuts",
    "0126:Growing of oleaginous fruits",
    "0127:Growing of beverage crops",
    "0128:Growing of spices, aromatic, drug and pharmaceutical crops",
    "0129:Growing of other perennial crops",
];

pub const FORESTRY_CATEGORIES: [&str; 2] = ["0210:Silviculture and other forestry activities", "0220:Logging"];

pub const ANIMAL_CATEGORIES: [&str; 5] = [
    "0141:Raising of cattle and buffaloes",
    "0144:Raising of sheep and goats",
    "0145:Raising of swine|pigs",
    "0146:Raising of poultry",
    "0149:Raising of other animals",
];

/// Gross calorific value flow; names containing `correction` are excluded
pub const ENERGY_FLOW: &str = "Energy, gross calorific value, in biomass";

/// Average energy density of biomass, MJ/kg
pub const AVERAGE_ENERGY_DENSITY: f64 = 19.0;

/// Straw-to-grain ratios reported in the literature, per crop keyword.
/// Later keywords take precedence when a name contains several.
const CROP_RESIDUES: [(&[&str], &[f64]); 7] = [
    (
        &["wheat"],
        &[1.3, 1.2, 1.34, 1.75, 0.6, 1.0, 1.7, 1.7, 1.6, 0.8, 1.7, 1.3, 1.3, 1.5, 0.9, 1.3],
    ),
    (&["barley"], &[1.3, 1.5, 1.0, 1.75, 1.0, 1.24, 1.2, 1.0]),
    (&["rye"], &[1.75, 1.7]),
    (&["maize", "corn"], &[1.0, 1.0, 0.9, 2.0, 1.3, 1.0, 0.7, 1.0, 1.0, 1.0]),
    (&["sunflower"], &[1.5, 2.6, 1.4]),
    (&["rape"], &[1.1, 1.7, 1.7]),
    (&["rice"], &[1.76, 1.0]),
];

pub const FORESTRY_RESIDUE_RATIO: f64 = 6.0 / 4.0;
pub const DEFAULT_RESIDUE_RATIO: f64 = 1.0;

fn in_list(process: &Process, list: &[&str]) -> bool {
    list.contains(&process.category_name())
}

/// Wood energy density for a forestry process, MJ/kg
pub fn wood_energy_density(process_name: &str) -> f64 {
    if process_name.contains("softwood") {
        15.7
    } else if process_name.contains("hardwood") {
        15.0
    } else {
        15.5
    }
}

/// Ratio of unused to used biomass for a process
pub fn residue_ratio(process: &Process) -> f64 {
    let mut ratio = DEFAULT_RESIDUE_RATIO;

    if in_list(process, &CROP_CATEGORIES) {
        for (keywords, values) in CROP_RESIDUES {
            if keywords.iter().any(|k| process.name.contains(k)) {
                ratio = mean(values).unwrap_or(DEFAULT_RESIDUE_RATIO);
            }
        }
    }
    if in_list(process, &FORESTRY_CATEGORIES) {
        ratio = FORESTRY_RESIDUE_RATIO;
    }
    // grazing leaves no residues
    if in_list(process, &ANIMAL_CATEGORIES) {
        ratio = 0.0;
    }
    ratio
}

/// Amount of the last gross-calorific-value exchange, if any
fn energy_content(process: &Process) -> Option<f64> {
    process
        .exchanges
        .iter()
        .filter(|e| e.flow.name.contains(ENERGY_FLOW) && !e.flow.name.contains("correction"))
        .map(|e| e.amount)
        .last()
}

/// Check that every crop, forestry and animal category exists in the tree.
pub fn check_categories(categories: &[Category]) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();
    for name in CROP_CATEGORIES.iter().chain(&FORESTRY_CATEGORIES).chain(&ANIMAL_CATEGORIES) {
        if !categories.iter().any(|c| c.name.contains(name)) {
            warn!(category = %name, "Category not found");
            outcome.unresolved.push(format!("category: {}", name));
        }
    }
    outcome
}

/// Crop processes with a mass reference get exactly 1 kg of used biomass.
pub fn fill_crops(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let mut outcome = RuleOutcome::default();

    for mut process in store.processes()? {
        if !in_list(&process, &CROP_CATEGORIES) || process.is_market() {
            continue;
        }
        let mass_based = process.reference_exchange().is_some_and(|e| e.unit == "kg");
        if !mass_based {
            continue;
        }
        let result = set_or_insert(store, &mut process, &ctx.flows.biomass_used, 1.0, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(touched = outcome.counts.touched(), "Crop biomass filled");
    Ok(outcome)
}

/// Forestry processes: energy content over wood energy density.
pub fn fill_forestry(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let mut outcome = RuleOutcome::default();

    for mut process in store.processes()? {
        if !in_list(&process, &FORESTRY_CATEGORIES) {
            continue;
        }
        let Some(energy) = energy_content(&process) else {
            continue;
        };
        let amount = energy / wood_energy_density(&process.name);
        let result = set_or_insert(store, &mut process, &ctx.flows.biomass_used, amount, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(touched = outcome.counts.touched(), "Forestry biomass filled");
    Ok(outcome)
}

/// All other processes carrying a gross calorific value.
pub fn fill_remaining(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let mut outcome = RuleOutcome::default();

    for mut process in store.processes()? {
        if in_list(&process, &CROP_CATEGORIES) || in_list(&process, &FORESTRY_CATEGORIES) {
            continue;
        }
        let Some(energy) = energy_content(&process) else {
            continue;
        };
        let amount = energy / AVERAGE_ENERGY_DENSITY;
        let result = set_or_insert(store, &mut process, &ctx.flows.biomass_used, amount, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(touched = outcome.counts.touched(), "Remaining biomass filled");
    Ok(outcome)
}

/// Unused biomass for processes that carry used biomass but no unused biomass yet.
pub fn fill_unused(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let mut outcome = RuleOutcome::default();

    for mut process in store.processes()? {
        if process.has_flow(BIOMASS_UNUSED) {
            continue;
        }
        let Some(used) = process.input_for(BIOMASS_USED).map(|e| e.amount) else {
            continue;
        };
        let amount = used * residue_ratio(&process);
        let result = set_or_insert(store, &mut process, &ctx.flows.biomass_unused, amount, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(inserted = outcome.counts.inserted, "Unused biomass filled");
    Ok(outcome)
}
