//! Missing gangue/overburden detection for mining processes

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use super::{RuleContext, RuleOutcome};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Category, Process};
use crate::registry::OVERBURDEN;
use crate::resolver::set_or_insert;

pub const COAL_ROOT: &str = "05:Mining of coal and lignite";
pub const METAL_ORES_ROOT: &str = "07:Mining of metal ores";
pub const OTHER_MINING_ROOT: &str = "08:Other mining and quarrying";

/// Which mining root a category descends from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningBranch {
    /// Overburden expected
    Coal,
    /// Gangue and overburden expected
    MetalOres,
    /// Nothing expected
    Other,
}

impl MiningBranch {
    pub fn expects_gangue(&self) -> bool {
        matches!(self, Self::MetalOres)
    }

    pub fn expects_overburden(&self) -> bool {
        matches!(self, Self::Coal | Self::MetalOres)
    }
}

/// Mining categories: the three roots plus two levels of descendants
#[derive(Debug, Clone, Default)]
pub struct MiningClosure {
    branches: HashMap<String, MiningBranch>,
}

impl MiningClosure {
    pub fn build(categories: &[Category]) -> Self {
        let mut branches = HashMap::new();

        for (root, branch) in [
            (COAL_ROOT, MiningBranch::Coal),
            (METAL_ORES_ROOT, MiningBranch::MetalOres),
            (OTHER_MINING_ROOT, MiningBranch::Other),
        ] {
            let mut level: Vec<&Category> = categories.iter().filter(|c| c.name == root).collect();
            if level.is_empty() {
                warn!(category = root, "Mining category not found");
            }
            for _ in 0..3 {
                let mut next = Vec::new();
                for category in level {
                    branches.insert(category.name.clone(), branch);
                    next.extend(
                        categories
                            .iter()
                            .filter(|c| c.parent_id.as_deref() == Some(category.id.as_str())),
                    );
                }
                level = next;
            }
        }

        Self { branches }
    }

    pub fn branch_of(&self, process: &Process) -> Option<MiningBranch> {
        self.branches.get(process.category_name()).copied()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Process names collected by [`flag_missing`]
#[derive(Debug, Clone, Default)]
pub struct MissingFlows {
    pub overburden: BTreeSet<String>,
    pub gangue: BTreeSet<String>,
    /// Processes outside the mining categories that extract from the ground
    /// without gangue or overburden; reported only
    pub outside: BTreeSet<String>,
}

/// Flag mining processes that extract from the ground without gangue or
/// overburden, with a unit-valued `flag missing ...` input.
pub fn flag_missing(
    store: &mut dyn InventoryStore,
    ctx: &RuleContext<'_>,
    closure: &MiningClosure,
) -> Result<(RuleOutcome, MissingFlows), IntensityError> {
    let gangue = ctx.flows.gangue.name.as_str();
    let mut outcome = RuleOutcome::default();
    let mut missing = MissingFlows::default();

    for mut process in store.processes()? {
        let has_gangue = process.has_flow(gangue);
        let has_overburden = process.has_flow(OVERBURDEN);

        match closure.branch_of(&process) {
            Some(branch) => {
                let extracts = process
                    .exchanges
                    .iter()
                    .any(|e| e.flow.category.iter().any(|c| c.contains("in ground")));
                if !extracts {
                    continue;
                }

                if !has_gangue && branch.expects_gangue() {
                    missing.gangue.insert(process.name.clone());
                    let result = set_or_insert(store, &mut process, &ctx.flows.flag_missing_gangue, 1.0, Some("kg"))?;
                    outcome.counts.record(result);
                }
                if !has_overburden && branch.expects_overburden() {
                    missing.overburden.insert(process.name.clone());
                    let result =
                        set_or_insert(store, &mut process, &ctx.flows.flag_missing_overburden, 1.0, Some("kg"))?;
                    outcome.counts.record(result);
                }
            }
            None => {
                let extracts = process.exchanges.iter().any(|e| {
                    e.flow.category.iter().any(|c| c.contains("in ground")) && !e.flow.name.contains("Soil,")
                });
                if extracts && (!has_gangue || !has_overburden) {
                    missing.outside.insert(process.name.clone());
                }
            }
        }
    }

    info!(
        missing_overburden = missing.overburden.len(),
        missing_gangue = missing.gangue.len(),
        missing_outside = missing.outside.len(),
        "Mining processes checked"
    );
    Ok((outcome, missing))
}
