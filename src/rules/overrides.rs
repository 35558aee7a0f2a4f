//! Literature overrides keyed by (name substring, location substring)

use tracing::{info, warn};

use super::tables::OverrideEntry;
use super::{ambiguity, resolve_process_name, MatchPolicy, RuleContext, RuleOutcome};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Flow, Process};
use crate::resolver::set_or_insert;

/// What a table does to a `flag external data` line already on a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalFlag {
    /// Set the flag to this table's value
    Overwrite,
    /// Leave a flag written by an earlier table alone
    KeepExisting,
}

/// Write every table value onto the matching process(es) as an input of `target`.
///
/// With `flag_external` set, each touched process also receives a
/// `flag external data` input carrying the same amount, subject to `flag`.
/// Entries that match nothing are reported as unresolved and the run continues.
pub fn apply_table(
    store: &mut dyn InventoryStore,
    ctx: &RuleContext<'_>,
    label: &str,
    table: &[OverrideEntry],
    target: &Flow,
    flag: ExternalFlag,
) -> Result<RuleOutcome, IntensityError> {
    let processes = store.processes()?;
    let mut outcome = RuleOutcome::default();

    for entry in table {
        let resolution = resolve_process_name(&processes, entry.name, ctx.policy);
        if resolution.is_ambiguous() {
            outcome
                .ambiguous
                .push(ambiguity(entry.name, None, resolution.candidates.clone(), ctx.policy));
        }

        let Some(name) = resolution.chosen else {
            let reason = if resolution.candidates.is_empty() { "no match" } else { "ambiguous" };
            warn!(table = label, name = entry.name, location = entry.location, reason, "Override entry skipped");
            outcome
                .unresolved
                .push(format!("{}: {} @ {} ({})", label, entry.name, entry.location, reason));
            continue;
        };

        let matched: Vec<Process> = store
            .processes_for_name(&name)?
            .into_iter()
            .filter(|p| p.location_name().contains(entry.location))
            .collect();

        if matched.is_empty() {
            warn!(table = label, name = %name, location = entry.location, "No process at location");
            outcome
                .unresolved
                .push(format!("{}: {} @ {} (no match)", label, entry.name, entry.location));
            continue;
        }

        if matched.len() > 1 {
            let locations = matched.iter().map(|p| p.location_name().to_string()).collect();
            outcome
                .ambiguous
                .push(ambiguity(&name, Some(entry.location), locations, ctx.policy));
            if ctx.policy == MatchPolicy::Strict {
                outcome
                    .unresolved
                    .push(format!("{}: {} @ {} (ambiguous)", label, entry.name, entry.location));
                continue;
            }
        }

        for mut process in matched {
            let result = set_or_insert(store, &mut process, target, entry.value, Some("kg"))?;
            outcome.counts.record(result);

            let keep = flag == ExternalFlag::KeepExisting && process.has_flow(&ctx.flows.flag_external_data.name);
            if ctx.flag_external && !keep {
                let written = set_or_insert(store, &mut process, &ctx.flows.flag_external_data, entry.value, Some("kg"))?;
                outcome.counts.record(written);
            }
        }
    }

    info!(
        table = label,
        entries = table.len(),
        inserted = outcome.counts.inserted,
        updated = outcome.counts.updated,
        unresolved = outcome.unresolved.len(),
        "Override table applied"
    );
    Ok(outcome)
}
