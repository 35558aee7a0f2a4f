//! Gap-filling rule engine
//!
//! Each rule reads a fresh snapshot of the processes it needs, decides which
//! processes qualify and what amount they get, and writes through
//! [`crate::resolver::set_or_insert`]. Rules do not share ambient state:
//! everything they observe is returned as a [`RuleOutcome`] and folded into
//! the run's [`GapFillReport`].
//!
//! Required order (later rules read flows written by earlier ones):
//!
//! 1. [`overburden::consolidate`]
//! 2. [`overrides::apply_table`] for overburden, then gangue
//! 3. [`missing::flag_missing`]
//! 4. [`biomass`] used (crops, forestry, remaining), then unused
//! 5. [`soil::fill_tillage`], [`soil::fill_compacting`]

pub mod biomass;
pub mod missing;
pub mod overburden;
pub mod overrides;
pub mod soil;
pub mod tables;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Process;
use crate::registry::SyntheticFlows;
use crate::resolver::UpsertCounts;

/// How a free-text name substring is resolved to a process name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// The last matching process name wins; every location match is updated.
    /// Ambiguities are still logged and reported.
    #[default]
    LastWins,
    /// More than one candidate name, or more than one location match, skips the entry.
    Strict,
}

/// Settings shared by every rule in a run
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub flows: &'a SyntheticFlows,
    pub policy: MatchPolicy,
    /// Write `flag external data` exchanges next to table values
    pub flag_external: bool,
}

/// A lookup that matched more than one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousMatch {
    pub needle: String,
    pub location: Option<String>,
    pub candidates: Vec<String>,
}

/// What one rule did
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub counts: UpsertCounts,
    /// Table entries or catalog names that matched nothing
    pub unresolved: Vec<String>,
    pub ambiguous: Vec<AmbiguousMatch>,
}

impl RuleOutcome {
    pub fn merge(&mut self, other: RuleOutcome) {
        self.counts.merge(other.counts);
        self.unresolved.extend(other.unresolved);
        self.ambiguous.extend(other.ambiguous);
    }
}

/// Everything the gap-filling pass observed, threaded through the pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct GapFillReport {
    pub missing_overburden: BTreeSet<String>,
    pub missing_gangue: BTreeSet<String>,
    pub missing_outside: BTreeSet<String>,
    pub unresolved: Vec<String>,
    pub ambiguous: Vec<AmbiguousMatch>,
    /// Resolver tallies per rule name
    pub counts: BTreeMap<String, UpsertCounts>,
}

impl GapFillReport {
    pub fn absorb(&mut self, rule: &str, outcome: RuleOutcome) {
        self.counts.entry(rule.to_string()).or_default().merge(outcome.counts);
        self.unresolved.extend(outcome.unresolved);
        self.ambiguous.extend(outcome.ambiguous);
    }

    /// False once any table entry or catalog name went unresolved; the
    /// name/location catalog is then probably stale for this database.
    pub fn names_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Result of resolving a name substring against the process list
#[derive(Debug, Clone, PartialEq)]
pub struct NameResolution {
    pub chosen: Option<String>,
    /// Distinct matching names, in order of first appearance
    pub candidates: Vec<String>,
}

impl NameResolution {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Find the process name containing `needle`, ignoring market processes.
pub fn resolve_process_name(processes: &[Process], needle: &str, policy: MatchPolicy) -> NameResolution {
    let mut candidates: Vec<String> = Vec::new();
    let mut last = None;

    for process in processes {
        if process.name.contains(needle) && !process.is_market() {
            if !candidates.iter().any(|c| c == &process.name) {
                candidates.push(process.name.clone());
            }
            last = Some(process.name.clone());
        }
    }

    let chosen = match policy {
        MatchPolicy::LastWins => last,
        MatchPolicy::Strict if candidates.len() == 1 => last,
        MatchPolicy::Strict => None,
    };

    NameResolution { chosen, candidates }
}

/// Log an ambiguity and turn it into a report entry
pub(crate) fn ambiguity(needle: &str, location: Option<&str>, candidates: Vec<String>, policy: MatchPolicy) -> AmbiguousMatch {
    warn!(
        needle = %needle,
        location = location.unwrap_or("-"),
        candidates = candidates.len(),
        ?policy,
        "Ambiguous process match"
    );
    AmbiguousMatch {
        needle: needle.to_string(),
        location: location.map(str::to_string),
        candidates,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_resolve_prefers_last_match() {
        let ore = ground("ore", "Iron");
        let processes = vec![
            process("a", "gold production | gold | x", "c", "Canada", vec![input(1, &ore, 1.0)]),
            process("b", "market for gold | gold", "c", "Global", vec![]),
            process("c", "gold production | gold | y", "c", "Australia", vec![]),
        ];

        let last = resolve_process_name(&processes, "gold production | gold", MatchPolicy::LastWins);
        assert_eq!(last.chosen.as_deref(), Some("gold production | gold | y"));
        assert!(last.is_ambiguous());

        let strict = resolve_process_name(&processes, "gold production | gold", MatchPolicy::Strict);
        assert_eq!(strict.chosen, None);
        assert_eq!(strict.candidates.len(), 2);

        let unique = resolve_process_name(&processes, "| gold | x", MatchPolicy::Strict);
        assert_eq!(unique.chosen.as_deref(), Some("gold production | gold | x"));
    }

    #[test]
    fn test_market_processes_never_match() {
        let processes = vec![process("b", "market for gold | gold", "c", "Global", vec![])];
        let res = resolve_process_name(&processes, "gold", MatchPolicy::LastWins);
        assert_eq!(res.chosen, None);
        assert!(res.candidates.is_empty());
    }

    #[test]
    fn test_report_names_resolved() {
        let mut report = GapFillReport::default();
        assert!(report.names_resolved());
        report.absorb(
            "overrides",
            RuleOutcome {
                unresolved: vec!["x @ y".to_string()],
                ..Default::default()
            },
        );
        assert!(!report.names_resolved());
        assert!(report.counts.contains_key("overrides"));
    }
}
