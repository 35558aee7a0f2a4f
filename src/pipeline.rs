//! End-to-end run: gap-fill, classify, assemble, package, import, report

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::{Classifier, ObservedAmounts};
use crate::config::Config;
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::method::{self, MethodOptions};
use crate::registry::{FlowRegistry, SyntheticFlows};
use crate::report::write_missing_csvs;
use crate::rules::missing::{flag_missing, MiningClosure};
use crate::rules::overrides::ExternalFlag;
use crate::rules::tables::{GANGUE_TABLE, OVERBURDEN_TABLE};
use crate::rules::{biomass, overburden, overrides, soil, GapFillReport, RuleContext};

/// What a run did and where it put things
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub report: GapFillReport,
    /// False when any table entry, operation or category name matched nothing
    pub names_resolved: bool,
    pub artifact_dir: PathBuf,
    pub archive: PathBuf,
    pub factor_count: usize,
    pub imported: bool,
    /// Diagnostic CSVs, written only in analysis mode
    pub reports: Vec<PathBuf>,
}

/// Apply every gap-filling rule in order and collect what they observed.
pub fn gap_fill(
    store: &mut dyn InventoryStore,
    ctx: &RuleContext<'_>,
    closure: &MiningClosure,
) -> Result<GapFillReport, IntensityError> {
    let mut report = GapFillReport::default();

    report.absorb("overburden", overburden::consolidate(store, ctx)?);
    report.absorb(
        "overburden table",
        overrides::apply_table(
            store,
            ctx,
            "overburden",
            OVERBURDEN_TABLE,
            &ctx.flows.overburden,
            ExternalFlag::Overwrite,
        )?,
    );
    report.absorb(
        "gangue table",
        overrides::apply_table(store, ctx, "gangue", GANGUE_TABLE, &ctx.flows.gangue, ExternalFlag::KeepExisting)?,
    );

    let (outcome, missing) = flag_missing(store, ctx, closure)?;
    report.absorb("missing flags", outcome);
    report.missing_overburden = missing.overburden;
    report.missing_gangue = missing.gangue;
    report.missing_outside = missing.outside;

    report.absorb("category check", biomass::check_categories(&store.categories()?));
    report.absorb("biomass crops", biomass::fill_crops(store, ctx)?);
    report.absorb("biomass forestry", biomass::fill_forestry(store, ctx)?);
    report.absorb("biomass remaining", biomass::fill_remaining(store, ctx)?);
    report.absorb("biomass unused", biomass::fill_unused(store, ctx)?);
    report.absorb("soil tillage", soil::fill_tillage(store, ctx)?);
    report.absorb("soil compacting", soil::fill_compacting(store, ctx)?);

    for (rule, counts) in &report.counts {
        info!(
            rule = %rule,
            inserted = counts.inserted,
            updated = counts.updated,
            unchanged = counts.unchanged,
            "Rule applied"
        );
    }
    Ok(report)
}

/// Run the whole pipeline against `store`, writing artifacts below `data_root`.
///
/// Mutations persist as each rule goes; a failure part-way leaves the
/// earlier rules' writes in place and a rerun converges.
pub fn run(store: &mut dyn InventoryStore, config: &Config, data_root: &Path) -> Result<RunSummary, IntensityError> {
    let flows: SyntheticFlows = FlowRegistry::bootstrap(store)?;
    let ctx = RuleContext {
        flows: &flows,
        policy: config.match_policy,
        flag_external: config.analysis,
    };
    let closure = MiningClosure::build(&store.categories()?);
    info!(categories = closure.len(), "Mining categories resolved");

    let report = gap_fill(store, &ctx, &closure)?;
    let names_resolved = report.names_resolved();
    if !names_resolved {
        warn!(
            unresolved = report.unresolved.len(),
            "Some names were not found; the name and location catalog may not fit this database"
        );
    }

    let observed = ObservedAmounts::collect(&store.processes()?, &closure, &flows.gangue.name);
    let classification = Classifier::new(config.analysis).classify(&store.flows()?, &observed);

    let artifact = method::assemble(&classification, &MethodOptions::new(config.method_name.clone()));
    let artifact_dir = artifact.write_dir(&method::artifact_dir(data_root, &config.database_name))?;
    let archive = method::archive(&artifact_dir)?;

    if config.import {
        method::import_archive(store, &archive)?;
    }

    let reports = if config.analysis {
        write_missing_csvs(&method::output_dir(data_root), &report)?
    } else {
        Vec::new()
    };

    Ok(RunSummary {
        names_resolved,
        artifact_dir,
        archive,
        factor_count: artifact.factor_count(),
        imported: config.import,
        reports,
        report,
    })
}
