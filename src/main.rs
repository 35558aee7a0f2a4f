//! Material Intensity CLI
//!
//! ## Usage
//!
//! ```bash
//! # Discover the data folder below $HOME and process the default database
//! material-intensity
//!
//! # Explicit database file and data folder
//! material-intensity --db-path ./ei.db --data-root ./openLCA-data-1.4
//!
//! # Diagnostic categories, external-data flags and CSV reports
//! material-intensity --analysis
//! ```

use std::path::PathBuf;

use clap::Parser;
use material_intensity::{find_data_root, run, Config, InventoryDb, MatchPolicy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "material-intensity")]
#[command(about = "Gap-fill an inventory database and build the Material Intensity method")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "MATERIAL_INTENSITY_CONFIG")]
    config: Option<PathBuf>,

    /// Inventory database name
    #[arg(long, env = "MATERIAL_INTENSITY_DATABASE")]
    database: Option<String>,

    /// Inventory database file
    #[arg(long, env = "MATERIAL_INTENSITY_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Host data folder (skips discovery)
    #[arg(long, env = "MATERIAL_INTENSITY_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Add diagnostic categories, external-data flags and CSV reports
    #[arg(long)]
    analysis: bool,

    /// Do not import the method archive back into the database
    #[arg(long)]
    no_import: bool,

    /// How ambiguous process names are resolved
    #[arg(long, value_enum)]
    match_policy: Option<MatchPolicy>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("material_intensity=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(database) = args.database {
        config.database_name = database;
    }
    if let Some(path) = args.db_path {
        config.database_path = Some(path);
    }
    if let Some(root) = args.data_root {
        config.data_root = Some(root);
    }
    if args.analysis {
        config.analysis = true;
    }
    if args.no_import {
        config.import = false;
    }
    if let Some(policy) = args.match_policy {
        config.match_policy = policy;
    }

    let data_root = match &config.data_root {
        Some(root) => root.clone(),
        None => find_data_root(&config.discovery_start, &config.sentinel)?,
    };
    let db_path = config.database_file(&data_root);

    info!(
        database = %config.database_name,
        db_path = %db_path.display(),
        data_root = %data_root.display(),
        analysis = config.analysis,
        "Starting material-intensity"
    );

    let mut db = InventoryDb::open(&db_path)?;
    let summary = run(&mut db, &config, &data_root)?;

    info!(
        artifact = %summary.artifact_dir.display(),
        archive = %summary.archive.display(),
        factors = summary.factor_count,
        unresolved = summary.report.unresolved.len(),
        ambiguous = summary.report.ambiguous.len(),
        "Run finished"
    );

    println!("Version check: {}", summary.names_resolved);
    if summary.imported {
        println!("Material Intensity method created and imported");
    } else {
        println!("Material Intensity method created: {}", summary.archive.display());
    }
    Ok(())
}
