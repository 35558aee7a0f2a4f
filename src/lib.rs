//! Material Intensity - gap-filling and LCIA method builder
//!
//! Completes a life-cycle inventory database with the physical quantities a
//! Material-Footprint/MIPS indicator needs, then classifies its elementary
//! flows into the Material Intensity impact categories and packages them as
//! an importable method.
//!
//! ## Run
//!
//! 1. Bootstrap the nine synthetic flows from template flows ([`registry`])
//! 2. Gap-fill overburden, gangue, biomass and soil exchanges ([`rules`])
//! 3. Classify flows into impact categories ([`classifier`])
//! 4. Write, zip and import the method artifact ([`method`])
//! 5. Optionally export diagnostic CSVs ([`report`])
//!
//! ## Output Layout
//!
//! ```text
//! <data root>/Material Intensity/
//! ├── Material Intensity METHOD_<database>/
//! │   ├── lcia_methods/<method id>.json
//! │   └── lcia_categories/<category id>.json
//! ├── Material Intensity METHOD_<database>.zip
//! └── missing_*.csv          # analysis mode only
//! ```

pub mod classifier;
pub mod config;
pub mod db;
pub mod discovery;
pub mod error;
pub mod method;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod stats;

pub use classifier::{Classification, Classifier, ImpactCategoryKind, ObservedAmounts};
pub use config::Config;
pub use db::{InventoryDb, InventoryStore};
pub use discovery::find_data_root;
pub use error::IntensityError;
pub use method::{assemble, MethodArtifact, MethodOptions};
pub use model::{Category, Exchange, Flow, FlowType, ImpactMethodRecord, Process, ReferenceProperty};
pub use pipeline::{run, RunSummary};
pub use registry::{FlowRegistry, SyntheticFlows};
pub use resolver::{set_or_insert, Upsert};
pub use rules::{GapFillReport, MatchPolicy, RuleContext};
