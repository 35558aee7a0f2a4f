//! Method assembler
//!
//! Turns a [`Classification`] into the portable method artifact: a directory
//! of olca-schema JSON documents, zipped for the host importer. The importer
//! reads the archive back into an [`crate::db::InventoryStore`].

pub mod archive;
pub mod artifact;
pub mod import;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::classifier::Classification;
pub use archive::archive;
pub use artifact::{
    unit_refs, CategoryDocument, CategoryStub, FlowDescriptor, ImpactFactorDocument, MethodArtifact, MethodDocument,
};
pub use import::import_archive;

pub const METHOD_ID: &str = "56c9a436-2c1d-4ead-87d5-17ac168b0191";
pub const METHOD_VERSION: &str = "1.0";
/// Folder the method and its categories are filed under
pub const METHOD_CATEGORY: &str = "Material Intensity";
pub const DEFAULT_METHOD_NAME: &str = "Material Intensity";
pub const REFERENCE_UNIT: &str = "kg";

#[derive(Debug, Clone)]
pub struct MethodOptions {
    pub name: String,
    pub last_change: DateTime<Utc>,
}

impl MethodOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_change: Utc::now(),
        }
    }
}

impl Default for MethodOptions {
    fn default() -> Self {
        Self::new(DEFAULT_METHOD_NAME)
    }
}

/// Build the method artifact. Only strictly positive factors are kept.
pub fn assemble(classification: &Classification, options: &MethodOptions) -> MethodArtifact {
    let last_change = options.last_change.to_rfc3339_opts(SecondsFormat::Millis, false);
    let mut stubs = Vec::with_capacity(classification.buckets.len());
    let mut categories = Vec::with_capacity(classification.buckets.len());

    for bucket in &classification.buckets {
        let kind = bucket.kind;
        stubs.push(CategoryStub {
            kind: "ImpactCategory".to_string(),
            category: METHOD_CATEGORY.to_string(),
            id: kind.id().to_string(),
            name: kind.name().to_string(),
            ref_unit: REFERENCE_UNIT.to_string(),
        });

        let impact_factors: Vec<ImpactFactorDocument> = bucket
            .factors
            .iter()
            .filter(|f| f.value > 0.0)
            .map(|f| {
                let refs = unit_refs(&f.unit);
                ImpactFactorDocument {
                    kind: "ImpactFactor".to_string(),
                    value: f.value,
                    flow: FlowDescriptor {
                        kind: "Flow".to_string(),
                        id: f.flow_id.clone(),
                        name: f.flow_name.clone(),
                        category_path: f.category_path.clone(),
                        flow_type: "ELEMENTARY_FLOW".to_string(),
                        ref_unit: f.unit.clone(),
                    },
                    unit: refs.as_ref().map(|(u, _)| u.clone()),
                    flow_property: refs.map(|(_, p)| p),
                }
            })
            .collect();

        let dropped = bucket.factors.len() - impact_factors.len();
        if dropped > 0 {
            info!(category = kind.name(), dropped, "Non-positive factors left out");
        }

        categories.push(CategoryDocument {
            context: artifact::SCHEMA_CONTEXT.to_string(),
            kind: "ImpactCategory".to_string(),
            category: METHOD_CATEGORY.to_string(),
            id: kind.id().to_string(),
            name: kind.name().to_string(),
            version: METHOD_VERSION.to_string(),
            last_change: last_change.clone(),
            reference_unit_name: REFERENCE_UNIT.to_string(),
            impact_factors,
        });
    }

    MethodArtifact {
        method: MethodDocument {
            kind: "ImpactMethod".to_string(),
            category: METHOD_CATEGORY.to_string(),
            id: METHOD_ID.to_string(),
            name: options.name.clone(),
            version: METHOD_VERSION.to_string(),
            impact_categories: stubs,
        },
        categories,
    }
}

/// `<data_root>/Material Intensity/Material Intensity METHOD_<database>`
pub fn artifact_dir(data_root: &Path, database_name: &str) -> PathBuf {
    output_dir(data_root).join(format!("Material Intensity METHOD_{}", database_name))
}

/// Folder holding the artifact, its archive and the diagnostic reports
pub fn output_dir(data_root: &Path) -> PathBuf {
    data_root.join("Material Intensity")
}
