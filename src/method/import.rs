//! Importer for zipped method artifacts

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::artifact::{CategoryDocument, MethodDocument, CATEGORIES_DIR, METHODS_DIR};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{ImpactCategoryRecord, ImpactFactorRecord, ImpactMethodRecord};

/// Files of an archive keyed by normalized entry name
fn extract_zip(path: &Path) -> Result<HashMap<String, Vec<u8>>, IntensityError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut files = HashMap::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().trim_start_matches('/').to_string();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        files.insert(name, contents);
    }

    Ok(files)
}

fn to_record(method: MethodDocument, categories: &HashMap<String, CategoryDocument>) -> Result<ImpactMethodRecord, IntensityError> {
    let mut records = Vec::with_capacity(method.impact_categories.len());

    for stub in &method.impact_categories {
        let doc = categories.get(&stub.id).ok_or_else(|| {
            IntensityError::InvalidArtifact(format!("category {} ({}) has no document", stub.name, stub.id))
        })?;

        records.push(ImpactCategoryRecord {
            id: doc.id.clone(),
            name: doc.name.clone(),
            reference_unit: doc.reference_unit_name.clone(),
            factors: doc
                .impact_factors
                .iter()
                .map(|f| ImpactFactorRecord {
                    flow_id: f.flow.id.clone(),
                    value: f.value,
                    unit: f
                        .unit
                        .as_ref()
                        .map(|u| u.name.clone())
                        .unwrap_or_else(|| f.flow.ref_unit.clone()),
                })
                .collect(),
        });
    }

    Ok(ImpactMethodRecord {
        id: method.id,
        name: method.name,
        version: method.version,
        categories: records,
    })
}

/// Materialize every method in the archive, replacing stored methods that
/// share its name or id.
pub fn import_archive(store: &mut dyn InventoryStore, path: &Path) -> Result<Vec<ImpactMethodRecord>, IntensityError> {
    let files = extract_zip(path)?;

    let mut methods = Vec::new();
    let mut categories = HashMap::new();
    for (name, bytes) in &files {
        let Some((dir, file)) = name.split_once('/') else {
            warn!(entry = %name, "Ignoring archive entry outside the method folders");
            continue;
        };
        if !file.ends_with(".json") {
            continue;
        }
        match dir {
            METHODS_DIR => methods.push(serde_json::from_slice::<MethodDocument>(bytes)?),
            CATEGORIES_DIR => {
                let doc: CategoryDocument = serde_json::from_slice(bytes)?;
                categories.insert(doc.id.clone(), doc);
            }
            _ => warn!(entry = %name, "Ignoring archive entry outside the method folders"),
        }
    }

    if methods.is_empty() {
        return Err(IntensityError::InvalidArtifact(format!(
            "{} contains no {} document",
            path.display(),
            METHODS_DIR
        )));
    }
    methods.sort_by(|a, b| a.id.cmp(&b.id));

    let mut imported = Vec::with_capacity(methods.len());
    for method in methods {
        let record = to_record(method, &categories)?;

        for existing in store.impact_methods()? {
            if existing.name == record.name || existing.id == record.id {
                store.delete_impact_method(&existing.id)?;
                info!(method = %existing.name, id = %existing.id, "Replaced existing impact method");
            }
        }

        store.insert_impact_method(&record)?;
        info!(
            method = %record.name,
            categories = record.categories.len(),
            factors = record.categories.iter().map(|c| c.factors.len()).sum::<usize>(),
            "Impact method imported"
        );
        imported.push(record);
    }

    Ok(imported)
}
