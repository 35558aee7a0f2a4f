//! JSON documents of the method artifact (olca-schema layout)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntensityError;

pub const SCHEMA_CONTEXT: &str = "http://greendelta.github.io/olca-schema/context.jsonld";
pub const METHODS_DIR: &str = "lcia_methods";
pub const CATEGORIES_DIR: &str = "lcia_categories";

/// Typed reference to a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRef {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPropertyRef {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub category_path: Vec<String>,
}

/// Unit and flow property for a factor unit name; `None` for unknown units
pub fn unit_refs(unit: &str) -> Option<(UnitRef, FlowPropertyRef)> {
    let (unit_id, property_id, property) = match unit {
        "kg" => (
            "20aadc24-a391-41cf-b340-3e4529f44bde",
            "93a60a56-a3c8-11da-a746-0800200b9a66",
            "Mass",
        ),
        "MJ" => (
            "52765a6c-3896-43c2-b2f4-c679acf13efe",
            "f6811440-ee37-11de-8a39-0800200c9a66",
            "Energy",
        ),
        "m3" => (
            "1c3a9695-398d-4b1f-b07e-a8715b610f70",
            "93a60a56-a3c8-22da-a746-0800200c9a66",
            "Volume",
        ),
        _ => return None,
    };

    Some((
        UnitRef {
            kind: "Unit".to_string(),
            id: unit_id.to_string(),
            name: unit.to_string(),
        },
        FlowPropertyRef {
            kind: "FlowProperty".to_string(),
            id: property_id.to_string(),
            name: property.to_string(),
            category_path: vec!["Technical flow properties".to_string()],
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDescriptor {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub category_path: Vec<String>,
    pub flow_type: String,
    pub ref_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactFactorDocument {
    #[serde(rename = "@type")]
    pub kind: String,
    pub value: f64,
    pub flow: FlowDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_property: Option<FlowPropertyRef>,
}

/// Category stub listed inside the method document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStub {
    #[serde(rename = "@type")]
    pub kind: String,
    pub category: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub ref_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDocument {
    #[serde(rename = "@type")]
    pub kind: String,
    pub category: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub version: String,
    pub impact_categories: Vec<CategoryStub>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub category: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub version: String,
    pub last_change: String,
    pub reference_unit_name: String,
    pub impact_factors: Vec<ImpactFactorDocument>,
}

/// Method document plus one document per category
#[derive(Debug, Clone, PartialEq)]
pub struct MethodArtifact {
    pub method: MethodDocument,
    pub categories: Vec<CategoryDocument>,
}

impl MethodArtifact {
    /// Write `lcia_methods/<id>.json` and `lcia_categories/<id>.json` under `dir`.
    ///
    /// Existing files with the same ids are overwritten; the directory is
    /// created if needed.
    pub fn write_dir(&self, dir: &Path) -> Result<PathBuf, IntensityError> {
        let methods = dir.join(METHODS_DIR);
        let categories = dir.join(CATEGORIES_DIR);
        fs::create_dir_all(&methods)?;
        fs::create_dir_all(&categories)?;

        let path = methods.join(format!("{}.json", self.method.id));
        fs::write(&path, serde_json::to_vec_pretty(&self.method)?)?;

        for category in &self.categories {
            let path = categories.join(format!("{}.json", category.id));
            fs::write(&path, serde_json::to_vec_pretty(category)?)?;
            debug!(category = %category.name, factors = category.impact_factors.len(), "Category written");
        }

        Ok(dir.to_path_buf())
    }

    pub fn factor_count(&self) -> usize {
        self.categories.iter().map(|c| c.impact_factors.len()).sum()
    }
}
