//! Flow registry
//!
//! Makes sure the nine synthetic elementary flows the method relies on exist
//! exactly once. Missing flows are created from a template flow's
//! classification (category, property, unit) under a fixed reference id, so
//! repeated runs against the same database never introduce aliases.

use tracing::info;

use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::model::{Flow, FlowClass};

pub const OVERBURDEN: &str = "Overburden";
pub const BIOMASS_USED: &str = "Biomass, used";
pub const BIOMASS_UNUSED: &str = "Biomass, unused";
pub const SOIL_MOVED: &str = "Soil, moved";
pub const SOIL_COMPACTED: &str = "Soil, compacted";
/// Spelling matches flows already created in existing databases.
pub const SOIL_ERODED: &str = "Soil, erodet";
pub const FLAG_MISSING_OVERBURDEN: &str = "flag missing overburden";
pub const FLAG_MISSING_GANGUE: &str = "flag missing gangue";
pub const FLAG_EXTERNAL_DATA: &str = "flag external data";

/// Which template a synthetic flow is cloned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    /// `Resource/in ground` mass flow (the gangue flow)
    Ground,
    /// `Resource/biotic` flow measured in kg
    Biotic,
    /// `Resource/unspecified` flow measured in kg
    Unspecified,
}

/// Name, fixed reference id and template of every synthetic flow
pub const SYNTHETIC_FLOWS: [(&str, &str, TemplateRole); 9] = [
    (OVERBURDEN, "8711a380-e9dc-4bbf-be2b-91d243a8e39d", TemplateRole::Ground),
    (BIOMASS_USED, "9442f771-1473-40d6-8dab-8ffbb94fec1d", TemplateRole::Biotic),
    (BIOMASS_UNUSED, "bfb3e97d-cb6b-4f02-867c-e8908601a8f3", TemplateRole::Biotic),
    (SOIL_MOVED, "676ab17e-7679-42b1-8095-76fe2340e14b", TemplateRole::Ground),
    (SOIL_COMPACTED, "1755461b-ad4c-4a02-a7b0-67efe5bc053f", TemplateRole::Ground),
    (SOIL_ERODED, "5cb88e58-b1e2-4b10-a055-c9870eb375e7", TemplateRole::Ground),
    (FLAG_MISSING_OVERBURDEN, "1994dbda-47ff-4dba-9f5b-f28f84b15b30", TemplateRole::Unspecified),
    (FLAG_MISSING_GANGUE, "8f27c4a2-a8d2-45e5-b15b-d2af5ef0447e", TemplateRole::Unspecified),
    (FLAG_EXTERNAL_DATA, "db01c0ff-a5ca-454a-8834-0595e7b59814", TemplateRole::Unspecified),
];

/// The template flows located in the inventory
#[derive(Debug, Clone)]
pub struct Templates {
    /// Gangue doubles as the `in ground` template
    pub gangue: Flow,
    pub biotic: FlowClass,
    pub unspecified: FlowClass,
}

impl Templates {
    /// Locate all templates, failing before any mutation if one is absent.
    pub fn locate(flows: &[Flow]) -> Result<Self, IntensityError> {
        let gangue = flows
            .iter()
            .find(|f| f.name == "Gangue")
            .or_else(|| {
                flows
                    .iter()
                    .rev()
                    .find(|f| f.name.contains("Gangue") && !f.name.contains("bauxite"))
            })
            .cloned()
            .ok_or_else(|| IntensityError::MissingTemplate {
                role: "in ground".to_string(),
                criteria: "a flow named like 'Gangue' (not bauxite)".to_string(),
            })?;

        let biotic = resource_template(flows, "biotic")?;
        let unspecified = resource_template(flows, "unspecified")?;

        Ok(Self {
            gangue,
            biotic,
            unspecified,
        })
    }

    pub fn class_for(&self, role: TemplateRole) -> FlowClass {
        match role {
            TemplateRole::Ground => self.gangue.class(),
            TemplateRole::Biotic => self.biotic.clone(),
            TemplateRole::Unspecified => self.unspecified.clone(),
        }
    }
}

fn resource_template(flows: &[Flow], leaf: &str) -> Result<FlowClass, IntensityError> {
    flows
        .iter()
        .rev()
        .find(|f| f.category_leaf() == leaf && f.category_parent() == Some("Resource") && f.unit == "kg")
        .map(Flow::class)
        .ok_or_else(|| IntensityError::MissingTemplate {
            role: leaf.to_string(),
            criteria: format!("a 'Resource/{}' flow measured in kg", leaf),
        })
}

/// Return the flow called `name`, creating it from `class` under `id` if absent.
pub fn ensure_flow(
    store: &mut dyn InventoryStore,
    name: &str,
    class: &FlowClass,
    id: &str,
) -> Result<Flow, IntensityError> {
    if let Some(existing) = store.flows_for_name(name)?.into_iter().next() {
        return Ok(existing);
    }

    let flow = Flow::with_class(id, name, class.clone());
    store.insert_flow(&flow)?;
    info!(flow = %name, id = %id, "Created synthetic flow");
    Ok(flow)
}

/// Synthetic flows plus the gangue flow, resolved once per run
#[derive(Debug, Clone)]
pub struct SyntheticFlows {
    pub gangue: Flow,
    pub overburden: Flow,
    pub biomass_used: Flow,
    pub biomass_unused: Flow,
    pub soil_moved: Flow,
    pub soil_compacted: Flow,
    pub soil_eroded: Flow,
    pub flag_missing_overburden: Flow,
    pub flag_missing_gangue: Flow,
    pub flag_external_data: Flow,
}

pub struct FlowRegistry;

impl FlowRegistry {
    /// Locate templates and ensure every synthetic flow exists.
    pub fn bootstrap(store: &mut dyn InventoryStore) -> Result<SyntheticFlows, IntensityError> {
        let templates = Templates::locate(&store.flows()?)?;

        let mut created = Vec::with_capacity(SYNTHETIC_FLOWS.len());
        for (name, id, role) in SYNTHETIC_FLOWS {
            created.push(ensure_flow(store, name, &templates.class_for(role), id)?);
        }

        let mut flows = created.into_iter();
        let mut next = || {
            flows
                .next()
                .ok_or_else(|| IntensityError::Internal("synthetic flow list exhausted".to_string()))
        };

        Ok(SyntheticFlows {
            gangue: templates.gangue.clone(),
            overburden: next()?,
            biomass_used: next()?,
            biomass_unused: next()?,
            soil_moved: next()?,
            soil_compacted: next()?,
            soil_eroded: next()?,
            flag_missing_overburden: next()?,
            flag_missing_gangue: next()?,
            flag_external_data: next()?,
        })
    }
}
