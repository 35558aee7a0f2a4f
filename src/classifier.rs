//! Category classifier
//!
//! Partitions the gap-filled flow inventory into the Material Intensity
//! impact categories. Every category is a predicate over flows plus a
//! characterization factor; the result is rebuilt from scratch each run.

use serde::Serialize;
use tracing::{info, warn};

use crate::model::{Flow, Process, ReferenceProperty};
use crate::registry::{
    BIOMASS_UNUSED, BIOMASS_USED, FLAG_EXTERNAL_DATA, FLAG_MISSING_GANGUE, FLAG_MISSING_OVERBURDEN, OVERBURDEN,
    SOIL_COMPACTED, SOIL_ERODED, SOIL_MOVED,
};
use crate::rules::missing::{MiningBranch, MiningClosure};
use crate::stats::median;

/// Impact categories of the method, in artifact order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImpactCategoryKind {
    AbioticRmi,
    AbioticTmr,
    BioticRmi,
    BioticTmr,
    Water,
    MovedSoil,
    EstimateMissingAbiotic,
    FlagExternalData,
}

impl ImpactCategoryKind {
    pub const ALL: [ImpactCategoryKind; 8] = [
        Self::AbioticRmi,
        Self::AbioticTmr,
        Self::BioticRmi,
        Self::BioticTmr,
        Self::Water,
        Self::MovedSoil,
        Self::EstimateMissingAbiotic,
        Self::FlagExternalData,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AbioticRmi => "Abiotic RMI",
            Self::AbioticTmr => "Abiotic TMR",
            Self::BioticRmi => "Biotic RMI",
            Self::BioticTmr => "Biotic TMR",
            Self::Water => "Water",
            Self::MovedSoil => "Moved Soil",
            Self::EstimateMissingAbiotic => "ESTIMATE MISSING ABIOTIC",
            Self::FlagExternalData => "FLAG EXTERNAL DATA",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::AbioticRmi => "90768cd8-9b26-11ee-b9d1-0242ac120002",
            Self::AbioticTmr => "0e79d9c7-8add-4a23-a25e-1f55a4e82d2d",
            Self::BioticRmi => "90768f6c-9b26-11ee-b9d1-0242ac120002",
            Self::BioticTmr => "3d2d5656-2e3e-4453-8003-c3d485356045",
            Self::Water => "8f07827d-72c0-4ae7-a708-a18e684b3f54",
            Self::MovedSoil => "68be8652-dba7-443e-b439-c57d058f0388",
            Self::EstimateMissingAbiotic => "cd9a353b-371c-4aa9-bdec-89e98891d5dd",
            Self::FlagExternalData => "edeb416b-5d59-4524-95dc-9c0a9261c0d0",
        }
    }

    /// Categories that only exist to size data gaps
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::EstimateMissingAbiotic | Self::FlagExternalData)
    }
}

/// One flow in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRecord {
    pub flow_id: String,
    pub flow_name: String,
    pub category_path: Vec<String>,
    /// Unit the factor refers to: `kg`, `MJ` or `m3`
    pub unit: String,
    pub value: f64,
}

impl FactorRecord {
    fn new(flow: &Flow, unit: &str, value: f64) -> Self {
        Self {
            flow_id: flow.id.clone(),
            flow_name: flow.name.clone(),
            category_path: flow.category.clone(),
            unit: unit.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub kind: ImpactCategoryKind,
    pub factors: Vec<FactorRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub buckets: Vec<CategoryBucket>,
}

impl Classification {
    pub fn get(&self, kind: ImpactCategoryKind) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|b| b.kind == kind)
    }

    pub fn flow_ids(&self, kind: ImpactCategoryKind) -> Vec<&str> {
        self.get(kind)
            .map(|b| b.factors.iter().map(|f| f.flow_id.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Overburden and gangue amounts actually recorded by coal and ore mining
#[derive(Debug, Clone, Default)]
pub struct ObservedAmounts {
    pub overburden: Vec<f64>,
    pub gangue: Vec<f64>,
}

impl ObservedAmounts {
    pub fn collect(processes: &[Process], closure: &MiningClosure, gangue_name: &str) -> Self {
        let mut observed = Self::default();
        for process in processes {
            if !matches!(closure.branch_of(process), Some(MiningBranch::Coal | MiningBranch::MetalOres)) {
                continue;
            }
            for exchange in &process.exchanges {
                if exchange.flow.name == gangue_name {
                    observed.gangue.push(exchange.amount);
                }
                if exchange.flow.name == OVERBURDEN {
                    observed.overburden.push(exchange.amount);
                }
            }
        }
        observed
    }
}

fn in_ground(flow: &Flow) -> bool {
    flow.category_leaf() == "in ground"
}

fn abiotic_rmi(flow: &Flow) -> bool {
    abiotic_tmr(flow) && !flow.name.contains(OVERBURDEN)
}

fn abiotic_tmr(flow: &Flow) -> bool {
    in_ground(flow) && flow.property == ReferenceProperty::Mass && !flow.name.contains("Soil,")
}

fn biotic_rmi(flow: &Flow) -> bool {
    flow.name == BIOMASS_USED || flow.name.contains("Fish,")
}

fn biotic_tmr(flow: &Flow) -> bool {
    biotic_rmi(flow) || flow.name == BIOMASS_UNUSED
}

/// Unit and factor of a water flow, `None` if it is not one
fn water(flow: &Flow) -> Option<(&'static str, f64)> {
    let leaf = flow.category_leaf();
    if leaf != "in water" && leaf != "in ground" {
        return None;
    }
    if !flow.name.contains("Water,") || flow.name.contains("turbine") || flow.name.contains("salt") {
        return None;
    }
    match flow.property {
        ReferenceProperty::Mass => Some(("kg", 1.0)),
        ReferenceProperty::Volume => Some(("m3", 1000.0)),
        _ => None,
    }
}

fn moved_soil(flow: &Flow) -> bool {
    in_ground(flow) && [SOIL_MOVED, SOIL_COMPACTED, SOIL_ERODED].contains(&flow.name.as_str())
}

pub struct Classifier {
    analysis: bool,
}

impl Classifier {
    /// `analysis` adds the two diagnostic categories
    pub fn new(analysis: bool) -> Self {
        Self { analysis }
    }

    pub fn kinds(&self) -> Vec<ImpactCategoryKind> {
        ImpactCategoryKind::ALL
            .into_iter()
            .filter(|k| self.analysis || !k.is_diagnostic())
            .collect()
    }

    pub fn classify(&self, flows: &[Flow], observed: &ObservedAmounts) -> Classification {
        let buckets: Vec<CategoryBucket> = self
            .kinds()
            .into_iter()
            .map(|kind| CategoryBucket {
                kind,
                factors: Self::factors(kind, flows, observed),
            })
            .collect();

        for bucket in &buckets {
            info!(category = bucket.kind.name(), flows = bucket.factors.len(), "Category classified");
        }
        Classification { buckets }
    }

    fn factors(kind: ImpactCategoryKind, flows: &[Flow], observed: &ObservedAmounts) -> Vec<FactorRecord> {
        let unit_factor = |pred: fn(&Flow) -> bool| -> Vec<FactorRecord> {
            flows
                .iter()
                .filter(|f| pred(f))
                .map(|f| FactorRecord::new(f, "kg", 1.0))
                .collect()
        };

        match kind {
            ImpactCategoryKind::AbioticRmi => unit_factor(abiotic_rmi),
            ImpactCategoryKind::AbioticTmr => unit_factor(abiotic_tmr),
            ImpactCategoryKind::BioticRmi => unit_factor(biotic_rmi),
            ImpactCategoryKind::BioticTmr => unit_factor(biotic_tmr),
            ImpactCategoryKind::MovedSoil => unit_factor(moved_soil),
            ImpactCategoryKind::FlagExternalData => unit_factor(|f| f.name == FLAG_EXTERNAL_DATA),
            ImpactCategoryKind::Water => flows
                .iter()
                .filter_map(|f| water(f).map(|(unit, value)| FactorRecord::new(f, unit, value)))
                .collect(),
            ImpactCategoryKind::EstimateMissingAbiotic => {
                let mut records = Vec::new();
                for flow in flows {
                    let amounts = match flow.name.as_str() {
                        FLAG_MISSING_OVERBURDEN => &observed.overburden,
                        FLAG_MISSING_GANGUE => &observed.gangue,
                        _ => continue,
                    };
                    match median(amounts) {
                        Some(value) => records.push(FactorRecord::new(flow, "kg", value)),
                        None => warn!(flow = %flow.name, "No observed amounts, factor omitted"),
                    }
                }
                records
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlowType;

    fn flow(id: &str, name: &str, leaf: &str, property: ReferenceProperty, unit: &str) -> Flow {
        Flow {
            id: id.to_string(),
            name: name.to_string(),
            category: vec!["Elementary flows".into(), "Resource".into(), leaf.into()],
            property,
            unit: unit.to_string(),
            flow_type: FlowType::ElementaryFlow,
        }
    }

    fn inventory() -> Vec<Flow> {
        use ReferenceProperty::*;
        vec![
            flow("fe", "Iron", "in ground", Mass, "kg"),
            flow("g", "Gangue", "in ground", Mass, "kg"),
            flow("ov", OVERBURDEN, "in ground", Mass, "kg"),
            flow("sm", SOIL_MOVED, "in ground", Mass, "kg"),
            flow("sc", SOIL_COMPACTED, "in ground", Mass, "kg"),
            flow("se", SOIL_ERODED, "in ground", Mass, "kg"),
            flow("gas", "Gas, natural", "in ground", Volume, "m3"),
            flow("bu", BIOMASS_USED, "biotic", Mass, "kg"),
            flow("bx", BIOMASS_UNUSED, "biotic", Mass, "kg"),
            flow("fish", "Fish, pelagic, in ocean", "biotic", Mass, "kg"),
            flow("wr", "Water, river", "in water", Volume, "m3"),
            flow("ww", "Water, well, in ground", "in ground", Mass, "kg"),
            flow("wt", "Water, cooling, turbine", "in water", Volume, "m3"),
            flow("ws", "Water, salt, ocean", "in water", Volume, "m3"),
            flow("fmo", FLAG_MISSING_OVERBURDEN, "unspecified", Mass, "kg"),
            flow("fmg", FLAG_MISSING_GANGUE, "unspecified", Mass, "kg"),
            flow("fx", FLAG_EXTERNAL_DATA, "unspecified", Mass, "kg"),
        ]
    }

    fn observed() -> ObservedAmounts {
        ObservedAmounts {
            overburden: vec![5.0, 1.0, 3.0],
            gangue: vec![],
        }
    }

    #[test]
    fn test_tmr_contains_rmi() {
        let classification = Classifier::new(true).classify(&inventory(), &observed());
        for (rmi, tmr) in [
            (ImpactCategoryKind::AbioticRmi, ImpactCategoryKind::AbioticTmr),
            (ImpactCategoryKind::BioticRmi, ImpactCategoryKind::BioticTmr),
        ] {
            let tmr_ids = classification.flow_ids(tmr);
            for id in classification.flow_ids(rmi) {
                assert!(tmr_ids.contains(&id), "{} missing from {:?}", id, tmr);
            }
        }

        assert_eq!(classification.flow_ids(ImpactCategoryKind::AbioticRmi), vec!["fe", "g"]);
        assert_eq!(classification.flow_ids(ImpactCategoryKind::AbioticTmr), vec!["fe", "g", "ov"]);
        assert_eq!(classification.flow_ids(ImpactCategoryKind::BioticRmi), vec!["bu", "fish"]);
        assert_eq!(classification.flow_ids(ImpactCategoryKind::BioticTmr), vec!["bu", "bx", "fish"]);
        assert_eq!(classification.flow_ids(ImpactCategoryKind::MovedSoil), vec!["sm", "sc", "se"]);
    }

    #[test]
    fn test_water_units_and_exclusions() {
        let classification = Classifier::new(false).classify(&inventory(), &observed());
        let water = classification.get(ImpactCategoryKind::Water).unwrap();
        let ids: Vec<&str> = water.factors.iter().map(|f| f.flow_id.as_str()).collect();
        assert_eq!(ids, vec!["wr", "ww"]);

        assert_eq!(water.factors[0].unit, "m3");
        assert_eq!(water.factors[0].value, 1000.0);
        assert_eq!(water.factors[1].unit, "kg");
        assert_eq!(water.factors[1].value, 1.0);
        assert!(!ids.contains(&"wt"));
    }

    #[test]
    fn test_diagnostics_only_with_analysis() {
        let regular = Classifier::new(false).classify(&inventory(), &observed());
        assert_eq!(regular.buckets.len(), 6);
        assert!(regular.get(ImpactCategoryKind::FlagExternalData).is_none());

        let full = Classifier::new(true).classify(&inventory(), &observed());
        assert_eq!(full.buckets.len(), 8);
        let missing = full.get(ImpactCategoryKind::EstimateMissingAbiotic).unwrap();
        // no observed gangue, so only the overburden flag gets a factor
        assert_eq!(missing.factors.len(), 1);
        assert_eq!(missing.factors[0].flow_id, "fmo");
        assert_eq!(missing.factors[0].value, 3.0);
        assert_eq!(full.flow_ids(ImpactCategoryKind::FlagExternalData), vec!["fx"]);
    }

    #[test]
    fn test_category_ids_are_distinct() {
        let mut ids: Vec<&str> = ImpactCategoryKind::ALL.iter().map(|k| k.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
