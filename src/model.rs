//! Inventory records: flows, processes, exchanges, categories, impact methods
//!
//! These mirror the entities of the host inventory database closely enough
//! for the gap-filling rules to read and rewrite them. Flows are referenced
//! from exchanges by a lightweight [`FlowRef`] that carries the name and
//! category path, because most rules match on those rather than on ids.

use serde::{Deserialize, Serialize};

/// Reference flow property of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceProperty {
    Mass,
    Energy,
    Volume,
    Area,
    Other,
}

impl ReferenceProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Energy => "energy",
            Self::Volume => "volume",
            Self::Area => "area",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "mass" => Self::Mass,
            "energy" => Self::Energy,
            "volume" => Self::Volume,
            "area" => Self::Area,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    ElementaryFlow,
    ProductFlow,
    WasteFlow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElementaryFlow => "ELEMENTARY_FLOW",
            Self::ProductFlow => "PRODUCT_FLOW",
            Self::WasteFlow => "WASTE_FLOW",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "PRODUCT_FLOW" => Self::ProductFlow,
            "WASTE_FLOW" => Self::WasteFlow,
            _ => Self::ElementaryFlow,
        }
    }
}

/// Classification triple shared by flows cloned from the same template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowClass {
    /// Hierarchical category, root first (e.g. `["Elementary flows", "Resource", "in ground"]`)
    pub category: Vec<String>,
    pub property: ReferenceProperty,
    pub unit: String,
    pub flow_type: FlowType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub name: String,
    pub category: Vec<String>,
    pub property: ReferenceProperty,
    /// Reference unit name (`kg`, `MJ`, `m3`, ...)
    pub unit: String,
    pub flow_type: FlowType,
}

impl Flow {
    /// Build a flow from an explicit classification plus identity fields.
    pub fn with_class(id: impl Into<String>, name: impl Into<String>, class: FlowClass) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: class.category,
            property: class.property,
            unit: class.unit,
            flow_type: class.flow_type,
        }
    }

    pub fn class(&self) -> FlowClass {
        FlowClass {
            category: self.category.clone(),
            property: self.property,
            unit: self.unit.clone(),
            flow_type: self.flow_type,
        }
    }

    /// Innermost category name, `""` when uncategorized
    pub fn category_leaf(&self) -> &str {
        self.category.last().map(String::as_str).unwrap_or("")
    }

    /// Name of the category directly above the leaf
    pub fn category_parent(&self) -> Option<&str> {
        let n = self.category.len();
        if n >= 2 {
            Some(self.category[n - 2].as_str())
        } else {
            None
        }
    }

    pub fn to_ref(&self) -> FlowRef {
        FlowRef {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
        }
    }
}

/// Flow as seen from an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRef {
    pub id: String,
    pub name: String,
    pub category: Vec<String>,
}

impl FlowRef {
    pub fn category_leaf(&self) -> &str {
        self.category.last().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Process-local identifier, unique within one process
    pub internal_id: u32,
    pub flow: FlowRef,
    pub is_input: bool,
    pub amount: f64,
    pub unit: String,
    /// Flow property the amount is expressed in (the flow's reference factor)
    pub property: ReferenceProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub name: String,
    /// Leaf category name, e.g. `0710:Mining of iron ores`
    pub category: Option<String>,
    pub location: Option<String>,
    /// Internal id of the exchange the process is normalized to
    pub quantitative_reference: Option<u32>,
    pub exchanges: Vec<Exchange>,
}

impl Process {
    pub fn is_market(&self) -> bool {
        self.name.contains("market")
    }

    pub fn is_treatment(&self) -> bool {
        self.name.contains("treatment")
    }

    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn location_name(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn reference_exchange(&self) -> Option<&Exchange> {
        let id = self.quantitative_reference?;
        self.exchanges.iter().find(|e| e.internal_id == id)
    }

    /// First input exchange whose flow carries exactly `flow_name`
    pub fn input_for(&self, flow_name: &str) -> Option<&Exchange> {
        self.exchanges
            .iter()
            .find(|e| e.is_input && e.flow.name == flow_name)
    }

    pub fn has_flow(&self, flow_name: &str) -> bool {
        self.exchanges.iter().any(|e| e.flow.name == flow_name)
    }

    pub fn max_internal_id(&self) -> u32 {
        self.exchanges.iter().map(|e| e.internal_id).max().unwrap_or(0)
    }
}

/// Node of the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactorRecord {
    pub flow_id: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCategoryRecord {
    pub id: String,
    pub name: String,
    pub reference_unit: String,
    pub factors: Vec<ImpactFactorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactMethodRecord {
    pub id: String,
    pub name: String,
    pub version: String,
    pub categories: Vec<ImpactCategoryRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(internal_id: u32, name: &str, is_input: bool) -> Exchange {
        Exchange {
            internal_id,
            flow: FlowRef {
                id: format!("id-{}", name),
                name: name.to_string(),
                category: vec!["Resource".to_string(), "in ground".to_string()],
            },
            is_input,
            amount: 1.0,
            unit: "kg".to_string(),
            property: ReferenceProperty::Mass,
        }
    }

    #[test]
    fn test_process_lookups() {
        let process = Process {
            id: "p1".to_string(),
            name: "market for gravel".to_string(),
            category: None,
            location: Some("Global".to_string()),
            quantitative_reference: Some(7),
            exchanges: vec![ex(3, "Gangue", false), ex(7, "gravel", false), ex(5, "Gangue", true)],
        };

        assert!(process.is_market());
        assert!(!process.is_treatment());
        assert_eq!(process.max_internal_id(), 7);
        assert_eq!(process.reference_exchange().unwrap().flow.name, "gravel");
        assert_eq!(process.input_for("Gangue").unwrap().internal_id, 5);
        assert_eq!(process.category_name(), "");
    }

    #[test]
    fn test_flow_category_helpers() {
        let flow = Flow {
            id: "f".to_string(),
            name: "Wood, hard".to_string(),
            category: vec!["Elementary flows".into(), "Resource".into(), "biotic".into()],
            property: ReferenceProperty::Volume,
            unit: "m3".to_string(),
            flow_type: FlowType::ElementaryFlow,
        };
        assert_eq!(flow.category_leaf(), "biotic");
        assert_eq!(flow.category_parent(), Some("Resource"));

        let clone = Flow::with_class("g", "Biomass, used", flow.class());
        assert_eq!(clone.category, flow.category);
        assert_eq!(clone.unit, "m3");
    }

    #[test]
    fn test_enum_round_trip_strings() {
        for p in [
            ReferenceProperty::Mass,
            ReferenceProperty::Energy,
            ReferenceProperty::Volume,
            ReferenceProperty::Area,
        ] {
            assert_eq!(ReferenceProperty::parse(p.as_str()), p);
        }
        assert_eq!(FlowType::parse("WASTE_FLOW"), FlowType::WasteFlow);
    }
}
