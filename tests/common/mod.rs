//! Small inventory used by the integration tests

#![allow(dead_code)]

use material_intensity::model::FlowRef;
use material_intensity::{Category, Exchange, Flow, FlowType, InventoryDb, InventoryStore, Process, ReferenceProperty};

pub const BAUXITE: &str = "bauxite mine operation | bauxite";
pub const BARITE: &str = "barite production | barite | Cutoff, S";
pub const NICKEL: &str = "nickel mine operation, sulfidic ore | nickel concentrate";
pub const SOFTWOOD: &str = "softwood forestry, pine, sustainable forest management | sawlog and veneer log";
pub const SAND: &str = "sand quarry operation | sand";

pub fn flow(id: &str, name: &str, category: &[&str], property: ReferenceProperty, unit: &str) -> Flow {
    Flow {
        id: id.to_string(),
        name: name.to_string(),
        category: category.iter().map(|s| s.to_string()).collect(),
        property,
        unit: unit.to_string(),
        flow_type: FlowType::ElementaryFlow,
    }
}

pub fn ground(id: &str, name: &str) -> Flow {
    flow(id, name, &["Elementary flows", "Resource", "in ground"], ReferenceProperty::Mass, "kg")
}

fn exchange(internal_id: u32, flow: &Flow, amount: f64, is_input: bool) -> Exchange {
    Exchange {
        internal_id,
        flow: FlowRef {
            id: flow.id.clone(),
            name: flow.name.clone(),
            category: flow.category.clone(),
        },
        is_input,
        amount,
        unit: flow.unit.clone(),
        property: flow.property,
    }
}

pub fn process(id: &str, name: &str, category: &str, location: &str, product: &Flow, inputs: &[(&Flow, f64)]) -> Process {
    let mut exchanges = vec![exchange(1, product, 1.0, false)];
    for (i, (flow, amount)) in inputs.iter().enumerate() {
        exchanges.push(exchange(i as u32 + 2, flow, *amount, true));
    }
    Process {
        id: id.to_string(),
        name: name.to_string(),
        category: Some(category.to_string()),
        location: Some(location.to_string()),
        quantitative_reference: Some(1),
        exchanges,
    }
}

fn category(id: &str, name: &str, parent: Option<&str>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent.map(str::to_string),
    }
}

/// Templates, a water flow, mining categories and one process per rule family
pub fn seeded() -> InventoryDb {
    let mut db = InventoryDb::open_in_memory().unwrap();

    let gangue = ground("gangue", "Gangue");
    let bauxite = ground("bauxite", "Bauxite");
    let barite = ground("barite", "Barite");
    let nickel = ground("nickel", "Nickel, 1.98% in silicates, 1.04% in crude ore");
    let sand = ground("sand", "Sand, unspecified");
    let energy = flow(
        "gcv",
        "Energy, gross calorific value, in biomass",
        &["Elementary flows", "Resource", "biotic"],
        ReferenceProperty::Energy,
        "MJ",
    );
    let wood = flow(
        "wood",
        "Wood, soft, standing",
        &["Elementary flows", "Resource", "biotic"],
        ReferenceProperty::Mass,
        "kg",
    );
    let peat = flow(
        "peat",
        "Peat",
        &["Elementary flows", "Resource", "unspecified"],
        ReferenceProperty::Mass,
        "kg",
    );
    let water = flow(
        "water",
        "Water, river",
        &["Elementary flows", "Resource", "in water"],
        ReferenceProperty::Volume,
        "m3",
    );
    let product = Flow {
        flow_type: FlowType::ProductFlow,
        ..flow("product", "product", &["Products"], ReferenceProperty::Mass, "kg")
    };

    for f in [&gangue, &bauxite, &barite, &nickel, &sand, &energy, &wood, &peat, &water, &product] {
        db.insert_flow(f).unwrap();
    }

    for c in [
        category("c07", "07:Mining of metal ores", None),
        category("c072", "072:Mining of non-ferrous metal ores", Some("c07")),
        category("c0729", "0729:Mining of other non-ferrous metal ores", Some("c072")),
        category("c08", "08:Other mining and quarrying", None),
        category("c0810", "0810:Quarrying of stone, sand and clay", Some("c08")),
        category("c0220", "0220:Logging", None),
    ] {
        db.insert_category(&c).unwrap();
    }

    for p in [
        process("p-bauxite", BAUXITE, "0729:Mining of other non-ferrous metal ores", "Global", &product, &[(&bauxite, 1.0)]),
        process("p-barite", BARITE, "0899:Other mining and quarrying n.e.c.", "Europe", &product, &[(&barite, 1.2)]),
        process("p-nickel", NICKEL, "0729:Mining of other non-ferrous metal ores", "Global", &product, &[(&nickel, 2.0)]),
        process("p-sand", SAND, "0810:Quarrying of stone, sand and clay", "CH", &product, &[(&sand, 1.0)]),
        process("p-wood", SOFTWOOD, "0220:Logging", "DE", &product, &[(&energy, 100.0), (&water, 0.1)]),
    ] {
        db.insert_process(&p).unwrap();
    }

    db
}

pub const COAL: &str = "hard coal mine operation | hard coal";
pub const PLOUGHING: &str = "tillage, ploughing | tillage, ploughing | Cutoff, U";
pub const WHEAT: &str = "wheat production | wheat grain";
pub const ROAD: &str = "logging road construction | forest road";

/// [`seeded`] plus a waste-bearing mine, a field operation, a crop and a forest road
pub fn seeded_field() -> InventoryDb {
    let mut db = seeded();

    let spoil = Flow {
        flow_type: FlowType::WasteFlow,
        ..flow("spoil", "spoil from hard coal mining", &["Waste", "mining"], ReferenceProperty::Mass, "kg")
    };
    let coal = ground("coal", "Coal, hard");
    let road = flow(
        "road",
        "Transformation, from traffic area, rail/road embankment",
        &["Elementary flows", "Land use", "land transformation"],
        ReferenceProperty::Area,
        "m2",
    );
    let diesel = Flow {
        flow_type: FlowType::ProductFlow,
        ..flow("diesel", "diesel, burned in agricultural machinery", &["Products"], ReferenceProperty::Energy, "MJ")
    };
    let grain = Flow {
        flow_type: FlowType::ProductFlow,
        ..flow("grain", "wheat grain", &["Products"], ReferenceProperty::Mass, "kg")
    };
    for f in [&spoil, &coal, &road, &diesel, &grain] {
        db.insert_flow(f).unwrap();
    }

    let product = db.flows_for_name("product").unwrap().remove(0);
    for p in [
        process("p-coal", COAL, "0510:Mining of hard coal", "China", &product, &[(&coal, 1.1), (&spoil, 6.0)]),
        process("p-plough", PLOUGHING, "0161:Support activities for crop production", "CH", &product, &[(&diesel, 60.0)]),
        process(
            "p-wheat",
            WHEAT,
            "0111:Growing of cereals (except rice), leguminous crops and oil seeds",
            "FR",
            &grain,
            &[],
        ),
        process("p-road", ROAD, "0220:Logging", "SE", &product, &[(&road, 0.002)]),
    ] {
        db.insert_process(&p).unwrap();
    }

    db
}

pub fn stored(db: &InventoryDb, id: &str) -> Process {
    db.processes().unwrap().into_iter().find(|p| p.id == id).unwrap()
}

pub fn input(process: &Process, flow_name: &str) -> Option<f64> {
    process.input_for(flow_name).map(|e| e.amount)
}
