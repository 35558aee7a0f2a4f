//! Literature values for mining processes whose inventory lacks overburden or
//! gangue. Values are kg per kg of reference product and are authoritative:
//! they replace whatever the inventory or the waste consolidation produced.

/// One row of an override table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideEntry {
    /// Substring of the process name (`activity | product`)
    pub name: &'static str,
    /// Substring of the location name; `Global` and `Rest-of-World` are ordinary names
    pub location: &'static str,
    pub value: f64,
}

const fn entry(name: &'static str, location: &'static str, value: f64) -> OverrideEntry {
    OverrideEntry { name, location, value }
}

const CU_SULFIDE: &str = "copper mine operation and beneficiation, sulfide ore | copper concentrate, sulfide ore";
const CU_MOLYBDENITE: &str = "copper mine operation and beneficiation, sulfide ore | molybdenite";
const PGM_COPPER: &str = "platinum group metal mine operation, ore with high palladium content | copper, cathode";

pub const OVERBURDEN_TABLE: &[OverrideEntry] = &[
    // 1 m cap over 3 to 7 m of ore
    entry("bauxite mine operation | bauxite", "Global", 0.1904762),
    entry("barite production | barite", "Rest-of-World", 0.09),
    entry("barite production | barite", "Europe", 0.09),
    entry("barite production | barite", "Canada, Qu", 0.09),
    entry("iron ore mine operation, 63% Fe | iron ore, crude ore, 63% Fe", "India", 1.85),
    entry("iron ore mine operation, 46% Fe | iron ore, crude ore, 46% Fe", "Global", 1.85),
    entry("iron ore mine operation and beneficiation | iron ore concentrate", "Canada, Qu", 1.85),
    // copper cathode
    entry("gold mine operation and refining | copper, cathode", "Sweden", 291.0),
    entry(PGM_COPPER, "Russian Federation", 291.0),
    entry(
        "copper production, cathode, solvent extraction and electrowinning process | copper, cathode",
        "Global",
        291.0,
    ),
    // copper concentrate
    entry(CU_SULFIDE, "Australia", 70.0),
    entry(CU_SULFIDE, "Canada", 69.0),
    entry(CU_SULFIDE, "Chile", 121.0),
    entry(CU_SULFIDE, "China", 75.0),
    entry(CU_SULFIDE, "Indonesia", 109.0),
    entry(CU_SULFIDE, "Kazakhstan", 60.0),
    entry(CU_SULFIDE, "Rest-of-World", 75.0),
    entry(CU_SULFIDE, "Russian Federation", 75.0),
    entry(CU_SULFIDE, "United States", 309.0),
    entry(CU_SULFIDE, "Zambia", 264.0),
    entry("gold-silver mine operation and beneficiation | copper concentrate, sulfide ore", "Canada, Qu", 69.0),
    entry("molybdenite mine operation | copper concentrate, sulfide ore", "Global", 75.0),
    // gold
    entry("silver-gold mine operation with refinery | gold", "Chile", 1912966.0),
    entry("silver-gold mine operation with refinery | gold", "Rest-of-World", 1912966.0),
    entry("gold mine operation and gold production, unrefined | gold, unrefined", "South Africa", 1912966.0),
    entry("gold mine operation and gold production, unrefined | gold, unrefined", "Rest-of-World", 1912966.0),
    entry("gold mine operation and refining | gold", "Sweden", 1912966.0),
    entry("gold-silver mine operation with refinery | gold", "Papua New Guinea", 200793.0),
    entry("gold-silver mine operation with refinery | gold", "Canada, Qu", 253051.0),
    entry("gold-silver mine operation with refinery | gold", "Rest-of-World", 1912966.0),
    entry("gold production | gold", "Canada", 253051.0),
    entry("gold production | gold", "Australia", 1573988.0),
    entry("gold production | gold", "Tanzania, United Republic of", 1793320.0),
    entry("gold production | gold", "United States", 5093769.0),
    // silver
    entry("gold mine operation and refining | silver", "Sweden", 30970.0),
    entry("gold-silver mine operation with refinery | silver", "Papua New Guinea", 30970.0),
    entry("gold-silver mine operation with refinery | silver", "Canada, Qu", 27409.0),
    entry("gold-silver mine operation with refinery | silver", "Rest-of-World", 30970.0),
    entry("silver-gold mine operation with refinery | silver", "Chile", 30970.0),
    entry("silver-gold mine operation with refinery | silver", "Rest-of-World", 30970.0),
    entry("silver mine operation with extraction | silver, unrefined", "Peru", 26580.0),
    // molybdenite
    entry(CU_MOLYBDENITE, "Canada", 1125.0),
    entry(CU_MOLYBDENITE, "Chile", 1134.0),
    entry(CU_MOLYBDENITE, "China", 1134.0),
    entry(CU_MOLYBDENITE, "Rest-of-World", 1134.0),
    entry(CU_MOLYBDENITE, "Russian Federation", 1134.0),
    entry(CU_MOLYBDENITE, "United States", 1134.0),
    entry("molybdenite mine operation | molybdenite", "Global", 1136.0),
    // zinc
    entry("gold mine operation and refining | zinc", "Sweden", 76.0),
    entry("gold-silver mine operation and beneficiation | zinc concentrate", "Canada, Qu", 40.0),
    entry("silver mine operation with extraction | zinc concentrate", "Peru", 40.0),
];

pub const GANGUE_TABLE: &[OverrideEntry] = &[
    // bauxite is the mined ore itself
    entry("bauxite mine operation | bauxite", "Global", 0.0),
    entry("barite production | barite |", "Europe", 0.333),
    entry("barite production | barite |", "Rest-of-World", 0.333),
    entry("barite production | barite |", "Canada, Qu", 0.333),
    // iron, scaled from the 63% Fe crude ore
    entry(
        "iron ore mine operation and beneficiation | iron ore concentrate |",
        "Canada, Q",
        46.0 / 100.0 * 0.4995,
    ),
    entry(
        "iron ore mine operation, 46% Fe | iron ore, crude ore, 46% Fe |",
        "Global",
        46.0 / 63.0 * 0.4995,
    ),
    // copper cathode
    entry(
        "platinum group metal mine operation, ore with high palladium content | copper, cathode |",
        "Russian Federation",
        212.0,
    ),
    entry("gold mine operation and refining | copper, cathode |", "Sweden", 39.0),
    entry(
        "copper production, cathode, solvent extraction and electrowinning process | copper, cathode",
        "Global",
        119.0,
    ),
    // copper concentrate
    entry(CU_SULFIDE, "Australia", 22.0),
    entry(CU_SULFIDE, "Canada", 14.0),
    entry(CU_SULFIDE, "Chile", 67.0),
    entry(CU_SULFIDE, "China", 75.0),
    entry(CU_SULFIDE, "Indonesia", 75.0),
    entry(CU_SULFIDE, "Kazakhstan", 29.0),
    entry(CU_SULFIDE, "Rest-of-World", 75.0),
    entry(CU_SULFIDE, "Russian Federation", 75.0),
    entry(CU_SULFIDE, "United States", 85.0),
    entry(CU_SULFIDE, "Zambia", 40.0),
    entry("molybdenite mine operation | copper concentrate, sulfide ore |", "Global", 75.0),
    entry("gold-silver mine operation and beneficiation | copper concentrate, sulfide ore", "Canada, Qu", 14.0),
    // gold
    entry("gold mine operation and gold production, unrefined | gold, unrefined", "Rest-of-World", 511257.0),
    entry("gold mine operation and gold production, unrefined | gold, unrefined", "South Africa", 34.0),
    entry("gold mine operation and refining | gold |", "Sweden", 1000340.0),
    entry("gold production | gold |", "Australia", 1627.0),
    entry("gold production | gold |", "Canada", 520026.0),
    entry("gold production | gold |", "Tanzania, United Republic of", 334465.0),
    entry("gold production | gold |", "United States", 509221.0),
    entry("silver-gold mine operation with refinery | gold |", "Chile", 938750.0),
    entry("silver-gold mine operation with refinery | gold |", "Rest-of-World", 511257.0),
    entry("gold-silver mine operation with refinery | gold |", "Canada, Q", 520026.0),
    entry("gold-silver mine operation with refinery | gold |", "Papua New Guinea", 1258757.0),
    entry("gold-silver mine operation with refinery | gold |", "Rest-of-World", 511257.0),
    entry("molybdenite mine operation | molybdenite |", "Global", 1414.0),
    // silver
    entry("gold-silver mine operation with refinery | silver |", "Canada, Q", 14185.0),
    entry("gold-silver mine operation with refinery | silver |", "Papua New Guinea", 21172.0),
    entry("gold-silver mine operation with refinery | silver |", "Rest-of-World", 9432.0),
    entry("gold mine operation and refining | silver |", "Sweden", 16334.0),
    entry("silver-gold mine operation with refinery | silver |", "Chile", 9089.0),
    entry("silver-gold mine operation with refinery | silver |", "Rest-of-World", 9432.0),
    // lead, zinc
    entry("gold mine operation and refining | lead", "Sweden", 31.0),
    entry("gold-silver mine operation and beneficiation | lead concentrate", "Canada, Q", 10.0),
    entry("gold mine operation and refining | zinc", "Sweden", 11.0),
    entry("gold-silver mine operation and beneficiation | zinc concentrate", "Canada, Q", 18.0),
    // platinum group metals
    entry("platinum group metal mine operation, ore with high palladium content | nickel, class", "Russian Federation", 93.0),
    entry("platinum group metal mine operation, ore with high palladium content | palladium", "Russian Federation", 3127297.0),
    entry("platinum group metal mine operation, ore with high palladium content | platinum", "Russian Federation", 2534893.0),
    entry("platinum group metal mine operation, ore with high palladium content | rhodium", "Russian Federation", 28.0),
    entry("uranium production, in yellowcake, in-situ leaching | uranium, in yellowcake", "Global", 8384.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    const PGM: &str = "platinum group metal mine operation, ore with high palladium content";

    #[test]
    fn test_table_sizes() {
        assert_eq!(OVERBURDEN_TABLE.len(), 52);
        assert_eq!(GANGUE_TABLE.len(), 49);
    }

    #[test]
    fn test_values_are_not_negative() {
        for e in OVERBURDEN_TABLE.iter().chain(GANGUE_TABLE) {
            assert!(e.value >= 0.0, "{} @ {}", e.name, e.location);
            assert!(!e.name.is_empty() && !e.location.is_empty());
        }
    }

    #[test]
    fn test_pgm_rows_share_prefix() {
        let pgm = GANGUE_TABLE.iter().filter(|e| e.name.starts_with(PGM)).count();
        assert_eq!(pgm, 5);
        assert!(PGM_COPPER.starts_with(PGM));
    }
}
