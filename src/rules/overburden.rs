//! Overburden consolidation
//!
//! Part of the removed overburden is booked as waste flows, which cannot
//! carry a characterization factor. Processes producing those wastes get an
//! `Overburden` elementary input holding their summed amount.

use tracing::{debug, info};

use super::{RuleContext, RuleOutcome};
use crate::db::InventoryStore;
use crate::error::IntensityError;
use crate::registry::OVERBURDEN;
use crate::resolver::set_or_insert;

/// Waste flows that record overburden which is not refilled
pub const OVERBURDEN_WASTE_FLOWS: [&str; 3] = [
    "non-sulfidic overburden, off-site",
    "spoil from hard coal mining",
    "spoil from lignite mining",
];

/// Seed `Overburden` from the waste flows of every non-market, non-treatment
/// process. A process that already carries an `Overburden` exchange keeps it.
pub fn consolidate(store: &mut dyn InventoryStore, ctx: &RuleContext<'_>) -> Result<RuleOutcome, IntensityError> {
    let mut outcome = RuleOutcome::default();
    let mut explicit = 0usize;

    for mut process in store.processes()? {
        if process.is_market() || process.is_treatment() {
            continue;
        }

        let waste: Vec<f64> = process
            .exchanges
            .iter()
            .filter(|e| OVERBURDEN_WASTE_FLOWS.contains(&e.flow.name.as_str()))
            .map(|e| e.amount)
            .collect();
        if waste.is_empty() {
            continue;
        }

        if process.has_flow(OVERBURDEN) {
            debug!(process = %process.name, "Explicit overburden kept");
            explicit += 1;
            continue;
        }

        let sum: f64 = waste.iter().sum();
        let result = set_or_insert(store, &mut process, &ctx.flows.overburden, sum, Some("kg"))?;
        outcome.counts.record(result);
    }

    info!(
        seeded = outcome.counts.inserted,
        explicit,
        "Overburden consolidated from waste flows"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlowType, ReferenceProperty};
    use crate::rules::fixtures::*;
    use crate::rules::MatchPolicy;

    fn waste(id: &str, name: &str) -> crate::model::Flow {
        let mut f = flow(id, name, &["Waste", "mining"], ReferenceProperty::Mass, "kg");
        f.flow_type = FlowType::WasteFlow;
        f
    }

    #[test]
    fn test_waste_amounts_are_summed() {
        let (mut db, flows) = bootstrapped();
        let spoil = waste("w1", "spoil from hard coal mining");
        let offsite = waste("w2", "non-sulfidic overburden, off-site");
        let coal = ground("coal", "Coal, hard");
        for f in [&spoil, &offsite, &coal] {
            db.insert_flow(f).unwrap();
        }
        db.insert_process(&process(
            "p",
            "hard coal mine operation | hard coal",
            "0510:Mining of hard coal",
            "China",
            vec![output(1, &coal, 1.0), output(2, &spoil, 3.0), output(3, &offsite, 1.5)],
        ))
        .unwrap();

        let ctx = RuleContext {
            flows: &flows,
            policy: MatchPolicy::LastWins,
            flag_external: false,
        };
        let outcome = consolidate(&mut db, &ctx).unwrap();
        assert_eq!(outcome.counts.inserted, 1);

        let stored = stored(&db, "p");
        let ov = stored.input_for(OVERBURDEN).unwrap();
        assert_eq!(ov.amount, 4.5);
        assert_eq!(ov.internal_id, 4);
    }

    #[test]
    fn test_explicit_overburden_wins() {
        let (mut db, flows) = bootstrapped();
        let spoil = waste("w1", "spoil from lignite mining");
        db.insert_flow(&spoil).unwrap();
        db.insert_process(&process(
            "p",
            "lignite mine operation | lignite",
            "0520:Mining of lignite",
            "Germany",
            vec![output(1, &spoil, 3.0), input(2, &flows.overburden, 7.0)],
        ))
        .unwrap();

        let ctx = RuleContext {
            flows: &flows,
            policy: MatchPolicy::LastWins,
            flag_external: false,
        };
        let outcome = consolidate(&mut db, &ctx).unwrap();
        assert_eq!(outcome.counts.touched(), 0);
        assert_eq!(stored(&db, "p").input_for(OVERBURDEN).unwrap().amount, 7.0);
    }

    #[test]
    fn test_treatment_and_market_are_skipped() {
        let (mut db, flows) = bootstrapped();
        let spoil = waste("w1", "spoil from lignite mining");
        db.insert_flow(&spoil).unwrap();
        db.insert_process(&process(
            "t",
            "treatment of spoil from lignite mining, in surface landfill",
            "3821:Treatment and disposal of non-hazardous waste",
            "Germany",
            vec![input(1, &spoil, 1.0)],
        ))
        .unwrap();

        let ctx = RuleContext {
            flows: &flows,
            policy: MatchPolicy::LastWins,
            flag_external: false,
        };
        consolidate(&mut db, &ctx).unwrap();
        assert!(!stored(&db, "t").has_flow(OVERBURDEN));
    }
}
