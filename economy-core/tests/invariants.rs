//! Cross-module invariants: hypothetical evaluation must never leak into the
//! state, pricing must stay consistent with the wage anchor, and the storage
//! optimizer must terminate no matter how absurd the demand.

use economy_core::{
    basic_production, compute_prices, conversion_list, economy_report, production,
    worker_production, ActionEffect, Building, Evaluator, GameState, Job, Res, Science,
    ScienceIndex, ROI_CEILING, WAGE,
};

fn town() -> GameState {
    let mut state = GameState::new();
    state.level.insert(Building::Hut, 10.0);
    state.level.insert(Building::Barn, 3.0);
    state.level.insert(Building::Workshop, 1.0);
    state.level.insert(Building::Library, 5.0);
    state.level.insert(Building::Smelter, 2.0);
    state.workers.insert(Job::Farmer, 8.0);
    state.workers.insert(Job::Woodcutter, 5.0);
    state.workers.insert(Job::Miner, 4.0);
    for s in [
        Science::Calendar,
        Science::Agriculture,
        Science::Mining,
        Science::Archery,
    ] {
        state.researched.insert(s, true);
    }
    state
}

#[test]
fn invariant_report_leaves_the_state_untouched_after_the_idle_fold() {
    let mut state = town();
    economy_report(&mut state);
    let settled = serde_json::to_value(&state).unwrap();

    economy_report(&mut state);
    let after = serde_json::to_value(&state).unwrap();
    assert_eq!(
        settled, after,
        "a second report must observe exactly the state the first one left behind"
    );
}

#[test]
fn invariant_pricing_and_production_run_on_a_settled_state_without_mutation() {
    let mut state = town();
    basic_production(&mut state); // settle the idle-worker fold
    let before = serde_json::to_value(&state).unwrap();

    let mut conversions = conversion_list(&mut state);
    let prices = compute_prices(&mut state, &mut conversions);
    let prod = production(&mut state, &conversions);

    let after = serde_json::to_value(&state).unwrap();
    assert_eq!(before, after, "pricing and the conversion pass leaked state");
    assert!(prod.get(Res::Catnip).is_finite());
    assert!(prices.get(Res::Catnip) > 0.0);
}

#[test]
fn invariant_resource_prices_anchor_to_the_wage() {
    let mut state = town();
    let mut conversions = conversion_list(&mut state);
    let prices = compute_prices(&mut state, &mut conversions);

    // One marginal worker of each basic trade earns exactly the wage.
    for (job, res) in [
        (Job::Farmer, Res::Catnip),
        (Job::Woodcutter, Res::Wood),
        (Job::Miner, Res::Minerals),
    ] {
        let marginal = worker_production(&mut state, job, res);
        let earned = prices.get(res) * marginal;
        assert!(
            (earned - WAGE).abs() < 1e-9,
            "{job:?} earns {earned} per marginal worker, expected the wage {WAGE}"
        );
    }
}

#[test]
fn invariant_conversions_never_overdraw_their_inputs() {
    let mut state = town();
    state.level.insert(Building::TradePost, 2.0);
    state.workers.insert(Job::Hunter, 6.0);
    for res in Res::all() {
        state.conversion_proportion.insert(res, 1.0);
    }

    let conversions = conversion_list(&mut state);
    let prod = production(&mut state, &conversions);

    // Every crafted or harvested input stays non-negative even with all
    // dials wide open; each conversion is capped by the remaining surplus.
    for res in [
        Res::Minerals,
        Res::Wood,
        Res::Iron,
        Res::Fur,
        Res::Parchment,
        Res::Beam,
        Res::Slab,
        Res::Steel,
        Res::Plate,
    ] {
        assert!(
            prod.get(res) >= -1e-9,
            "net {res:?} production went negative: {}",
            prod.get(res)
        );
    }
}

#[test]
fn invariant_storage_optimizer_terminates_on_absurd_demand() {
    let mut state = town();
    let mut conversions = conversion_list(&mut state);
    let prices = compute_prices(&mut state, &mut conversions);
    let sciences = ScienceIndex::build(&prices);

    let mut target = state.clone();
    let before = target.clone();
    let mut ev = Evaluator::new(&mut target, &prices, &sciences, &conversions);
    let action = ev.custom(
        "GreatWork".into(),
        ActionEffect::Level {
            building: Building::Temple,
        },
        &[(Res::Catnip, 1e18)],
        false,
        true,
    );

    assert!(
        action.investment.cost.is_infinite(),
        "a demand no storage chain can satisfy must be priced out, got {}",
        action.investment.cost
    );
    assert!(action
        .investment
        .expenses
        .iter()
        .any(|e| e.name == "<more storage needed>"));
    assert_eq!(target.level, before.level);
    assert_eq!(target.upgrades, before.upgrades);
}

#[test]
fn invariant_reported_rois_are_nonnegative_and_capped() {
    let mut state = town();
    let report = economy_report(&mut state);
    for action in report
        .actions
        .iter()
        .chain(&report.storage_actions)
        .chain(&report.metaphysic_actions)
    {
        assert!(
            action.roi >= 0.0,
            "{} has a negative ROI: {}",
            action.name,
            action.roi
        );
        assert!(
            action.roi.is_infinite() || action.roi <= ROI_CEILING,
            "{} slipped past the ROI ceiling: {}",
            action.name,
            action.roi
        );
    }
}
