use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::actions::{Action, Evaluator};
use crate::catalog;
use crate::cba::{CostBenefitAnalysis, Expenditure};
use crate::conversion::{conversion_list, production, Conversion};
use crate::patch::{delta, StateUpdate};
use crate::pricing::compute_prices;
use crate::science::ScienceIndex;
use crate::state::GameState;
use crate::types::{Cart, Res, Science};

// ============================================================================
// Economy Report - one full decision-support snapshot
// ============================================================================

/// A visible research row: priced cost plus researched marker.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
pub struct ScienceEntry {
    pub name: Science,
    pub investment: crate::cba::Investment,
    pub state_info: String,
}

/// Everything the caller needs to decide the next purchase. Built from
/// scratch on every request; nothing in here persists.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct EconomyReport {
    pub production: Cart,
    pub prices: Cart,
    pub conversions: Vec<Conversion>,
    pub actions: Vec<Action>,
    pub storage_actions: Vec<Action>,
    pub sciences: Vec<ScienceEntry>,
    pub metaphysic_actions: Vec<Action>,
    pub fur_report: CostBenefitAnalysis,
}

/// Assemble the full report: conversions and prices first, then the research
/// index, then every action family assessed against the live state. All
/// hypothetical evaluation windows are reverted; the only lasting state
/// change is the idle-worker fold inside basic production.
pub fn economy_report(state: &mut GameState) -> EconomyReport {
    let mut conversions = conversion_list(state);
    let prices = compute_prices(state, &mut conversions);
    let science_index = ScienceIndex::build(&prices);
    let production_cart = production(state, &conversions);

    let mut ev = Evaluator::new(state, &prices, &science_index, &conversions);
    let actions = catalog::main_actions(&mut ev);
    let mut storage_actions: Vec<Action> = catalog::storage_actions(&mut ev, None)
        .into_iter()
        .map(|a| ev.assess(a))
        .collect();
    storage_actions.sort_by(|a, b| a.roi.total_cmp(&b.roi));
    let metaphysic_actions = catalog::metaphysic_actions(&mut ev);
    let fur_report = fur_consumption_report(&mut ev);
    drop(ev);

    let sciences = science_index
        .infos
        .iter()
        .enumerate()
        .filter(|&(i, _)| science_index.visible(state, i))
        .map(|(_, info)| ScienceEntry {
            name: info.name,
            investment: info.investment.clone(),
            state_info: if state.researched(info.name) { "R" } else { "" }.into(),
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        actions = actions.len(),
        storage_actions = storage_actions.len(),
        "economy report assembled"
    );

    EconomyReport {
        production: production_cart,
        prices: prices.iter().collect(),
        conversions,
        actions,
        storage_actions,
        sciences,
        metaphysic_actions,
        fur_report,
    }
}

/// What turning fur consumption on (or off) would do to net production,
/// signed so the report always shows the cost of having it on.
fn fur_consumption_report(ev: &mut Evaluator) -> CostBenefitAnalysis {
    let fur_on = ev.state.luxury_on(Res::Fur);
    let change = StateUpdate::luxury(Res::Fur, !fur_on);
    let conversions = ev.conversions;
    let production_delta = delta(ev.state, |s| production(s, conversions), &change);

    let mut report = CostBenefitAnalysis::default();
    let sign = if fur_on { -1.0 } else { 1.0 };
    for res in Res::all() {
        let quantity = production_delta.get(res);
        if quantity != 0.0 {
            report
                .ret
                .add(Expenditure::new(quantity * sign, res, ev.prices.get(res)));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Building, Job};

    fn town() -> GameState {
        let mut state = GameState::new();
        state.level.insert(Building::Hut, 10.0);
        state.level.insert(Building::Barn, 3.0);
        state.level.insert(Building::Workshop, 1.0);
        state.level.insert(Building::Library, 5.0);
        state.workers.insert(Job::Farmer, 10.0);
        state.workers.insert(Job::Woodcutter, 5.0);
        state.workers.insert(Job::Miner, 3.0);
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
    fn report_is_idempotent_after_the_idle_fold() {
        let mut state = town();
        economy_report(&mut state);
        let workers_after_first: Vec<f64> = Job::all().map(|j| state.workers(j)).collect();
        let levels_after_first = state.level.clone();

        economy_report(&mut state);
        let workers_after_second: Vec<f64> = Job::all().map(|j| state.workers(j)).collect();
        assert_eq!(workers_after_first, workers_after_second);
        assert_eq!(levels_after_first, state.level);
        assert_eq!(state.extra_kittens, 0.0);
    }

    #[test]
    fn action_lists_are_sorted_by_roi() {
        let mut state = town();
        let report = economy_report(&mut state);
        for list in [&report.actions, &report.storage_actions, &report.metaphysic_actions] {
            for pair in list.windows(2) {
                assert!(
                    pair[0].roi.total_cmp(&pair[1].roi).is_le(),
                    "{} ({}) sorts after {} ({})",
                    pair[0].name,
                    pair[0].roi,
                    pair[1].name,
                    pair[1].roi,
                );
            }
        }
    }

    #[test]
    fn report_contains_all_metaphysic_perks() {
        let mut state = town();
        let report = economy_report(&mut state);
        assert_eq!(report.metaphysic_actions.len(), 9);
    }

    #[test]
    fn fur_report_shows_the_cost_of_consumption() {
        let mut state = town();
        state.luxury.insert(Res::Fur, true);
        let report = economy_report(&mut state);
        // With fur on, the report is signed as the cost of keeping it on:
        // catnip demand rises (happier kittens eat more), so the catnip
        // entry is the production lost.
        assert!(!report.fur_report.ret.expenditures.is_empty());
    }

    #[test]
    fn prices_cover_every_catalog_resource() {
        let mut state = town();
        let report = economy_report(&mut state);
        for res in Res::all() {
            assert!(report.prices.contains(res), "missing price for {res:?}");
        }
    }
}
