use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::cba::{roi, Expenditure, Expense, Investment};
use crate::conversion::{craft_ratio, production, Conversion};
use crate::num::hyperbolic_limit;
use crate::patch::{apply, delta, StateUpdate};
use crate::pricing::PriceTable;
use crate::science::ScienceIndex;
use crate::state::{praise_bonus, GameState};
use crate::types::{Building, Metaphysic, Res, Unlock, Upgrade};
use crate::production::{capacity, storage};

// ============================================================================
// Actions - every purchasable step, priced and assessed
// ============================================================================

/// What committing an action does to the state. Quantities are recomputed
/// from the live state at apply time, so a stored effect stays correct after
/// other actions ran.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub enum ActionEffect {
    Level { building: Building },
    ToggleActive { building: Building },
    Upgrade { upgrade: Upgrade },
    Metaphysic { metaphysic: Metaphysic, paragon_cost: f64 },
    Tradeship,
    Praise,
    FeedElders,
    /// Absolute target, not an increment.
    Compendia { desired: f64 },
}

impl ActionEffect {
    pub fn update(&self, state: &GameState, times: f64) -> StateUpdate {
        match *self {
            ActionEffect::Level { building } => {
                let new_level = state.level(building) + times;
                let mut update = StateUpdate::level(building, new_level);
                if new_level != 0.0 {
                    if let Some(old) = building.obsoletes() {
                        update.level.push((old, 0.0));
                    }
                }
                update
            }
            ActionEffect::ToggleActive { building } => {
                let active = state.active.get(&building) == Some(&true);
                StateUpdate {
                    active: vec![(building, !active)],
                    ..StateUpdate::default()
                }
            }
            ActionEffect::Upgrade { upgrade } => StateUpdate::upgrade(upgrade, times > 0.0),
            ActionEffect::Metaphysic {
                metaphysic,
                paragon_cost,
            } => StateUpdate {
                metaphysic: vec![(metaphysic, times > 0.0)],
                paragon: Some(state.paragon - times * paragon_cost),
                ..StateUpdate::default()
            },
            ActionEffect::Tradeship => StateUpdate {
                ships: Some(state.ships + times * craft_ratio(state, None)),
                ..StateUpdate::default()
            },
            ActionEffect::Praise => {
                let mut update = StateUpdate::default();
                update.faith.stored =
                    Some(state.faith.stored + times * 1000.0 * (1.0 + praise_bonus(state)));
                update
            }
            ActionEffect::FeedElders => StateUpdate {
                leviathan_energy: Some(state.leviathan_energy + times),
                ..StateUpdate::default()
            },
            ActionEffect::Compendia { desired } => StateUpdate {
                compendia: Some(desired),
                ..StateUpdate::default()
            },
        }
    }

    /// The prerequisite-index key this action is gated under, if any.
    fn unlock(&self) -> Option<Unlock> {
        match *self {
            ActionEffect::Level { building } | ActionEffect::ToggleActive { building } => {
                Some(Unlock::Building(building))
            }
            ActionEffect::Upgrade { upgrade } => Some(Unlock::Upgrade(upgrade)),
            _ => None,
        }
    }
}

/// A fully priced action: investment (with procured storage and disclosed
/// prerequisites), assessed return, and the resulting ROI.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
pub struct Action {
    pub name: String,
    pub effect: ActionEffect,
    pub investment: Investment,
    #[serde(rename = "return")]
    pub ret: Investment,
    pub roi: f64,
    pub state_info: String,
    pub repeatable: bool,
    #[serde(skip)]
    pub available: bool,
}

// ============================================================================
// Evaluator - prices and assesses actions against a borrowed state
// ============================================================================

/// Evaluation context for one report. Holds the state and the per-report
/// tables; `procuring_storage` is the reentrancy guard that keeps the
/// storage optimizer from recursing into itself.
pub struct Evaluator<'a> {
    pub state: &'a mut GameState,
    pub prices: &'a PriceTable,
    pub sciences: &'a ScienceIndex,
    pub conversions: &'a [Conversion],
    procuring_storage: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        state: &'a mut GameState,
        prices: &'a PriceTable,
        sciences: &'a ScienceIndex,
        conversions: &'a [Conversion],
    ) -> Self {
        Self {
            state,
            prices,
            sciences,
            conversions,
            procuring_storage: false,
        }
    }

    fn expenditure(&self, res: Res, amount: f64) -> Expenditure {
        Expenditure::new(amount, res, self.prices.get(res))
    }

    /// Shared action construction: price the cart, fold in unmet research,
    /// then procure whatever storage the purchase needs.
    fn build(
        &mut self,
        name: String,
        effect: ActionEffect,
        cost: &[(Res, f64)],
        multiplier: f64,
        repeatable: bool,
        available: bool,
        state_info: String,
    ) -> Action {
        let mut investment = Investment::new();
        for &(res, amount) in cost {
            investment.add(self.expenditure(res, amount * multiplier));
        }
        self.procure_prerequisite(&mut investment, effect.unlock(), repeatable);
        self.procure_storage(&mut investment);

        Action {
            name,
            effect,
            investment,
            ret: Investment::new(),
            roi: f64::INFINITY,
            state_info,
            repeatable,
            available,
        }
    }

    fn procure_prerequisite(
        &mut self,
        investment: &mut Investment,
        unlock: Option<Unlock>,
        repeatable: bool,
    ) {
        let Some(unlock) = unlock else { return };
        for i in self.sciences.missing_prerequisites(self.state, unlock) {
            let info = &self.sciences.infos[i];
            let expense = Expense {
                name: info.name.name(),
                cost: info.investment.cost,
            };
            if repeatable {
                // Charging every repeat of the action with the full research
                // cost would be misleading; disclose it on the side instead.
                investment.add_additional_requirement(expense);
            } else {
                investment.add_expense(expense);
            }
        }
    }

    /// If any expenditure exceeds current storage, buy the cheapest-per-unit
    /// storage expansions hypothetically until it fits, folding their cost
    /// into the investment. All hypothetical purchases are reverted before
    /// returning; only the expenses remain.
    fn procure_storage(&mut self, investment: &mut Investment) {
        let mut undoers: Vec<StateUpdate> = Vec::new();
        let mut current = storage(self.state);
        let expenditures = investment.expenditures.clone();

        'expenditures: for xp in &expenditures {
            while xp.amount > capacity(&current, xp.res) {
                if self.procuring_storage {
                    // A storage candidate that itself needs storage is not
                    // worth chasing; price it out of the running.
                    investment.cost = f64::INFINITY;
                    break 'expenditures;
                }

                let mut best: Option<(Action, crate::types::Cart)> = None;
                let mut best_roi = 0.0;
                if investment.expenses.len() < 9 {
                    self.procuring_storage = true;
                    let desired_science = (xp.res == Res::Science).then_some(xp.amount);
                    let candidates = crate::catalog::storage_actions(self, desired_science);
                    for candidate in candidates {
                        let change = candidate.effect.update(self.state, 1.0);
                        let memento = apply(self.state, &change);
                        let new_storage = storage(self.state);
                        apply(self.state, &memento);

                        let gain = new_storage.get(xp.res) - current.get(xp.res);
                        let r = gain / candidate.investment.cost;
                        if r > best_roi {
                            best_roi = r;
                            best = Some((candidate, new_storage));
                        }
                    }
                    self.procuring_storage = false;
                }

                match best {
                    Some((candidate, new_storage)) => {
                        investment.add_expense(Expense {
                            name: candidate.name.clone(),
                            cost: candidate.investment.cost,
                        });
                        let change = candidate.effect.update(self.state, 1.0);
                        undoers.push(apply(self.state, &change));
                        current = new_storage;
                    }
                    None => {
                        investment.add_expense(Expense {
                            name: "<more storage needed>".into(),
                            cost: f64::INFINITY,
                        });
                        break 'expenditures;
                    }
                }
            }
        }

        while let Some(memento) = undoers.pop() {
            apply(self.state, &memento);
        }
    }

    /// Fill in the action's return from the marginal production change of
    /// applying it once, then derive its ROI.
    pub fn assess(&mut self, mut action: Action) -> Action {
        let conversions = self.conversions;
        let change = action.effect.update(self.state, 1.0);
        let production_delta = delta(self.state, |s| production(s, conversions), &change);
        for res in Res::all() {
            if production_delta.contains(res) {
                action
                    .ret
                    .add(self.expenditure(res, production_delta.get(res)));
            }
        }
        action.roi = roi(action.investment.cost, action.ret.cost);
        action
    }

    // ------------------------------------------------------------------
    // Constructors mirroring the catalog's action families
    // ------------------------------------------------------------------

    pub fn building(
        &mut self,
        building: Building,
        cost: &[(Res, f64)],
        ratio: f64,
        reduction: Option<f64>,
    ) -> Action {
        let level = self.state.level(building);
        let multiplier = price_ratio(self.state, ratio, reduction).powf(level);
        let obsolete = building
            .obsoleted_by()
            .map(|newer| self.state.level(newer) != 0.0)
            .unwrap_or(false);
        self.build(
            building.name(),
            ActionEffect::Level { building },
            cost,
            multiplier,
            true,
            !obsolete,
            format!("{level}"),
        )
    }

    /// Space structures: flat price ratio, except oil which always scales at
    /// 1.05 per level and is discounted by the space elevator.
    pub fn space(&mut self, building: Building, cost: &[(Res, f64)], ratio: f64) -> Action {
        let level = self.state.level(building);
        let elevator = self.state.level(Building::SpaceElevator);
        let oil_discount = (1.0 - hyperbolic_limit(elevator * 0.05, 0.75))
            * 1.05f64.powf(level)
            / ratio.powf(level);
        let cost: Vec<(Res, f64)> = cost
            .iter()
            .map(|&(res, amount)| {
                if res == Res::Oil {
                    (res, amount * oil_discount)
                } else {
                    (res, amount)
                }
            })
            .collect();
        self.building(building, &cost, ratio, None)
    }

    /// Temple extensions: steep flat ratio, and only the first level is
    /// worth showing unless transcendence opens the rest up.
    pub fn religious(&mut self, building: Building, cost: &[(Res, f64)]) -> Action {
        let mut action = self.building(building, cost, 2.5, None);
        action.available &= self.state.level(building) == 0.0
            || self.state.has(Upgrade::Transcendence)
            || self.state.show_researched;
        action
    }

    pub fn ziggurat(&mut self, building: Building, cost: &[(Res, f64)], ratio: f64) -> Action {
        let mut action = self.building(building, cost, ratio, None);
        action.available &= self.state.level(Building::Ziggurat) > 0.0;
        action
    }

    pub fn upgrade(&mut self, upgrade: Upgrade, cost: &[(Res, f64)]) -> Action {
        let researched = self.state.has(upgrade);
        let available = self.state.level(Building::Workshop) != 0.0
            && (self.state.show_researched || !researched);
        let state_info = if researched { "R" } else { " " };
        self.build(
            upgrade.name(),
            ActionEffect::Upgrade { upgrade },
            cost,
            1.0,
            false,
            available,
            state_info.into(),
        )
    }

    pub fn metaphysic(&mut self, metaphysic: Metaphysic, paragon_cost: f64) -> Action {
        let state_info = if self.state.meta(metaphysic) { "R" } else { " " };
        self.build(
            metaphysic.name(),
            ActionEffect::Metaphysic {
                metaphysic,
                paragon_cost,
            },
            &[],
            1.0,
            false,
            true,
            state_info.into(),
        )
    }

    pub fn activation(&mut self, building: Building) -> Action {
        let active = self.state.active.get(&building) == Some(&true);
        let state_info = if active { "on" } else { "off" };
        self.build(
            building.name(),
            ActionEffect::ToggleActive { building },
            &[],
            1.0,
            false,
            true,
            state_info.into(),
        )
    }

    pub fn tradeship(&mut self) -> Action {
        self.build(
            "TradeShip".into(),
            ActionEffect::Tradeship,
            &[(Res::Scaffold, 100.0), (Res::Plate, 150.0), (Res::Starchart, 25.0)],
            1.0,
            true,
            true,
            String::new(),
        )
    }

    pub fn praise(&mut self) -> Action {
        self.build(
            "PraiseTheSun".into(),
            ActionEffect::Praise,
            &[(Res::Faith, 1000.0)],
            1.0,
            true,
            true,
            String::new(),
        )
    }

    /// One-off action with an explicit cart, outside the catalog families.
    pub fn custom(
        &mut self,
        name: String,
        effect: ActionEffect,
        cost: &[(Res, f64)],
        repeatable: bool,
        available: bool,
    ) -> Action {
        self.build(name, effect, cost, 1.0, repeatable, available, String::new())
    }

    pub fn feed_elders(&mut self) -> Action {
        self.build(
            "FeedElders".into(),
            ActionEffect::FeedElders,
            &[(Res::Necrocorn, 1.0)],
            1.0,
            true,
            true,
            String::new(),
        )
    }
}

/// Effective per-level price ratio. `None` skips the reduction machinery
/// entirely (space, religious and ziggurat lines use their raw ratio).
fn price_ratio(state: &GameState, ratio: f64, reduction: Option<f64>) -> f64 {
    let Some(reduction) = reduction else {
        return ratio;
    };
    let m = |mp, v: f64| if state.meta(mp) { v } else { 0.0 };
    let base = ratio - 1.0;
    let diff = reduction
        + m(Metaphysic::Engineering, 0.01)
        + m(Metaphysic::GoldenRatio, (1.0 + 5f64.sqrt()) / 2.0 * 0.01)
        + m(Metaphysic::DivineProportion, 0.16 / 9.0)
        + m(Metaphysic::VitruvianFeline, 0.02)
        + m(Metaphysic::Renaissance, 0.0225);
    ratio - hyperbolic_limit(diff, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::conversion_list;
    use crate::pricing::compute_prices;
    use crate::types::Job;

    fn context(state: &mut GameState) -> (Vec<Conversion>, PriceTable, ScienceIndex) {
        let mut convs = conversion_list(state);
        let prices = compute_prices(state, &mut convs);
        let sciences = ScienceIndex::build(&prices);
        (convs, prices, sciences)
    }

    fn village() -> GameState {
        let mut state = GameState::new();
        state.level.insert(Building::Hut, 8.0);
        state.level.insert(Building::Barn, 2.0);
        state.level.insert(Building::Workshop, 1.0);
        state.workers.insert(Job::Farmer, 6.0);
        state.workers.insert(Job::Woodcutter, 5.0);
        for s in [
            crate::types::Science::Calendar,
            crate::types::Science::Agriculture,
        ] {
            state.researched.insert(s, true);
        }
        state
    }

    #[test]
    fn price_ratio_reductions_never_cross_one() {
        let mut state = GameState::new();
        for m in [
            Metaphysic::Engineering,
            Metaphysic::GoldenRatio,
            Metaphysic::DivineProportion,
            Metaphysic::VitruvianFeline,
            Metaphysic::Renaissance,
        ] {
            state.metaphysic.insert(m, true);
        }
        let reduced = price_ratio(&state, 1.12, Some(0.5));
        assert!(reduced > 1.0);
        assert!(reduced < 1.12);
        assert_eq!(price_ratio(&state, 1.15, None), 1.15);
    }

    #[test]
    fn building_cost_scales_with_level() {
        let mut state = village();
        state.level.insert(Building::CatnipField, 3.0);
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = village();
        state2.level.insert(Building::CatnipField, 3.0);
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        let action = ev.building(Building::CatnipField, &[(Res::Catnip, 10.0)], 1.12, Some(0.0));
        let expected = 10.0 * 1.12f64.powi(3);
        let amount = action.investment.expenditures[0].amount;
        assert!((amount - expected).abs() < 1e-9);
    }

    #[test]
    fn repeatable_actions_disclose_prerequisites_without_charging() {
        let mut state = village();
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = village();
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        // Smelter needs Mining -> MetalWorking, neither researched.
        let action = ev.building(Building::Smelter, &[(Res::Minerals, 200.0)], 1.15, Some(0.0));
        assert_eq!(action.investment.also_required.len(), 2);
        assert!(action.investment.also_required_cost > 0.0);
        assert!(action.investment.expenses.is_empty());
        // The primary total holds only the minerals.
        let minerals_cost = 200.0 * prices.get(Res::Minerals);
        assert!((action.investment.cost - minerals_cost).abs() < 1e-9);
    }

    #[test]
    fn non_repeatable_actions_pay_prerequisites_up_front() {
        let mut state = village();
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = village();
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        // Bolas needs Mining, unresearched.
        let action = ev.upgrade(Upgrade::Bolas, &[(Res::Minerals, 250.0), (Res::Wood, 50.0)]);
        assert_eq!(action.investment.expenses.len(), 1);
        assert_eq!(action.investment.expenses[0].name, "Mining");
        assert!(action.investment.also_required.is_empty());
    }

    #[test]
    fn storage_procurement_reverts_the_state() {
        let mut state = village();
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = village();
        let before = state2.clone();
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        // A purchase far beyond barn capacity forces storage procurement.
        let action = ev.building(
            Building::LogHouse,
            &[(Res::Wood, 200.0), (Res::Minerals, 250.0)],
            1.15,
            Some(0.0),
        );
        assert_eq!(state2.level, before.level);
        assert_eq!(state2.upgrades, before.upgrades);
        // Storage was either procured as expenses or flagged infeasible.
        assert!(action.investment.cost.is_finite() || !action.investment.expenses.is_empty());
    }

    #[test]
    fn assess_leaves_the_state_unchanged() {
        let mut state = village();
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = village();
        let before = state2.clone();
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        let action = ev.building(Building::CatnipField, &[(Res::Catnip, 10.0)], 1.12, Some(0.0));
        let assessed = ev.assess(action);
        assert_eq!(state2.level, before.level);
        assert!(assessed.roi > 0.0);
    }

    #[test]
    fn obsolete_buildings_are_unavailable() {
        let mut state = village();
        state.level.insert(Building::BroadcastTower, 1.0);
        let (convs, prices, sciences) = context(&mut state);
        let mut state2 = state.clone();
        let mut ev = Evaluator::new(&mut state2, &prices, &sciences, &convs);
        let action = ev.building(
            Building::Amphitheatre,
            &[(Res::Wood, 200.0), (Res::Minerals, 1200.0), (Res::Parchment, 3.0)],
            1.15,
            Some(0.0),
        );
        assert!(!action.available);
    }
}
