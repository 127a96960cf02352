use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::num::{invert_tri_value, transcendence_ratio, tri_value};
use crate::types::{Building, Job, Metaphysic, Res, Science, Upgrade};

// ============================================================================
// Game State - the complete mutable snapshot
// ============================================================================

/// Faith / apocrypha progression counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[serde(default)]
pub struct FaithState {
    pub stored: f64,
    pub previously_stored: f64,
    pub apocrypha_points: f64,
    pub transcendence_level: f64,
}

/// The full game snapshot. Owned by the external state store; the engine
/// borrows it per report and patches it only inside reverted hypothetical
/// windows (plus the documented idle-worker fold, see `basic_production`).
///
/// Sparse-map leaves follow the absent-means-default contract: a missing
/// level/worker count is 0, a missing flag is false, a missing markup is 1,
/// a missing conversion proportion is 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct GameState {
    pub level: HashMap<Building, f64>,
    /// Only meaningful for `Building::activatable()`; absent means active.
    pub active: HashMap<Building, bool>,
    pub workers: HashMap<Job, f64>,
    pub upgrades: HashMap<Upgrade, bool>,
    pub metaphysic: HashMap<Metaphysic, bool>,
    pub researched: HashMap<Science, bool>,
    /// Luxury consumption toggles (fur, ivory, unicorn, alicorn).
    pub luxury: HashMap<Res, bool>,
    pub price_markup: HashMap<Res, f64>,
    pub conversion_proportion: HashMap<Res, f64>,
    pub paragon: f64,
    pub karma: f64,
    pub ships: f64,
    pub compendia: f64,
    /// Hypothetical extra population used by marginal worker pricing.
    pub extra_kittens: f64,
    pub leviathan_energy: f64,
    pub show_researched: bool,
    pub faith: FaithState,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, b: Building) -> f64 {
        self.level.get(&b).copied().unwrap_or(0.0)
    }

    /// Level counting a deactivated building as zero.
    pub fn active_level(&self, b: Building) -> f64 {
        if self.active.get(&b) == Some(&false) {
            0.0
        } else {
            self.level(b)
        }
    }

    pub fn workers(&self, j: Job) -> f64 {
        self.workers.get(&j).copied().unwrap_or(0.0)
    }

    pub fn has(&self, u: Upgrade) -> bool {
        self.upgrades.get(&u).copied().unwrap_or(false)
    }

    pub fn meta(&self, m: Metaphysic) -> bool {
        self.metaphysic.get(&m).copied().unwrap_or(false)
    }

    pub fn researched(&self, s: Science) -> bool {
        self.researched.get(&s).copied().unwrap_or(false)
    }

    pub fn luxury_on(&self, r: Res) -> bool {
        self.luxury.get(&r).copied().unwrap_or(false)
    }

    pub fn markup(&self, r: Res) -> f64 {
        self.price_markup.get(&r).copied().unwrap_or(1.0)
    }

    pub fn proportion(&self, r: Res) -> f64 {
        self.conversion_proportion.get(&r).copied().unwrap_or(0.0)
    }

    /// Population provided by housing.
    pub fn kittens(&self) -> f64 {
        self.level(Building::Hut) * 2.0
            + self.level(Building::LogHouse) * 1.0
            + self.level(Building::Mansion) * 1.0
            + self.level(Building::SpaceStation) * 2.0
            + self.level(Building::TerraformingStation) * 1.0
    }
}

// ============================================================================
// Faith & prestige operations
// ============================================================================

/// Multiplier the praise action applies to stored faith.
pub fn praise_bonus(state: &GameState) -> f64 {
    tri_value(state.faith.apocrypha_points, 0.1) * 0.1
}

pub fn set_praise_bonus(bonus: f64, state: &mut GameState) {
    state.faith.apocrypha_points = invert_tri_value(bonus / 0.1, 0.1);
}

/// Convert stored faith into apocrypha points. `undo` restores the faith
/// stored before the previous reset instead of zeroing it.
pub fn faith_reset(state: &mut GameState, undo: bool) {
    let newly_stored = if undo {
        state.faith.previously_stored
    } else {
        0.0
    };
    state.faith.previously_stored = state.faith.stored;
    state.faith.stored = newly_stored;

    let converted = state.faith.previously_stored - state.faith.stored;
    state.faith.apocrypha_points +=
        1.01 * (1.0 + state.faith.transcendence_level).powi(2) * converted * 1e-6;
}

/// Raise (or with negative `times`, lower) the transcendence level, paying
/// the marginal apocrypha cost.
pub fn transcend(state: &mut GameState, times: f64) {
    let old_level = state.faith.transcendence_level;
    let new_level = old_level + times;
    let cost = transcendence_ratio(new_level) - transcendence_ratio(old_level);

    state.faith.transcendence_level = new_level;
    state.faith.apocrypha_points -= cost;
}

/// Prestige reset: convert surplus population to paragon and start over,
/// keeping metaphysics, karma, paragon and the apocrypha side of faith.
pub fn reset(state: &mut GameState) {
    faith_reset(state, false);
    state.paragon += (state.kittens() - 70.0).max(0.0);

    let metaphysic = std::mem::take(&mut state.metaphysic);
    let faith = FaithState {
        apocrypha_points: state.faith.apocrypha_points,
        transcendence_level: state.faith.transcendence_level,
        ..FaithState::default()
    };
    *state = GameState {
        metaphysic,
        faith,
        karma: state.karma,
        paragon: state.paragon,
        ..GameState::default()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faith_reset_round_trips_with_undo() {
        let mut state = GameState::new();
        state.faith.stored = 4000.0;
        faith_reset(&mut state, false);
        assert_eq!(state.faith.stored, 0.0);
        assert!(state.faith.apocrypha_points > 0.0);
        faith_reset(&mut state, true);
        assert_eq!(state.faith.stored, 4000.0);
    }

    #[test]
    fn transcend_up_then_down_restores_apocrypha() {
        let mut state = GameState::new();
        state.faith.apocrypha_points = 1.0;
        transcend(&mut state, 2.0);
        transcend(&mut state, -2.0);
        assert!((state.faith.apocrypha_points - 1.0).abs() < 1e-12);
        assert_eq!(state.faith.transcendence_level, 0.0);
    }

    #[test]
    fn reset_awards_paragon_for_surplus_population() {
        let mut state = GameState::new();
        state.level.insert(Building::Hut, 50.0); // 100 kittens
        state.metaphysic.insert(Metaphysic::Engineering, true);
        reset(&mut state);
        assert_eq!(state.paragon, 30.0);
        assert!(state.meta(Metaphysic::Engineering));
        assert!(state.level.is_empty());
    }
}
