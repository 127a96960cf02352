use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::state::GameState;
use crate::types::{Building, Cart, Job, Metaphysic, Res, Science, Upgrade};

// ============================================================================
// State Patch Engine - apply a partial update in place, get a memento back
// ============================================================================

/// A partial update of `GameState`: every leaf is optional, map-shaped leaves
/// list exactly the entries to overwrite. Applying an update returns another
/// `StateUpdate` (the memento) that holds the previous values of the touched
/// leaves; applying the memento restores them.
///
/// Cloning the full state instead would be safer, but mementos are taken
/// hundreds of times per report, so the patch must run in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct StateUpdate {
    pub level: Vec<(Building, f64)>,
    pub active: Vec<(Building, bool)>,
    pub workers: Vec<(Job, f64)>,
    pub upgrades: Vec<(Upgrade, bool)>,
    pub metaphysic: Vec<(Metaphysic, bool)>,
    pub researched: Vec<(Science, bool)>,
    pub luxury: Vec<(Res, bool)>,
    pub conversion_proportion: Vec<(Res, f64)>,
    pub paragon: Option<f64>,
    pub ships: Option<f64>,
    pub compendia: Option<f64>,
    pub extra_kittens: Option<f64>,
    pub leviathan_energy: Option<f64>,
    pub faith: FaithUpdate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(default)]
pub struct FaithUpdate {
    pub stored: Option<f64>,
    pub previously_stored: Option<f64>,
    pub apocrypha_points: Option<f64>,
    pub transcendence_level: Option<f64>,
}

impl StateUpdate {
    pub fn level(b: Building, new_level: f64) -> Self {
        Self {
            level: vec![(b, new_level)],
            ..Self::default()
        }
    }

    pub fn worker(j: Job, count: f64) -> Self {
        Self {
            workers: vec![(j, count)],
            ..Self::default()
        }
    }

    pub fn upgrade(u: Upgrade, on: bool) -> Self {
        Self {
            upgrades: vec![(u, on)],
            ..Self::default()
        }
    }

    pub fn luxury(r: Res, on: bool) -> Self {
        Self {
            luxury: vec![(r, on)],
            ..Self::default()
        }
    }
}

/// Overwrite the leaves named by `update` and return a memento restoring
/// them. Map entries absent before the patch are remembered as their default
/// value (0 / false), which is indistinguishable under the absent-means-
/// default contract. The memento must be applied at most once.
pub fn apply(state: &mut GameState, update: &StateUpdate) -> StateUpdate {
    let mut memento = StateUpdate::default();

    for &(b, v) in &update.level {
        memento
            .level
            .push((b, state.level.insert(b, v).unwrap_or(0.0)));
    }
    for &(b, v) in &update.active {
        memento
            .active
            .push((b, state.active.insert(b, v).unwrap_or(true)));
    }
    for &(j, v) in &update.workers {
        memento
            .workers
            .push((j, state.workers.insert(j, v).unwrap_or(0.0)));
    }
    for &(u, v) in &update.upgrades {
        memento
            .upgrades
            .push((u, state.upgrades.insert(u, v).unwrap_or(false)));
    }
    for &(m, v) in &update.metaphysic {
        memento
            .metaphysic
            .push((m, state.metaphysic.insert(m, v).unwrap_or(false)));
    }
    for &(s, v) in &update.researched {
        memento
            .researched
            .push((s, state.researched.insert(s, v).unwrap_or(false)));
    }
    for &(r, v) in &update.luxury {
        memento
            .luxury
            .push((r, state.luxury.insert(r, v).unwrap_or(false)));
    }
    for &(r, v) in &update.conversion_proportion {
        memento
            .conversion_proportion
            .push((r, state.conversion_proportion.insert(r, v).unwrap_or(0.0)));
    }

    if let Some(v) = update.paragon {
        memento.paragon = Some(std::mem::replace(&mut state.paragon, v));
    }
    if let Some(v) = update.ships {
        memento.ships = Some(std::mem::replace(&mut state.ships, v));
    }
    if let Some(v) = update.compendia {
        memento.compendia = Some(std::mem::replace(&mut state.compendia, v));
    }
    if let Some(v) = update.extra_kittens {
        memento.extra_kittens = Some(std::mem::replace(&mut state.extra_kittens, v));
    }
    if let Some(v) = update.leviathan_energy {
        memento.leviathan_energy = Some(std::mem::replace(&mut state.leviathan_energy, v));
    }
    if let Some(v) = update.faith.stored {
        memento.faith.stored = Some(std::mem::replace(&mut state.faith.stored, v));
    }
    if let Some(v) = update.faith.previously_stored {
        memento.faith.previously_stored =
            Some(std::mem::replace(&mut state.faith.previously_stored, v));
    }
    if let Some(v) = update.faith.apocrypha_points {
        memento.faith.apocrypha_points =
            Some(std::mem::replace(&mut state.faith.apocrypha_points, v));
    }
    if let Some(v) = update.faith.transcendence_level {
        memento.faith.transcendence_level =
            Some(std::mem::replace(&mut state.faith.transcendence_level, v));
    }

    memento
}

/// Scoped hypothetical window: apply `update`, run `f`, revert. The revert
/// happens on every non-panicking exit path.
pub fn with_patch<T>(
    state: &mut GameState,
    update: &StateUpdate,
    f: impl FnOnce(&mut GameState) -> T,
) -> T {
    let memento = apply(state, update);
    let result = f(state);
    apply(state, &memento);
    result
}

/// Marginal delta of `metric` under `change`: per-resource difference between
/// the patched and unpatched outputs, over the keys the baseline reports.
/// The state is reverted before returning.
pub fn delta(
    state: &mut GameState,
    mut metric: impl FnMut(&mut GameState) -> Cart,
    change: &StateUpdate,
) -> Cart {
    let original = metric(state);
    let modified = with_patch(state, change, &mut metric);
    original
        .iter()
        .map(|(r, v)| (r, modified.get(r) - v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_then_memento_restores_touched_leaves() {
        let mut state = GameState::new();
        state.level.insert(Building::Smelter, 3.0);
        state.workers.insert(Job::Miner, 5.0);
        state.paragon = 12.0;

        let update = StateUpdate {
            level: vec![(Building::Smelter, 4.0), (Building::Hut, 1.0)],
            workers: vec![(Job::Miner, 6.0)],
            paragon: Some(50.0),
            faith: FaithUpdate {
                stored: Some(99.0),
                ..FaithUpdate::default()
            },
            ..StateUpdate::default()
        };

        let memento = apply(&mut state, &update);
        assert_eq!(state.level(Building::Smelter), 4.0);
        assert_eq!(state.level(Building::Hut), 1.0);
        assert_eq!(state.workers(Job::Miner), 6.0);
        assert_eq!(state.paragon, 50.0);
        assert_eq!(state.faith.stored, 99.0);

        apply(&mut state, &memento);
        assert_eq!(state.level(Building::Smelter), 3.0);
        assert_eq!(state.level(Building::Hut), 0.0);
        assert_eq!(state.workers(Job::Miner), 5.0);
        assert_eq!(state.paragon, 12.0);
        assert_eq!(state.faith.stored, 0.0);
    }

    #[test]
    fn with_patch_reverts_after_closure() {
        let mut state = GameState::new();
        let seen = with_patch(
            &mut state,
            &StateUpdate::level(Building::Mine, 2.0),
            |s| s.level(Building::Mine),
        );
        assert_eq!(seen, 2.0);
        assert_eq!(state.level(Building::Mine), 0.0);
    }
}
