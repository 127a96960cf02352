use wasm_bindgen::prelude::*;

mod actions;
mod catalog;
mod cba;
mod conversion;
mod num;
mod patch;
mod pricing;
mod production;
mod report;
mod science;
mod state;
mod types;

pub use actions::*;
pub use cba::*;
pub use conversion::*;
pub use num::*;
pub use patch::*;
pub use pricing::*;
pub use production::*;
pub use report::*;
pub use science::*;
pub use state::*;
pub use types::*;

// ============================================================================
// WASM API - Economy
// ============================================================================

#[wasm_bindgen]
pub struct Economy {
    state: GameState,
}

#[wasm_bindgen]
impl Economy {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        Self {
            state: GameState::new(),
        }
    }

    /// Replace the whole state, e.g. from a persisted save.
    #[wasm_bindgen]
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// Load a state from its JSON form, e.g. a save exported as text.
    #[wasm_bindgen]
    pub fn set_state_json(&mut self, json: &str) {
        self.state = serde_json::from_str(json).unwrap_or_default();
    }

    /// Snapshot of the current state for persistence or display.
    #[wasm_bindgen]
    pub fn get_state(&self) -> GameState {
        self.state.clone()
    }

    /// Commit a partial update (a purchased action's effect, a manual edit)
    /// and return the memento that undoes it.
    #[wasm_bindgen]
    pub fn apply_update(&mut self, update: StateUpdate) -> StateUpdate {
        patch::apply(&mut self.state, &update)
    }

    /// Build the full decision-support report for the current state.
    #[wasm_bindgen]
    pub fn report(&mut self) -> EconomyReport {
        report::economy_report(&mut self.state)
    }

    /// Prestige reset: surplus population becomes paragon.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        state::reset(&mut self.state);
    }

    /// Convert stored faith to apocrypha points; `undo` restores the
    /// previously stored faith instead.
    #[wasm_bindgen]
    pub fn faith_reset(&mut self, undo: bool) {
        state::faith_reset(&mut self.state, undo);
    }

    /// Raise (or lower, with negative `times`) the transcendence level.
    #[wasm_bindgen]
    pub fn transcend(&mut self, times: f64) {
        state::transcend(&mut self.state, times);
    }

    #[wasm_bindgen]
    pub fn praise_bonus(&self) -> f64 {
        state::praise_bonus(&self.state)
    }

    #[wasm_bindgen]
    pub fn set_praise_bonus(&mut self, bonus: f64) {
        state::set_praise_bonus(bonus, &mut self.state);
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_update_returns_a_working_memento() {
        let mut economy = Economy::new();
        let update = StateUpdate {
            level: vec![(Building::Hut, 3.0)],
            workers: vec![(Job::Farmer, 5.0)],
            ..StateUpdate::default()
        };
        let memento = economy.apply_update(update);
        assert_eq!(economy.get_state().level(Building::Hut), 3.0);

        economy.apply_update(memento);
        assert_eq!(economy.get_state().level(Building::Hut), 0.0);
        assert_eq!(economy.get_state().workers(Job::Farmer), 0.0);
    }

    #[test]
    fn report_runs_end_to_end_on_a_fresh_state() {
        let mut economy = Economy::new();
        economy.apply_update(StateUpdate {
            level: vec![(Building::Hut, 5.0), (Building::Barn, 1.0)],
            workers: vec![(Job::Farmer, 4.0)],
            ..StateUpdate::default()
        });
        let report = economy.report();
        assert!(!report.actions.is_empty());
        assert!(!report.conversions.is_empty());
        assert!(!report.sciences.is_empty());
    }

    #[test]
    fn transcend_spends_apocrypha() {
        let mut economy = Economy::new();
        let mut update = StateUpdate::default();
        update.faith.apocrypha_points = Some(10.0);
        economy.apply_update(update);
        economy.transcend(1.0);
        let state = economy.get_state();
        assert_eq!(state.faith.transcendence_level, 1.0);
        assert!(state.faith.apocrypha_points < 10.0);
    }
}
