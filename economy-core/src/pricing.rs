use std::collections::HashMap;

use crate::cba::Expenditure;
use crate::conversion::Conversion;
use crate::patch::{delta, StateUpdate};
use crate::production::basic_production;
use crate::state::GameState;
use crate::types::{Building, Job, Res};

// ============================================================================
// Shadow Prices - everything valued in kitten-seconds of labor
// ============================================================================

/// The numeraire: one second of one kitten's labor.
pub const WAGE: f64 = 1.0;

/// Marginal shadow price per resource. Complete after construction; a lookup
/// miss is a catalog bug, not a runtime condition.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<Res, f64>,
}

impl PriceTable {
    pub fn get(&self, res: Res) -> f64 {
        *self
            .prices
            .get(&res)
            .unwrap_or_else(|| panic!("no price derived for {res:?}"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Res, f64)> + '_ {
        Res::all().filter_map(|r| self.prices.get(&r).map(|&p| (r, p)))
    }
}

/// Marginal output of `res` from assigning one more kitten to `job`. The
/// extra kitten is hypothetical population, so the idle-worker fold does not
/// steal it back into farming.
pub fn worker_production(state: &mut GameState, job: Job, res: Res) -> f64 {
    let change = StateUpdate {
        workers: vec![(job, state.workers(job) + 1.0)],
        extra_kittens: Some(1.0),
        ..StateUpdate::default()
    };
    delta(state, basic_production, &change).get(res)
}

/// Iron is priced on the margin of one more smelter: the forgone wood and
/// minerals plus a maintenance term, spread over the marginal iron output.
/// Below the pivot the maintenance share scales down so early smelters are
/// not priced out of reach.
fn iron_price(state: &mut GameState, wood_price: f64, minerals_price: f64) -> f64 {
    let smelter = delta(
        state,
        basic_production,
        &StateUpdate::level(Building::Smelter, state.level(Building::Smelter) + 1.0),
    );
    let input_cost =
        -smelter.get(Res::Wood) * wood_price - smelter.get(Res::Minerals) * minerals_price;
    let maintenance = state.markup(Res::Iron);
    let pivot = 0.01;
    let cost = if maintenance < pivot {
        input_cost * maintenance / pivot
    } else {
        input_cost + maintenance
    };
    cost / smelter.get(Res::Iron)
}

/// Build the complete price table and, as a side effect, fill in each
/// conversion's investment and return. Basic resources are priced off labor
/// margins and markups; converted resources resolve recursively through
/// their producing conversion, memoized in the table.
pub fn compute_prices(state: &mut GameState, conversions: &mut [Conversion]) -> PriceTable {
    let mut prices: HashMap<Res, f64> = HashMap::new();

    let gold_price = 10.0 * state.markup(Res::Gold);
    prices.insert(Res::Gold, gold_price);
    prices.insert(
        Res::Catnip,
        WAGE / worker_production(state, Job::Farmer, Res::Catnip),
    );
    let wood_price = WAGE / worker_production(state, Job::Woodcutter, Res::Wood);
    prices.insert(Res::Wood, wood_price);
    let minerals_price = WAGE / worker_production(state, Job::Miner, Res::Minerals);
    prices.insert(Res::Minerals, minerals_price);
    prices.insert(Res::Uranium, 100.0 * state.markup(Res::Uranium));
    prices.insert(Res::Unobtainium, 1000.0 * state.markup(Res::Unobtainium));
    // A geologist digs up gold on the side; coal only carries the wage left
    // over after that gold is credited.
    let geologist_gold = gold_price * worker_production(state, Job::Geologist, Res::Gold);
    prices.insert(
        Res::Coal,
        (WAGE - geologist_gold).max(0.0) / worker_production(state, Job::Geologist, Res::Coal)
            * state.markup(Res::Coal),
    );
    prices.insert(Res::Oil, 5.0 * state.markup(Res::Oil));
    prices.insert(
        Res::Catpower,
        WAGE / worker_production(state, Job::Hunter, Res::Catpower),
    );
    prices.insert(
        Res::Science,
        WAGE / worker_production(state, Job::Scholar, Res::Science),
    );
    prices.insert(Res::Culture, state.markup(Res::Culture));
    prices.insert(
        Res::Faith,
        WAGE / worker_production(state, Job::Priest, Res::Faith) * state.markup(Res::Faith),
    );
    prices.insert(Res::Unicorn, state.markup(Res::Unicorn));
    prices.insert(Res::Alicorn, 20000.0 * state.markup(Res::Alicorn));
    prices.insert(
        Res::Necrocorn,
        20000.0 * state.markup(Res::Alicorn) + 30000.0 * state.markup(Res::Necrocorn),
    );
    prices.insert(Res::Antimatter, 5000.0 * state.markup(Res::Antimatter));
    prices.insert(Res::Starchart, 1000.0 * state.markup(Res::Starchart));
    prices.insert(Res::Iron, iron_price(state, wood_price, minerals_price));
    // Hunts flood the market with ivory whether anyone wants it or not.
    prices.insert(Res::Ivory, 0.0);

    // Converted resources: the last conversion producing a resource is its
    // price initializer. Product markups are read up front so the recursive
    // resolution below never needs the state again.
    let mut initializer: HashMap<Res, usize> = HashMap::new();
    let mut markups: HashMap<Res, f64> = HashMap::new();
    for (i, conv) in conversions.iter().enumerate() {
        initializer.insert(conv.product, i);
        markups.insert(conv.product, state.markup(conv.product));
    }
    for i in 0..conversions.len() {
        initialize_conversion(i, &mut prices, conversions, &initializer, &markups);
    }

    PriceTable { prices }
}

fn price_for(
    res: Res,
    prices: &mut HashMap<Res, f64>,
    conversions: &mut [Conversion],
    initializer: &HashMap<Res, usize>,
    markups: &HashMap<Res, f64>,
) -> f64 {
    if let Some(&i) = initializer.get(&res) {
        initialize_conversion(i, prices, conversions, initializer, markups);
    }
    *prices
        .get(&res)
        .unwrap_or_else(|| panic!("no price or conversion derives {res:?}"))
}

/// Price a conversion's product and record its cost/benefit breakdown.
/// Recursion over conversion indices instead of the structs themselves, so a
/// chain like blueprint -> compendium -> manuscript -> parchment resolves
/// without aliasing the slice. A resource priced before its conversion runs
/// (iron, uranium) keeps that price; the conversion still records its
/// breakdown at the kept price.
fn initialize_conversion(
    i: usize,
    prices: &mut HashMap<Res, f64>,
    conversions: &mut [Conversion],
    initializer: &HashMap<Res, usize>,
    markups: &HashMap<Res, f64>,
) {
    if conversions[i].initialized {
        return;
    }
    // Mark first: a cycle in the conversion declarations would otherwise
    // recurse forever instead of surfacing as a missing price.
    conversions[i].initialized = true;

    let product = conversions[i].product;
    let inputs = conversions[i].inputs.clone();
    let produced = conversions[i].currently_produced.clone();

    let mut cost = 0.0;
    let mut benefit = 0.0;
    let mut investment_items = Vec::new();
    for &(res, amount) in &inputs {
        let price = price_for(res, prices, conversions, initializer, markups);
        cost += amount * price;
        investment_items.push(Expenditure::new(amount, res, price));
    }

    // Byproducts count against (negative) or toward (positive) the product's
    // price; iterate in canonical resource order for stable report output.
    let mut return_items = Vec::new();
    for res in Res::all() {
        if res == product || !produced.contains(res) {
            continue;
        }
        let quantity = produced.get(res);
        if quantity == 0.0 {
            continue;
        }
        let price = price_for(res, prices, conversions, initializer, markups);
        if quantity < 0.0 {
            cost -= quantity * price;
        } else {
            benefit += quantity * price;
        }
        return_items.push(Expenditure::new(quantity, res, price));
    }

    let output = produced.get(product);
    let existing = prices.get(&product).copied().unwrap_or(0.0);
    let price = if existing != 0.0 {
        existing
    } else {
        let markup = markups.get(&product).copied().unwrap_or(1.0);
        ((cost * markup - benefit) / output).max(0.0)
    };
    prices.insert(product, price);

    for xp in investment_items {
        conversions[i].investment.add(xp);
    }
    for xp in return_items {
        conversions[i].ret.add(xp);
    }
    conversions[i]
        .ret
        .add(Expenditure::new(output, product, price));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::conversion_list;

    fn hamlet() -> GameState {
        let mut state = GameState::new();
        state.level.insert(Building::Hut, 6.0);
        state.workers.insert(Job::Farmer, 4.0);
        state
    }

    #[test]
    fn catnip_price_is_wage_over_marginal_farmer_output() {
        let mut state = hamlet();
        let marginal = worker_production(&mut state, Job::Farmer, Res::Catnip);
        let mut convs = conversion_list(&mut state);
        let prices = compute_prices(&mut state, &mut convs);
        assert!((prices.get(Res::Catnip) - WAGE / marginal).abs() < 1e-12);
    }

    #[test]
    fn worker_pricing_leaves_the_state_unchanged() {
        let mut state = hamlet();
        let mut convs = conversion_list(&mut state);
        compute_prices(&mut state, &mut convs);
        assert_eq!(state.workers(Job::Farmer), 4.0);
        assert_eq!(state.extra_kittens, 0.0);
    }

    #[test]
    fn ivory_is_free() {
        let mut state = hamlet();
        let mut convs = conversion_list(&mut state);
        let prices = compute_prices(&mut state, &mut convs);
        assert_eq!(prices.get(Res::Ivory), 0.0);
    }

    #[test]
    fn converted_resources_chain_their_input_prices() {
        let mut state = hamlet();
        let mut convs = conversion_list(&mut state);
        let prices = compute_prices(&mut state, &mut convs);
        // A slab costs at least its 250 minerals, a beam its 175 wood.
        assert!(prices.get(Res::Slab) > 0.0);
        assert!(prices.get(Res::Beam) >= 175.0 * prices.get(Res::Wood) - 1e-9);
        // A megalith chains through slab, beam and plate.
        assert!(prices.get(Res::Megalith) > prices.get(Res::Slab) * 50.0);
    }

    #[test]
    fn preset_prices_survive_their_conversion() {
        let mut state = hamlet();
        let mut convs = conversion_list(&mut state);
        let prices = compute_prices(&mut state, &mut convs);
        // Uranium is priced as a basic resource even though the dragon trade
        // also produces it.
        assert_eq!(prices.get(Res::Uranium), 100.0);
    }
}
