use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::{Res, EPS};

/// ROI ratios beyond this are reported as infeasible rather than as a
/// misleadingly huge finite number.
pub const ROI_CEILING: f64 = 1e6;

// ============================================================================
// Expenditures & Investments - the cost/benefit line items
// ============================================================================

/// One resource line item, priced at evaluation time. Immutable once built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Tsify)]
pub struct Expenditure {
    pub amount: f64,
    pub res: Res,
    pub price: f64,
    pub cost: f64,
}

impl Expenditure {
    /// Panics on NaN amounts: that is a catalog bug, not a runtime condition.
    pub fn new(amount: f64, res: Res, price: f64) -> Self {
        assert!(!amount.is_nan(), "NaN amount for {res:?} in catalog data");
        Self {
            amount,
            res,
            price,
            cost: amount * price,
        }
    }
}

/// A named fixed cost (e.g. a storage upgrade bought on the side).
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
pub struct Expense {
    pub name: String,
    pub cost: f64,
}

/// Accumulated expenditures and expenses. `also_required` items are
/// informational: disclosed but not counted into `cost`, so repeatable
/// actions are not each charged a shared prerequisite's full price.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
pub struct Investment {
    pub cost: f64,
    pub expenditures: Vec<Expenditure>,
    pub expenses: Vec<Expense>,
    pub also_required: Vec<Expense>,
    pub also_required_cost: f64,
}

impl Investment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, xp: Expenditure) {
        if xp.cost.abs() > EPS || xp.amount.abs() > EPS {
            self.cost += xp.cost;
            self.expenditures.push(xp);
        }
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.cost += expense.cost;
        self.expenses.push(expense);
    }

    pub fn add_additional_requirement(&mut self, expense: Expense) {
        self.also_required_cost += expense.cost;
        self.also_required.push(expense);
    }
}

/// Investment/return pair. `instantaneous` analyses resolve in one
/// evaluation; ongoing ones are already folded into basic production.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
pub struct CostBenefitAnalysis {
    pub investment: Investment,
    #[serde(rename = "return")]
    pub ret: Investment,
    pub instantaneous: bool,
}

/// Investment cost over return cost; +inf for valueless or absurd ratios so
/// bad actions sort last without NaN or divide-by-zero noise.
pub fn roi(investment_cost: f64, return_cost: f64) -> f64 {
    let ratio = investment_cost / return_cost;
    if return_cost <= 0.0 || ratio > ROI_CEILING {
        f64::INFINITY
    } else {
        ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_expenditures_are_dropped() {
        let mut inv = Investment::new();
        inv.add(Expenditure::new(1e-9, Res::Catnip, 1e-3));
        assert!(inv.expenditures.is_empty());
        assert_eq!(inv.cost, 0.0);

        inv.add(Expenditure::new(10.0, Res::Catnip, 2.0));
        assert_eq!(inv.cost, 20.0);
    }

    #[test]
    fn roi_is_infinite_for_nonpositive_or_absurd_returns() {
        assert_eq!(roi(10.0, 0.0), f64::INFINITY);
        assert_eq!(roi(10.0, -5.0), f64::INFINITY);
        assert_eq!(roi(1e12, 1.0), f64::INFINITY);
        assert!((roi(10.0, 5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "NaN amount")]
    fn nan_amount_is_a_catalog_bug() {
        Expenditure::new(f64::NAN, Res::Wood, 1.0);
    }
}
