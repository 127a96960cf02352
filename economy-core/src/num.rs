// ============================================================================
// Saturating numeric helpers - many bonuses compound through these, so their
// exact shapes are part of the economy's contract.
// ============================================================================

/// Clamp `x` into `[min, max]`.
pub fn hard_limit(min: f64, x: f64, max: f64) -> f64 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Decreasing transform used for diminishing penalties: `1 - x` below 0.75,
/// then a hyperbola that never reaches zero.
pub fn hyperbolic_decrease(x: f64) -> f64 {
    if x < 0.75 {
        1.0 - x
    } else {
        0.25 / ((x - 0.5) / 0.25)
    }
}

/// Saturating transform: linear up to 75% of `limit`, then asymptotically
/// approaching `limit`.
pub fn hyperbolic_limit(x: f64, limit: f64) -> f64 {
    let mut a = x / limit;
    if a > 0.75 {
        a = 1.0 - 0.25 / ((a - 0.5) / 0.25);
    }
    a * limit
}

/// Triangular-number inverse: how many whole "stripes" fit into `value`.
pub fn tri_value(value: f64, stripe: f64) -> f64 {
    ((1.0 + 8.0 * value / stripe).sqrt() - 1.0) / 2.0
}

pub fn invert_tri_value(tri: f64, stripe: f64) -> f64 {
    (((tri * 2.0 + 1.0).powi(2) - 1.0) / 8.0) * stripe
}

/// Apocrypha cost curve for transcendence levels.
pub fn transcendence_ratio(level: f64) -> f64 {
    ((level.exp() / 5.0 + 1.0).powi(2) - 1.0) / 80.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_limit_clamps_both_ends() {
        assert_eq!(hard_limit(0.25, 0.1, 1.0), 0.25);
        assert_eq!(hard_limit(0.25, 0.5, 1.0), 0.5);
        assert_eq!(hard_limit(0.25, 2.0, 1.0), 1.0);
    }

    #[test]
    fn hyperbolic_limit_is_linear_below_knee() {
        assert!((hyperbolic_limit(100.0, 200.0) - 100.0).abs() < 1e-12);
        assert!((hyperbolic_limit(150.0, 200.0) - 150.0).abs() < 1e-12);
    }

    #[test]
    fn hyperbolic_limit_never_exceeds_cap() {
        for x in [160.0, 200.0, 1000.0, 1e9] {
            let y = hyperbolic_limit(x, 200.0);
            assert!(y < 200.0, "hyperbolic_limit({x}) = {y} exceeded cap");
        }
    }

    #[test]
    fn hyperbolic_limit_is_continuous_at_knee() {
        let below = hyperbolic_limit(149.999, 200.0);
        let above = hyperbolic_limit(150.001, 200.0);
        assert!((below - above).abs() < 1e-2);
    }

    #[test]
    fn tri_value_round_trips() {
        for v in [0.0, 1.0, 42.0, 1234.5] {
            let t = tri_value(v, 1000.0);
            let back = invert_tri_value(t, 1000.0);
            assert!((back - v).abs() < 1e-9, "round trip {v} -> {t} -> {back}");
        }
    }
}
