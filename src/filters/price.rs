//! Target price filter.

use super::Filter;
use crate::ah::Product;

/// Absorbs float rounding so that the tolerance boundary stays inclusive
/// (e.g. `|2.10 - 2.00|` evaluates slightly above `0.10`).
const PRICE_EPSILON: f64 = 1e-9;

/// Keeps products whose resolved price lies within `tolerance` of `target`.
///
/// Products without a resolvable price never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFilter {
    target: f64,
    tolerance: f64,
}

impl PriceFilter {
    /// Creates a filter around a target price. A negative tolerance matches nothing.
    pub fn around(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    /// Returns true if the price is within tolerance of the target.
    pub fn accepts(&self, price: f64) -> bool {
        self.tolerance >= 0.0 && (price - self.target).abs() <= self.tolerance + PRICE_EPSILON
    }
}

impl Filter for PriceFilter {
    fn matches(&self, product: &Product) -> bool {
        product.resolved_price().is_some_and(|price| self.accepts(price))
    }

    fn description(&self) -> String {
        format!("Price: €{:.2} ± €{:.2}", self.target, self.tolerance)
    }
}
