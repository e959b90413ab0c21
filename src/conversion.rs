//! Conversion of amounts between the supported currencies using a fixed
//! bilateral rate table.

use crate::models::Currency;

/// A bilateral exchange-rate table.
///
/// Rates are specified independently per direction and are not forced to be
/// reciprocal, so `rate(a, b)` is generally not `1 / rate(b, a)`. The table
/// is an explicit value injected into [AppState](crate::AppState) rather
/// than a process-wide constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    rates: [[f64; Currency::ALL.len()]; Currency::ALL.len()],
}

impl RateTable {
    /// Build a table from explicit rates, indexed `[from][to]` in the order
    /// of [Currency::ALL]. Diagonal entries are ignored, same-currency
    /// conversion is always the identity.
    pub fn new(rates: [[f64; Currency::ALL.len()]; Currency::ALL.len()]) -> Self {
        Self { rates }
    }

    /// The multiplier applied when converting `from` into `to`.
    pub fn rate(&self, from: Currency, to: Currency) -> f64 {
        if from == to {
            return 1.0;
        }

        self.rates[from.index()][to.index()]
    }

    /// Convert `amount` from one currency into another.
    ///
    /// Identity when `from == to`, otherwise a single floating-point
    /// multiplication by the table rate. No rounding is applied.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }

        amount * self.rate(from, to)
    }
}

impl Default for RateTable {
    /// The application's built-in rates.
    fn default() -> Self {
        // Indexed USD, AOA, EUR. These values are approximations and the
        // opposite directions are intentionally left as specified rather
        // than derived from each other.
        Self::new([
            [1.0, 830.0, 0.92],
            [0.0012, 1.0, 0.0011],
            [1.09, 900.0, 1.0],
        ])
    }
}
