//! Percentage-of-total shares.
//!
//! Shares are computed in decimal arithmetic and only converted to `f64` at
//! the end, so the shares of a fully covered scope add up to one. A zero
//! total yields zero shares rather than `NaN`.

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// The share of `value` in `total`, between 0 and 1.
///
/// Returns 0 when `total` is not positive.
pub fn share_of(value: Decimal, total: Decimal) -> f64 {
    if total <= Decimal::ZERO {
        return 0.0;
    }

    value
        .checked_div(total)
        .and_then(|share| share.to_f64())
        .unwrap_or(0.0)
}

/// The shares of each value in the sum of all values.
///
/// The result is in the same order as `values`.
pub fn distribute(values: &[Decimal]) -> Vec<f64> {
    let total: Decimal = values.iter().sum();

    values.iter().map(|value| share_of(*value, total)).collect()
}
