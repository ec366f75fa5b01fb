//! Rounding conventions shared by every component.
//!
//! Amounts are kept exact while they flow through the engine and are
//! rounded to cents only where they leave it. Equality-to-zero checks
//! use a fixed tolerance band of one cent.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of decimal places every output amount is rounded to.
pub const CENTS_SCALE: u32 = 2;

/// Band within which a balance counts as settled: one cent.
pub const TOLERANCE: Decimal = dec!(0.01);

/// Round to two decimal places, halves away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `amount` lies within `[-TOLERANCE, +TOLERANCE]`.
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= TOLERANCE
}

/// True when `a` and `b` differ by at most `tolerance`.
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}
