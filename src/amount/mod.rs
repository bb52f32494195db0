//! Monetary amount conversion.
//!
//! # Responsibilities
//! - Convert between display units (whole coins) and base units (10^-12 coin)
//! - Reject amounts outside the unsigned 64-bit base-unit range
//! - Guarantee exact round-trips for any integer base-unit value
//!
//! # Design Decisions
//! - `rust_decimal` everywhere; floating point is never used for money
//! - Rounding is banker's (half-to-even), applied only when scaling up

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Base units per display unit (10^12).
pub const SCALE: u64 = 1_000_000_000_000;

/// Errors from amount conversion.
#[derive(Debug, Error)]
pub enum AmountError {
    /// The converted value is negative or does not fit in u64 base units.
    #[error("amount {0} is outside the representable base-unit range")]
    OutOfRange(Decimal),
}

fn scale() -> Decimal {
    Decimal::from(SCALE)
}

/// Convert a display-unit amount to integer base units.
///
/// Rounds to the nearest base unit using banker's rounding. Fails if the
/// result is negative or does not fit in 64 unsigned bits.
pub fn to_base_units(amount: Decimal) -> Result<u64, AmountError> {
    let scaled = amount
        .checked_mul(scale())
        .ok_or(AmountError::OutOfRange(amount))?;
    let rounded = scaled.round();
    if rounded.is_sign_negative() {
        return Err(AmountError::OutOfRange(amount));
    }
    rounded.to_u64().ok_or(AmountError::OutOfRange(amount))
}

/// Convert integer base units to a display-unit amount.
///
/// Exact for every u64 input; zero maps to exact `Decimal::ZERO`.
pub fn to_display_units(base: u64) -> Decimal {
    if base == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(base) / scale()
}
