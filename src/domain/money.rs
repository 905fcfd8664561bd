//! Monetary types for price and amount representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Base-asset quantity represented as a Decimal for precision.
pub type Amount = Decimal;

/// Decimal places venues quote prices with.
pub const PRICE_SCALE: u32 = 8;

/// Round a price to the venue quoting precision.
#[must_use]
pub fn quote(price: Price) -> Price {
    price.round_dp(PRICE_SCALE)
}

/// Convert a floating point close price into a quoted decimal price.
///
/// Returns `None` for non-finite input.
#[must_use]
pub fn price_from_f64(value: f64) -> Option<Price> {
    Decimal::from_f64_retain(value).map(quote)
}
