//! Conversions between the decimal amounts used at the API surface and the
//! integer minor units stored in the database.
//!
//! Balances and transaction amounts are stored as integer minor units
//! (hundredths) so that the conditional balance update in the ledger is exact
//! integer arithmetic inside SQLite. Binary floating point is never used for
//! money.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

/// The number of decimal places supported for monetary amounts.
const SCALE: u32 = 2;

/// Convert a decimal amount to integer minor units.
///
/// # Errors
/// Returns [Error::Validation] if `amount` has more than two decimal places
/// or does not fit in an `i64` after scaling.
pub fn to_minor_units(amount: Decimal) -> Result<i64, Error> {
    let scaled = amount
        .checked_mul(Decimal::from(100))
        .ok_or_else(|| Error::Validation("amount is out of range".to_owned()))?;

    if scaled.fract() != Decimal::ZERO {
        return Err(Error::Validation(
            "amount must have at most 2 decimal places".to_owned(),
        ));
    }

    scaled
        .to_i64()
        .ok_or_else(|| Error::Validation("amount is out of range".to_owned()))
}

/// Convert integer minor units back into a decimal amount with two decimal
/// places, e.g. `10000` becomes `100.00`.
pub fn from_minor_units(units: i64) -> Decimal {
    Decimal::new(units, SCALE)
}
