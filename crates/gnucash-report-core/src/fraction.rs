//! Exact parsing of GNUCash rational numbers.
//!
//! GNUCash stores every split value, split quantity and price as a
//! `numerator/denominator` string such as `12345/100`. Denominators are almost
//! always powers of ten (the commodity's smallest currency unit), in which case
//! the conversion to [`Decimal`] is exact. Other denominators are divided out
//! with the full 28 significant digits `Decimal` offers.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest scale a [`Decimal`] can carry.
const MAX_SCALE: u32 = 28;

/// Errors that can occur while parsing a fraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionError {
    /// The text is not of the form `integer` or `integer/integer`.
    #[error("malformed fraction: {0:?}")]
    Malformed(String),
    /// The denominator is zero.
    #[error("zero denominator in fraction: {0:?}")]
    ZeroDenominator(String),
    /// The value does not fit into a decimal.
    #[error("fraction out of range: {0:?}")]
    Overflow(String),
}

/// Parse a `numerator/denominator` string into a decimal.
///
/// A bare integer is accepted as a fraction with denominator one.
///
/// # Examples
///
/// ```
/// use gnucash_report_core::parse_fraction;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_fraction("12345/100").unwrap(), dec!(123.45));
/// assert_eq!(parse_fraction("-5/1").unwrap(), dec!(-5));
/// assert_eq!(parse_fraction("42").unwrap(), dec!(42));
/// ```
pub fn parse_fraction(text: &str) -> Result<Decimal, FractionError> {
    let trimmed = text.trim();
    let (numerator, denominator) = trimmed.split_once('/').unwrap_or((trimmed, "1"));

    let malformed = || FractionError::Malformed(text.to_string());
    let mut numerator: i128 = numerator.trim().parse().map_err(|_| malformed())?;
    let mut denominator: i128 = denominator.trim().parse().map_err(|_| malformed())?;

    if denominator == 0 {
        return Err(FractionError::ZeroDenominator(text.to_string()));
    }
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }

    let overflow = || FractionError::Overflow(text.to_string());
    if let Some(scale) = decimal_scale(denominator) {
        return Decimal::try_from_i128_with_scale(numerator, scale).map_err(|_| overflow());
    }

    let numerator = Decimal::try_from_i128_with_scale(numerator, 0).map_err(|_| overflow())?;
    let denominator = Decimal::try_from_i128_with_scale(denominator, 0).map_err(|_| overflow())?;
    numerator
        .checked_div(denominator)
        .map(|value| value.normalize())
        .ok_or_else(overflow)
}

/// Number of decimal places represented by `denominator` if it is a power of ten.
fn decimal_scale(mut denominator: i128) -> Option<u32> {
    let mut scale = 0;
    while denominator % 10 == 0 {
        denominator /= 10;
        scale += 1;
    }
    (denominator == 1 && scale <= MAX_SCALE).then_some(scale)
}
