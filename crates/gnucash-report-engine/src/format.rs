//! Currency formatting for report cells.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as dollars: `$`, an optional minus sign, the integer part
/// grouped by thousands and exactly two decimals.
///
/// ```
/// use gnucash_report_engine::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123_450, 2)), "$1,234.50");
/// assert_eq!(format_currency(Decimal::new(-12, 0)), "$-12.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push('$');
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}
