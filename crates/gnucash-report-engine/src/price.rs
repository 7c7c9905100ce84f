//! Commodity prices as of a report date.
//!
//! Prices come from the book's price database, already grouped by commodity
//! and sorted by date in the [`LedgerIndex`]. A lookup returns the most recent
//! quote on or before the requested date.

use chrono::NaiveDate;
use gnucash_report_core::LedgerIndex;
use rust_decimal::Decimal;

/// Commodity id that is always worth exactly one unit.
pub const BASE_CURRENCY: &str = "USD";

/// A price together with the date of the quote it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    /// Price per unit.
    pub price: Decimal,
    /// Date of the quote, absent for the base currency and for missing prices.
    pub date: Option<NaiveDate>,
}

impl PricePoint {
    /// The price of the base currency.
    pub const UNIT: Self = Self {
        price: Decimal::ONE,
        date: None,
    };

    /// The price used when no quote exists.
    pub const MISSING: Self = Self {
        price: Decimal::ZERO,
        date: None,
    };
}

/// Price lookups over a ledger's price database.
#[derive(Debug, Clone, Copy)]
pub struct PriceDatabase<'a> {
    index: &'a LedgerIndex<'a>,
}

impl<'a> PriceDatabase<'a> {
    /// Create a price database backed by `index`.
    pub const fn new(index: &'a LedgerIndex<'a>) -> Self {
        Self { index }
    }

    /// Price of one unit of `commodity_id` as of `date`.
    ///
    /// The base currency is always 1. Otherwise the latest quote dated on or
    /// before `date` is used; when several quotes share that date the one
    /// declared last in the book wins. With no such quote the price is zero.
    pub fn price_as_of(&self, commodity_id: &str, date: NaiveDate) -> PricePoint {
        if commodity_id == BASE_CURRENCY {
            return PricePoint::UNIT;
        }

        let quotes = self.index.prices(commodity_id);
        let upto = quotes.partition_point(|quote| quote.date <= date);
        if let Some(quote) = upto.checked_sub(1).and_then(|i| quotes.get(i)) {
            PricePoint {
                price: quote.value,
                date: Some(quote.date),
            }
        } else {
            tracing::debug!(commodity = commodity_id, %date, "no price on or before date; using 0");
            PricePoint::MISSING
        }
    }
}
