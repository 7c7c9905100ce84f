//! Totals by commodity namespace.
//!
//! The category report re-keys a balance report by the namespace of each
//! account's commodity (`CURRENCY`, `NYSE`, `MUTF`, ...). Only an account's
//! own value is counted, so nested accounts are never counted twice.

use chrono::NaiveDate;
use gnucash_report_core::LedgerIndex;
use rust_decimal::Decimal;

use crate::format::format_currency;
use crate::pivot::DATE_FORMAT;
use crate::report::{Report, ReportSet};
use crate::table::{Cell, Table};

/// Value per commodity namespace on one report date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    /// The report date.
    pub date: NaiveDate,
    totals: Vec<(String, Decimal)>,
}

impl CategoryTotals {
    /// Every namespace with its total, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.totals.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Total for one namespace.
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    /// Sum over all namespaces.
    pub fn sum(&self) -> Decimal {
        self.totals.iter().map(|(_, total)| *total).sum()
    }

    fn add(&mut self, category: &str, value: Decimal) {
        if let Some((_, total)) = self.totals.iter_mut().find(|(name, _)| name == category) {
            *total += value;
        } else {
            self.totals.push((category.to_string(), value));
        }
    }
}

/// Bucket every node of `report` by its commodity namespace.
///
/// All namespaces declared in the ledger are present, starting at zero. Nodes
/// without a commodity snapshot contribute nothing.
pub fn category_totals(report: &Report, index: &LedgerIndex<'_>) -> CategoryTotals {
    let mut totals = CategoryTotals {
        date: report.end,
        totals: index
            .categories()
            .iter()
            .map(|category| ((*category).to_string(), Decimal::ZERO))
            .collect(),
    };

    for node in report.nodes() {
        if let Some(commodity) = &node.commodity {
            totals.add(&commodity.category, node.value);
        }
    }
    totals
}

/// Build the category table: a header of namespaces, then one row per report.
pub fn category_table(reports: &ReportSet, index: &LedgerIndex<'_>) -> Table {
    let all: Vec<CategoryTotals> = reports
        .iter()
        .map(|report| category_totals(report, index))
        .collect();

    // Namespaces only seen on nodes extend the header after the declared ones.
    let mut categories: Vec<String> = index.categories().iter().map(|c| (*c).to_string()).collect();
    for totals in &all {
        for (category, _) in totals.iter() {
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
    }

    let header = vec![std::iter::once(None)
        .chain(categories.iter().cloned().map(Some))
        .collect::<Vec<Cell>>()];

    let rows = all
        .iter()
        .map(|totals| {
            std::iter::once(Some(totals.date.format(DATE_FORMAT).to_string()))
                .chain(
                    categories
                        .iter()
                        .map(|c| totals.get(c).map(format_currency)),
                )
                .collect::<Vec<Cell>>()
        })
        .collect();

    Table::new(header, rows)
}
