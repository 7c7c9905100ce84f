//! Transaction date windows.

use chrono::NaiveDate;
use gnucash_report_core::Transaction;

/// The range of posting dates a report looks at. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionWindow {
    /// Everything posted on or before the date.
    UpTo(NaiveDate),
    /// Everything posted between the two dates.
    Between(NaiveDate, NaiveDate),
}

impl TransactionWindow {
    /// Whether a posting date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::UpTo(end) => date <= end,
            Self::Between(start, end) => start <= date && date <= end,
        }
    }

    /// The first date of the window, if bounded below.
    pub const fn start(&self) -> Option<NaiveDate> {
        match *self {
            Self::UpTo(_) => None,
            Self::Between(start, _) => Some(start),
        }
    }

    /// The last date of the window.
    pub const fn end(&self) -> NaiveDate {
        match *self {
            Self::UpTo(end) | Self::Between(_, end) => end,
        }
    }

    /// Transactions inside the window, in their original order.
    pub fn filter<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| self.contains(txn.date))
            .collect()
    }
}
