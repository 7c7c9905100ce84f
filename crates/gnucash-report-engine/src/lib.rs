//! Report engine for gnucash-report.
//!
//! Given a [`LedgerIndex`], the engine produces the report tables:
//!
//! 1. [`AccountPaths`] resolves configured `Parent:Child` paths to account ids.
//! 2. [`TransactionWindow`] selects the transactions of each date range.
//! 3. [`AccountAggregator`] builds one [`ReportNode`] tree per account,
//!    valuing splits with a [`Valuation`] strategy and rolling totals up.
//! 4. [`ReportBuilder`] repeats this for every configured date range.
//! 5. [`ReportAssembler`] pivots the trees into a [`Table`];
//!    [`category_table`] buckets them by commodity namespace instead.
//!
//! # Example
//!
//! ```
//! use gnucash_report_core::{Account, Commodity, Ledger, LedgerIndex, NaiveDate, Split, Transaction};
//! use gnucash_report_engine::{
//!     AccountPaths, DisplayDepth, ReportAssembler, ReportBuilder, ReportKind,
//! };
//! use rust_decimal::Decimal;
//!
//! let usd = |a: Account| a.with_commodity("CURRENCY", "USD");
//! let day = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
//! let ledger = Ledger {
//!     accounts: vec![
//!         usd(Account::new("r", "Root Account", None)),
//!         usd(Account::new("a", "Assets", Some("r"))),
//!         usd(Account::new("c", "Checking", Some("a"))),
//!         usd(Account::new("e", "Equity", Some("r"))),
//!     ],
//!     commodities: vec![Commodity::new("CURRENCY", "USD")],
//!     transactions: vec![Transaction::new(
//!         "t",
//!         day,
//!         vec![
//!             Split::new("c", Decimal::from(100), Decimal::from(100)),
//!             Split::new("e", Decimal::from(-100), Decimal::from(-100)),
//!         ],
//!     )],
//!     ..Ledger::default()
//! };
//!
//! let index = LedgerIndex::new(&ledger);
//! let paths = AccountPaths::resolve(&index, &["Assets"]);
//! let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
//! let reports = ReportBuilder::new(&index, ReportKind::AssetBalance)
//!     .build(&paths, &[(end, end)])
//!     .unwrap();
//!
//! let table = ReportAssembler::new(DisplayDepth::Uniform(2)).assemble(&reports);
//! assert_eq!(table.to_strings()[1], vec!["2021-01-31", "$100.00"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod category;
pub mod error;
pub mod format;
pub mod paths;
pub mod pivot;
pub mod price;
pub mod report;
pub mod table;
pub mod window;

pub use aggregate::{AccountAggregator, CommoditySnapshot, ReportNode, Valuation};
pub use category::{category_table, category_totals, CategoryTotals};
pub use error::EngineError;
pub use format::format_currency;
pub use paths::{AccountPath, AccountPaths};
pub use pivot::{DisplayDepth, ReportAssembler};
pub use price::{PriceDatabase, PricePoint};
pub use report::{Report, ReportBuilder, ReportKind, ReportSet};
pub use table::{Cell, Table};
pub use window::TransactionWindow;

#[doc(no_inline)]
pub use gnucash_report_core::LedgerIndex;
