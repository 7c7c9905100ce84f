//! Core types for gnucash-report
//!
//! This crate provides the fundamental types shared by the loader, the report
//! engine and the command-line tool:
//!
//! - [`Account`] - A node of the chart of accounts
//! - [`Commodity`] - A currency or security an account is denominated in
//! - [`PriceQuote`] - A point-in-time price of a commodity
//! - [`Transaction`] / [`Split`] - Dated transfers between accounts
//! - [`Ledger`] - Everything read from one GNUCash book
//! - [`LedgerIndex`] - Read-only lookup tables built once per run
//!
//! # Example
//!
//! ```
//! use gnucash_report_core::{Account, Ledger, LedgerIndex, ROOT_ACCOUNT_NAME};
//!
//! let ledger = Ledger {
//!     accounts: vec![
//!         Account::new("root", ROOT_ACCOUNT_NAME, None),
//!         Account::new("assets", "Assets", Some("root")),
//!     ],
//!     ..Ledger::default()
//! };
//!
//! let index = LedgerIndex::new(&ledger);
//! let root = index.root().unwrap();
//! assert_eq!(index.children(&root.id)[0].name, "Assets");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fraction;
pub mod index;
pub mod ledger;

pub use fraction::{parse_fraction, FractionError};
pub use index::LedgerIndex;
pub use ledger::{
    Account, Commodity, CommodityRef, Ledger, PriceQuote, Split, Transaction,
    ACCOUNT_PATH_SEPARATOR, ROOT_ACCOUNT_NAME,
};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
