//! GNUCash XML book loader.
//!
//! This crate reads the uncompressed XML form of a GNUCash book into a
//! [`Ledger`]. Only the parts the reports need are kept: commodities, the price
//! database, the chart of accounts and transactions with their splits.
//! Scheduled-transaction templates are skipped.
//!
//! # Example
//!
//! ```ignore
//! use gnucash_report_loader::load;
//! use std::path::Path;
//!
//! let ledger = load(Path::new("books.gnucash"))?;
//! println!("{} transactions", ledger.transactions.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod xml;

use gnucash_report_core::{FractionError, Ledger};
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Magic bytes at the start of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is a compressed GNUCash book.
    #[error("{path} is compressed; save the book uncompressed (File > Save As, uncheck \"Compress\")")]
    Compressed {
        /// The compressed file.
        path: PathBuf,
    },

    /// The XML itself is malformed.
    #[error("malformed XML at byte {position}: {message}")]
    Xml {
        /// Byte offset where the reader failed.
        position: usize,
        /// Error message from the XML reader.
        message: String,
    },

    /// The document is well-formed XML but not a GNUCash book.
    #[error("not a GNUCash book: root element is <{0}>")]
    NotGnucash(String),

    /// A record lacks an element the reports depend on.
    #[error("{record} {id} is missing <{element}>")]
    MissingElement {
        /// Kind of record (account, split, ...).
        record: &'static str,
        /// Id of the record, if it had one.
        id: String,
        /// The missing element.
        element: &'static str,
    },

    /// A numeric element is not a valid fraction.
    #[error("invalid <{element}> in {record} {id}: {source}")]
    InvalidNumber {
        /// Kind of record.
        record: &'static str,
        /// Id of the record.
        id: String,
        /// The offending element.
        element: &'static str,
        /// The fraction error.
        #[source]
        source: FractionError,
    },

    /// A date element could not be parsed.
    #[error("invalid date {value:?} in {record} {id}")]
    InvalidDate {
        /// Kind of record.
        record: &'static str,
        /// Id of the record.
        id: String,
        /// The offending text.
        value: String,
    },
}

/// Load a GNUCash book from a file.
pub fn load(path: &Path) -> Result<Ledger, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.starts_with(&GZIP_MAGIC) {
        return Err(LoadError::Compressed {
            path: path.to_path_buf(),
        });
    }

    let ledger = load_reader(bytes.as_slice())?;
    tracing::debug!(
        path = %path.display(),
        accounts = ledger.accounts.len(),
        commodities = ledger.commodities.len(),
        prices = ledger.prices.len(),
        transactions = ledger.transactions.len(),
        "loaded GNUCash book"
    );
    Ok(ledger)
}

/// Load a GNUCash book from an in-memory XML string.
pub fn load_str(source: &str) -> Result<Ledger, LoadError> {
    load_reader(source.as_bytes())
}

/// Load a GNUCash book from any buffered reader.
pub fn load_reader<R: BufRead>(reader: R) -> Result<Ledger, LoadError> {
    xml::BookReader::new(reader).read()
}
