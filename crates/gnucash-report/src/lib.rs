//! GNUCash report generator.
//!
//! This crate provides the `gnucash-report` command-line tool. Given an INI
//! configuration file it loads an uncompressed GNUCash XML book and writes up
//! to four CSV reports:
//!
//! - Asset Balance: market value of accounts at each end date
//! - Asset Category: the same values bucketed by commodity namespace
//! - Asset Investment: money moved into accounts during each period
//! - Income Statement: income and expenses during each period
//!
//! # Example Usage
//!
//! ```bash
//! gnucash-report -c reports.ini
//! gnucash-report -c reports.ini -v
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
