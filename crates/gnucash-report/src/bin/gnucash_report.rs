//! gnucash-report - Generate CSV reports from a GNUCash book.
//!
//! Reads an INI configuration naming the book, the enabled reports, their
//! accounts and date ranges, and writes one CSV file per report.

fn main() -> std::process::ExitCode {
    gnucash_report::cmd::report_cmd::main()
}
