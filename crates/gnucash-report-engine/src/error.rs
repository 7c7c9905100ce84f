//! Report engine error types.

use thiserror::Error;

/// Error returned when a report cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A market-valued account has no usable commodity.
    #[error("account {account} has no declared commodity{}", commodity_suffix(.commodity))]
    MissingCommodity {
        /// Name of the offending account.
        account: String,
        /// The commodity id it references, if any.
        commodity: Option<String>,
    },

    /// Some configured account paths did not resolve.
    #[error("unresolved account paths: {}", .0.join(", "))]
    UnresolvedPaths(Vec<String>),

    /// An account id is not present in the ledger.
    #[error("unknown account id {0}")]
    UnknownAccount(String),
}

fn commodity_suffix(commodity: &Option<String>) -> String {
    commodity
        .as_ref()
        .map(|id| format!(" (references undeclared commodity {id})"))
        .unwrap_or_default()
}
