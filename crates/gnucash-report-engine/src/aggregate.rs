//! Per-account aggregation into report trees.
//!
//! An [`AccountAggregator`] turns one account and its descendants into a
//! [`ReportNode`] tree for a set of transactions. Every node carries the value
//! of the account's own splits and a rolled-up total that also includes all of
//! its (non-excluded) descendants:
//!
//! ```text
//! total = value + sum(child.total for child in children)
//! ```
//!
//! How a split becomes a value depends on the [`Valuation`]: balance reports
//! price the summed quantity at the report date, flow reports add up the raw
//! split values.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use gnucash_report_core::{Account, LedgerIndex, Transaction};
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::price::PriceDatabase;

/// How an account's splits are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valuation {
    /// Summed quantity times the commodity's price as of the report date.
    MarkToMarket,
    /// Summed split value as recorded in the transactions.
    Cashflow,
}

/// The commodity an account was valued in, as seen on the report date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommoditySnapshot {
    /// Commodity id.
    pub id: String,
    /// Commodity namespace, used as its category.
    pub category: String,
    /// User display symbol, if any.
    pub symbol: Option<String>,
    /// Price per unit on the report date.
    pub price: Decimal,
    /// Date of the quote the price came from.
    pub price_date: Option<NaiveDate>,
}

/// One account in a report tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNode {
    /// Account id.
    pub id: String,
    /// Account name.
    pub name: String,
    /// Distance from the Root Account.
    pub depth: usize,
    /// Non-excluded children, in ledger order.
    pub children: Vec<ReportNode>,
    /// Value of this account's own splits.
    pub value: Decimal,
    /// Summed quantity of this account's own splits.
    pub quantity: Decimal,
    /// Commodity details, for market-valued nodes.
    pub commodity: Option<CommoditySnapshot>,
    /// Rolled-up total of this account and all its descendants.
    pub total: Decimal,
}

impl ReportNode {
    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child with the given account id.
    pub fn child(&self, id: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.id == id)
    }

    /// This node and all its descendants, in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Summed (value, quantity) per account id.
type SplitTotals<'t> = HashMap<&'t str, (Decimal, Decimal)>;

fn split_totals<'t>(transactions: &[&'t Transaction]) -> SplitTotals<'t> {
    let mut totals: SplitTotals<'t> = HashMap::new();
    for txn in transactions {
        for split in &txn.splits {
            let entry = totals.entry(split.account.as_str()).or_default();
            entry.0 += split.value;
            entry.1 += split.quantity;
        }
    }
    totals
}

/// Builds [`ReportNode`] trees for one valuation strategy.
#[derive(Debug, Clone)]
pub struct AccountAggregator<'a> {
    index: &'a LedgerIndex<'a>,
    prices: PriceDatabase<'a>,
    valuation: Valuation,
    excluded: HashSet<String>,
}

impl<'a> AccountAggregator<'a> {
    /// Create an aggregator over `index`.
    pub fn new(index: &'a LedgerIndex<'a>, valuation: Valuation) -> Self {
        Self {
            index,
            prices: PriceDatabase::new(index),
            valuation,
            excluded: HashSet::new(),
        }
    }

    /// Leave the given account ids, and everything below them, out of every
    /// tree.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(ids.into_iter().map(Into::into));
        self
    }

    /// The valuation strategy in use.
    pub const fn valuation(&self) -> Valuation {
        self.valuation
    }

    /// Build the tree rooted at `account_id`.
    ///
    /// `depth` is the depth of `account_id` itself; children are one deeper.
    /// Prices are taken as of `end`.
    pub fn build(
        &self,
        account_id: &str,
        transactions: &[&Transaction],
        end: NaiveDate,
        depth: usize,
    ) -> Result<ReportNode, EngineError> {
        let account = self
            .index
            .account(account_id)
            .ok_or_else(|| EngineError::UnknownAccount(account_id.to_string()))?;
        let totals = split_totals(transactions);
        self.node(account, &totals, end, depth)
    }

    fn node(
        &self,
        account: &Account,
        totals: &SplitTotals<'_>,
        end: NaiveDate,
        depth: usize,
    ) -> Result<ReportNode, EngineError> {
        let children = self
            .index
            .children(&account.id)
            .iter()
            .filter(|child| !self.excluded.contains(&child.id))
            .map(|child| self.node(child, totals, end, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let (summed_value, quantity) = totals
            .get(account.id.as_str())
            .copied()
            .unwrap_or_default();

        let (value, commodity) = match self.valuation {
            Valuation::Cashflow => (summed_value, None),
            Valuation::MarkToMarket => {
                let snapshot = self.snapshot(account, end)?;
                (quantity * snapshot.price, Some(snapshot))
            }
        };

        let total = children.iter().fold(value, |acc, child| acc + child.total);

        Ok(ReportNode {
            id: account.id.clone(),
            name: account.name.clone(),
            depth,
            children,
            value,
            quantity,
            commodity,
            total,
        })
    }

    fn snapshot(&self, account: &Account, end: NaiveDate) -> Result<CommoditySnapshot, EngineError> {
        let missing = || EngineError::MissingCommodity {
            account: account.name.clone(),
            commodity: account.commodity.as_ref().map(|c| c.id.clone()),
        };

        let reference = account.commodity.as_ref().ok_or_else(missing)?;
        let commodity = self.index.commodity(&reference.id).ok_or_else(missing)?;
        let price = self.prices.price_as_of(&commodity.id, end);

        Ok(CommoditySnapshot {
            id: commodity.id.clone(),
            category: commodity.namespace.clone(),
            symbol: commodity.symbol.clone(),
            price: price.price,
            price_date: price.date,
        })
    }
}
