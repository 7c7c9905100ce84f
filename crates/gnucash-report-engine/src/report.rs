//! Report kinds and the per-date report builder.

use std::fmt;

use chrono::NaiveDate;
use gnucash_report_core::LedgerIndex;

use crate::aggregate::{AccountAggregator, ReportNode, Valuation};
use crate::error::EngineError;
use crate::paths::AccountPaths;
use crate::window::TransactionWindow;

/// The four reports the tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Market value of asset accounts at each end date.
    AssetBalance,
    /// Market value at each end date, bucketed by commodity namespace.
    AssetCategory,
    /// Money moved into and out of investment accounts per period.
    AssetInvestment,
    /// Income and expenses per period.
    IncomeStatement,
}

impl ReportKind {
    /// Every report kind, in the order they are run.
    pub const ALL: [Self; 4] = [
        Self::AssetBalance,
        Self::AssetCategory,
        Self::AssetInvestment,
        Self::IncomeStatement,
    ];

    /// Human-readable name, also the configuration section title.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AssetBalance => "Asset Balance",
            Self::AssetCategory => "Asset Category",
            Self::AssetInvestment => "Asset Investment",
            Self::IncomeStatement => "Income Statement",
        }
    }

    /// How account values are computed for this report.
    pub const fn valuation(self) -> Valuation {
        match self {
            Self::AssetBalance | Self::AssetCategory => Valuation::MarkToMarket,
            Self::AssetInvestment | Self::IncomeStatement => Valuation::Cashflow,
        }
    }

    /// The transactions a configured `(start, end)` pair covers.
    ///
    /// Balance reports are cumulative and ignore `start`.
    pub const fn window(self, start: NaiveDate, end: NaiveDate) -> TransactionWindow {
        match self {
            Self::AssetBalance | Self::AssetCategory => TransactionWindow::UpTo(end),
            Self::AssetInvestment | Self::IncomeStatement => TransactionWindow::Between(start, end),
        }
    }

    /// Whether the report is a pivot of account columns (as opposed to
    /// category totals).
    pub const fn is_pivot(self) -> bool {
        !matches!(self, Self::AssetCategory)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Account trees for one date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// First date of the window, for period reports.
    pub start: Option<NaiveDate>,
    /// Last date of the window; prices are taken as of this date.
    pub end: NaiveDate,
    /// One tree per resolved account path, in configured order.
    pub trees: Vec<ReportNode>,
    /// Index of each tree's account path in the configured list. Paths that
    /// did not resolve leave a gap.
    pub positions: Vec<usize>,
}

impl Report {
    /// Create a report whose trees sit at configured positions `0..trees.len()`.
    pub fn new(start: Option<NaiveDate>, end: NaiveDate, trees: Vec<ReportNode>) -> Self {
        let positions = (0..trees.len()).collect();
        Self {
            start,
            end,
            trees,
            positions,
        }
    }

    /// Every tree with the configured position of its account path.
    pub fn positioned_trees(&self) -> impl Iterator<Item = (usize, &ReportNode)> {
        self.positions.iter().copied().zip(&self.trees)
    }

    /// The tree whose top-level account is `account_id`.
    pub fn tree(&self, account_id: &str) -> Option<&ReportNode> {
        self.trees.iter().find(|tree| tree.id == account_id)
    }

    /// Every node of every tree, tree by tree in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &ReportNode> {
        self.trees.iter().flat_map(|tree| tree.iter())
    }
}

/// Reports for every configured date range, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSet {
    reports: Vec<Report>,
}

impl ReportSet {
    /// Number of reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether there are no reports.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Iterate over the reports.
    pub fn iter(&self) -> std::slice::Iter<'_, Report> {
        self.reports.iter()
    }
}

impl FromIterator<Report> for ReportSet {
    fn from_iter<T: IntoIterator<Item = Report>>(iter: T) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}

impl<'r> IntoIterator for &'r ReportSet {
    type Item = &'r Report;
    type IntoIter = std::slice::Iter<'r, Report>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

/// Builds a [`ReportSet`] for one report kind.
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    index: &'a LedgerIndex<'a>,
    kind: ReportKind,
    aggregator: AccountAggregator<'a>,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder for `kind` over `index`.
    pub fn new(index: &'a LedgerIndex<'a>, kind: ReportKind) -> Self {
        Self {
            index,
            kind,
            aggregator: AccountAggregator::new(index, kind.valuation()),
        }
    }

    /// Leave the accounts named by the resolved `paths` out of every tree.
    #[must_use]
    pub fn with_excluded(mut self, paths: &AccountPaths) -> Self {
        self.aggregator = self
            .aggregator
            .with_excluded(paths.resolved().map(|path| path.leaf().to_string()));
        self
    }

    /// Build one report per `(start, end)` pair, in order.
    ///
    /// Unresolved paths are skipped.
    pub fn build(
        &self,
        paths: &AccountPaths,
        dates: &[(NaiveDate, NaiveDate)],
    ) -> Result<ReportSet, EngineError> {
        dates
            .iter()
            .map(|&(start, end)| -> Result<Report, EngineError> {
                let window = self.kind.window(start, end);
                let transactions = window.filter(self.index.transactions());
                tracing::debug!(
                    report = %self.kind,
                    end = %window.end(),
                    transactions = transactions.len(),
                    "building report"
                );

                let (positions, trees): (Vec<_>, Vec<_>) = paths
                    .iter()
                    .enumerate()
                    .filter_map(|(position, (_, path))| path.map(|path| (position, path)))
                    .map(|(position, path)| {
                        self.aggregator
                            .build(path.leaf(), &transactions, end, path.depth())
                            .map(|tree| (position, tree))
                    })
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .unzip();

                Ok(Report {
                    start: window.start(),
                    end,
                    trees,
                    positions,
                })
            })
            .collect()
    }
}
