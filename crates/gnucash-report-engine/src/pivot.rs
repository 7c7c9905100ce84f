//! Flattening report trees into a pivot table.
//!
//! Each report tree is shown down to a display depth. Nodes above that depth
//! are only walked through; nodes at it become columns and carry their rolled-up
//! totals; deeper nodes are already included in those totals and never get a
//! column of their own.
//!
//! Columns are keyed by `(depth, name)` in the order they are first seen across
//! all reports. There is one header row per distinct depth, labelling only the
//! columns at that depth, and one data row per report:
//!
//! ```text
//!            ,Checking ,Savings
//! 2021-01-31 ,$100.00  ,$50.00
//! ```

use std::collections::HashMap;

use crate::aggregate::ReportNode;
use crate::format::format_currency;
use crate::report::ReportSet;
use crate::table::{Cell, Table};

/// Date format of the first cell of every data row.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How deep each top-level account is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayDepth {
    /// The same depth for every account.
    Uniform(usize),
    /// One depth per configured account path, by position, whether or not the
    /// path resolved. Paths past the end of the list use the last depth.
    PerAccount(Vec<usize>),
}

impl DisplayDepth {
    /// Display depth of the account path configured at `position`.
    pub fn for_tree(&self, position: usize) -> usize {
        match self {
            Self::Uniform(depth) => *depth,
            Self::PerAccount(depths) => depths
                .get(position)
                .or_else(|| depths.last())
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// Turns a [`ReportSet`] into a pivot [`Table`].
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    depth: DisplayDepth,
}

impl ReportAssembler {
    /// Create an assembler showing accounts down to `depth`.
    pub const fn new(depth: DisplayDepth) -> Self {
        Self { depth }
    }

    /// Build the table for `reports`.
    pub fn assemble(&self, reports: &ReportSet) -> Table {
        let columns = self.columns(reports);
        let lookup: HashMap<(usize, &str), usize> = columns
            .iter()
            .enumerate()
            .map(|(i, (depth, name))| ((*depth, name.as_str()), i))
            .collect();

        let mut depths: Vec<usize> = Vec::new();
        for (depth, _) in &columns {
            if !depths.contains(depth) {
                depths.push(*depth);
            }
        }

        let header: Vec<Vec<Cell>> = depths
            .iter()
            .map(|&row_depth| {
                std::iter::once(None)
                    .chain(columns.iter().map(|(depth, name)| {
                        (*depth == row_depth).then(|| name.clone())
                    }))
                    .collect::<Vec<Cell>>()
            })
            .collect();

        let rows = reports
            .iter()
            .map(|report| {
                let mut cells: Vec<Cell> = vec![None; columns.len() + 1];
                cells[0] = Some(report.end.format(DATE_FORMAT).to_string());
                for (position, tree) in report.positioned_trees() {
                    let target = self.depth.for_tree(position);
                    visit(tree, target, &mut |node| {
                        if let Some(&i) = lookup.get(&(target, node.name.as_str())) {
                            cells[i + 1] = Some(format_currency(node.total));
                        }
                    });
                }
                cells
            })
            .collect();

        Table::new(header, rows)
    }

    /// Distinct `(depth, name)` columns in first-seen order.
    fn columns(&self, reports: &ReportSet) -> Vec<(usize, String)> {
        let mut columns: Vec<(usize, String)> = Vec::new();
        for report in reports {
            for (position, tree) in report.positioned_trees() {
                let target = self.depth.for_tree(position);
                visit(tree, target, &mut |node| {
                    if !columns
                        .iter()
                        .any(|(depth, name)| *depth == target && *name == node.name)
                    {
                        columns.push((target, node.name.clone()));
                    }
                });
            }
        }
        columns
    }
}

/// Call `f` on every node of `tree` that sits exactly at `target` depth.
fn visit<'n>(tree: &'n ReportNode, target: usize, f: &mut impl FnMut(&'n ReportNode)) {
    if tree.depth == target {
        f(tree);
    } else if tree.depth < target {
        for child in &tree.children {
            visit(child, target, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn node(name: &str, depth: usize, value: Decimal, children: Vec<ReportNode>) -> ReportNode {
        let total = children.iter().fold(value, |acc, c| acc + c.total);
        ReportNode {
            id: name.to_lowercase(),
            name: name.to_string(),
            depth,
            children,
            value,
            quantity: value,
            commodity: None,
            total,
        }
    }

    fn assets(checking: Decimal, savings: Decimal) -> ReportNode {
        node(
            "Assets",
            1,
            dec!(0),
            vec![
                node("Checking", 2, checking, Vec::new()),
                node("Savings", 2, savings, Vec::new()),
            ],
        )
    }

    fn strings(records: &[Vec<Cell>]) -> Vec<Vec<String>> {
        records
            .iter()
            .map(|r| r.iter().map(|c| c.clone().unwrap_or_default()).collect())
            .collect()
    }

    #[test]
    fn test_depth_selects_columns() {
        let report = Report::new(None, date(2021, 1, 31), vec![assets(dec!(100), dec!(50))]);
        let set: ReportSet = vec![report].into_iter().collect();

        let table = ReportAssembler::new(DisplayDepth::Uniform(2)).assemble(&set);
        assert_eq!(strings(table.header()), vec![vec!["", "Checking", "Savings"]]);
        assert_eq!(
            strings(table.rows()),
            vec![vec!["2021-01-31", "$100.00", "$50.00"]]
        );

        let table = ReportAssembler::new(DisplayDepth::Uniform(1)).assemble(&set);
        assert_eq!(strings(table.header()), vec![vec!["", "Assets"]]);
        assert_eq!(strings(table.rows()), vec![vec!["2021-01-31", "$150.00"]]);
    }

    #[test]
    fn test_per_account_depths_make_one_header_row_each() {
        let income = node(
            "Income",
            1,
            dec!(0),
            vec![node("Salary", 2, dec!(-3000), Vec::new())],
        );
        let trees = vec![assets(dec!(100), dec!(50)), income];
        let report = Report::new(None, date(2021, 1, 31), trees);
        let set: ReportSet = vec![report].into_iter().collect();

        let table = ReportAssembler::new(DisplayDepth::PerAccount(vec![1, 2])).assemble(&set);
        assert_eq!(
            strings(table.header()),
            vec![vec!["", "Assets", ""], vec!["", "", "Salary"]]
        );
        assert_eq!(
            strings(table.rows()),
            vec![vec!["2021-01-31", "$150.00", "$-3,000.00"]]
        );
    }

    #[test]
    fn test_columns_accumulate_across_reports() {
        let january = node("Assets", 1, dec!(0), vec![node("Checking", 2, dec!(10), Vec::new())]);
        let set: ReportSet = vec![
            Report::new(None, date(2021, 1, 31), vec![january]),
            Report::new(None, date(2021, 2, 28), vec![assets(dec!(20), dec!(5))]),
            Report::new(None, date(2021, 2, 28), vec![assets(dec!(30), dec!(6))]),
        ]
        .into_iter()
        .collect();

        let table = ReportAssembler::new(DisplayDepth::Uniform(2)).assemble(&set);
        assert_eq!(strings(table.header()), vec![vec!["", "Checking", "Savings"]]);
        assert_eq!(
            strings(table.rows()),
            vec![
                vec!["2021-01-31", "$10.00", ""],
                vec!["2021-02-28", "$20.00", "$5.00"],
                vec!["2021-02-28", "$30.00", "$6.00"],
            ]
        );
    }

    #[test]
    fn test_tree_deeper_than_target_is_hidden() {
        let checking = node("Checking", 2, dec!(1), Vec::new());
        let report = Report::new(None, date(2021, 1, 31), vec![checking]);
        let set: ReportSet = vec![report].into_iter().collect();

        let table = ReportAssembler::new(DisplayDepth::Uniform(1)).assemble(&set);
        assert!(table.header().is_empty());
        assert_eq!(strings(table.rows()), vec![vec!["2021-01-31"]]);
    }

    #[test]
    fn test_per_account_depths_follow_configured_positions() {
        let income = node(
            "Income",
            1,
            dec!(0),
            vec![node("Salary", 2, dec!(-3000), Vec::new())],
        );
        // The first configured path did not resolve, so the trees sit at 1 and 2.
        let report = Report {
            start: None,
            end: date(2021, 1, 31),
            trees: vec![assets(dec!(100), dec!(50)), income],
            positions: vec![1, 2],
        };
        let set: ReportSet = vec![report].into_iter().collect();

        let table = ReportAssembler::new(DisplayDepth::PerAccount(vec![1, 2, 1])).assemble(&set);
        assert_eq!(
            strings(table.header()),
            vec![vec!["", "Checking", "Savings", ""], vec!["", "", "", "Income"]]
        );
        assert_eq!(
            strings(table.rows()),
            vec![vec!["2021-01-31", "$100.00", "$50.00", "$-3,000.00"]]
        );
    }

    #[test]
    fn test_missing_depths_reuse_last() {
        let depth = DisplayDepth::PerAccount(vec![1, 3]);
        assert_eq!(depth.for_tree(0), 1);
        assert_eq!(depth.for_tree(1), 3);
        assert_eq!(depth.for_tree(5), 3);
        assert_eq!(DisplayDepth::PerAccount(Vec::new()).for_tree(0), 0);
    }
}
