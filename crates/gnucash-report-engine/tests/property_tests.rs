//! Property-based tests for the report engine.
//!
//! These tests verify invariants hold for arbitrary account trees and
//! transactions using proptest.

use gnucash_report_core::{
    Account, Commodity, CommodityRef, Ledger, LedgerIndex, NaiveDate, PriceQuote, Split,
    Transaction, ROOT_ACCOUNT_NAME,
};
use gnucash_report_engine::{
    category_totals, AccountAggregator, AccountPaths, ReportBuilder, ReportKind, ReportNode,
    Valuation,
};
use proptest::prelude::*;
use proptest::sample::Index;
use rust_decimal::Decimal;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Assets".to_string()),
        Just("Cash".to_string()),
        Just("Brokerage".to_string()),
        Just("Fund".to_string()),
    ]
}

/// A chart of accounts: account `i + 1` hangs below one of the accounts
/// declared before it, so every account is reachable from the root.
fn arb_tree() -> impl Strategy<Value = Vec<(Index, String)>> {
    prop::collection::vec((any::<Index>(), arb_name()), 1..16)
}

fn arb_splits() -> impl Strategy<Value = Vec<(Index, i64, u32)>> {
    prop::collection::vec((any::<Index>(), -1_000_000i64..1_000_000i64, 1u32..28u32), 0..24)
}

fn id(i: usize) -> String {
    format!("n{i}")
}

/// Build a ledger from a generated tree. Odd accounts hold a stock, even ones
/// hold dollars.
fn build_ledger(tree: &[(Index, String)], splits: &[(Index, i64, u32)]) -> Ledger {
    let mut accounts = vec![Account::new(id(0), ROOT_ACCOUNT_NAME, None)
        .with_commodity("CURRENCY", "USD")];
    for (i, (parent, name)) in tree.iter().enumerate() {
        let parent = id(parent.index(i + 1));
        let account = Account::new(id(i + 1), name.clone(), Some(&parent));
        accounts.push(if (i + 1) % 2 == 1 {
            account.with_commodity("NYSE", "GPC")
        } else {
            account.with_commodity("CURRENCY", "USD")
        });
    }

    let transactions = splits
        .iter()
        .enumerate()
        .map(|(t, (account, cents, day))| {
            let amount = Decimal::new(*cents, 2);
            Transaction::new(
                format!("t{t}"),
                date(2021, 1, *day),
                vec![Split::new(id(account.index(accounts.len())), amount, amount)],
            )
        })
        .collect();

    Ledger {
        accounts,
        commodities: vec![
            Commodity::new("CURRENCY", "USD"),
            Commodity::new("NYSE", "GPC"),
            Commodity::new("MUTF", "FXNAX"),
        ],
        prices: vec![PriceQuote::new(
            CommodityRef::new("NYSE", "GPC"),
            date(2021, 1, 1),
            Decimal::new(12_345, 2),
        )],
        transactions,
    }
}

fn name_path(index: &LedgerIndex<'_>, account: &Account) -> String {
    let mut names = vec![account.name.as_str()];
    let mut current = account;
    while let Some(parent) = current.parent.as_deref().and_then(|p| index.account(p)) {
        if parent.is_root() {
            break;
        }
        names.push(parent.name.as_str());
        current = parent;
    }
    names.reverse();
    names.join(":")
}

fn check_rollup(node: &ReportNode) -> Result<(), TestCaseError> {
    let children: Decimal = node.children.iter().map(|c| c.total).sum();
    prop_assert_eq!(node.total, node.value + children);
    for child in &node.children {
        prop_assert_eq!(child.depth, node.depth + 1);
        check_rollup(child)?;
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every account's name path resolves to an account with the same name path.
    #[test]
    fn prop_path_resolution_round_trip(tree in arb_tree()) {
        let ledger = build_ledger(&tree, &[]);
        let index = LedgerIndex::new(&ledger);

        let paths: Vec<String> = ledger.accounts[1..]
            .iter()
            .map(|account| name_path(&index, account))
            .collect();
        let resolved = AccountPaths::resolve(&index, &paths);
        prop_assert!(resolved.verified());

        for (i, path) in paths.iter().enumerate() {
            let found = resolved.get(i).unwrap();
            prop_assert_eq!(found.depth(), path.split(':').count());
            let leaf = index.account(found.leaf()).unwrap();
            prop_assert_eq!(&name_path(&index, leaf), path);
        }
    }

    /// Totals roll up exactly and the root total is the sum of every split.
    #[test]
    fn prop_cashflow_additivity(tree in arb_tree(), splits in arb_splits()) {
        let ledger = build_ledger(&tree, &splits);
        let index = LedgerIndex::new(&ledger);
        let txns: Vec<_> = ledger.transactions.iter().collect();

        let root = AccountAggregator::new(&index, Valuation::Cashflow)
            .build(&id(0), &txns, date(2021, 12, 31), 0)
            .unwrap();
        check_rollup(&root)?;

        let expected: Decimal = ledger
            .transactions
            .iter()
            .flat_map(|t| &t.splits)
            .map(|s| s.value)
            .sum();
        prop_assert_eq!(root.total, expected);
        prop_assert_eq!(root.iter().count(), ledger.accounts.len());
    }

    /// Market-valued trees obey the same roll-up rule.
    #[test]
    fn prop_mark_to_market_additivity(tree in arb_tree(), splits in arb_splits()) {
        let ledger = build_ledger(&tree, &splits);
        let index = LedgerIndex::new(&ledger);
        let txns: Vec<_> = ledger.transactions.iter().collect();

        let root = AccountAggregator::new(&index, Valuation::MarkToMarket)
            .build(&id(0), &txns, date(2021, 12, 31), 0)
            .unwrap();
        check_rollup(&root)?;
        for node in root.iter() {
            let price = node.commodity.as_ref().unwrap().price;
            prop_assert_eq!(node.value, node.quantity * price);
        }
    }

    /// Category buckets add up to the sum of the nodes' own values.
    #[test]
    fn prop_category_conservation(
        tree in arb_tree(),
        splits in arb_splits(),
        day in 1u32..28u32,
    ) {
        let ledger = build_ledger(&tree, &splits);
        let index = LedgerIndex::new(&ledger);
        let paths = AccountPaths::resolve(&index, &[ledger.accounts[1].name.as_str()]);
        let end = date(2021, 1, day);

        let reports = ReportBuilder::new(&index, ReportKind::AssetCategory)
            .build(&paths, &[(end, end)])
            .unwrap();
        let report = reports.iter().next().unwrap();
        let totals = category_totals(report, &index);

        let own: Decimal = report.nodes().map(|node| node.value).sum();
        prop_assert_eq!(totals.sum(), own);
        prop_assert_eq!(totals.iter().count(), 3);
    }
}
