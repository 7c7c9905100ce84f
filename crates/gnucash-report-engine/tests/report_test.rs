//! End-to-end tests for the report engine.

use gnucash_report_core::{
    Account, Commodity, CommodityRef, Ledger, LedgerIndex, NaiveDate, PriceQuote, Split,
    Transaction, ROOT_ACCOUNT_NAME,
};
use gnucash_report_engine::{
    category_table, AccountPaths, DisplayDepth, ReportAssembler, ReportBuilder, ReportKind,
};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn usd(account: Account) -> Account {
    account.with_commodity("CURRENCY", "USD")
}

/// Root -> Assets -> {Checking, Savings} with $100 and $50 deposited on
/// 2021-01-15.
fn household() -> Ledger {
    Ledger {
        accounts: vec![
            usd(Account::new("root", ROOT_ACCOUNT_NAME, None)),
            usd(Account::new("assets", "Assets", Some("root"))),
            usd(Account::new("checking", "Checking", Some("assets"))),
            usd(Account::new("savings", "Savings", Some("assets"))),
            usd(Account::new("equity", "Equity", Some("root"))),
        ],
        commodities: vec![Commodity::new("CURRENCY", "USD")],
        prices: Vec::new(),
        transactions: vec![Transaction::new(
            "opening",
            date(2021, 1, 15),
            vec![
                Split::new("checking", dec!(100), dec!(100)),
                Split::new("savings", dec!(50), dec!(50)),
                Split::new("equity", dec!(-150), dec!(-150)),
            ],
        )],
    }
}

fn strings(table: &gnucash_report_engine::Table) -> Vec<Vec<String>> {
    table.to_strings()
}

#[test]
fn test_balance_report_end_to_end() {
    let ledger = household();
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Assets"]);
    assert!(paths.verified());

    let end = date(2021, 1, 31);
    let reports = ReportBuilder::new(&index, ReportKind::AssetBalance)
        .build(&paths, &[(date(2021, 1, 1), end)])
        .unwrap();

    let report = reports.iter().next().unwrap();
    let assets = report.tree("assets").unwrap();
    assert_eq!(assets.total, dec!(150));
    assert_eq!(assets.depth, 1);
    assert_eq!(assets.child("checking").unwrap().depth, 2);

    let table = ReportAssembler::new(DisplayDepth::Uniform(2)).assemble(&reports);
    assert_eq!(
        strings(&table),
        vec![
            vec!["", "Checking", "Savings"],
            vec!["2021-01-31", "$100.00", "$50.00"],
        ]
    );
}

#[test]
fn test_window_boundaries_are_inclusive() {
    let ledger = household();
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Assets"]);
    let day = date(2021, 1, 15);

    let on_the_day = ReportBuilder::new(&index, ReportKind::IncomeStatement)
        .build(&paths, &[(day, day), (date(2021, 1, 16), date(2021, 1, 31))])
        .unwrap();
    let totals: Vec<_> = on_the_day.iter().map(|r| r.trees[0].total).collect();
    assert_eq!(totals, vec![dec!(150), dec!(0)]);

    let balance = ReportBuilder::new(&index, ReportKind::AssetBalance)
        .build(&paths, &[(day, day), (day, date(2021, 1, 14))])
        .unwrap();
    let totals: Vec<_> = balance.iter().map(|r| r.trees[0].total).collect();
    assert_eq!(totals, vec![dec!(150), dec!(0)]);
}

#[test]
fn test_usd_accounts_ignore_price_quotes() {
    let mut ledger = household();
    ledger.prices.push(PriceQuote::new(
        CommodityRef::new("CURRENCY", "USD"),
        date(2021, 1, 1),
        dec!(3),
    ));
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Assets:Checking"]);

    let reports = ReportBuilder::new(&index, ReportKind::AssetBalance)
        .build(&paths, &[(date(2021, 1, 1), date(2021, 1, 31))])
        .unwrap();
    let checking = &reports.iter().next().unwrap().trees[0];

    assert_eq!(checking.total, dec!(100));
    let snapshot = checking.commodity.as_ref().unwrap();
    assert_eq!(snapshot.price, dec!(1));
    assert_eq!(snapshot.price_date, None);
}

#[test]
fn test_unresolved_path_is_flagged() {
    let ledger = household();
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Assets:Checking", "Assets:Brokerage", "Equity"]);

    assert!(!paths.verified());
    assert!(paths.get(0).is_some());
    assert!(paths.get(1).is_none());
    assert!(paths.get(2).is_some());
}

#[test]
fn test_category_report_end_to_end() {
    let mut ledger = household();
    ledger.commodities.push(Commodity::new("NYSE", "GPC"));
    ledger.accounts.push(
        Account::new("gpc", "GPC", Some("assets"))
            .with_commodity("NYSE", "GPC")
            .with_type("STOCK"),
    );
    ledger.prices.push(PriceQuote::new(
        CommodityRef::new("NYSE", "GPC"),
        date(2021, 1, 4),
        dec!(100),
    ));
    ledger.transactions.push(Transaction::new(
        "buy",
        date(2021, 1, 20),
        vec![
            Split::new("gpc", dec!(1000), dec!(10)),
            Split::new("checking", dec!(-1000), dec!(-1000)),
        ],
    ));
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Assets"]);

    let reports = ReportBuilder::new(&index, ReportKind::AssetCategory)
        .build(
            &paths,
            &[
                (date(2021, 1, 1), date(2021, 1, 16)),
                (date(2021, 1, 1), date(2021, 1, 31)),
            ],
        )
        .unwrap();

    let table = category_table(&reports, &index);
    assert_eq!(
        strings(&table),
        vec![
            vec!["", "CURRENCY", "NYSE"],
            vec!["2021-01-16", "$150.00", "$0.00"],
            vec!["2021-01-31", "$-850.00", "$1,000.00"],
        ]
    );
}

#[test]
fn test_per_account_depths_survive_unresolved_paths() {
    let ledger = household();
    let index = LedgerIndex::new(&ledger);
    let paths = AccountPaths::resolve(&index, &["Bogus", "Assets", "Equity"]);
    assert!(!paths.verified());

    let reports = ReportBuilder::new(&index, ReportKind::AssetBalance)
        .build(&paths, &[(date(2021, 1, 1), date(2021, 1, 31))])
        .unwrap();

    let table = ReportAssembler::new(DisplayDepth::PerAccount(vec![1, 2, 1])).assemble(&reports);
    assert_eq!(
        strings(&table),
        vec![
            vec!["", "Checking", "Savings", ""],
            vec!["", "", "", "Equity"],
            vec!["2021-01-31", "$100.00", "$50.00", "$-150.00"],
        ]
    );
}
