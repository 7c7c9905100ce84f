//! Read-only lookup tables over a [`Ledger`].
//!
//! The index is built once per run and shared by every report. All lookups are
//! hash-map or slice accesses; nothing here scans the whole ledger.

use std::collections::{HashMap, HashSet};

use crate::ledger::{Account, Commodity, Ledger, PriceQuote, Transaction};

/// Structural queries over a loaded ledger.
#[derive(Debug)]
pub struct LedgerIndex<'a> {
    ledger: &'a Ledger,
    accounts: HashMap<&'a str, &'a Account>,
    /// Children per parent id, in document order.
    children: HashMap<&'a str, Vec<&'a Account>>,
    root: Option<&'a Account>,
    commodities: HashMap<&'a str, &'a Commodity>,
    /// Distinct commodity namespaces, in document order.
    categories: Vec<&'a str>,
    /// Quotes per commodity id, stable-sorted by date.
    prices: HashMap<&'a str, Vec<&'a PriceQuote>>,
}

impl<'a> LedgerIndex<'a> {
    /// Build every index for `ledger`.
    pub fn new(ledger: &'a Ledger) -> Self {
        let mut accounts = HashMap::with_capacity(ledger.accounts.len());
        let mut children: HashMap<&str, Vec<&Account>> = HashMap::new();
        let mut root = None;

        for account in &ledger.accounts {
            accounts.entry(account.id.as_str()).or_insert(account);
            if let Some(parent) = &account.parent {
                children.entry(parent.as_str()).or_default().push(account);
            } else if root.is_none() && account.is_root() {
                root = Some(account);
            }
        }

        let mut commodities = HashMap::with_capacity(ledger.commodities.len());
        let mut seen_categories = HashSet::new();
        let mut categories = Vec::new();
        for commodity in &ledger.commodities {
            commodities.entry(commodity.id.as_str()).or_insert(commodity);
            if seen_categories.insert(commodity.namespace.as_str()) {
                categories.push(commodity.namespace.as_str());
            }
        }

        let mut prices: HashMap<&str, Vec<&PriceQuote>> = HashMap::new();
        for quote in &ledger.prices {
            prices
                .entry(quote.commodity.id.as_str())
                .or_default()
                .push(quote);
        }
        for quotes in prices.values_mut() {
            quotes.sort_by_key(|quote| quote.date);
        }

        Self {
            ledger,
            accounts,
            children,
            root,
            commodities,
            categories,
            prices,
        }
    }

    /// The ledger this index was built from.
    pub const fn ledger(&self) -> &'a Ledger {
        self.ledger
    }

    /// The book's "Root Account", if it has one.
    pub const fn root(&self) -> Option<&'a Account> {
        self.root
    }

    /// Look up an account by id.
    pub fn account(&self, id: &str) -> Option<&'a Account> {
        self.accounts.get(id).copied()
    }

    /// Direct children of an account, in document order.
    pub fn children(&self, id: &str) -> &[&'a Account] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look up a commodity by id. The first declaration wins.
    pub fn commodity(&self, id: &str) -> Option<&'a Commodity> {
        self.commodities.get(id).copied()
    }

    /// Every distinct commodity namespace, in the order first declared.
    pub fn categories(&self) -> &[&'a str] {
        &self.categories
    }

    /// Price quotes for a commodity, oldest first.
    ///
    /// Quotes sharing a date keep their document order.
    pub fn prices(&self, commodity_id: &str) -> &[&'a PriceQuote] {
        self.prices.get(commodity_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// All transactions, in document order.
    pub fn transactions(&self) -> &'a [Transaction] {
        &self.ledger.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CommodityRef, ROOT_ACCOUNT_NAME};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        Ledger {
            accounts: vec![
                Account::new("root", ROOT_ACCOUNT_NAME, None),
                Account::new("assets", "Assets", Some("root")),
                Account::new("checking", "Checking", Some("assets")),
                Account::new("savings", "Savings", Some("assets")),
                Account::new("template", "Template Root", None),
            ],
            commodities: vec![
                Commodity::new("CURRENCY", "USD"),
                Commodity::new("NYSE", "GPC").with_symbol("GPC"),
                Commodity::new("NYSE", "KO"),
                Commodity::new("MUTF", "FXNAX"),
            ],
            prices: vec![
                PriceQuote::new(CommodityRef::new("NYSE", "GPC"), date(2021, 3, 1), dec!(120)),
                PriceQuote::new(CommodityRef::new("NYSE", "GPC"), date(2021, 1, 1), dec!(100)),
                PriceQuote::new(CommodityRef::new("NYSE", "GPC"), date(2021, 3, 1), dec!(121)),
            ],
            transactions: Vec::new(),
        }
    }

    #[test]
    fn test_root_and_children() {
        let ledger = sample_ledger();
        let index = LedgerIndex::new(&ledger);

        assert_eq!(index.root().map(|a| a.id.as_str()), Some("root"));

        let names: Vec<_> = index
            .children("assets")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Checking", "Savings"]);
        assert!(index.children("checking").is_empty());
        assert!(index.children("missing").is_empty());
    }

    #[test]
    fn test_account_lookup() {
        let ledger = sample_ledger();
        let index = LedgerIndex::new(&ledger);

        assert_eq!(index.account("savings").unwrap().name, "Savings");
        assert!(index.account("nope").is_none());
    }

    #[test]
    fn test_categories_in_declaration_order() {
        let ledger = sample_ledger();
        let index = LedgerIndex::new(&ledger);

        assert_eq!(index.categories(), &["CURRENCY", "NYSE", "MUTF"]);
        assert_eq!(
            index.commodity("GPC").and_then(|c| c.symbol.as_deref()),
            Some("GPC")
        );
    }

    #[test]
    fn test_prices_sorted_stably_by_date() {
        let ledger = sample_ledger();
        let index = LedgerIndex::new(&ledger);

        let values: Vec<_> = index.prices("GPC").iter().map(|q| q.value).collect();
        assert_eq!(values, vec![dec!(100), dec!(120), dec!(121)]);
        assert!(index.prices("KO").is_empty());
    }

    #[test]
    fn test_missing_root() {
        let ledger = Ledger {
            accounts: vec![Account::new("a", "Assets", None)],
            ..Ledger::default()
        };
        let index = LedgerIndex::new(&ledger);
        assert!(index.root().is_none());
    }
}
