//! Ledger entities read from a GNUCash book.
//!
//! These are plain data records. They are produced once by the loader and
//! never mutated afterwards; every lookup goes through [`LedgerIndex`].
//!
//! [`LedgerIndex`]: crate::LedgerIndex

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Name GNUCash gives the invisible top-level account of every book.
pub const ROOT_ACCOUNT_NAME: &str = "Root Account";

/// Separator between account names in a human-readable account path.
pub const ACCOUNT_PATH_SEPARATOR: char = ':';

/// Reference to a commodity by namespace and id (`NYSE`/`GPC`, `CURRENCY`/`USD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommodityRef {
    /// Commodity namespace (exchange, fund marker or `CURRENCY`).
    pub namespace: String,
    /// Commodity id within the namespace.
    pub id: String,
}

impl CommodityRef {
    /// Create a new commodity reference.
    #[must_use]
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

/// An account of the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Stable GUID of the account.
    pub id: String,
    /// Display name (one segment of an account path).
    pub name: String,
    /// GNUCash account type (`ROOT`, `ASSET`, `BANK`, `STOCK`, ...).
    pub account_type: String,
    /// Parent account GUID, absent for roots.
    pub parent: Option<String>,
    /// Commodity the account is denominated in.
    pub commodity: Option<CommodityRef>,
    /// Free-form description.
    pub description: Option<String>,
}

impl Account {
    /// Create an account without a commodity.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type: String::new(),
            parent: parent.map(str::to_string),
            commodity: None,
            description: None,
        }
    }

    /// Set the account's commodity.
    #[must_use]
    pub fn with_commodity(mut self, namespace: &str, id: &str) -> Self {
        self.commodity = Some(CommodityRef::new(namespace, id));
        self
    }

    /// Set the account type.
    #[must_use]
    pub fn with_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    /// Whether this is the book's distinguished root account.
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.name == ROOT_ACCOUNT_NAME
    }
}

/// A currency or security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commodity {
    /// Namespace, used as the commodity's category.
    pub namespace: String,
    /// Id within the namespace.
    pub id: String,
    /// Full name, e.g. "Genuine Parts Company".
    pub name: Option<String>,
    /// User-defined display symbol (the `user_symbol` slot).
    pub symbol: Option<String>,
}

impl Commodity {
    /// Create a commodity without a name or symbol.
    #[must_use]
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
            name: None,
            symbol: None,
        }
    }

    /// Set the display symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Price of one unit of a commodity on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    /// The commodity being priced.
    pub commodity: CommodityRef,
    /// The currency the price is expressed in.
    pub currency: CommodityRef,
    /// Date of the quote.
    pub date: NaiveDate,
    /// Price per unit.
    pub value: Decimal,
}

impl PriceQuote {
    /// Create a quote priced in US dollars.
    #[must_use]
    pub fn new(commodity: CommodityRef, date: NaiveDate, value: Decimal) -> Self {
        Self {
            commodity,
            currency: CommodityRef::new("CURRENCY", "USD"),
            date,
            value,
        }
    }
}

/// One leg of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// GUID of the account this leg posts to.
    pub account: String,
    /// Value in the transaction currency.
    pub value: Decimal,
    /// Quantity in the account's commodity.
    pub quantity: Decimal,
}

impl Split {
    /// Create a new split.
    #[must_use]
    pub fn new(account: impl Into<String>, value: Decimal, quantity: Decimal) -> Self {
        Self {
            account: account.into(),
            value,
            quantity,
        }
    }
}

/// A dated transaction with two or more splits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Stable GUID of the transaction.
    pub id: String,
    /// Posting date.
    pub date: NaiveDate,
    /// Description line.
    pub description: String,
    /// The legs of the transaction.
    pub splits: Vec<Split>,
}

impl Transaction {
    /// Create a new transaction without a description.
    #[must_use]
    pub fn new(id: impl Into<String>, date: NaiveDate, splits: Vec<Split>) -> Self {
        Self {
            id: id.into(),
            date,
            description: String::new(),
            splits,
        }
    }

    /// Splits of this transaction that post to `account`.
    pub fn splits_for<'a>(&'a self, account: &'a str) -> impl Iterator<Item = &'a Split> + 'a {
        self.splits.iter().filter(move |split| split.account == account)
    }
}

/// Everything read from one GNUCash book, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// All accounts, including the root.
    pub accounts: Vec<Account>,
    /// All declared commodities.
    pub commodities: Vec<Commodity>,
    /// The price database.
    pub prices: Vec<PriceQuote>,
    /// All transactions.
    pub transactions: Vec<Transaction>,
}
