//! Streaming reader for the GNUCash XML schema.
//!
//! Elements are matched on their qualified names (`act:name`, `split:value`)
//! together with their parent element, which is how GNUCash disambiguates the
//! many `cmdty:id` and `ts:date` children it writes.

use std::io::BufRead;
use std::mem;

use chrono::NaiveDate;
use gnucash_report_core::{
    parse_fraction, Account, Commodity, CommodityRef, Decimal, Ledger, PriceQuote, Split,
    Transaction,
};
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::LoadError;

const DOCUMENT_ROOT: &str = "gnc-v2";
const TEMPLATE_TRANSACTIONS: &str = "gnc:template-transactions";
const USER_SYMBOL_SLOT: &str = "user_symbol";

#[derive(Debug, Default)]
struct CommodityFields {
    namespace: Option<String>,
    id: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
    slot_key: Option<String>,
}

#[derive(Debug, Default)]
struct PriceFields {
    id: Option<String>,
    commodity_namespace: Option<String>,
    commodity_id: Option<String>,
    currency_namespace: Option<String>,
    currency_id: Option<String>,
    date: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Default)]
struct AccountFields {
    id: Option<String>,
    name: Option<String>,
    account_type: Option<String>,
    parent: Option<String>,
    description: Option<String>,
    commodity_namespace: Option<String>,
    commodity_id: Option<String>,
}

#[derive(Debug, Default)]
struct SplitFields {
    id: Option<String>,
    account: Option<String>,
    value: Option<String>,
    quantity: Option<String>,
}

#[derive(Debug, Default)]
struct TransactionFields {
    id: Option<String>,
    description: Option<String>,
    date: Option<String>,
    splits: Vec<Split>,
}

/// Reads one GNUCash document into a [`Ledger`].
pub struct BookReader<R> {
    reader: Reader<R>,
    /// Qualified names of the currently open elements.
    stack: Vec<String>,
    /// Text of the innermost open element.
    text: String,
    seen_root: bool,
    ledger: Ledger,
    commodity: Option<CommodityFields>,
    price: Option<PriceFields>,
    account: Option<AccountFields>,
    transaction: Option<TransactionFields>,
    split: Option<SplitFields>,
}

impl<R: BufRead> BookReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        Self {
            reader,
            stack: Vec::new(),
            text: String::new(),
            seen_root: false,
            ledger: Ledger::default(),
            commodity: None,
            price: None,
            account: None,
            transaction: None,
            split: None,
        }
    }

    pub fn read(mut self) -> Result<Ledger, LoadError> {
        let mut buf = Vec::new();
        let mut skipped = Vec::new();

        loop {
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| xml_error(self.reader.buffer_position(), e))?;

            match event {
                Event::Start(e) => {
                    let name = qualified_name(e.name());
                    if name == TEMPLATE_TRANSACTIONS {
                        self.reader
                            .read_to_end_into(e.name(), &mut skipped)
                            .map_err(|e| xml_error(self.reader.buffer_position(), e))?;
                        skipped.clear();
                    } else {
                        self.start(name)?;
                    }
                }
                Event::Empty(e) => {
                    self.start(qualified_name(e.name()))?;
                    self.end()?;
                }
                Event::End(_) => self.end()?,
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| xml_error(self.reader.buffer_position(), e))?;
                    self.text.push_str(&text);
                }
                Event::CData(c) => {
                    self.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !self.seen_root {
            return Err(LoadError::Xml {
                position: self.reader.buffer_position(),
                message: "document has no root element".to_string(),
            });
        }
        Ok(self.ledger)
    }

    fn start(&mut self, name: String) -> Result<(), LoadError> {
        if !self.seen_root {
            if name != DOCUMENT_ROOT {
                return Err(LoadError::NotGnucash(name));
            }
            self.seen_root = true;
        }

        match name.as_str() {
            "gnc:commodity" => self.commodity = Some(CommodityFields::default()),
            "price" if self.parent() == "gnc:pricedb" => self.price = Some(PriceFields::default()),
            "gnc:account" => self.account = Some(AccountFields::default()),
            "gnc:transaction" => self.transaction = Some(TransactionFields::default()),
            "trn:split" => self.split = Some(SplitFields::default()),
            _ => {}
        }

        self.text.clear();
        self.stack.push(name);
        Ok(())
    }

    fn end(&mut self) -> Result<(), LoadError> {
        let Some(name) = self.stack.pop() else {
            return Ok(());
        };
        let text = mem::take(&mut self.text).trim().to_string();

        match name.as_str() {
            "gnc:commodity" => {
                if let Some(fields) = self.commodity.take() {
                    self.ledger.commodities.push(finish_commodity(fields)?);
                }
            }
            "price" => {
                if let Some(fields) = self.price.take() {
                    self.ledger.prices.push(finish_price(fields)?);
                }
            }
            "gnc:account" => {
                if let Some(fields) = self.account.take() {
                    self.ledger.accounts.push(finish_account(fields)?);
                }
            }
            "trn:split" => {
                if let Some(fields) = self.split.take() {
                    let transaction = self.transaction.get_or_insert_with(Default::default);
                    let split = finish_split(fields, transaction.id.as_deref())?;
                    transaction.splits.push(split);
                }
            }
            "gnc:transaction" => {
                if let Some(fields) = self.transaction.take() {
                    self.ledger.transactions.push(finish_transaction(fields)?);
                }
            }
            _ => self.field(&name, text),
        }
        Ok(())
    }

    /// Store the text of a leaf element in whichever record is open.
    fn field(&mut self, name: &str, text: String) {
        let parent = self.parent().to_string();

        match (parent.as_str(), name) {
            ("gnc:commodity", field) => {
                if let Some(commodity) = &mut self.commodity {
                    match field {
                        "cmdty:space" => commodity.namespace = Some(text),
                        "cmdty:id" => commodity.id = Some(text),
                        "cmdty:name" => commodity.name = Some(text),
                        _ => {}
                    }
                }
            }
            ("slot", field) if self.ancestor(1) == "cmdty:slots" => {
                if let Some(commodity) = &mut self.commodity {
                    match field {
                        "slot:key" => commodity.slot_key = Some(text),
                        "slot:value" if commodity.slot_key.as_deref() == Some(USER_SYMBOL_SLOT) => {
                            commodity.symbol = Some(text);
                        }
                        _ => {}
                    }
                }
            }

            ("price", field) => {
                if let Some(price) = &mut self.price {
                    match field {
                        "price:id" => price.id = Some(text),
                        "price:value" => price.value = Some(text),
                        _ => {}
                    }
                }
            }
            ("price:commodity", field) => {
                if let Some(price) = &mut self.price {
                    match field {
                        "cmdty:space" => price.commodity_namespace = Some(text),
                        "cmdty:id" => price.commodity_id = Some(text),
                        _ => {}
                    }
                }
            }
            ("price:currency", field) => {
                if let Some(price) = &mut self.price {
                    match field {
                        "cmdty:space" => price.currency_namespace = Some(text),
                        "cmdty:id" => price.currency_id = Some(text),
                        _ => {}
                    }
                }
            }
            ("price:time", "ts:date") => {
                if let Some(price) = &mut self.price {
                    price.date = Some(text);
                }
            }

            ("gnc:account", field) => {
                if let Some(account) = &mut self.account {
                    match field {
                        "act:id" => account.id = Some(text),
                        "act:name" => account.name = Some(text),
                        "act:type" => account.account_type = Some(text),
                        "act:parent" => account.parent = Some(text),
                        "act:description" => account.description = Some(text),
                        _ => {}
                    }
                }
            }
            ("act:commodity", field) => {
                if let Some(account) = &mut self.account {
                    match field {
                        "cmdty:space" => account.commodity_namespace = Some(text),
                        "cmdty:id" => account.commodity_id = Some(text),
                        _ => {}
                    }
                }
            }

            ("gnc:transaction", field) => {
                if let Some(transaction) = &mut self.transaction {
                    match field {
                        "trn:id" => transaction.id = Some(text),
                        "trn:description" => transaction.description = Some(text),
                        _ => {}
                    }
                }
            }
            ("trn:date-posted", "ts:date") => {
                if let Some(transaction) = &mut self.transaction {
                    transaction.date = Some(text);
                }
            }
            ("trn:split", field) => {
                if let Some(split) = &mut self.split {
                    match field {
                        "split:id" => split.id = Some(text),
                        "split:account" => split.account = Some(text),
                        "split:value" => split.value = Some(text),
                        "split:quantity" => split.quantity = Some(text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn parent(&self) -> &str {
        self.ancestor(0)
    }

    /// Name of the open element `depth` levels above the innermost one.
    fn ancestor(&self, depth: usize) -> &str {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .and_then(|i| self.stack.get(i))
            .map_or("", String::as_str)
    }
}

fn qualified_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn xml_error(position: usize, error: quick_xml::Error) -> LoadError {
    LoadError::Xml {
        position,
        message: error.to_string(),
    }
}

fn required(
    value: Option<String>,
    record: &'static str,
    id: Option<&str>,
    element: &'static str,
) -> Result<String, LoadError> {
    value.ok_or_else(|| LoadError::MissingElement {
        record,
        id: id.unwrap_or("<unknown>").to_string(),
        element,
    })
}

fn number(
    text: &str,
    record: &'static str,
    id: &str,
    element: &'static str,
) -> Result<Decimal, LoadError> {
    parse_fraction(text).map_err(|source| LoadError::InvalidNumber {
        record,
        id: id.to_string(),
        element,
        source,
    })
}

/// Parse a GNUCash timestamp (`2021-01-15 10:59:00 -0500`) down to its date.
fn date(text: &str, record: &'static str, id: &str) -> Result<NaiveDate, LoadError> {
    text.split_whitespace()
        .next()
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .ok_or_else(|| LoadError::InvalidDate {
            record,
            id: id.to_string(),
            value: text.to_string(),
        })
}

fn finish_commodity(fields: CommodityFields) -> Result<Commodity, LoadError> {
    let id = required(fields.id, "commodity", None, "cmdty:id")?;
    let namespace = required(fields.namespace, "commodity", Some(&id), "cmdty:space")?;
    Ok(Commodity {
        namespace,
        id,
        name: fields.name,
        symbol: fields.symbol,
    })
}

fn finish_price(fields: PriceFields) -> Result<PriceQuote, LoadError> {
    let id = fields.id.as_deref();
    let commodity_id = required(fields.commodity_id, "price", id, "cmdty:id")?;
    let date_text = required(fields.date, "price", id, "ts:date")?;
    let value_text = required(fields.value, "price", id, "price:value")?;
    let id = id.unwrap_or(&commodity_id);

    Ok(PriceQuote {
        commodity: CommodityRef::new(fields.commodity_namespace.unwrap_or_default(), &commodity_id),
        currency: CommodityRef::new(
            fields.currency_namespace.unwrap_or_default(),
            fields.currency_id.unwrap_or_default(),
        ),
        date: date(&date_text, "price", id)?,
        value: number(&value_text, "price", id, "price:value")?,
    })
}

fn finish_account(fields: AccountFields) -> Result<Account, LoadError> {
    let id = required(fields.id, "account", None, "act:id")?;
    let name = required(fields.name, "account", Some(&id), "act:name")?;
    let commodity = fields
        .commodity_id
        .map(|commodity_id| CommodityRef::new(fields.commodity_namespace.unwrap_or_default(), commodity_id));

    Ok(Account {
        id,
        name,
        account_type: fields.account_type.unwrap_or_default(),
        parent: fields.parent,
        commodity,
        description: fields.description,
    })
}

fn finish_split(fields: SplitFields, transaction: Option<&str>) -> Result<Split, LoadError> {
    let id = fields.id.as_deref().or(transaction);
    let account = required(fields.account, "split", id, "split:account")?;
    let value = required(fields.value, "split", id, "split:value")?;
    let quantity = required(fields.quantity, "split", id, "split:quantity")?;
    let id = id.unwrap_or("<unknown>");

    Ok(Split {
        account,
        value: number(&value, "split", id, "split:value")?,
        quantity: number(&quantity, "split", id, "split:quantity")?,
    })
}

fn finish_transaction(fields: TransactionFields) -> Result<Transaction, LoadError> {
    let id = required(fields.id, "transaction", None, "trn:id")?;
    let posted = required(fields.date, "transaction", Some(&id), "ts:date")?;

    Ok(Transaction {
        date: date(&posted, "transaction", &id)?,
        description: fields.description.unwrap_or_default(),
        splits: fields.splits,
        id,
    })
}
