//! Client-side search over a transaction snapshot.
//!
//! A transaction is kept when it matches the free-text term, the selected
//! year and the selected month. Transactions without a usable date never
//! match a concrete year or month, but do match [`Selection::All`].

use std::{fmt, str::FromStr};

use crate::{EngineError, Transaction};

/// A selector value: everything, or one specific value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    /// `All` accepts anything, even a missing value; `Only` needs an equal one.
    pub fn accepts(&self, value: Option<T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value.as_ref() == Some(wanted),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for Selection<i32> {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selection(s, "year", |_| true)
    }
}

impl FromStr for Selection<u32> {
    type Err = EngineError;

    /// Month selector: `all` or `1..=12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selection(s, "month", |month: &u32| (1..=12).contains(month))
    }
}

fn parse_selection<T: FromStr>(
    raw: &str,
    label: &str,
    valid: impl Fn(&T) -> bool,
) -> Result<Selection<T>, EngineError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => Ok(Selection::Only(value)),
        _ => Err(EngineError::InvalidSelection(format!(
            "invalid {label}: {raw}"
        ))),
    }
}

/// Search criteria for the expense list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    term: String,
    pub year: Selection<i32>,
    pub month: Selection<u32>,
}

impl TransactionFilter {
    pub fn new(term: &str, year: Selection<i32>, month: Selection<u32>) -> Self {
        Self {
            term: term.to_lowercase(),
            year,
            month,
        }
    }

    /// The search term, already lower-cased.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_term(tx) && self.year.accepts(tx.year()) && self.month.accepts(tx.month())
    }

    fn matches_term(&self, tx: &Transaction) -> bool {
        if self.term.is_empty() {
            return true;
        }
        tx.category.to_lowercase().contains(&self.term)
            || tx.description.to_lowercase().contains(&self.term)
            || tx.kind.as_str().contains(&self.term)
    }

    /// Matching transactions, in input order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }
}

/// Shorthand for `TransactionFilter::new(term, year, month).apply(transactions)`.
pub fn filter(
    transactions: &[Transaction],
    term: &str,
    year: Selection<i32>,
    month: Selection<u32>,
) -> Vec<Transaction> {
    TransactionFilter::new(term, year, month).apply(transactions)
}
