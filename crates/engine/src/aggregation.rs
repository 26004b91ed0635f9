//! Totals derived from a transaction snapshot.
//!
//! Aggregation is recomputed from scratch on every call; nothing is cached
//! between snapshots.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Accumulator, Amount, EngineError, ResultEngine, Transaction, TransactionKind};

/// Income/expense totals plus expense totals per category.
///
/// Categories with no expense transaction are absent from `category_totals`
/// (never present with a zero value).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub category_totals: BTreeMap<String, Amount>,
}

impl Aggregation {
    /// Validates totals computed elsewhere (e.g. the server dashboard).
    pub fn from_totals(
        total_income: f64,
        total_expense: f64,
        category_totals: impl IntoIterator<Item = (String, f64)>,
    ) -> ResultEngine<Self> {
        let category_totals = category_totals
            .into_iter()
            .map(|(category, amount)| {
                if category.trim().is_empty() {
                    return Err(EngineError::empty("category"));
                }
                Ok((category, Amount::non_negative(amount)?))
            })
            .collect::<ResultEngine<BTreeMap<_, _>>>()?;

        Ok(Self {
            total_income: Amount::non_negative(total_income)?,
            total_expense: Amount::non_negative(total_expense)?,
            category_totals,
        })
    }

    /// Sum of all category totals.
    pub fn category_sum(&self) -> Amount {
        self.category_totals.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_income.is_zero() && self.total_expense.is_zero() && self.category_totals.is_empty()
    }
}

/// Computes income, expense and per-category expense totals.
pub fn aggregate(transactions: &[Transaction]) -> Aggregation {
    let mut income = Accumulator::new();
    let mut expense = Accumulator::new();
    let mut categories: HashMap<&str, Accumulator> = HashMap::new();

    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => income.add(tx.amount),
            TransactionKind::Expense => {
                expense.add(tx.amount);
                categories.entry(tx.category.as_str()).or_default().add(tx.amount);
            }
        }
    }

    Aggregation {
        total_income: income.total(),
        total_expense: expense.total(),
        category_totals: categories
            .into_iter()
            .map(|(category, acc)| (category.to_string(), acc.total()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: TransactionKind, category: &str, amount: f64) -> Transaction {
        Transaction::new("x", amount, category, "", kind, None).unwrap()
    }

    #[test]
    fn income_is_not_a_category() {
        let agg = aggregate(&[
            tx(TransactionKind::Income, "Salary", 100.0),
            tx(TransactionKind::Expense, "Food", 40.0),
            tx(TransactionKind::Expense, "Rent", 25.5),
            tx(TransactionKind::Expense, "Food", 10.0),
        ]);
        assert_eq!(agg.total_income, Amount::new(100.0));
        assert_eq!(agg.total_expense, Amount::new(75.5));
        assert_eq!(agg.category_totals.len(), 2);
        assert_eq!(agg.category_totals["Food"], Amount::new(50.0));
        assert_eq!(agg.category_totals["Rent"], Amount::new(25.5));
        assert!(!agg.category_totals.contains_key("Salary"));
    }

    #[test]
    fn categories_are_case_sensitive() {
        let agg = aggregate(&[
            tx(TransactionKind::Expense, "food", 1.0),
            tx(TransactionKind::Expense, "Food", 2.0),
        ]);
        assert_eq!(agg.category_totals.len(), 2);
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let agg = aggregate(&[]);
        assert_eq!(agg, Aggregation::default());
        assert!(agg.is_empty());
    }

    #[test]
    fn from_totals_validates_amounts() {
        let agg = Aggregation::from_totals(
            10.0,
            4.0,
            [("Food".to_string(), 4.0)],
        )
        .unwrap();
        assert_eq!(agg.category_sum(), Amount::new(4.0));

        assert!(Aggregation::from_totals(-1.0, 0.0, []).is_err());
        assert!(Aggregation::from_totals(0.0, 0.0, [("Food".to_string(), f64::NAN)]).is_err());
        assert!(Aggregation::from_totals(0.0, 0.0, [(String::new(), 1.0)]).is_err());
    }
}
