//! Display-ready figures derived from an [`Aggregation`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Aggregation, Amount, Transaction, aggregate, filter::TransactionFilter, filter::Selection};

/// Above this share of the budget the dashboard shows a warning.
pub const NEAR_LIMIT_PERCENTAGE: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceLabel {
    Surplus,
    Deficit,
}

impl fmt::Display for BalanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surplus => f.write_str("Surplus"),
            Self::Deficit => f.write_str("Deficit"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// `None` when the budget is zero.
    pub spent_percentage: Option<f64>,
    pub balance: Amount,
    pub is_over_budget: bool,
    pub is_surplus: bool,
}

impl BudgetReport {
    pub fn label(&self) -> BalanceLabel {
        if self.is_surplus {
            BalanceLabel::Surplus
        } else {
            BalanceLabel::Deficit
        }
    }

    pub fn is_near_limit(&self) -> bool {
        self.spent_percentage
            .is_some_and(|spent| spent > NEAR_LIMIT_PERCENTAGE)
    }
}

/// Derives budget usage and balance from `agg`.
pub fn format(agg: &Aggregation, budget: Amount) -> BudgetReport {
    let spent_percentage = agg.total_expense.percentage_of(budget);
    let balance = agg.total_income - agg.total_expense;
    BudgetReport {
        spent_percentage,
        balance,
        is_over_budget: spent_percentage.is_some_and(|spent| spent > 100.0),
        is_surplus: balance.is_positive(),
    }
}

/// Share of total expense taken by `amount`, 0 when there is no expense.
pub fn category_percentage(agg: &Aggregation, amount: Amount) -> f64 {
    amount.percentage_of(agg.total_expense).unwrap_or(0.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Amount,
    pub percentage: f64,
}

/// Category bars: largest amount first, ties by name.
pub fn breakdown(agg: &Aggregation) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = agg
        .category_totals
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: category.clone(),
            amount: *amount,
            percentage: category_percentage(agg, *amount),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .value()
            .total_cmp(&a.amount.value())
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Aggregation over the transactions of one calendar month.
pub fn monthly(transactions: &[Transaction], year: i32, month: u32) -> Aggregation {
    let in_month = TransactionFilter::new("", Selection::Only(year), Selection::Only(month));
    aggregate(&in_month.apply(transactions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(income: f64, expense: f64) -> Aggregation {
        Aggregation::from_totals(income, expense, []).unwrap()
    }

    #[test]
    fn surplus_within_budget() {
        let report = format(&agg(100.0, 50.0), Amount::new(80.0));
        assert_eq!(report.spent_percentage, Some(62.5));
        assert_eq!(report.balance, Amount::new(50.0));
        assert!(!report.is_over_budget);
        assert!(report.is_surplus);
        assert_eq!(report.label(), BalanceLabel::Surplus);
        assert!(!report.is_near_limit());
    }

    #[test]
    fn deficit_over_budget() {
        let report = format(&agg(20.0, 90.0), Amount::new(80.0));
        assert_eq!(report.spent_percentage, Some(112.5));
        assert_eq!(report.balance, Amount::new(-70.0));
        assert!(report.is_over_budget);
        assert!(!report.is_surplus);
        assert_eq!(report.label(), BalanceLabel::Deficit);
        assert!(report.is_near_limit());
    }

    #[test]
    fn zero_budget_leaves_percentage_undefined() {
        let report = format(&agg(0.0, 10.0), Amount::ZERO);
        assert_eq!(report.spent_percentage, None);
        assert!(!report.is_over_budget);
        assert!(!report.is_near_limit());
    }

    #[test]
    fn balanced_books_are_a_deficit() {
        let report = format(&agg(10.0, 10.0), Amount::new(10.0));
        assert!(!report.is_surplus);
        assert!(!report.is_over_budget);
    }

    #[test]
    fn breakdown_orders_by_amount() {
        let agg = Aggregation::from_totals(
            0.0,
            100.0,
            [
                ("Rent".to_string(), 60.0),
                ("Food".to_string(), 20.0),
                ("Fun".to_string(), 20.0),
            ],
        )
        .unwrap();
        let shares = breakdown(&agg);
        let names: Vec<_> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, ["Rent", "Food", "Fun"]);
        assert_eq!(shares[0].percentage, 60.0);
        assert_eq!(shares[1].percentage, 20.0);
    }

    #[test]
    fn category_percentage_without_expense_is_zero() {
        assert_eq!(category_percentage(&Aggregation::default(), Amount::new(5.0)), 0.0);
    }
}
