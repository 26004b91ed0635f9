use std::collections::BTreeSet;

use crate::Transaction;

/// Distinct years present in `transactions`, newest first.
///
/// Feeds the year selector; undated transactions contribute nothing.
pub fn distinct_years(transactions: &[Transaction]) -> Vec<i32> {
    transactions
        .iter()
        .filter_map(Transaction::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransactionKind, parse_timestamp};

    fn dated(date: &str) -> Transaction {
        Transaction::new(
            date,
            1.0,
            "Misc",
            "",
            TransactionKind::Expense,
            parse_timestamp(date, chrono_tz::UTC),
        )
        .unwrap()
    }

    #[test]
    fn descending_without_duplicates() {
        let list = [
            dated("2022-05-01"),
            dated("2024-01-01"),
            dated("2022-12-31"),
            dated("2023-06-15"),
            dated("garbage"),
        ];
        assert_eq!(distinct_years(&list), [2024, 2023, 2022]);
    }

    #[test]
    fn empty_input() {
        assert!(distinct_years(&[]).is_empty());
    }
}
