//! Transaction primitives.
//!
//! A `Transaction` is an immutable ledger entry fetched from the remote API.
//! The sign of the money movement is carried by [`TransactionKind`], never by
//! the amount.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine};

/// A point in time expressed in the user's timezone.
pub type Timestamp = DateTime<FixedOffset>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidField {
                field: "type",
                reason: format!("unknown transaction type: {other}"),
            }),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    /// Creation time in the user's timezone; `None` when the server sent a
    /// value that could not be parsed.
    pub date: Option<Timestamp>,
}

impl Transaction {
    /// Builds a validated transaction.
    ///
    /// Fails when the amount is negative or not finite, or when the category
    /// is blank. The description may be empty.
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        kind: TransactionKind,
        date: Option<Timestamp>,
    ) -> ResultEngine<Self> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(EngineError::empty("category"));
        }
        Ok(Self {
            id: id.into(),
            amount: Amount::non_negative(amount)?,
            category,
            description: description.into(),
            kind,
            date,
        })
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|date| date.year())
    }

    /// Calendar month, 1..=12.
    pub fn month(&self) -> Option<u32> {
        self.date.map(|date| date.month())
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|date| date.date_naive())
    }
}

/// Parses a server timestamp and expresses it in `tz`.
///
/// Accepts RFC3339 (`2024-01-05T10:00:00.000Z`, `2024-01-05T10:00:00+02:00`)
/// and bare dates (`2024-01-05`, read as midnight in `tz`). Anything else
/// yields `None`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&tz).fixed_offset());
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(TransactionKind::try_from("Income").unwrap(), TransactionKind::Income);
        assert_eq!(" expense ".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!(TransactionKind::try_from("refund").is_err());
    }

    #[test]
    fn new_rejects_negative_amount_and_blank_category() {
        assert!(matches!(
            Transaction::new("1", -5.0, "Food", "", TransactionKind::Expense, None),
            Err(EngineError::InvalidAmount(_))
        ));
        assert_eq!(
            Transaction::new("1", 5.0, "  ", "", TransactionKind::Expense, None).unwrap_err(),
            EngineError::empty("category")
        );
    }

    #[test]
    fn timestamp_is_shifted_into_user_timezone() {
        // 23:30 UTC on Jan 31st is already February in Rome.
        let date = parse_timestamp("2024-01-31T23:30:00.000Z", chrono_tz::Europe::Rome).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 1));

        let date = parse_timestamp("2024-01-31T23:30:00Z", chrono_tz::UTC).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 31));
    }

    #[test]
    fn bare_dates_and_garbage() {
        let date = parse_timestamp("2023-12-05", chrono_tz::UTC).unwrap();
        assert_eq!(date.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 5).unwrap());
        assert!(parse_timestamp("yesterday", chrono_tz::UTC).is_none());
        assert!(parse_timestamp("", chrono_tz::UTC).is_none());
    }

    #[test]
    fn calendar_accessors_follow_date() {
        let date = parse_timestamp("2022-07-14T09:00:00Z", chrono_tz::UTC);
        let tx = Transaction::new("a", 1.0, "Rent", "", TransactionKind::Expense, date).unwrap();
        assert_eq!(tx.year(), Some(2022));
        assert_eq!(tx.month(), Some(7));

        let undated = Transaction::new("b", 1.0, "Rent", "", TransactionKind::Expense, None).unwrap();
        assert_eq!(undated.year(), None);
        assert_eq!(undated.day(), None);
    }
}
