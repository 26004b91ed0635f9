//! Category-specific trackers.
//!
//! A tracker is a named bucket with its own dated items, kept outside the
//! main transaction ledger. The tracker owns its items.

use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine, Timestamp};

/// The fixed set of tracker categories offered to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerKind {
    Subscription,
    Grocery,
    Event,
    HealthAndEducation,
    Budget,
    Bill,
    DebtRepayment,
    Savings,
    Investment,
    Custom,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 10] = [
        Self::Subscription,
        Self::Grocery,
        Self::Event,
        Self::HealthAndEducation,
        Self::Budget,
        Self::Bill,
        Self::DebtRepayment,
        Self::Savings,
        Self::Investment,
        Self::Custom,
    ];

    /// Label used on the wire and shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::Grocery => "Grocery",
            Self::Event => "Event",
            Self::HealthAndEducation => "Health and Education",
            Self::Budget => "Budget",
            Self::Bill => "Bill",
            Self::DebtRepayment => "Debt Repayment",
            Self::Savings => "Savings",
            Self::Investment => "Investment",
            Self::Custom => "Other/Custom",
        }
    }
}

impl TryFrom<&str> for TrackerKind {
    type Error = EngineError;

    /// Matches labels case-insensitively; `-`/`_` stand for spaces so that
    /// `debt-repayment` works on a command line.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(&wanted)
                    || (*kind == Self::Custom
                        && (wanted.eq_ignore_ascii_case("other")
                            || wanted.eq_ignore_ascii_case("custom")))
            })
            .ok_or_else(|| EngineError::InvalidField {
                field: "tracker type",
                reason: format!("unknown tracker type: {}", value.trim()),
            })
    }
}

impl std::str::FromStr for TrackerKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerItem {
    pub id: String,
    pub name: String,
    pub amount: Amount,
    pub date: Option<Timestamp>,
}

impl TrackerItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        date: Option<Timestamp>,
    ) -> ResultEngine<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::empty("item name"));
        }
        Ok(Self {
            id: id.into(),
            name,
            amount: Amount::non_negative(amount)?,
            date,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: String,
    pub name: String,
    pub kind: TrackerKind,
    pub items: Vec<TrackerItem>,
}

impl Tracker {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: TrackerKind,
        items: Vec<TrackerItem>,
    ) -> ResultEngine<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::empty("tracker name"));
        }
        Ok(Self {
            id: id.into(),
            name,
            kind,
            items,
        })
    }

    /// Running total of the tracker's items.
    pub fn total(&self) -> Amount {
        self.items.iter().map(|item| item.amount).sum()
    }
}
