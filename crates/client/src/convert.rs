//! Boundary validation: wire payloads into engine values.
//!
//! A payload that decodes but breaks the data model (negative amount, blank
//! category, unknown tracker type) fails the whole response with
//! [`ClientError::MalformedResponse`]. A date that cannot be parsed only
//! drops that date.

use api_types::{expense, goal, report, tracker, user};
use chrono_tz::Tz;
use engine::{
    Aggregation, Amount, Goal, Tracker, TrackerItem, TrackerKind, Transaction, TransactionKind,
    parse_timestamp,
};

use crate::{
    Dashboard, MonthlyReport, Notification, Profile,
    error::{ClientError, Result},
};

pub(crate) fn date(raw: Option<&str>, tz: Tz, what: &str) -> Option<engine::Timestamp> {
    let raw = raw?;
    let parsed = parse_timestamp(raw, tz);
    if parsed.is_none() {
        tracing::warn!("dropping unparsable {what} date: {raw:?}");
    }
    parsed
}

pub(crate) fn kind(kind: expense::TransactionKind) -> TransactionKind {
    match kind {
        expense::TransactionKind::Income => TransactionKind::Income,
        expense::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn kind_to_wire(kind: TransactionKind) -> expense::TransactionKind {
    match kind {
        TransactionKind::Income => expense::TransactionKind::Income,
        TransactionKind::Expense => expense::TransactionKind::Expense,
    }
}

pub(crate) fn transaction(view: expense::TransactionView, tz: Tz) -> Result<Transaction> {
    let when = date(view.date.as_deref(), tz, "transaction");
    Transaction::new(
        view.id,
        view.amount,
        view.category,
        view.description,
        kind(view.kind),
        when,
    )
    .map_err(ClientError::from)
}

pub(crate) fn transactions(views: Vec<expense::TransactionView>, tz: Tz) -> Result<Vec<Transaction>> {
    views.into_iter().map(|view| transaction(view, tz)).collect()
}

pub(crate) fn goal(view: goal::GoalView) -> Result<Goal> {
    Ok(Goal::new(view.id, view.name, view.target_amount, view.current_amount)?)
}

pub(crate) fn tracker(view: tracker::TrackerView, tz: Tz) -> Result<Tracker> {
    let kind = TrackerKind::try_from(view.kind.as_str())?;
    let items = view
        .items
        .into_iter()
        .map(|item| {
            let when = date(item.date.as_deref(), tz, "tracker item");
            TrackerItem::new(item.id, item.name, item.amount, when).map_err(ClientError::from)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Tracker::new(view.id, view.name, kind, items)?)
}

pub(crate) fn dashboard(view: expense::Dashboard) -> Result<Dashboard> {
    let totals = Aggregation::from_totals(view.total_income, view.total_expense, view.category_totals)?;
    Ok(Dashboard {
        username: view.username,
        totals,
    })
}

pub(crate) fn monthly_report(view: report::MonthlyReport, query: report::MonthlyReportQuery) -> Result<MonthlyReport> {
    let totals = Aggregation::from_totals(0.0, view.total_expense, view.category_totals)?;
    Ok(MonthlyReport {
        year: query.year,
        month: query.month,
        totals,
    })
}

pub(crate) fn profile(view: user::Profile, tz: Tz) -> Result<Profile> {
    Ok(Profile {
        member_since: date(view.created_at.as_deref(), tz, "profile"),
        username: view.username,
        email: view.email,
        budget: Amount::non_negative(view.budget)?,
    })
}

pub(crate) fn notification(view: user::Notification, tz: Tz) -> Notification {
    Notification {
        date: date(view.date.as_deref(), tz, "notification"),
        message: view.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(amount: f64, category: &str, date: Option<&str>) -> expense::TransactionView {
        expense::TransactionView {
            id: "t1".to_string(),
            amount,
            category: category.to_string(),
            description: String::new(),
            kind: expense::TransactionKind::Expense,
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn valid_view_converts() {
        let tx = transaction(view(12.5, "Food", Some("2024-03-01T10:00:00Z")), chrono_tz::UTC).unwrap();
        assert_eq!(tx.amount, Amount::new(12.5));
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.month(), Some(3));
    }

    #[test]
    fn bad_date_is_dropped_not_fatal() {
        let tx = transaction(view(1.0, "Food", Some("31/02/2024")), chrono_tz::UTC).unwrap();
        assert_eq!(tx.date, None);
    }

    #[test]
    fn invariant_violations_are_malformed() {
        let err = transaction(view(-3.0, "Food", None), chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        let err = transaction(view(3.0, "", None), chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn one_bad_row_fails_the_list() {
        let views = vec![view(1.0, "Food", None), view(-1.0, "Food", None)];
        assert!(transactions(views, chrono_tz::UTC).is_err());
    }

    #[test]
    fn unknown_tracker_type_is_malformed() {
        let view = tracker::TrackerView {
            id: "tr".to_string(),
            name: "Stuff".to_string(),
            kind: "Lottery".to_string(),
            items: Vec::new(),
        };
        assert!(matches!(tracker(view, chrono_tz::UTC), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn kind_mapping_round_trips() {
        for wire in [expense::TransactionKind::Income, expense::TransactionKind::Expense] {
            assert_eq!(kind_to_wire(kind(wire)), wire);
        }
    }
}
