//! Plain-text views printed on stdout.

use client::{Notification, Profile};
use engine::{
    Aggregation, Amount, BudgetReport, CategoryShare, Goal, Timestamp, Tracker, Transaction,
};

fn day(date: Option<Timestamp>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Two decimals, like amounts.
fn percentage(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}%"),
        None => "n/a".to_string(),
    }
}

fn share_line(share: &CategoryShare) -> String {
    format!(
        "  {:<16} {:>12}  {:>6.2}%",
        share.category,
        share.amount.to_string(),
        share.percentage
    )
}

pub fn transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions.".to_string();
    }
    let header = format!(
        "{:<24}  {:<10}  {:<7}  {:<16}  {:>12}  Description",
        "Id", "Date", "Type", "Category", "Amount"
    );
    let rows = transactions.iter().map(|tx| {
        format!(
            "{:<24}  {:<10}  {:<7}  {:<16}  {:>12}  {}",
            tx.id,
            day(tx.date),
            tx.kind,
            tx.category,
            tx.amount.to_string(),
            tx.description
        )
        .trim_end()
        .to_string()
    });
    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn years(years: &[i32]) -> String {
    if years.is_empty() {
        return "No dated transactions.".to_string();
    }
    years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Totals, budget usage and the per-category bars.
pub fn summary(agg: &Aggregation, budget: Amount, report: &BudgetReport, shares: &[CategoryShare]) -> String {
    let status = if report.is_over_budget {
        " (over budget)"
    } else if report.is_near_limit() {
        " (near limit)"
    } else {
        ""
    };

    let mut lines = vec![
        format!("Total income:   {:>12}", agg.total_income.to_string()),
        format!("Total expense:  {:>12}", agg.total_expense.to_string()),
        format!("{:<15} {:>12}", format!("{}:", report.label()), report.balance.to_string()),
        format!(
            "Budget:         {:>12}  spent {}{status}",
            budget.to_string(),
            percentage(report.spent_percentage)
        ),
    ];
    if !shares.is_empty() {
        lines.push(String::new());
        lines.push("By category:".to_string());
        lines.extend(shares.iter().map(share_line));
    }
    lines.join("\n")
}

pub fn monthly(year: i32, month: u32, agg: &Aggregation, shares: &[CategoryShare]) -> String {
    let mut lines = vec![
        format!("Report for {year}-{month:02}"),
        format!("Total expense:  {:>12}", agg.total_expense.to_string()),
    ];
    lines.extend(shares.iter().map(share_line));
    lines.join("\n")
}

pub fn goals(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet.".to_string();
    }
    goals
        .iter()
        .map(|goal| {
            format!(
                "{}  {}: {} of {} ({} saved, {} to go)",
                goal.id,
                goal.name,
                goal.current,
                goal.target,
                percentage(goal.progress()),
                goal.remaining()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn trackers(trackers: &[Tracker]) -> String {
    if trackers.is_empty() {
        return "No trackers yet.".to_string();
    }
    let mut lines = Vec::new();
    for tracker in trackers {
        lines.push(format!(
            "{}  {} [{}]  total {}",
            tracker.id,
            tracker.name,
            tracker.kind,
            tracker.total()
        ));
        lines.extend(tracker.items.iter().map(|item| {
            format!(
                "    {}  {:<10}  {:<20} {:>12}",
                item.id,
                day(item.date),
                item.name,
                item.amount.to_string()
            )
        }));
    }
    lines.join("\n")
}

pub fn profile(profile: &Profile) -> String {
    [
        format!("Username:     {}", profile.username),
        format!("Email:        {}", profile.email),
        format!("Budget:       {}", profile.budget),
        format!("Member since: {}", day(profile.member_since)),
    ]
    .join("\n")
}

pub fn notifications(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }
    notifications
        .iter()
        .map(|note| format!("{}  {}", day(note.date), note.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{TrackerItem, TrackerKind, TransactionKind, parse_timestamp, report};

    #[test]
    fn transaction_rows_show_undated_as_dash() {
        let rows = vec![
            Transaction::new(
                "e1",
                100.0,
                "Salary",
                "",
                TransactionKind::Income,
                parse_timestamp("2024-01-05", chrono_tz::UTC),
            )
            .unwrap(),
            Transaction::new("e2", 7.5, "Food", "lunch", TransactionKind::Expense, None).unwrap(),
        ];
        let text = transactions(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("2024-01-05") && lines[1].contains("100.00"));
        assert!(lines[2].contains(" - ") && lines[2].ends_with("lunch"));
        assert_eq!(transactions(&[]), "No transactions.");
    }

    #[test]
    fn summary_flags_budget_state() {
        let agg = Aggregation::from_totals(20.0, 90.0, [("Rent".to_string(), 90.0)]).unwrap();
        let budget = Amount::new(80.0);
        let text = summary(&agg, budget, &report::format(&agg, budget), &report::breakdown(&agg));
        assert!(text.contains("Deficit:"));
        assert!(text.contains("-70.00"));
        assert!(text.contains("spent 112.50% (over budget)"));
        assert!(text.contains("Rent"));
        assert!(text.ends_with("100.00%"));
    }

    #[test]
    fn percentages_use_two_decimals() {
        let agg = Aggregation::from_totals(
            0.0,
            3.0,
            [("A".to_string(), 1.0), ("B".to_string(), 2.0)],
        )
        .unwrap();
        let text = monthly(2024, 3, &agg, &report::breakdown(&agg));
        assert_eq!(
            text,
            "Report for 2024-03\n\
             Total expense:          3.00\n  \
             B                        2.00   66.67%\n  \
             A                        1.00   33.33%"
        );
        assert_eq!(percentage(Some(62.5)), "62.50%");
    }

    #[test]
    fn summary_without_budget() {
        let agg = Aggregation::default();
        let text = summary(&agg, Amount::ZERO, &report::format(&agg, Amount::ZERO), &[]);
        assert!(text.contains("spent n/a"));
        assert!(!text.contains("By category"));
    }

    #[test]
    fn trackers_list_items_under_their_tracker() {
        let items = vec![TrackerItem::new("i1", "Milk", 2.5, None).unwrap()];
        let tracker = engine::Tracker::new("t1", "Grocery", TrackerKind::Grocery, items).unwrap();
        let text = trackers(&[tracker]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "t1  Grocery [Grocery]  total 2.50");
        assert!(lines[1].starts_with("    i1  -"));
        assert!(lines[1].ends_with("2.50"));
    }
}
