use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// A ledger entry as returned by `GET /api/expenses`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub amount: f64,
        pub category: String,
        #[serde(default)]
        pub description: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Creation timestamp as sent by the server (usually RFC3339).
        ///
        /// Kept as a string so a bad value does not reject the whole list.
        #[serde(default)]
        pub date: Option<String>,
    }

    /// Request body for `POST /api/expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: f64,
        pub category: String,
        pub description: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
    }

    /// Server-computed summary for `GET /api/expenses/dashboard`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Dashboard {
        pub username: String,
        pub total_income: f64,
        pub total_expense: f64,
        #[serde(default)]
        pub category_totals: HashMap<String, f64>,
    }
}

pub mod report {
    use super::*;
    use std::collections::HashMap;

    /// Query of `GET /api/users/monthly-report`.
    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct MonthlyReportQuery {
        /// 1..=12
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyReport {
        pub total_expense: f64,
        #[serde(default)]
        pub category_totals: HashMap<String, f64>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub name: String,
        pub target_amount: f64,
        /// Missing on goals created before progress tracking existed.
        #[serde(default)]
        pub current_amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalNew {
        pub name: String,
        pub target_amount: f64,
    }
}

pub mod tracker {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TrackerItemView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub name: String,
        pub amount: f64,
        #[serde(default)]
        pub date: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TrackerView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub name: String,
        /// One of the fixed tracker labels (e.g. `"Debt Repayment"`).
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default)]
        pub items: Vec<TrackerItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackerNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrackerItemNew {
        pub name: String,
        pub amount: f64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Profile {
        pub username: String,
        pub email: String,
        /// Monthly budget; `0` when never set.
        #[serde(default)]
        pub budget: f64,
        #[serde(default)]
        pub created_at: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub budget: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Notification {
        pub message: String,
        #[serde(default)]
        pub date: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_view_reads_mongo_ids_and_type() {
        let raw = r#"{
            "_id": "65a1",
            "amount": 40,
            "category": "Food",
            "type": "expense",
            "date": "2024-01-10T08:00:00.000Z"
        }"#;
        let view: expense::TransactionView = serde_json::from_str(raw).unwrap();
        assert_eq!(view.id, "65a1");
        assert_eq!(view.kind, expense::TransactionKind::Expense);
        assert_eq!(view.description, "");
        assert_eq!(view.date.as_deref(), Some("2024-01-10T08:00:00.000Z"));
    }

    #[test]
    fn goal_current_amount_defaults_to_zero() {
        let raw = r#"{"id": "g1", "name": "Bike", "targetAmount": 300.5}"#;
        let view: goal::GoalView = serde_json::from_str(raw).unwrap();
        assert_eq!(view.id, "g1");
        assert_eq!(view.current_amount, 0.0);
    }

    #[test]
    fn expense_new_serializes_type_field() {
        let body = expense::ExpenseNew {
            amount: 12.5,
            category: "Food".to_string(),
            description: String::new(),
            kind: expense::TransactionKind::Income,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "income");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = r#"{"_id": "1", "amount": 1, "category": "x", "type": "refund"}"#;
        assert!(serde_json::from_str::<expense::TransactionView>(raw).is_err());
    }
}
