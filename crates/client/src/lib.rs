//! HTTP gateway to the Dhanvikas API.
//!
//! [`Gateway`] owns the base URL, the bearer token and the user's timezone;
//! nothing is read from ambient state. Every response is decoded into the
//! `api_types` wire shapes and then validated into `engine` values, so
//! callers only ever see well-formed data or a [`ClientError`].

use api_types::{expense, goal, report, tracker, user};
use chrono_tz::Tz;
use engine::{Aggregation, Amount, Goal, Timestamp, Tracker, TrackerKind, Transaction, TransactionKind};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};

pub use error::{ClientError, Result};

mod convert;
mod error;

/// Server-computed dashboard summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub username: String,
    pub totals: Aggregation,
}

/// Server-computed monthly report.
///
/// The server reports a single total, carried in `totals.total_expense`;
/// `totals.total_income` is always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub totals: Aggregation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    pub email: String,
    /// Monthly budget, zero when never set.
    pub budget: Amount,
    pub member_since: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub date: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    timezone: Tz,
}

impl Gateway {
    /// `token` is the bearer token from a previous login, if any.
    pub fn new(base_url: &str, token: Option<String>, timezone: Tz) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(format!("{base_url} cannot be a base")));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: token.filter(|token| !token.trim().is_empty()),
            timezone,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::BaseUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn public(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{method} {}", url.path());
        self.http.request(method, url)
    }

    /// Fails with [`ClientError::MissingToken`] before anything is sent.
    fn authed(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(self.public(method, url).bearer_auth(token))
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let res = request.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::warn!("request failed with {status}: {body}");
        Err(ClientError::from_status(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
        res.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                ClientError::MalformedResponse(err.to_string())
            } else {
                ClientError::Transport(err)
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let request = self.authed(Method::GET, self.endpoint(segments)?)?;
        Self::decode(Self::send(request).await?).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let request = self.authed(Method::DELETE, self.endpoint(segments)?)?;
        Self::send(request).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let request = self
            .public(Method::POST, self.endpoint(&["api", "auth", "login"])?)
            .json(&user::Login {
                email: email.to_string(),
                password: password.to_string(),
            });
        let res: user::LoginResponse = Self::decode(Self::send(request).await?).await?;
        if res.token.trim().is_empty() {
            return Err(ClientError::MalformedResponse("empty token".to_string()));
        }
        Ok(res.token)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let request = self
            .public(Method::POST, self.endpoint(&["api", "auth", "register"])?)
            .json(&user::Register {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });
        Self::send(request).await?;
        Ok(())
    }

    pub async fn expenses(&self) -> Result<Vec<Transaction>> {
        let views: Vec<expense::TransactionView> = self.get(&["api", "expenses"]).await?;
        convert::transactions(views, self.timezone)
    }

    pub async fn add_expense(
        &self,
        amount: Amount,
        category: &str,
        description: &str,
        kind: TransactionKind,
    ) -> Result<Transaction> {
        let request = self
            .authed(Method::POST, self.endpoint(&["api", "expenses"])?)?
            .json(&expense::ExpenseNew {
                amount: amount.value(),
                category: category.to_string(),
                description: description.to_string(),
                kind: convert::kind_to_wire(kind),
            });
        let view: expense::TransactionView = Self::decode(Self::send(request).await?).await?;
        convert::transaction(view, self.timezone)
    }

    pub async fn delete_expense(&self, id: &str) -> Result<()> {
        self.delete(&["api", "expenses", id]).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let view: expense::Dashboard = self.get(&["api", "expenses", "dashboard"]).await?;
        convert::dashboard(view)
    }

    pub async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport> {
        let query = report::MonthlyReportQuery { month, year };
        let mut url = self.endpoint(&["api", "users", "monthly-report"])?;
        url.query_pairs_mut()
            .append_pair("month", &query.month.to_string())
            .append_pair("year", &query.year.to_string());

        let request = self.authed(Method::GET, url)?;
        let view: report::MonthlyReport = Self::decode(Self::send(request).await?).await?;
        convert::monthly_report(view, query)
    }

    pub async fn goals(&self) -> Result<Vec<Goal>> {
        let views: Vec<goal::GoalView> = self.get(&["api", "goals"]).await?;
        views.into_iter().map(convert::goal).collect()
    }

    pub async fn add_goal(&self, name: &str, target: Amount) -> Result<()> {
        let request = self
            .authed(Method::POST, self.endpoint(&["api", "goals"])?)?
            .json(&goal::GoalNew {
                name: name.to_string(),
                target_amount: target.value(),
            });
        Self::send(request).await?;
        Ok(())
    }

    /// Deleting a goal is how it is marked as achieved.
    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        self.delete(&["api", "goals", id]).await
    }

    pub async fn trackers(&self) -> Result<Vec<Tracker>> {
        let views: Vec<tracker::TrackerView> = self.get(&["api", "trackers"]).await?;
        views
            .into_iter()
            .map(|view| convert::tracker(view, self.timezone))
            .collect()
    }

    /// Trackers are named after their type.
    pub async fn add_tracker(&self, kind: TrackerKind) -> Result<()> {
        let request = self
            .authed(Method::POST, self.endpoint(&["api", "trackers"])?)?
            .json(&tracker::TrackerNew {
                name: kind.label().to_string(),
                kind: kind.label().to_string(),
            });
        Self::send(request).await?;
        Ok(())
    }

    pub async fn delete_tracker(&self, id: &str) -> Result<()> {
        self.delete(&["api", "trackers", id]).await
    }

    pub async fn add_tracker_item(&self, tracker_id: &str, name: &str, amount: Amount) -> Result<()> {
        let request = self
            .authed(Method::POST, self.endpoint(&["api", "trackers", tracker_id, "items"])?)?
            .json(&tracker::TrackerItemNew {
                name: name.to_string(),
                amount: amount.value(),
            });
        Self::send(request).await?;
        Ok(())
    }

    pub async fn delete_tracker_item(&self, tracker_id: &str, item_id: &str) -> Result<()> {
        self.delete(&["api", "trackers", tracker_id, "items", item_id]).await
    }

    pub async fn profile(&self) -> Result<Profile> {
        let view: user::Profile = self.get(&["api", "users", "profile"]).await?;
        convert::profile(view, self.timezone)
    }

    pub async fn update_budget(&self, budget: Amount) -> Result<()> {
        let request = self
            .authed(Method::PUT, self.endpoint(&["api", "users", "budget"])?)?
            .json(&user::BudgetUpdate {
                budget: budget.value(),
            });
        Self::send(request).await?;
        Ok(())
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        let views: Vec<user::Notification> = self.get(&["api", "users", "notifications"]).await?;
        Ok(views
            .into_iter()
            .map(|view| convert::notification(view, self.timezone))
            .collect())
    }

    pub async fn clear_notifications(&self) -> Result<()> {
        let request = self
            .authed(Method::POST, self.endpoint(&["api", "users", "clear-notifications"])?)?
            .json(&serde_json::json!({}));
        Self::send(request).await?;
        Ok(())
    }
}
