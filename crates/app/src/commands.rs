use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use client::Gateway;
use engine::{
    Amount, EXPORT_FILE_NAME, Selection, SnapshotSlot, TrackerKind, Transaction, TransactionFilter,
    TransactionKind, aggregate, distinct_years, report,
};

use crate::{
    error::{AppError, Result},
    prompt, render,
    session::Session,
    settings::{Overrides, Settings},
};

#[derive(Parser, Debug)]
#[command(name = "dhanvikas")]
#[command(about = "Track income, expenses, goals and budgets from the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token (password is prompted for).
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account (password is prompted for twice).
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session token.
    Logout,
    Expenses(Expenses),
    /// Server-computed totals with budget figures.
    Dashboard {
        /// Budget to measure spending against; defaults to total income.
        #[arg(long)]
        budget: Option<Amount>,
    },
    /// Monthly expense report.
    Report(ReportArgs),
    Goals(Goals),
    Trackers(Trackers),
    Profile(Profile),
    Notifications(Notifications),
}

/// Search criteria shared by the commands that work on a filtered view.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Case-insensitive text matched against category, description and type.
    #[arg(long, default_value = "")]
    search: String,
    /// `all` or a year such as 2024.
    #[arg(long, default_value = "all")]
    year: Selection<i32>,
    /// `all` or a month number 1-12.
    #[arg(long, default_value = "all")]
    month: Selection<u32>,
}

impl FilterArgs {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter::new(&self.search, self.year, self.month)
    }
}

#[derive(Args, Debug)]
pub struct Expenses {
    #[command(subcommand)]
    command: ExpensesCommand,
}

#[derive(Subcommand, Debug)]
enum ExpensesCommand {
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    Add {
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `income` or `expense`.
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionKind,
    },
    /// Delete one or more transactions concurrently.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Write the filtered view as CSV.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file, `-` for stdout.
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: String,
    },
    /// Years present in the ledger, newest first.
    Years,
    /// Totals and budget figures over the filtered view.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// Budget to measure spending against; defaults to total income.
        #[arg(long)]
        budget: Option<Amount>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
    /// Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Compute the report from the fetched ledger instead of asking the server.
    #[arg(long)]
    local: bool,
}

#[derive(Args, Debug)]
pub struct Goals {
    #[command(subcommand)]
    command: GoalsCommand,
}

#[derive(Subcommand, Debug)]
enum GoalsCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        target: Amount,
    },
    /// Mark a goal as achieved, which removes it.
    Achieve { id: String },
}

#[derive(Args, Debug)]
pub struct Trackers {
    #[command(subcommand)]
    command: TrackersCommand,
}

#[derive(Subcommand, Debug)]
enum TrackersCommand {
    List,
    /// Create a tracker, e.g. `grocery` or `debt-repayment`.
    Create { kind: TrackerKind },
    Delete { id: String },
    AddItem {
        tracker: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: Amount,
    },
    DeleteItem { tracker: String, item: String },
}

#[derive(Args, Debug)]
pub struct Profile {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    /// Set the monthly budget.
    Budget { amount: Amount },
}

#[derive(Args, Debug)]
pub struct Notifications {
    #[command(subcommand)]
    command: NotificationsCommand,
}

#[derive(Subcommand, Debug)]
enum NotificationsCommand {
    List,
    Clear,
}

/// Ledger snapshot shared by concurrent refreshes.
type Ledger = Mutex<SnapshotSlot<Transaction>>;

/// Re-fetches the ledger after a mutation.
///
/// The ticket is taken before `fetch` is first polled, so when refreshes
/// overlap the snapshot keeps the one that started last. Returns `false`
/// when this response was discarded as stale.
async fn refresh_into(
    ledger: &Ledger,
    fetch: impl Future<Output = client::Result<Vec<Transaction>>>,
) -> Result<bool> {
    let ticket = ledger.lock().unwrap_or_else(PoisonError::into_inner).begin();
    let fresh = fetch.await?;
    let accepted = ledger
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .accept(ticket, fresh);
    if !accepted {
        tracing::warn!("discarding stale expense snapshot");
    }
    Ok(accepted)
}

fn ledger_totals(ledger: &Ledger) -> Option<String> {
    let slot = ledger.lock().unwrap_or_else(PoisonError::into_inner);
    slot.is_loaded().then(|| totals_line(slot.items()))
}

async fn delete_expenses(gateway: &Gateway, ids: Vec<String>) -> Result<()> {
    let ledger = Arc::new(Ledger::default());
    let mut tasks = tokio::task::JoinSet::new();
    for id in ids {
        let gateway = gateway.clone();
        let ledger = Arc::clone(&ledger);
        tasks.spawn(async move {
            gateway.delete_expense(&id).await?;
            refresh_into(&ledger, gateway.expenses()).await?;
            Ok::<_, AppError>(id)
        });
    }

    let mut failure = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(id)) => println!("Deleted {id}."),
            Ok(Err(err)) => {
                tracing::warn!("delete failed: {err}");
                failure.get_or_insert(err);
            }
            Err(err) => {
                failure.get_or_insert(AppError::Input(format!("delete task failed: {err}")));
            }
        }
    }

    if let Some(totals) = ledger_totals(&ledger) {
        println!("{totals}");
    }
    failure.map_or(Ok(()), Err)
}

fn totals_line(transactions: &[Transaction]) -> String {
    let agg = aggregate(transactions);
    format!(
        "{} transactions, income {}, expense {}",
        transactions.len(),
        agg.total_income,
        agg.total_expense
    )
}

pub async fn run(command: Command, settings: &Settings) -> Result<()> {
    let session = Session::load(&settings.session_path)?;
    let gateway = Gateway::new(&settings.base_url, session.token, settings.tz()?)?;

    match command {
        Command::Login { email } => {
            let password = prompt::password()?;
            let token = gateway.login(&email, &password).await?;
            Session { token: Some(token) }.save(&settings.session_path)?;
            tracing::info!("session stored in {}", settings.session_path);
            println!("Logged in as {email}.");
        }
        Command::Register { username, email } => {
            let password = prompt::new_password()?;
            gateway.register(&username, &email, &password).await?;
            println!("Account created. Run `dhanvikas login --email {email}` to sign in.");
        }
        Command::Logout => {
            Session::clear(&settings.session_path)?;
            println!("Logged out.");
        }
        Command::Expenses(expenses) => run_expenses(expenses.command, &gateway).await?,
        Command::Dashboard { budget } => {
            let dashboard = gateway.dashboard().await?;
            let budget = budget.unwrap_or(dashboard.totals.total_income);
            let figures = report::format(&dashboard.totals, budget);
            println!("Welcome, {}", dashboard.username);
            println!(
                "{}",
                render::summary(&dashboard.totals, budget, &figures, &report::breakdown(&dashboard.totals))
            );
        }
        Command::Report(args) => {
            let today = chrono::Utc::now().with_timezone(&gateway.timezone());
            let year = args.year.unwrap_or(today.year());
            let month = args.month.unwrap_or(today.month());
            let totals = if args.local {
                report::monthly(&gateway.expenses().await?, year, month)
            } else {
                gateway.monthly_report(year, month).await?.totals
            };
            println!("{}", render::monthly(year, month, &totals, &report::breakdown(&totals)));
        }
        Command::Goals(goals) => match goals.command {
            GoalsCommand::List => println!("{}", render::goals(&gateway.goals().await?)),
            GoalsCommand::Add { name, target } => {
                gateway.add_goal(&name, target).await?;
                println!("{}", render::goals(&gateway.goals().await?));
            }
            GoalsCommand::Achieve { id } => {
                gateway.delete_goal(&id).await?;
                println!("Goal achieved.");
            }
        },
        Command::Trackers(trackers) => {
            match trackers.command {
                TrackersCommand::List => {}
                TrackersCommand::Create { kind } => gateway.add_tracker(kind).await?,
                TrackersCommand::Delete { id } => gateway.delete_tracker(&id).await?,
                TrackersCommand::AddItem { tracker, name, amount } => {
                    gateway.add_tracker_item(&tracker, &name, amount).await?
                }
                TrackersCommand::DeleteItem { tracker, item } => {
                    gateway.delete_tracker_item(&tracker, &item).await?
                }
            }
            println!("{}", render::trackers(&gateway.trackers().await?));
        }
        Command::Profile(profile) => {
            if let ProfileCommand::Budget { amount } = profile.command {
                gateway.update_budget(amount).await?;
            }
            println!("{}", render::profile(&gateway.profile().await?));
        }
        Command::Notifications(notifications) => match notifications.command {
            NotificationsCommand::List => {
                println!("{}", render::notifications(&gateway.notifications().await?));
            }
            NotificationsCommand::Clear => {
                gateway.clear_notifications().await?;
                println!("Notifications cleared.");
            }
        },
    }

    Ok(())
}

async fn run_expenses(command: ExpensesCommand, gateway: &Gateway) -> Result<()> {
    match command {
        ExpensesCommand::List { filter, json } => {
            let view = filter.filter().apply(&gateway.expenses().await?);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", render::transactions(&view));
            }
        }
        ExpensesCommand::Add {
            amount,
            category,
            description,
            kind,
        } => {
            let ledger = Ledger::default();
            let created = gateway
                .add_expense(amount, category.trim(), description.trim(), kind)
                .await?;
            tracing::info!("created {kind} {}", created.id);
            refresh_into(&ledger, gateway.expenses()).await?;
            println!("Added {kind} of {} in {}.", created.amount, created.category);
            if let Some(totals) = ledger_totals(&ledger) {
                println!("{totals}");
            }
        }
        ExpensesCommand::Delete { ids } => delete_expenses(gateway, ids).await?,
        ExpensesCommand::Export { filter, output } => {
            let view = filter.filter().apply(&gateway.expenses().await?);
            if output == "-" {
                engine::write_csv(std::io::stdout().lock(), &view)?;
            } else {
                std::fs::write(&output, engine::to_csv(&view)?)?;
                println!("Exported {} transactions to {output}.", view.len());
            }
        }
        ExpensesCommand::Years => {
            println!("{}", render::years(&distinct_years(&gateway.expenses().await?)));
        }
        ExpensesCommand::Summary {
            filter,
            budget,
            json,
        } => {
            let view = filter.filter().apply(&gateway.expenses().await?);
            let totals = aggregate(&view);
            let budget = budget.unwrap_or(totals.total_income);
            let figures = report::format(&totals, budget);
            let shares = report::breakdown(&totals);
            if json {
                let payload = serde_json::json!({
                    "totals": totals,
                    "budget": budget,
                    "report": figures,
                    "breakdown": shares,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", render::summary(&totals, budget, &figures, &shares));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn ledger_of(id: &str) -> Vec<Transaction> {
        vec![Transaction::new(id, 10.0, "Food", "", TransactionKind::Expense, None).unwrap()]
    }

    #[tokio::test]
    async fn older_refresh_arriving_late_is_discarded() {
        let ledger = Ledger::default();
        let older = async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok::<_, client::ClientError>(ledger_of("before-second-delete"))
        };
        let newer = async { Ok::<_, client::ClientError>(ledger_of("after-second-delete")) };

        let (older, newer) = tokio::join!(refresh_into(&ledger, older), refresh_into(&ledger, newer));
        assert!(!older.unwrap());
        assert!(newer.unwrap());

        let slot = ledger.lock().unwrap();
        assert_eq!(slot.items()[0].id, "after-second-delete");
    }

    #[tokio::test]
    async fn failed_refresh_leaves_ledger_unloaded() {
        let ledger = Ledger::default();
        let failing = async { Err::<Vec<Transaction>, _>(client::ClientError::Unauthorized) };
        assert!(refresh_into(&ledger, failing).await.is_err());
        assert_eq!(ledger_totals(&ledger), None);

        refresh_into(&ledger, async { Ok::<_, client::ClientError>(ledger_of("x")) }).await.unwrap();
        assert_eq!(
            ledger_totals(&ledger).as_deref(),
            Some("1 transactions, income 0.00, expense 10.00")
        );
    }

    #[test]
    fn delete_takes_several_ids() {
        let cli = Cli::try_parse_from(["dhanvikas", "expenses", "delete", "a", "b"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Expenses(Expenses { command: ExpensesCommand::Delete { ids } }) if ids == ["a", "b"]
        ));
        assert!(Cli::try_parse_from(["dhanvikas", "expenses", "delete"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filters_and_amounts() {
        let cli = Cli::try_parse_from([
            "dhanvikas", "expenses", "summary", "--search", "food", "--year", "2024", "--month", "3",
            "--budget", "80",
        ])
        .unwrap();
        let Command::Expenses(Expenses {
            command: ExpensesCommand::Summary { filter, budget, json },
        }) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(filter.year, Selection::Only(2024));
        assert_eq!(filter.month, Selection::Only(3));
        assert_eq!(budget, Some(Amount::new(80.0)));
        assert!(!json);
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(Cli::try_parse_from(["dhanvikas", "expenses", "list", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["dhanvikas", "report", "--month", "0"]).is_err());
    }

    #[test]
    fn tracker_kind_and_global_overrides() {
        let cli = Cli::try_parse_from([
            "dhanvikas", "trackers", "create", "debt-repayment", "--base-url", "http://api.test",
        ])
        .unwrap();
        assert_eq!(cli.overrides.base_url.as_deref(), Some("http://api.test"));
        assert!(matches!(
            cli.command,
            Command::Trackers(Trackers {
                command: TrackersCommand::Create {
                    kind: TrackerKind::DebtRepayment
                }
            })
        ));
    }
}
