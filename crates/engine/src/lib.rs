//! Pure transformation layer of the Dhanvikas expense tracker.
//!
//! Everything here works on an already-fetched snapshot: validated domain
//! values ([`Transaction`], [`Goal`], [`Tracker`]) and the functions that
//! derive what the user sees from them (search, year selector, totals,
//! budget figures, CSV export). Nothing in this crate performs I/O besides
//! writing CSV into a caller-provided writer, and nothing is cached between
//! calls.

pub use aggregation::{Aggregation, aggregate};
pub use error::EngineError;
pub use export::{EXPORT_FILE_NAME, to_csv, write_csv};
pub use filter::{Selection, TransactionFilter, filter};
pub use goals::Goal;
pub use money::{Accumulator, Amount};
pub use report::{BalanceLabel, BudgetReport, CategoryShare};
pub use snapshot::{SnapshotSlot, Ticket};
pub use trackers::{Tracker, TrackerItem, TrackerKind};
pub use transactions::{Timestamp, Transaction, TransactionKind, parse_timestamp};
pub use years::distinct_years;

mod aggregation;
mod error;
mod export;
pub mod filter;
mod goals;
mod money;
pub mod report;
mod snapshot;
mod trackers;
mod transactions;
mod years;

pub type ResultEngine<T> = Result<T, EngineError>;
