//! CSV export of a transaction list.
//!
//! Columns are fixed: `Date,Type,Category,Description,Amount`. Dates are ISO
//! 8601 calendar dates (`YYYY-MM-DD`) in the user's timezone, empty when the
//! transaction has no usable date. Amounts always carry two decimals and no
//! thousands separator. Fields are quoted only when they contain a comma, a
//! quote or a newline.

use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{EngineError, ResultEngine, Transaction};

/// Name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "expenses.csv";

const HEADER: [&str; 5] = ["Date", "Type", "Category", "Description", "Amount"];

/// Streams the CSV to `writer`, each row (header included) terminated by `\n`.
pub fn write_csv<W: io::Write>(writer: W, transactions: &[Transaction]) -> ResultEngine<()> {
    let mut out = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    out.write_record(HEADER)?;
    for tx in transactions {
        let date = tx
            .day()
            .map(|day| day.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let amount = tx.amount.to_string();
        out.write_record([
            date.as_str(),
            tx.kind.as_str(),
            tx.category.as_str(),
            tx.description.as_str(),
            amount.as_str(),
        ])?;
    }
    out.flush()
        .map_err(|err| EngineError::Export(err.to_string()))
}

/// Returns the CSV as text, rows separated by `\n` with no trailing newline.
pub fn to_csv(transactions: &[Transaction]) -> ResultEngine<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, transactions)?;
    let mut text = String::from_utf8(buffer)
        .map_err(|err| EngineError::Export(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
