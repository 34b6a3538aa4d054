//! Renders the report as a CSV file for spreadsheets.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    report::aggregation::Totals,
    transaction::{Transaction, TransactionType},
};

/// Tells spreadsheet programs that the file is UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

const HEADER: &str = "Concepto,Monto,Fecha,Tipo,Usuario\n";

/// Day/month/year without padding, as written in Spain, e.g. "5/1/2025".
const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

fn type_label(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "Ingreso",
        TransactionType::Expense => "Egreso",
    }
}

/// Render `transactions` one per row, followed by a summary of `totals`.
///
/// Text fields are always quoted, even when they look like numbers, and
/// amounts are written as plain numbers.
///
/// # Errors
///
/// Returns [Error::CsvError] if a row could not be written.
pub fn render_csv(transactions: &[Transaction], totals: &Totals) -> Result<String, Error> {
    let mut rows = String::new();

    for transaction in transactions {
        let date = transaction
            .date
            .format(DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        rows.push_str(&format!(
            "{},{},{},{},{}\n",
            quote(&transaction.concept)?,
            transaction.amount,
            quote(&date)?,
            quote(type_label(transaction.transaction_type))?,
            quote(&transaction.user.name)?,
        ));
    }

    Ok(format!(
        "{BYTE_ORDER_MARK}{HEADER}{rows}\nResumen\nTotal Ingresos,{}\nTotal Egresos,{}\nSaldo,{}",
        totals.total_income, totals.total_expense, totals.balance
    ))
}

/// Write `field` as a single quoted CSV field, doubling any quotes inside it.
fn quote(field: &str) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record([field])
        .map_err(|error| Error::CsvError(error.to_string()))?;

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;
    let mut quoted = String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))?;
    quoted.pop();

    Ok(quoted)
}
