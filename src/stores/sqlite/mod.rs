//! Implements the stores for a SQLite database.
//!
//! All stores created from the same [AppState](crate::AppState) share one
//! connection behind a mutex.

use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

mod transaction;
mod user;

pub use transaction::{SQLiteTransactionStore, create_transaction_table};
pub use user::{SQLiteUserStore, create_user_table};

/// How date times are written to the database.
///
/// Fixed width and always UTC so that ordering by the text column orders by
/// time.
const SQL_DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Format `date_time` for storage, converting it to UTC first.
pub(crate) fn to_sql_date_time(date_time: OffsetDateTime) -> Result<String, rusqlite::Error> {
    date_time
        .to_offset(UtcOffset::UTC)
        .format(SQL_DATE_TIME_FORMAT)
        .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
}

/// Read back a date time written by [to_sql_date_time].
pub(crate) fn from_sql_date_time(
    text: &str,
    column: usize,
) -> Result<OffsetDateTime, rusqlite::Error> {
    time::PrimitiveDateTime::parse(text, SQL_DATE_TIME_FORMAT)
        .map(|date_time| date_time.assume_utc())
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })
}

#[cfg(test)]
mod date_time_tests {
    use time::macros::datetime;

    use super::{from_sql_date_time, to_sql_date_time};

    #[test]
    fn stores_date_times_in_utc() {
        let date_time = datetime!(2025-01-10 01:30:00 +02:00);

        let text = to_sql_date_time(date_time).unwrap();

        assert_eq!(text, "2025-01-09T23:30:00.000000Z");
        assert_eq!(from_sql_date_time(&text, 0).unwrap(), date_time);
    }

    #[test]
    fn text_order_matches_time_order() {
        // 23:00 UTC, written with a later local date.
        let first = to_sql_date_time(datetime!(2025-01-10 00:00:00 +01:00)).unwrap();
        let second = to_sql_date_time(datetime!(2025-01-09 23:59:59.5 UTC)).unwrap();

        assert!(first < second, "{first} should sort before {second}");
    }
}
