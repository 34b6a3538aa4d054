//! Turns transaction request bodies into typed values.
//!
//! Validation runs before any store call, so a rejected request never writes
//! anything.

use serde::Deserialize;
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use utoipa::ToSchema;

use crate::{
    Error,
    transaction::{NewTransaction, TransactionChanges, TransactionType},
    user::UserID,
};

/// The JSON body for recording a transaction.
///
/// Fields are optional here so that every missing field can be reported in
/// one response.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// What the money was for.
    pub concept: Option<String>,
    /// A positive number, or a string holding one.
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
    /// An RFC 3339 date time, a date time without offset (UTC), or a plain date.
    pub date: Option<String>,
    /// Either `INCOME` or `EXPENSE`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl CreateTransactionRequest {
    /// Check the body and build the transaction to record for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidInput] naming the first rule that is broken:
    /// missing fields (all listed together), then the type, the amount and
    /// the date.
    pub fn validate(self, user_id: UserID) -> Result<NewTransaction, Error> {
        let missing: Vec<&str> = [
            ("concept", is_blank(self.concept.as_deref())),
            ("amount", is_missing_amount(self.amount.as_ref())),
            ("date", is_blank(self.date.as_deref())),
            ("type", is_blank(self.transaction_type.as_deref())),
        ]
        .into_iter()
        .filter_map(|(field, is_missing)| is_missing.then_some(field))
        .collect();

        let (Some(concept), Some(amount), Some(date), Some(transaction_type)) =
            (self.concept, self.amount, self.date, self.transaction_type)
        else {
            return Err(missing_fields(&missing));
        };

        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        let transaction_type = transaction_type.trim().parse::<TransactionType>()?;
        let amount = parse_amount(&amount)?;
        let date = parse_date(&date)?;

        Ok(NewTransaction {
            concept: concept.trim().to_owned(),
            amount,
            date,
            transaction_type,
            user_id,
        })
    }
}

/// The JSON body for editing a transaction.
///
/// Absent and `null` fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTransactionRequest {
    /// What the money was for.
    pub concept: Option<String>,
    /// A positive number, or a string holding one.
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
    /// An RFC 3339 date time, a date time without offset (UTC), or a plain date.
    pub date: Option<String>,
    /// Either `INCOME` or `EXPENSE`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl UpdateTransactionRequest {
    /// Check the supplied fields with the same rules as creation.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidInput] if a supplied field is not valid.
    pub fn validate(self) -> Result<TransactionChanges, Error> {
        let concept = match self.concept {
            Some(concept) if concept.trim().is_empty() => {
                return Err(Error::InvalidInput("Concept cannot be empty".to_owned()));
            }
            concept => concept.map(|concept| concept.trim().to_owned()),
        };
        let transaction_type = self
            .transaction_type
            .as_deref()
            .map(|transaction_type| transaction_type.trim().parse::<TransactionType>())
            .transpose()?;
        let amount = self.amount.as_ref().map(parse_amount).transpose()?;
        let date = self.date.as_deref().map(parse_date).transpose()?;

        Ok(TransactionChanges {
            concept,
            amount,
            date,
            transaction_type,
        })
    }
}

fn missing_fields(fields: &[&str]) -> Error {
    Error::InvalidInput(format!("Missing required fields: {}", fields.join(", ")))
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

fn is_missing_amount(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(amount)) => amount.trim().is_empty(),
        Some(_) => false,
    }
}

/// Read an amount from a JSON number or a numeric string.
///
/// # Errors
///
/// Returns [Error::InvalidInput] unless the value is a finite number greater
/// than zero.
pub fn parse_amount(value: &Value) -> Result<f64, Error> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::InvalidInput(
            "Amount must be a positive number".to_owned(),
        )),
    }
}

/// e.g. "2025-01-10T13:45:00" or "2025-01-10T13:45:00.250".
const LOCAL_DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Years that can be stored and written back out as RFC 3339.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Parse a transaction date and convert it to UTC.
///
/// Date times without an offset, and plain dates (taken as midnight), are
/// read as UTC.
///
/// # Errors
///
/// Returns [Error::InvalidInput] if `text` is not in one of the accepted
/// formats, or if its UTC year is outside 0 to 9999.
pub fn parse_date(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    OffsetDateTime::parse(text, &Rfc3339)
        .or_else(|_| {
            PrimitiveDateTime::parse(text, LOCAL_DATE_TIME_FORMAT).map(PrimitiveDateTime::assume_utc)
        })
        .or_else(|_| Date::parse(text, DATE_FORMAT).map(|date| date.midnight().assume_utc()))
        .ok()
        .and_then(|date_time| date_time.checked_to_offset(UtcOffset::UTC))
        .filter(|date_time| (MIN_YEAR..=MAX_YEAR).contains(&date_time.year()))
        .ok_or_else(|| Error::InvalidInput("Date must be a valid date".to_owned()))
}



#[cfg(test)]
mod parse_date_tests {
    use time::macros::datetime;

    use crate::{Error, transaction::validation::parse_date};

    #[test]
    fn parses_rfc3339_and_converts_to_utc() {
        assert_eq!(
            parse_date("2025-01-10T01:00:00+02:00"),
            Ok(datetime!(2025-01-09 23:00:00 UTC))
        );
        assert_eq!(
            parse_date("2025-01-10T00:00:00.000Z"),
            Ok(datetime!(2025-01-10 00:00:00 UTC))
        );
    }

    #[test]
    fn date_time_without_offset_is_utc() {
        assert_eq!(
            parse_date("2025-03-05T14:30:00"),
            Ok(datetime!(2025-03-05 14:30:00 UTC))
        );
    }

    #[test]
    fn plain_date_is_midnight_utc() {
        assert_eq!(parse_date("2025-03-05"), Ok(datetime!(2025-03-05 00:00:00 UTC)));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn rejects_dates_before_year_zero_in_utc() {
        assert_eq!(
            parse_date("0000-01-01T00:30:00+01:00"),
            Err(Error::InvalidInput("Date must be a valid date".to_owned()))
        );
    }

    #[test]
    fn rejects_dates_after_year_9999_in_utc() {
        assert_eq!(
            parse_date("9999-12-31T23:30:00-01:00"),
            Err(Error::InvalidInput("Date must be a valid date".to_owned()))
        );
    }

    #[test]
    fn accepts_the_edges_of_the_year_range() {
        assert_eq!(
            parse_date("0000-01-01T00:00:00Z"),
            Ok(datetime!(0000-01-01 00:00:00 UTC))
        );
        assert_eq!(
            parse_date("9999-12-31"),
            Ok(datetime!(9999-12-31 00:00:00 UTC))
        );
    }
}
