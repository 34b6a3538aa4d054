//! Turns axum extractor rejections into the application's error type so that
//! every bad request gets the same JSON error body.

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::Error;

/// Read the integer ID from a path like `/transactions/{transaction_id}`.
///
/// # Errors
///
/// Returns [Error::InvalidInput] if the path segment is not an integer.
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, Error> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Rejected path ID: {}", rejection.body_text());
            Err(Error::InvalidInput("Invalid ID".to_owned()))
        }
    }
}

/// Unwrap a JSON request body.
///
/// # Errors
///
/// Returns [Error::InvalidInput] with the decoder's message if the body is
/// missing, is not JSON, or does not have the expected shape.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    body.map(|Json(body)| body)
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}
