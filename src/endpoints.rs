//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/{user_id}', use [format_endpoint].

/// The route for logging in a user.
pub const LOG_IN: &str = "/log_in";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/log_out";
/// The route for the OpenAPI document.
pub const DOCS: &str = "/docs";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to edit or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route to list users.
pub const USERS: &str = "/users";
/// The route to edit a single user.
pub const USER: &str = "/users/{user_id}";
/// The route for the aggregate report.
pub const REPORTS: &str = "/reports";
/// The route for downloading the report as CSV.
pub const REPORT_EXPORT: &str = "/reports/export";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace,
/// e.g. '{user_id}' in '/users/{user_id}'. If there is no parameter, the
/// original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
