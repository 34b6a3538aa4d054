//! Route handlers for the aggregate report and its CSV export.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::header,
    response::IntoResponse,
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    report::{
        aggregation::{Report, build_report, summarize},
        export::render_csv,
    },
    stores::TransactionStore,
};

/// The state needed to build reports.
#[derive(Clone)]
pub struct ReportState {
    /// The store for the shared ledger.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Totals, monthly figures and every transaction in one response.
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    responses(
        (status = 200, description = "The aggregate report", body = Report),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
    )
)]
pub async fn get_report_endpoint(State(state): State<ReportState>) -> Result<Json<Report>, Error> {
    let transactions = state.transaction_store.get_all()?;

    Ok(Json(build_report(transactions)))
}

/// Download every transaction and the totals as a CSV file.
#[utoipa::path(
    get,
    path = "/reports/export",
    tag = "reports",
    responses(
        (status = 200, description = "The report as a CSV attachment", content_type = "text/csv", body = String),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
    )
)]
pub async fn export_report_endpoint(
    State(state): State<ReportState>,
) -> Result<impl IntoResponse, Error> {
    let transactions = state.transaction_store.get_all()?;
    let csv = render_csv(&transactions, &summarize(&transactions))?;

    let unix_millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let disposition = format!("attachment; filename=reporte-{unix_millis}.csv");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        csv,
    ))
}

#[cfg(test)]
mod get_report_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server_with_users, log_in_admin, log_in_user, seed_transaction},
    };

    #[tokio::test]
    async fn report_has_totals_months_and_transactions() {
        let (server, users) = get_test_server_with_users();
        seed_transaction(&server, &users, "Venta", 1500.0, "2025-01-10", "INCOME").await;
        seed_transaction(&server, &users, "Alquiler", 600.0, "2025-01-15", "EXPENSE").await;
        seed_transaction(&server, &users, "Luz", 80.5, "2025-02-03", "EXPENSE").await;
        let cookie = log_in_admin(&server, &users).await;

        let response = server.get(endpoints::REPORTS).add_cookie(cookie).await;

        response.assert_status_ok();
        let report = response.json::<serde_json::Value>();
        assert_eq!(report["totalIncome"], json!(1500.0));
        assert_eq!(report["totalExpense"], json!(680.5));
        assert_eq!(report["balance"], json!(819.5));
        assert_eq!(report["transactions"].as_array().map(Vec::len), Some(3));
        assert_eq!(
            report["monthlyData"],
            json!([
                { "month": "ene 2025", "income": 1500.0, "expense": 600.0 },
                { "month": "feb 2025", "income": 0.0, "expense": 80.5 },
            ])
        );
    }

    #[tokio::test]
    async fn empty_ledger_reports_zero() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_admin(&server, &users).await;

        server
            .get(endpoints::REPORTS)
            .add_cookie(cookie)
            .await
            .assert_json(&json!({
                "totalIncome": 0.0,
                "totalExpense": 0.0,
                "balance": 0.0,
                "transactions": [],
                "monthlyData": [],
            }));
    }

    #[tokio::test]
    async fn user_cannot_get_report() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_user(&server, &users).await;

        server
            .get(endpoints::REPORTS)
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
