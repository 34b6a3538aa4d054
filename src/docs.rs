//! The OpenAPI document describing the REST API, served at [crate::endpoints::DOCS].

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{
    ErrorResponse,
    auth::{LogInData, MessageResponse, Session},
    report::{MonthlySummary, Report, Totals},
    transaction::{
        CreateTransactionRequest, Owner, Transaction, TransactionType, UpdateTransactionRequest,
    },
    user::{Role, UpdateUserRequest, User},
};

/// Adds the auth cookie security scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AuthCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Encrypted session cookie issued by POST /log_in.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cashbook API",
        description = "A shared ledger of income and expenses with role-based access."
    ),
    security(("AuthCookie" = [])),
    paths(
        crate::auth::log_in::post_log_in,
        crate::auth::log_out::post_log_out,
        crate::transaction::endpoints::list_transactions_endpoint,
        crate::transaction::endpoints::create_transaction_endpoint,
        crate::transaction::endpoints::update_transaction_endpoint,
        crate::transaction::endpoints::delete_transaction_endpoint,
        crate::user::endpoints::list_users_endpoint,
        crate::user::endpoints::update_user_endpoint,
        crate::report::endpoints::get_report_endpoint,
        crate::report::endpoints::export_report_endpoint,
    ),
    components(schemas(
        ErrorResponse,
        LogInData,
        MessageResponse,
        Session,
        Transaction,
        TransactionType,
        Owner,
        CreateTransactionRequest,
        UpdateTransactionRequest,
        User,
        Role,
        UpdateUserRequest,
        Report,
        Totals,
        MonthlySummary,
    )),
    tags(
        (name = "auth", description = "Signing in and out"),
        (name = "transactions", description = "The shared ledger"),
        (name = "users", description = "User administration"),
        (name = "reports", description = "Totals, monthly figures and CSV export")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn get_api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use crate::{docs::ApiDoc, endpoints};

    #[test]
    fn documents_every_endpoint() {
        let document = ApiDoc::openapi();

        for path in [
            endpoints::LOG_IN,
            endpoints::LOG_OUT,
            endpoints::TRANSACTIONS,
            endpoints::TRANSACTION,
            endpoints::USERS,
            endpoints::USER,
            endpoints::REPORTS,
            endpoints::REPORT_EXPORT,
        ] {
            assert!(
                document.paths.paths.contains_key(path),
                "{path} is missing from the API docs"
            );
        }
    }

    #[test]
    fn registers_cookie_security_scheme() {
        let document = ApiDoc::openapi();
        let components = document.components.expect("document has no components");

        assert!(components.security_schemes.contains_key("AuthCookie"));
        assert!(components.schemas.contains_key("Transaction"));
    }
}
