//! Route handlers for listing, recording, editing and deleting transactions.
//!
//! Access is checked by the router before these run: anyone signed in may
//! list, only admins reach the rest.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    AppState, Error,
    auth::{MessageResponse, Session},
    request::{json_body, path_id},
    stores::TransactionStore,
    transaction::{
        Transaction, TransactionId,
        validation::{CreateTransactionRequest, UpdateTransactionRequest},
    },
};

/// The state needed to manage transactions.
#[derive(Clone)]
pub struct TransactionState {
    /// The store for the shared ledger.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// List every transaction, newest first.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "All transactions with their owners", body = [Transaction]),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
    )
)]
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    state.transaction_store.get_all().map(Json)
}

/// Record a transaction owned by the caller.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "The recorded transaction", body = Transaction),
        (status = 400, description = "A field is missing or invalid", body = crate::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
    )
)]
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let new_transaction = json_body(body)?.validate(session.id)?;
    let transaction = state.transaction_store.create(new_transaction)?;

    tracing::info!(
        "User {} recorded transaction {}",
        session.id,
        transaction.id
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Change some fields of a transaction.
#[utoipa::path(
    put,
    path = "/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = i64, Path, description = "The transaction to edit")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "The updated transaction", body = Transaction),
        (status = 400, description = "A field is invalid", body = crate::ErrorResponse),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
        (status = 404, description = "No such transaction", body = crate::ErrorResponse),
    )
)]
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let id = TransactionId::new(path_id(path)?);
    let changes = json_body(body)?.validate()?;

    state.transaction_store.update(id, changes).map(Json)
}

/// Remove a transaction.
#[utoipa::path(
    delete,
    path = "/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = i64, Path, description = "The transaction to delete")),
    responses(
        (status = 200, description = "The transaction was deleted", body = MessageResponse),
        (status = 401, description = "Not signed in", body = crate::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::ErrorResponse),
        (status = 404, description = "No such transaction", body = crate::ErrorResponse),
    )
)]
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, Error> {
    let id = TransactionId::new(path_id(path)?);

    state.transaction_store.delete(id)?;
    tracing::info!("User {} deleted transaction {id}", session.id);

    Ok(Json(MessageResponse::new("Transaction deleted")))
}



#[cfg(test)]
mod update_transaction_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server_with_users, log_in_admin, seed_transaction},
    };

    #[tokio::test]
    async fn updates_only_supplied_fields() {
        let (server, users) = get_test_server_with_users();
        let id = seed_transaction(&server, &users, "Venta", 150.0, "2025-01-10", "INCOME").await;
        let cookie = log_in_admin(&server, &users).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(cookie)
            .json(&json!({ "amount": "200.5" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<serde_json::Value>();
        assert_eq!(updated["amount"], json!(200.5));
        assert_eq!(updated["concept"], json!("Venta"));
        assert_eq!(updated["type"], json!("INCOME"));
        assert_eq!(updated["date"], json!("2025-01-10T00:00:00Z"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_and_store_is_unchanged() {
        let (server, users) = get_test_server_with_users();
        let id = seed_transaction(&server, &users, "Venta", 150.0, "2025-01-10", "INCOME").await;
        let cookie = log_in_admin(&server, &users).await;
        let before = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .await
            .json::<serde_json::Value>();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id + 100))
            .add_cookie(cookie.clone())
            .json(&json!({ "concept": "Changed" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Transaction not found" }));
        server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await
            .assert_json(&before);
    }

    #[tokio::test]
    async fn invalid_type_is_rejected() {
        let (server, users) = get_test_server_with_users();
        let id = seed_transaction(&server, &users, "Venta", 150.0, "2025-01-10", "INCOME").await;
        let cookie = log_in_admin(&server, &users).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(cookie)
            .json(&json!({ "type": "TRANSFER" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Type must be INCOME or EXPENSE" }));
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let (server, users) = get_test_server_with_users();
        let cookie = log_in_admin(&server, &users).await;

        let response = server
            .put("/transactions/abc")
            .add_cookie(cookie)
            .json(&json!({ "concept": "Changed" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid ID" }));
    }
}
