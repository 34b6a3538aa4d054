//! Application router configuration with public, signed-in and admin-only route definitions.

use axum::{
    Router,
    http::{StatusCode, header::ALLOW},
    middleware,
    response::Response,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{post_log_in, post_log_out, require_admin, require_auth},
    docs::get_api_docs,
    endpoints, error_response,
    report::{export_report_endpoint, get_report_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
    user::{list_users_endpoint, update_user_endpoint},
};

/// Return a router with all the app's routes.
///
/// Reading the ledger needs a signed-in user. Changing it, managing users and
/// reports need an admin. Every error, including unknown routes and wrong
/// methods, is answered with a JSON body.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::DOCS, get(get_api_docs));

    let signed_in_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::USERS, get(list_users_endpoint))
        .route(endpoints::USER, put(update_user_endpoint))
        .route(endpoints::REPORTS, get(get_report_endpoint))
        .route(endpoints::REPORT_EXPORT, get(export_report_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public_routes
        .merge(signed_in_routes)
        .merge(admin_routes)
        .fallback(get_404_not_found)
        .layer(middleware::map_response(json_method_not_allowed))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Give the empty 405 responses from the router a JSON body, keeping the `Allow` header.
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let mut json_response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    if let Some(allow) = response.headers().get(ALLOW) {
        json_response.headers_mut().insert(ALLOW, allow.clone());
    }

    json_response
}
