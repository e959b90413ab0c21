//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState, Error,
    auth::auth_guard,
    balances::get_balance,
    endpoints,
    logging::logging_middleware,
    session::{delete_session, get_session, post_session},
    transactions::{create_transaction, get_all_transactions, get_transactions},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(
            endpoints::SESSION,
            get(get_session).post(post_session).delete(delete_session),
        )
        .route(endpoints::LEGACY_TRANSACTIONS, get(get_all_transactions));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions).post(create_transaction),
        )
        .route(endpoints::BALANCE, get(get_balance))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requests for unknown paths get the JSON not-found body.
async fn get_not_found() -> Response {
    Error::NotFound.into_response()
}
