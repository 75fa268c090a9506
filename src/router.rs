//! HTTP routing.
//!
//! Builds the axum router that exposes the account service. The router is
//! a thin adapter: every route maps to exactly one service call.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, services::account_service::AccountService};

pub fn app(service: AccountService) -> Router {
    // Routes acting on an existing account need credential headers
    let account_routes = Router::new()
        .route(
            "/api/v1/account",
            get(handlers::accounts::get_account)
                .patch(handlers::accounts::update_account)
                .delete(handlers::accounts::delete_account),
        )
        .route(
            "/api/v1/account/deposit",
            post(handlers::accounts::deposit),
        )
        .route(
            "/api/v1/account/withdraw",
            post(handlers::accounts::withdraw),
        )
        .route_layer(axum_middleware::from_fn(
            middleware::credentials::credentials_middleware,
        ));

    Router::new()
        // Public routes (no credentials required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/accounts", post(handlers::accounts::create_account))
        .merge(account_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
