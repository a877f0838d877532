pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/users", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .route(
            "/users/me",
            get(handlers::users::me)
                .put(handlers::users::update_me)
                .delete(handlers::users::deactivate_me),
        )
        .route(
            "/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::open_account),
        )
        .route(
            "/accounts/:id",
            get(handlers::accounts::get_account).delete(handlers::accounts::close_account),
        )
        .route("/transactions/deposit", post(handlers::transactions::deposit))
        .route("/transactions/withdraw", post(handlers::transactions::withdraw))
        .route("/transactions/transfer", post(handlers::transactions::transfer))
        .route("/transactions/:id", get(handlers::transactions::get_transaction))
        .route(
            "/transactions/statement/:account_id",
            get(handlers::transactions::get_statement),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
