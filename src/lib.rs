use axum::{extract::FromRef, Router};

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod seed;
pub mod store;

pub use db::DbPool;

/// Everything a request handler needs, constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> DbPool {
        state.pool.clone()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new().nest("/api", api::app()).with_state(state)
}
