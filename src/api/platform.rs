use super::today;
use crate::{
    error::AppResult,
    store::stats::{self, PlatformStats},
    AppState, DbPool,
};
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Local::now().naive_local(),
    }))
}

async fn platform_stats(State(pool): State<DbPool>) -> AppResult<Json<PlatformStats>> {
    let conn = &mut pool.get().await?;
    Ok(Json(stats::platform_stats(conn, today()).await?))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(platform_stats))
}
