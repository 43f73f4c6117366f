use super::{
    extract::{JsonBody, PathParam, QueryParams},
    today,
};
use crate::{
    error::AppResult,
    models::ClubPatch,
    store::clubs::{self, ClubDetail, ClubFilter, ClubSummary},
    AppState, DbPool,
};
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct ClubQuery {
    category: Option<String>,
    search: Option<String>,
}

async fn list_clubs(
    State(pool): State<DbPool>,
    QueryParams(query): QueryParams<ClubQuery>,
) -> AppResult<Json<Vec<ClubSummary>>> {
    let conn = &mut pool.get().await?;
    let filter = ClubFilter {
        category: query.category,
        search: query.search,
    };
    Ok(Json(clubs::list_clubs(conn, &filter, today()).await?))
}

async fn list_categories(State(pool): State<DbPool>) -> AppResult<Json<Vec<String>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(clubs::list_categories(conn).await?))
}

async fn get_club(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<ClubDetail>> {
    let conn = &mut pool.get().await?;
    Ok(Json(clubs::get_club(conn, club_id, today()).await?))
}

async fn update_club(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
    JsonBody(patch): JsonBody<ClubPatch>,
) -> AppResult<Json<Value>> {
    patch.validate()?;
    let conn = &mut pool.get().await?;

    let club = clubs::update_club(conn, club_id, &patch).await?;

    Ok(Json(json!({
        "message": "Club updated successfully!",
        "club": club,
    })))
}

async fn delete_club(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    clubs::delete_club(conn, club_id).await?;
    Ok(Json(json!({ "message": "Club deleted successfully!" })))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/clubs", get(list_clubs))
        .route("/clubs/categories", get(list_categories))
        .route(
            "/clubs/:club_id",
            get(get_club).put(update_club).delete(delete_club),
        )
}
