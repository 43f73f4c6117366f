use super::{
    extract::{JsonBody, PathParam},
    required, today,
};
use crate::{
    error::{AppError, AppResult},
    models::MISSING_FIELDS,
    store::bookmarks::{self, BookmarkedClub},
    AppState, DbPool,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct AddBookmarkRequest {
    #[serde(rename = "studentID")]
    student_id: Option<String>,
    #[serde(rename = "clubID")]
    club_id: Option<i32>,
}

async fn add_bookmark(
    State(pool): State<DbPool>,
    JsonBody(req): JsonBody<AddBookmarkRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let student_id = required(req.student_id)?;
    let club_id = req
        .club_id
        .ok_or_else(|| AppError::validation(MISSING_FIELDS))?;
    let conn = &mut pool.get().await?;

    let bookmark = bookmarks::add_bookmark(conn, &student_id, club_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Bookmark added!",
            "bookmark": bookmark,
        })),
    ))
}

async fn remove_bookmark(
    State(pool): State<DbPool>,
    PathParam(bookmark_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    bookmarks::remove_bookmark(conn, bookmark_id).await?;
    Ok(Json(json!({ "message": "Bookmark removed successfully!" })))
}

async fn list_student_bookmarks(
    State(pool): State<DbPool>,
    PathParam(student_id): PathParam<String>,
) -> AppResult<Json<Vec<BookmarkedClub>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(
        bookmarks::list_for_student(conn, &student_id, today()).await?,
    ))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", post(add_bookmark))
        .route("/bookmarks/:bookmark_id", delete(remove_bookmark))
        .route(
            "/students/:student_id/bookmarks",
            get(list_student_bookmarks),
        )
}
