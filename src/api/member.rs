use super::{
    extract::{JsonBody, PathParam},
    required, today,
};
use crate::{
    error::AppResult,
    store::memberships::{self, JoinedClub, MembershipView},
    AppState, DbPool,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct JoinClubRequest {
    #[serde(rename = "studentID")]
    student_id: Option<String>,
    role: Option<String>,
}

async fn list_club_members(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<Vec<MembershipView>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(memberships::list_club_members(conn, club_id).await?))
}

async fn join_club(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
    JsonBody(req): JsonBody<JoinClubRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let student_id = required(req.student_id)?;
    // a blank role falls back to the default
    let role = req.role.filter(|role| !role.trim().is_empty());
    let conn = &mut pool.get().await?;

    let membership =
        memberships::join_club(conn, club_id, &student_id, role.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Joined club successfully!",
            "membership": membership,
        })),
    ))
}

async fn leave_club(
    State(pool): State<DbPool>,
    PathParam(membership_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    memberships::leave_club(conn, membership_id).await?;
    Ok(Json(json!({ "message": "Left club successfully!" })))
}

async fn list_student_memberships(
    State(pool): State<DbPool>,
    PathParam(student_id): PathParam<String>,
) -> AppResult<Json<Vec<JoinedClub>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(
        memberships::list_for_student(conn, &student_id, today()).await?,
    ))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route(
            "/clubs/:club_id/members",
            get(list_club_members).post(join_club),
        )
        .route("/members/:membership_id", delete(leave_club))
        .route(
            "/students/:student_id/memberships",
            get(list_student_memberships),
        )
}
