use super::extract::PathParam;
use crate::{
    error::{AppError, AppResult},
    store::identity::{self, StudentProfile},
    AppState, DbPool,
};
use axum::{extract::State, routing::get, Json, Router};

async fn get_student(
    State(pool): State<DbPool>,
    PathParam(student_id): PathParam<String>,
) -> AppResult<Json<StudentProfile>> {
    let conn = &mut pool.get().await?;
    let student = identity::find_student(conn, &student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))?;
    Ok(Json(student.into()))
}

pub fn app() -> Router<AppState> {
    Router::new().route("/students/:student_id", get(get_student))
}
