use super::{extract::JsonBody, required};
use crate::{
    error::AppResult,
    store::identity::{self, ClubRegistration, Principal, StudentRegistration},
    AppState, DbPool,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRegisterRequest {
    #[serde(rename = "studentID")]
    student_id: Option<String>,
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    major: Option<String>,
    year: Option<String>,
}

impl StudentRegisterRequest {
    fn into_registration(self) -> AppResult<StudentRegistration> {
        Ok(StudentRegistration {
            student_id: required(self.student_id)?,
            email: required(self.email)?,
            password: required(self.password)?,
            first_name: required(self.first_name)?,
            last_name: required(self.last_name)?,
            major: self.major,
            year: self.year,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClubRegisterRequest {
    club_name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    email: Option<String>,
    password: Option<String>,
    meeting_time: Option<String>,
    meeting_location: Option<String>,
}

impl ClubRegisterRequest {
    fn into_registration(self) -> AppResult<ClubRegistration> {
        Ok(ClubRegistration {
            club_name: required(self.club_name)?,
            description: required(self.description)?,
            category: required(self.category)?,
            email: required(self.email)?,
            password: required(self.password)?,
            meeting_time: self.meeting_time,
            meeting_location: self.meeting_location,
        })
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn register_student(
    State(pool): State<DbPool>,
    JsonBody(req): JsonBody<StudentRegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let registration = req.into_registration()?;
    let conn = &mut pool.get().await?;

    let profile = identity::register_student(conn, &registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Student registered successfully!",
            "user": Principal::Student(profile),
        })),
    ))
}

async fn register_club(
    State(pool): State<DbPool>,
    JsonBody(req): JsonBody<ClubRegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let registration = req.into_registration()?;
    let conn = &mut pool.get().await?;

    let (club, admin) = identity::register_club(conn, &registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Club registered successfully!",
            "club": club,
            "user": Principal::Club(admin),
        })),
    ))
}

async fn login(
    State(pool): State<DbPool>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<Value>> {
    let email = required(req.email)?;
    let password = required(req.password)?;
    let conn = &mut pool.get().await?;

    let user = identity::login(conn, &email, &password).await?;

    Ok(Json(json!({
        "message": "Login successful!",
        "user": user,
    })))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/register/student", post(register_student))
        .route("/register/club", post(register_club))
        .route("/login", post(login))
}
