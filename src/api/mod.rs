use crate::{
    error::{AppError, AppResult},
    models::MISSING_FIELDS,
    AppState,
};
use axum::Router;
use chrono::NaiveDate;

pub mod auth;
pub mod bookmark;
pub mod club;
pub mod event;
pub mod extract;
pub mod media;
pub mod member;
pub mod message;
pub mod platform;
pub mod student;

pub fn app() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::app())
        .merge(club::app())
        .merge(event::app())
        .merge(media::app())
        .merge(message::app())
        .merge(bookmark::app())
        .merge(member::app())
        .merge(student::app())
        .merge(platform::app())
}

/// The calendar date "upcoming" is measured against.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Unwraps a required text field, rejecting absent and blank values.
pub(crate) fn required(value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::validation(MISSING_FIELDS)),
    }
}

#[cfg(test)]
mod tests {
    use crate::{db, AppState};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    // The pool connects lazily, so requests rejected before touching the
    // database can be exercised without a server.
    fn router() -> Router {
        let pool = db::connect_to_db("postgres://nobody@127.0.0.1:1/none", 1).unwrap();
        crate::app(AppState::new(pool))
    }

    async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn student_registration_requires_fields() {
        let (status, body) = send(
            Method::POST,
            "/api/auth/register/student",
            Some(json!({ "studentID": "S1", "email": "a@x.edu" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields" }));
    }

    #[tokio::test]
    async fn club_registration_rejects_blank_name() {
        let (status, body) = send(
            Method::POST,
            "/api/auth/register/club",
            Some(json!({
                "clubName": "  ",
                "description": "d",
                "category": "Academic",
                "email": "c@x.edu",
                "password": "pw"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn login_without_body_is_a_json_error() {
        let (status, body) = send(Method::POST, "/api/auth/login", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn event_creation_validates_date() {
        let (status, body) = send(
            Method::POST,
            "/api/clubs/1/events",
            Some(json!({
                "description": "Tourney",
                "eventDate": "01/01/2099",
                "eventTime": "5-7PM",
                "eventLocation": "Room 4"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn event_listing_validates_query_dates() {
        let (status, _) = send(Method::GET, "/api/events?start_date=tomorrow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(Method::GET, "/api/events?club_id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn media_upload_rejects_unknown_type() {
        let (status, body) = send(
            Method::POST,
            "/api/clubs/1/media",
            Some(json!({ "mediaType": "audio", "mediaURL": "https://x.edu/a.mp3" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn message_requires_text() {
        let (status, body) = send(
            Method::POST,
            "/api/messages",
            Some(json!({ "senderID": "S1", "clubID": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn non_numeric_ids_are_rejected() {
        let (status, body) = send(Method::DELETE, "/api/media/latest", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn club_update_rejects_blank_fields() {
        let (status, _) = send(
            Method::PUT,
            "/api/clubs/1",
            Some(json!({ "description": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
