use super::{
    extract::{JsonBody, PathParam},
    required,
};
use crate::{
    error::{AppError, AppResult},
    models::MISSING_FIELDS,
    store::messages::{self, MessageInput, MessageView},
    AppState, DbPool,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest {
    #[serde(rename = "senderID")]
    sender_id: Option<String>,
    #[serde(rename = "clubID")]
    club_id: Option<i32>,
    subject: Option<String>,
    message_text: Option<String>,
}

impl SendMessageRequest {
    fn into_input(self) -> AppResult<MessageInput> {
        Ok(MessageInput {
            sender_id: required(self.sender_id)?,
            club_id: self
                .club_id
                .ok_or_else(|| AppError::validation(MISSING_FIELDS))?,
            subject: self.subject,
            message_text: required(self.message_text)?,
        })
    }
}

async fn send_message(
    State(pool): State<DbPool>,
    JsonBody(req): JsonBody<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let input = req.into_input()?;
    let conn = &mut pool.get().await?;

    let message = messages::send_message(conn, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Message sent successfully!",
            "data": message,
        })),
    ))
}

async fn list_club_inbox(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<Vec<MessageView>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(messages::list_club_inbox(conn, club_id).await?))
}

async fn list_student_sent(
    State(pool): State<DbPool>,
    PathParam(student_id): PathParam<String>,
) -> AppResult<Json<Vec<MessageView>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(messages::list_student_sent(conn, &student_id).await?))
}

async fn mark_read(
    State(pool): State<DbPool>,
    PathParam(message_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    messages::mark_read(conn, message_id).await?;
    Ok(Json(json!({ "message": "Message marked as read" })))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/messages", post(send_message))
        .route("/messages/:message_id/read", put(mark_read))
        .route("/clubs/:club_id/messages", get(list_club_inbox))
        .route("/students/:student_id/messages", get(list_student_sent))
}
