use super::{
    extract::{JsonBody, PathParam},
    required,
};
use crate::{
    error::{AppError, AppResult},
    models::{MediaType, MISSING_FIELDS},
    store::media::{self, MediaInput, MediaView},
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
#[serde(rename_all = "camelCase")]
struct UploadMediaRequest {
    media_type: Option<MediaType>,
    #[serde(rename = "mediaURL")]
    media_url: Option<String>,
    caption: Option<String>,
}

impl UploadMediaRequest {
    fn into_input(self) -> AppResult<MediaInput> {
        let media_type = self
            .media_type
            .ok_or_else(|| AppError::validation(MISSING_FIELDS))?;
        Ok(MediaInput {
            media_type,
            media_url: required(self.media_url)?,
            caption: self.caption,
        })
    }
}

async fn list_club_media(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<Vec<MediaView>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(media::list_club_media(conn, club_id).await?))
}

async fn upload_media(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
    JsonBody(req): JsonBody<UploadMediaRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let input = req.into_input()?;
    let conn = &mut pool.get().await?;

    let media = media::upload_media(conn, club_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Media uploaded successfully!",
            "media": media,
        })),
    ))
}

async fn delete_media(
    State(pool): State<DbPool>,
    PathParam(media_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    media::delete_media(conn, media_id).await?;
    Ok(Json(json!({ "message": "Media deleted successfully!" })))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route(
            "/clubs/:club_id/media",
            get(list_club_media).post(upload_media),
        )
        .route("/media/:media_id", delete(delete_media))
}
