use super::{
    extract::{JsonBody, PathParam, QueryParams},
    required, today,
};
use crate::{
    error::{AppError, AppResult},
    models::{parse_date, EventPatch},
    store::events::{self, EventFilter, EventInput, EventView},
    AppState, DbPool,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

/// Blank values are treated as absent.
#[derive(Deserialize)]
struct EventQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    club_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl EventQuery {
    fn into_filter(self) -> AppResult<EventFilter> {
        let club_id = present(self.club_id)
            .map(|id| {
                id.trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::validation(format!("invalid club_id `{id}`")))
            })
            .transpose()?;
        Ok(EventFilter {
            start_date: present(self.start_date).as_deref().map(parse_date).transpose()?,
            end_date: present(self.end_date).as_deref().map(parse_date).transpose()?,
            club_id,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventRequest {
    description: Option<String>,
    event_date: Option<String>,
    event_time: Option<String>,
    event_location: Option<String>,
}

impl CreateEventRequest {
    fn into_input(self) -> AppResult<EventInput> {
        let description = required(self.description)?;
        let event_date = required(self.event_date)?;
        let event_time = required(self.event_time)?;
        let event_location = required(self.event_location)?;
        Ok(EventInput {
            description,
            event_date: parse_date(&event_date)?,
            event_time,
            event_location,
        })
    }
}

/// Fields absent from the body are left untouched; unknown fields are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEventRequest {
    description: Option<String>,
    event_date: Option<String>,
    event_time: Option<String>,
    event_location: Option<String>,
}

impl UpdateEventRequest {
    fn into_patch(self) -> AppResult<EventPatch> {
        let patch = EventPatch {
            description: self.description,
            event_date: self.event_date.as_deref().map(parse_date).transpose()?,
            event_time: self.event_time,
            event_location: self.event_location,
        };
        patch.validate()?;
        Ok(patch)
    }
}

async fn list_events(
    State(pool): State<DbPool>,
    QueryParams(query): QueryParams<EventQuery>,
) -> AppResult<Json<Vec<EventView>>> {
    let filter = query.into_filter()?;
    let conn = &mut pool.get().await?;
    Ok(Json(events::list_events(conn, &filter, today()).await?))
}

async fn get_event(
    State(pool): State<DbPool>,
    PathParam(event_id): PathParam<i32>,
) -> AppResult<Json<EventView>> {
    let conn = &mut pool.get().await?;
    Ok(Json(events::get_event(conn, event_id).await?))
}

async fn update_event(
    State(pool): State<DbPool>,
    PathParam(event_id): PathParam<i32>,
    JsonBody(req): JsonBody<UpdateEventRequest>,
) -> AppResult<Json<Value>> {
    let patch = req.into_patch()?;
    let conn = &mut pool.get().await?;

    let event = events::update_event(conn, event_id, &patch).await?;

    Ok(Json(json!({
        "message": "Event updated successfully!",
        "event": event,
    })))
}

async fn delete_event(
    State(pool): State<DbPool>,
    PathParam(event_id): PathParam<i32>,
) -> AppResult<Json<Value>> {
    let conn = &mut pool.get().await?;
    events::delete_event(conn, event_id).await?;
    Ok(Json(json!({ "message": "Event deleted successfully!" })))
}

async fn list_club_events(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
) -> AppResult<Json<Vec<EventView>>> {
    let conn = &mut pool.get().await?;
    Ok(Json(events::list_club_events(conn, club_id).await?))
}

async fn create_event(
    State(pool): State<DbPool>,
    PathParam(club_id): PathParam<i32>,
    JsonBody(req): JsonBody<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let input = req.into_input()?;
    let conn = &mut pool.get().await?;

    let event = events::create_event(conn, club_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully!",
            "event": event,
        })),
    ))
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route(
            "/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/clubs/:club_id/events",
            get(list_club_events).post(create_event),
        )
}
