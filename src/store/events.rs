use crate::{
    error::{AppError, AppResult},
    models::{Event, EventPatch, NewEvent},
    schema::*,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

/// An event as shown on the calendar, with its club name and the day, month
/// and year split out for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub club_name: String,
    pub date: String,
    pub month: String,
    pub year: String,
}

impl EventView {
    fn new(event: Event, club_name: String) -> Self {
        Self {
            date: event.event_date.format("%d").to_string(),
            month: event.event_date.format("%b").to_string(),
            year: event.event_date.format("%Y").to_string(),
            event,
            club_name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Inclusive lower bound; today when absent.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end_date: Option<NaiveDate>,
    pub club_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct EventInput {
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
}

pub async fn list_events(
    conn: &mut AsyncPgConnection,
    filter: &EventFilter,
    today: NaiveDate,
) -> AppResult<Vec<EventView>> {
    let mut query = events::table
        .inner_join(clubs::table)
        .select((Event::as_select(), clubs::club_name))
        .filter(events::event_date.ge(filter.start_date.unwrap_or(today)))
        .into_boxed();

    if let Some(end_date) = filter.end_date {
        query = query.filter(events::event_date.le(end_date));
    }
    if let Some(club_id) = filter.club_id {
        query = query.filter(events::club_id.eq(club_id));
    }

    let rows = query
        .order((
            events::event_date.asc(),
            events::event_time.asc(),
            events::event_id.asc(),
        ))
        .load::<(Event, String)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(event, club_name)| EventView::new(event, club_name))
        .collect())
}

/// Every event of a club, past ones included.
pub async fn list_club_events(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> AppResult<Vec<EventView>> {
    let rows = events::table
        .inner_join(clubs::table)
        .filter(events::club_id.eq(club_id))
        .order((
            events::event_date.asc(),
            events::event_time.asc(),
            events::event_id.asc(),
        ))
        .select((Event::as_select(), clubs::club_name))
        .load::<(Event, String)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(event, club_name)| EventView::new(event, club_name))
        .collect())
}

pub async fn get_event(conn: &mut AsyncPgConnection, event_id: i32) -> AppResult<EventView> {
    let (event, club_name) = events::table
        .inner_join(clubs::table)
        .filter(events::event_id.eq(event_id))
        .select((Event::as_select(), clubs::club_name))
        .first::<(Event, String)>(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    Ok(EventView::new(event, club_name))
}

pub async fn create_event(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    input: &EventInput,
) -> AppResult<EventView> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let club_name = clubs::table
                .find(club_id)
                .select(clubs::club_name)
                .first::<String>(conn)
                .await
                .optional()?
                .ok_or_else(|| AppError::not_found("Club not found"))?;

            let event = diesel::insert_into(events::table)
                .values(NewEvent {
                    club_id,
                    event_date: input.event_date,
                    event_time: &input.event_time,
                    event_location: &input.event_location,
                    description: &input.description,
                })
                .returning(Event::as_returning())
                .get_result(conn)
                .await?;

            Ok(EventView::new(event, club_name))
        }
        .scope_boxed()
    })
    .await
}

pub async fn update_event(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    patch: &EventPatch,
) -> AppResult<EventView> {
    patch.validate()?;

    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let current = get_event(conn, event_id).await?;
            if patch.is_empty() {
                return Ok(current);
            }

            let event = diesel::update(events::table.find(event_id))
                .set(patch)
                .returning(Event::as_returning())
                .get_result(conn)
                .await?;

            Ok(EventView::new(event, current.club_name))
        }
        .scope_boxed()
    })
    .await
}

pub async fn delete_event(conn: &mut AsyncPgConnection, event_id: i32) -> AppResult<()> {
    let deleted = diesel::delete(events::table.find(event_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_fields_are_split_from_the_date() {
        let view = EventView::new(
            Event {
                event_id: 1,
                club_id: 2,
                event_date: NaiveDate::from_ymd_opt(2099, 1, 5).unwrap(),
                event_time: "5-7PM".into(),
                event_location: "Room 4".into(),
                description: "Tourney".into(),
            },
            "Chess Club".into(),
        );
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["eventID"], 1);
        assert_eq!(value["eventDate"], "2099-01-05");
        assert_eq!(value["clubName"], "Chess Club");
        assert_eq!(value["date"], "05");
        assert_eq!(value["month"], "Jan");
        assert_eq!(value["year"], "2099");
    }
}
