use super::{
    events::{EventFilter, EventView},
    like_pattern,
    media::MediaView,
    memberships::MembershipView,
};
use crate::{
    error::{AppError, AppResult},
    models::{Club, ClubPatch},
    schema::*,
};
use chrono::NaiveDate;
use diesel::{dsl::count_star, prelude::*};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use std::collections::HashMap;

/// Category value the frontend sends to mean "no category filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct ClubFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSummary {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: i64,
    pub upcoming_event_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDetail {
    #[serde(flatten)]
    pub summary: ClubSummary,
    pub members: Vec<MembershipView>,
    pub upcoming_events: Vec<EventView>,
    pub media: Vec<MediaView>,
}

pub async fn find_club(conn: &mut AsyncPgConnection, club_id: i32) -> AppResult<Club> {
    clubs::table
        .find(club_id)
        .select(Club::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::not_found("Club not found"))
}

pub async fn list_clubs(
    conn: &mut AsyncPgConnection,
    filter: &ClubFilter,
    today: NaiveDate,
) -> AppResult<Vec<ClubSummary>> {
    let mut query = clubs::table
        .select(Club::as_select())
        .order(clubs::club_id.asc())
        .into_boxed();

    if let Some(category) = filter
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    {
        query = query.filter(clubs::category.eq(category));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(clubs::club_name.ilike(like_pattern(search)));
    }

    let clubs = query.load::<Club>(conn).await?;
    summarize(conn, clubs, today).await
}

/// Attaches member and upcoming-event counts to each club. Counts are computed
/// per call with one grouped query each.
pub(crate) async fn summarize(
    conn: &mut AsyncPgConnection,
    clubs: Vec<Club>,
    today: NaiveDate,
) -> AppResult<Vec<ClubSummary>> {
    if clubs.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = clubs.iter().map(|c| c.club_id).collect();

    let members: HashMap<i32, i64> = club_members::table
        .filter(club_members::club_id.eq_any(&ids))
        .group_by(club_members::club_id)
        .select((club_members::club_id, count_star()))
        .load::<(i32, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    let upcoming: HashMap<i32, i64> = events::table
        .filter(events::club_id.eq_any(&ids))
        .filter(events::event_date.ge(today))
        .group_by(events::club_id)
        .select((events::club_id, count_star()))
        .load::<(i32, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(clubs
        .into_iter()
        .map(|club| {
            let id = club.club_id;
            ClubSummary {
                club,
                member_count: members.get(&id).copied().unwrap_or(0),
                upcoming_event_count: upcoming.get(&id).copied().unwrap_or(0),
            }
        })
        .collect())
}

pub async fn get_club(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    today: NaiveDate,
) -> AppResult<ClubDetail> {
    let club = find_club(conn, club_id).await?;
    let summary = summarize(conn, vec![club], today)
        .await?
        .pop()
        .ok_or_else(|| anyhow::anyhow!("`summarize` should return one club"))?;

    let members = super::memberships::list_club_members(conn, club_id).await?;
    let upcoming_events = super::events::list_events(
        conn,
        &EventFilter {
            club_id: Some(club_id),
            ..Default::default()
        },
        today,
    )
    .await?;
    let media = super::media::list_club_media(conn, club_id).await?;

    Ok(ClubDetail {
        summary,
        members,
        upcoming_events,
        media,
    })
}

pub async fn update_club(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    patch: &ClubPatch,
) -> AppResult<Club> {
    patch.validate()?;

    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let club = find_club(conn, club_id).await?;
            if patch.is_empty() {
                return Ok(club);
            }
            Ok(diesel::update(clubs::table.find(club_id))
                .set(patch)
                .returning(Club::as_returning())
                .get_result(conn)
                .await?)
        }
        .scope_boxed()
    })
    .await
}

/// Deletes a club together with everything that references it, children
/// first, in one transaction.
pub async fn delete_club(conn: &mut AsyncPgConnection, club_id: i32) -> AppResult<()> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            find_club(conn, club_id).await?;

            diesel::delete(bookmarks::table.filter(bookmarks::club_id.eq(club_id)))
                .execute(conn)
                .await?;
            diesel::delete(club_members::table.filter(club_members::club_id.eq(club_id)))
                .execute(conn)
                .await?;
            diesel::delete(messages::table.filter(messages::club_id.eq(club_id)))
                .execute(conn)
                .await?;
            diesel::delete(media::table.filter(media::club_id.eq(club_id)))
                .execute(conn)
                .await?;
            diesel::delete(events::table.filter(events::club_id.eq(club_id)))
                .execute(conn)
                .await?;
            diesel::delete(
                club_administrators::table.filter(club_administrators::club_id.eq(club_id)),
            )
            .execute(conn)
            .await?;
            diesel::delete(clubs::table.find(club_id))
                .execute(conn)
                .await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!(club_id, "deleted club");
    Ok(())
}

pub async fn list_categories(conn: &mut AsyncPgConnection) -> AppResult<Vec<String>> {
    Ok(clubs::table
        .select(clubs::category)
        .distinct()
        .order(clubs::category.asc())
        .load::<String>(conn)
        .await?)
}
