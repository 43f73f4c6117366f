use crate::{error::AppResult, schema::*};
use chrono::NaiveDate;
use diesel::{dsl::count_star, prelude::*};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_clubs: i64,
    pub total_students: i64,
    /// Upcoming events only.
    pub total_events: i64,
    pub total_messages: i64,
    pub clubs_by_category: BTreeMap<String, i64>,
}

pub async fn platform_stats(
    conn: &mut AsyncPgConnection,
    today: NaiveDate,
) -> AppResult<PlatformStats> {
    let total_clubs = clubs::table.count().get_result::<i64>(conn).await?;
    let total_students = students::table.count().get_result::<i64>(conn).await?;
    let total_events = events::table
        .filter(events::event_date.ge(today))
        .count()
        .get_result::<i64>(conn)
        .await?;
    let total_messages = messages::table.count().get_result::<i64>(conn).await?;

    let clubs_by_category = clubs::table
        .group_by(clubs::category)
        .select((clubs::category, count_star()))
        .load::<(String, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(PlatformStats {
        total_clubs,
        total_students,
        total_events,
        total_messages,
        clubs_by_category,
    })
}
