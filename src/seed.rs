//! Idempotent bootstrap of the default clubs, their administrator logins and a
//! few sample events. Safe to run on every start.

use crate::{
    auth,
    error::{AppError, AppResult},
    models::{NewClub, NewClubAdministrator, NewEvent},
    schema::*,
};
use chrono::{Days, NaiveDate};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};

pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// Sample events are only added while the events table holds fewer rows than this.
const EVENT_SEED_THRESHOLD: i64 = 3;

struct DefaultClub {
    club_name: &'static str,
    description: &'static str,
    category: &'static str,
    meeting_time: &'static str,
    meeting_location: &'static str,
    email: &'static str,
}

const DEFAULT_CLUBS: &[DefaultClub] = &[
    DefaultClub {
        club_name: "Basketball Club",
        description: "A fun and competitive basketball group for all skill levels.",
        category: "Sport",
        meeting_time: "Every Tue & Thu, 5 PM",
        meeting_location: "Gym A",
        email: "basketball@university.edu",
    },
    DefaultClub {
        club_name: "Tennis Club",
        description: "Weekly tennis practice and friendly matches.",
        category: "Sport",
        meeting_time: "Every Wed, 4 PM",
        meeting_location: "Tennis Courts",
        email: "tennis@university.edu",
    },
    DefaultClub {
        club_name: "Art Club",
        description: "Painting, drawing, and creative expression.",
        category: "Culture",
        meeting_time: "Every Fri, 3 PM",
        meeting_location: "Art Room 2",
        email: "art@university.edu",
    },
    DefaultClub {
        club_name: "Volunteer Society",
        description: "Make a difference in the community through volunteering.",
        category: "Volunteer",
        meeting_time: "Every Mon, 6 PM",
        meeting_location: "Student Center Room 201",
        email: "volunteer@university.edu",
    },
    DefaultClub {
        club_name: "Coding Club",
        description: "Learn programming and build amazing projects together.",
        category: "Technology",
        meeting_time: "Every Thu, 7 PM",
        meeting_location: "Computer Lab",
        email: "coding@university.edu",
    },
];

struct SampleEvent {
    club_name: &'static str,
    days_ahead: u64,
    event_time: &'static str,
    event_location: &'static str,
    description: &'static str,
}

const SAMPLE_EVENTS: &[SampleEvent] = &[
    SampleEvent {
        club_name: "Basketball Club",
        days_ahead: 3,
        event_time: "5:00 PM - 7:00 PM",
        event_location: "Gym A",
        description: "Practice game and team drills",
    },
    SampleEvent {
        club_name: "Basketball Club",
        days_ahead: 10,
        event_time: "6:00 PM - 8:00 PM",
        event_location: "Sports Complex",
        description: "Championship match against rival school",
    },
    SampleEvent {
        club_name: "Tennis Club",
        days_ahead: 5,
        event_time: "4:00 PM - 6:00 PM",
        event_location: "Tennis Courts",
        description: "Doubles tournament signup day",
    },
];

/// Rows inserted by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub clubs: usize,
    pub administrators: usize,
    pub events: usize,
}

pub async fn run(conn: &mut AsyncPgConnection, today: NaiveDate) -> AppResult<SeedReport> {
    let report = conn
        .transaction::<_, AppError, _>(|conn| {
            async move {
                let mut report = SeedReport::default();
                for club in DEFAULT_CLUBS {
                    seed_club(conn, club, &mut report).await?;
                }
                seed_events(conn, today, &mut report).await?;
                Ok(report)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        clubs = report.clubs,
        administrators = report.administrators,
        events = report.events,
        "seeding complete"
    );
    Ok(report)
}

async fn seed_club(
    conn: &mut AsyncPgConnection,
    default: &DefaultClub,
    report: &mut SeedReport,
) -> AppResult<()> {
    let inserted = diesel::insert_into(clubs::table)
        .values(NewClub {
            club_name: default.club_name,
            description: default.description,
            category: default.category,
            meeting_time: default.meeting_time,
            meeting_location: default.meeting_location,
        })
        .on_conflict(clubs::club_name)
        .do_nothing()
        .execute(conn)
        .await?;
    if inserted > 0 {
        tracing::info!("inserted club: {}", default.club_name);
        report.clubs += inserted;
    } else {
        tracing::debug!("skipped club (already exists): {}", default.club_name);
    }

    let club_id = clubs::table
        .filter(clubs::club_name.eq(default.club_name))
        .select(clubs::club_id)
        .first::<i32>(conn)
        .await?;

    let has_admin = club_administrators::table
        .filter(club_administrators::club_id.eq(club_id))
        .count()
        .get_result::<i64>(conn)
        .await?
        > 0;
    if has_admin {
        return Ok(());
    }

    let password_hash = auth::hash_password(DEFAULT_ADMIN_PASSWORD)?;
    let inserted = diesel::insert_into(club_administrators::table)
        .values(NewClubAdministrator {
            club_id,
            email: default.email,
            password_hash: &password_hash,
        })
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    if inserted > 0 {
        tracing::info!("created club administrator for: {}", default.club_name);
    } else {
        tracing::warn!(
            "could not create administrator for {}: {} is already in use",
            default.club_name,
            default.email
        );
    }
    report.administrators += inserted;
    Ok(())
}

async fn seed_events(
    conn: &mut AsyncPgConnection,
    today: NaiveDate,
    report: &mut SeedReport,
) -> AppResult<()> {
    let existing = events::table.count().get_result::<i64>(conn).await?;
    if existing >= EVENT_SEED_THRESHOLD {
        tracing::debug!("skipped event seeding ({existing} events already exist)");
        return Ok(());
    }

    for sample in SAMPLE_EVENTS {
        let Some(club_id) = clubs::table
            .filter(clubs::club_name.eq(sample.club_name))
            .select(clubs::club_id)
            .first::<i32>(conn)
            .await
            .optional()?
        else {
            continue;
        };
        let event_date = today
            .checked_add_days(Days::new(sample.days_ahead))
            .ok_or_else(|| anyhow::anyhow!("sample event date out of range"))?;

        diesel::insert_into(events::table)
            .values(NewEvent {
                club_id,
                event_date,
                event_time: sample.event_time,
                event_location: sample.event_location,
                description: sample.description,
            })
            .execute(conn)
            .await?;
        tracing::info!("inserted event: {} - {}", sample.club_name, sample.description);
        report.events += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_clubs_are_unique() {
        let names: HashSet<_> = DEFAULT_CLUBS.iter().map(|c| c.club_name).collect();
        let emails: HashSet<_> = DEFAULT_CLUBS.iter().map(|c| c.email).collect();
        assert_eq!(names.len(), DEFAULT_CLUBS.len());
        assert_eq!(emails.len(), DEFAULT_CLUBS.len());
    }

    #[test]
    fn sample_events_belong_to_default_clubs() {
        for sample in SAMPLE_EVENTS {
            assert!(DEFAULT_CLUBS.iter().any(|c| c.club_name == sample.club_name));
        }
        assert_eq!(SAMPLE_EVENTS.len() as i64, EVENT_SEED_THRESHOLD);
    }
}
