use super::clubs::{summarize, ClubSummary};
use crate::{
    error::{AppError, AppResult},
    models::{Club, Membership, NewMembership, DEFAULT_ROLE},
    schema::*,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

const MEMBERSHIP_CONFLICTS: &[(&str, &str)] = &[(
    "club_members_student_club_key",
    "Already a member of this club",
)];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    #[serde(flatten)]
    pub membership: Membership,
    pub student_name: String,
    pub club_name: String,
}

/// A club a student belongs to, with the membership's id, role and join time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedClub {
    #[serde(flatten)]
    pub summary: ClubSummary,
    #[serde(rename = "membershipID")]
    pub membership_id: i32,
    pub role: String,
    pub joined_at: NaiveDateTime,
}

type MembershipRow = (Membership, String, String, String);

fn into_view((membership, first_name, last_name, club_name): MembershipRow) -> MembershipView {
    MembershipView {
        membership,
        student_name: format!("{first_name} {last_name}"),
        club_name,
    }
}

pub async fn join_club(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    student_id: &str,
    role: Option<&str>,
) -> AppResult<MembershipView> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let membership_id = diesel::insert_into(club_members::table)
                .values(NewMembership {
                    student_id,
                    club_id,
                    role: role.unwrap_or(DEFAULT_ROLE),
                })
                .returning(club_members::membership_id)
                .get_result::<i32>(conn)
                .await
                .map_err(|e| AppError::on_unique(e, MEMBERSHIP_CONFLICTS))?;

            let row = club_members::table
                .inner_join(students::table)
                .inner_join(clubs::table)
                .filter(club_members::membership_id.eq(membership_id))
                .select((
                    Membership::as_select(),
                    students::first_name,
                    students::last_name,
                    clubs::club_name,
                ))
                .first::<MembershipRow>(conn)
                .await?;

            Ok(into_view(row))
        }
        .scope_boxed()
    })
    .await
}

pub async fn leave_club(conn: &mut AsyncPgConnection, membership_id: i32) -> AppResult<()> {
    let deleted = diesel::delete(club_members::table.find(membership_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::not_found("Membership not found"));
    }
    Ok(())
}

/// Members in the order they joined.
pub async fn list_club_members(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> AppResult<Vec<MembershipView>> {
    let rows = club_members::table
        .inner_join(students::table)
        .inner_join(clubs::table)
        .filter(club_members::club_id.eq(club_id))
        .order((club_members::joined_at.asc(), club_members::membership_id.asc()))
        .select((
            Membership::as_select(),
            students::first_name,
            students::last_name,
            clubs::club_name,
        ))
        .load::<MembershipRow>(conn)
        .await?;

    Ok(rows.into_iter().map(into_view).collect())
}

pub async fn list_for_student(
    conn: &mut AsyncPgConnection,
    student_id: &str,
    today: NaiveDate,
) -> AppResult<Vec<JoinedClub>> {
    let rows = club_members::table
        .inner_join(clubs::table)
        .filter(club_members::student_id.eq(student_id))
        .order((club_members::joined_at.asc(), club_members::membership_id.asc()))
        .select((Membership::as_select(), Club::as_select()))
        .load::<(Membership, Club)>(conn)
        .await?;

    let (memberships, clubs): (Vec<Membership>, Vec<Club>) = rows.into_iter().unzip();
    let summaries = summarize(conn, clubs, today).await?;

    Ok(memberships
        .into_iter()
        .zip(summaries)
        .map(|(membership, summary)| JoinedClub {
            summary,
            membership_id: membership.membership_id,
            role: membership.role,
            joined_at: membership.joined_at,
        })
        .collect())
}
