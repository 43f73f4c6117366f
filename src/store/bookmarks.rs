use super::clubs::{summarize, ClubSummary};
use crate::{
    error::{AppError, AppResult},
    models::{Bookmark, Club, NewBookmark},
    schema::*,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

const BOOKMARK_CONFLICTS: &[(&str, &str)] = &[("bookmarks_student_club_key", "Club already bookmarked")];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkView {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub club_name: String,
}

/// A bookmarked club with the bookmark's own id and timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedClub {
    #[serde(flatten)]
    pub summary: ClubSummary,
    #[serde(rename = "bookmarkID")]
    pub bookmark_id: i32,
    pub bookmarked_at: NaiveDateTime,
}

pub async fn add_bookmark(
    conn: &mut AsyncPgConnection,
    student_id: &str,
    club_id: i32,
) -> AppResult<BookmarkView> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let bookmark = diesel::insert_into(bookmarks::table)
                .values(NewBookmark {
                    student_id,
                    club_id,
                })
                .returning(Bookmark::as_returning())
                .get_result(conn)
                .await
                .map_err(|e| AppError::on_unique(e, BOOKMARK_CONFLICTS))?;

            let club_name = clubs::table
                .find(club_id)
                .select(clubs::club_name)
                .first::<String>(conn)
                .await?;

            Ok(BookmarkView {
                bookmark,
                club_name,
            })
        }
        .scope_boxed()
    })
    .await
}

pub async fn remove_bookmark(conn: &mut AsyncPgConnection, bookmark_id: i32) -> AppResult<()> {
    let deleted = diesel::delete(bookmarks::table.find(bookmark_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::not_found("Bookmark not found"));
    }
    Ok(())
}

/// The clubs a student has bookmarked, most recent first.
pub async fn list_for_student(
    conn: &mut AsyncPgConnection,
    student_id: &str,
    today: NaiveDate,
) -> AppResult<Vec<BookmarkedClub>> {
    let rows = bookmarks::table
        .inner_join(clubs::table)
        .filter(bookmarks::student_id.eq(student_id))
        .order((bookmarks::bookmarked_at.desc(), bookmarks::bookmark_id.desc()))
        .select((Bookmark::as_select(), Club::as_select()))
        .load::<(Bookmark, Club)>(conn)
        .await?;

    let (bookmarks, clubs): (Vec<Bookmark>, Vec<Club>) = rows.into_iter().unzip();
    let summaries = summarize(conn, clubs, today).await?;

    Ok(bookmarks
        .into_iter()
        .zip(summaries)
        .map(|(bookmark, summary)| BookmarkedClub {
            summary,
            bookmark_id: bookmark.bookmark_id,
            bookmarked_at: bookmark.bookmarked_at,
        })
        .collect())
}
