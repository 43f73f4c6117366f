use crate::{
    error::{AppError, AppResult},
    models::{Media, MediaType, NewMedia},
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    #[serde(flatten)]
    pub media: Media,
    pub club_name: String,
}

#[derive(Debug, Clone)]
pub struct MediaInput {
    pub media_type: MediaType,
    pub media_url: String,
    pub caption: Option<String>,
}

/// Newest uploads first.
pub async fn list_club_media(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> AppResult<Vec<MediaView>> {
    let rows = media::table
        .inner_join(clubs::table)
        .filter(media::club_id.eq(club_id))
        .order((media::uploaded_at.desc(), media::media_id.desc()))
        .select((Media::as_select(), clubs::club_name))
        .load::<(Media, String)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(media, club_name)| MediaView { media, club_name })
        .collect())
}

pub async fn upload_media(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    input: &MediaInput,
) -> AppResult<MediaView> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let club_name = clubs::table
                .find(club_id)
                .select(clubs::club_name)
                .first::<String>(conn)
                .await
                .optional()?
                .ok_or_else(|| AppError::not_found("Club not found"))?;

            let media = diesel::insert_into(media::table)
                .values(NewMedia {
                    club_id,
                    media_type: input.media_type.as_str(),
                    media_url: &input.media_url,
                    caption: input.caption.as_deref(),
                })
                .returning(Media::as_returning())
                .get_result(conn)
                .await?;

            Ok(MediaView { media, club_name })
        }
        .scope_boxed()
    })
    .await
}

pub async fn delete_media(conn: &mut AsyncPgConnection, media_id: i32) -> AppResult<()> {
    let deleted = diesel::delete(media::table.find(media_id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(AppError::not_found("Media not found"));
    }
    Ok(())
}
