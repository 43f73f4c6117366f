use crate::{
    error::{AppError, AppResult},
    models::{Message, NewMessage},
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: String,
    pub club_name: String,
}

#[derive(Debug, Clone)]
pub struct MessageInput {
    pub sender_id: String,
    pub club_id: i32,
    pub subject: Option<String>,
    pub message_text: String,
}

type MessageRow = (Message, String, String, String);

fn into_view((message, first_name, last_name, club_name): MessageRow) -> MessageView {
    MessageView {
        message,
        sender_name: format!("{first_name} {last_name}"),
        club_name,
    }
}

pub async fn send_message(
    conn: &mut AsyncPgConnection,
    input: &MessageInput,
) -> AppResult<MessageView> {
    conn.transaction::<_, AppError, _>(|conn| {
        async move {
            let message_id = diesel::insert_into(messages::table)
                .values(NewMessage {
                    sender_id: &input.sender_id,
                    club_id: input.club_id,
                    subject: input.subject.as_deref(),
                    message_text: &input.message_text,
                })
                .returning(messages::message_id)
                .get_result::<i32>(conn)
                .await?;

            let row = messages::table
                .inner_join(students::table)
                .inner_join(clubs::table)
                .filter(messages::message_id.eq(message_id))
                .select((
                    Message::as_select(),
                    students::first_name,
                    students::last_name,
                    clubs::club_name,
                ))
                .first::<MessageRow>(conn)
                .await?;

            Ok(into_view(row))
        }
        .scope_boxed()
    })
    .await
}

/// A club's inbox, newest first.
pub async fn list_club_inbox(
    conn: &mut AsyncPgConnection,
    club_id: i32,
) -> AppResult<Vec<MessageView>> {
    let rows = messages::table
        .inner_join(students::table)
        .inner_join(clubs::table)
        .filter(messages::club_id.eq(club_id))
        .order((messages::sent_at.desc(), messages::message_id.desc()))
        .select((
            Message::as_select(),
            students::first_name,
            students::last_name,
            clubs::club_name,
        ))
        .load::<MessageRow>(conn)
        .await?;

    Ok(rows.into_iter().map(into_view).collect())
}

/// Messages a student has sent, newest first.
pub async fn list_student_sent(
    conn: &mut AsyncPgConnection,
    student_id: &str,
) -> AppResult<Vec<MessageView>> {
    let rows = messages::table
        .inner_join(students::table)
        .inner_join(clubs::table)
        .filter(messages::sender_id.eq(student_id))
        .order((messages::sent_at.desc(), messages::message_id.desc()))
        .select((
            Message::as_select(),
            students::first_name,
            students::last_name,
            clubs::club_name,
        ))
        .load::<MessageRow>(conn)
        .await?;

    Ok(rows.into_iter().map(into_view).collect())
}

pub async fn mark_read(conn: &mut AsyncPgConnection, message_id: i32) -> AppResult<()> {
    let updated = diesel::update(messages::table.find(message_id))
        .set(messages::is_read.eq(true))
        .execute(conn)
        .await?;
    if updated == 0 {
        return Err(AppError::not_found("Message not found"));
    }
    Ok(())
}
