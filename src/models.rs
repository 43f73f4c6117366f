use crate::{
    error::{AppError, AppResult},
    schema::*,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_ROLE: &str = "Member";
pub const MISSING_FIELDS: &str = "Missing required fields";

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("invalid date `{value}`, expected YYYY-MM-DD")))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Student {
    pub student_id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub major: Option<String>,
    pub year: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub student_id: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub major: Option<&'a str>,
    pub year: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = club_administrators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClubAdministrator {
    pub club_admin_id: i32,
    pub club_id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = club_administrators)]
pub struct NewClubAdministrator<'a> {
    pub club_id: i32,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = clubs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Club {
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub club_name: String,
    pub description: String,
    pub category: String,
    pub meeting_time: String,
    pub meeting_location: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clubs)]
pub struct NewClub<'a> {
    pub club_name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub meeting_time: &'a str,
    pub meeting_location: &'a str,
}

/// Partial update of a club profile. Absent fields are left untouched and
/// unknown request fields are ignored.
#[derive(Debug, Default, Clone, Deserialize, AsChangeset)]
#[diesel(table_name = clubs)]
#[serde(rename_all = "camelCase")]
pub struct ClubPatch {
    pub description: Option<String>,
    pub meeting_time: Option<String>,
    pub meeting_location: Option<String>,
    pub category: Option<String>,
}

impl ClubPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.meeting_time.is_none()
            && self.meeting_location.is_none()
            && self.category.is_none()
    }

    pub fn validate(&self) -> AppResult<()> {
        reject_blank("description", &self.description)?;
        reject_blank("meetingTime", &self.meeting_time)?;
        reject_blank("meetingLocation", &self.meeting_location)?;
        reject_blank("category", &self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventID")]
    pub event_id: i32,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub description: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub club_id: i32,
    pub event_date: NaiveDate,
    pub event_time: &'a str,
    pub event_location: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub struct EventPatch {
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.event_date.is_none()
            && self.event_time.is_none()
            && self.event_location.is_none()
    }

    pub fn validate(&self) -> AppResult<()> {
        reject_blank("description", &self.description)?;
        reject_blank("eventTime", &self.event_time)?;
        reject_blank("eventLocation", &self.event_location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(rename = "mediaID")]
    pub media_id: i32,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub media_type: String,
    #[serde(rename = "mediaURL")]
    pub media_url: String,
    pub caption: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = media)]
pub struct NewMedia<'a> {
    pub club_id: i32,
    pub media_type: &'a str,
    pub media_url: &'a str,
    pub caption: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "messageID")]
    pub message_id: i32,
    #[serde(rename = "senderID")]
    pub sender_id: String,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub subject: Option<String>,
    pub message_text: String,
    pub is_read: bool,
    pub sent_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage<'a> {
    pub sender_id: &'a str,
    pub club_id: i32,
    pub subject: Option<&'a str>,
    pub message_text: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(rename = "bookmarkID")]
    pub bookmark_id: i32,
    #[serde(rename = "studentID")]
    pub student_id: String,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub bookmarked_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark<'a> {
    pub student_id: &'a str,
    pub club_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = club_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(rename = "membershipID")]
    pub membership_id: i32,
    #[serde(rename = "studentID")]
    pub student_id: String,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub role: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = club_members)]
pub struct NewMembership<'a> {
    pub student_id: &'a str,
    pub club_id: i32,
    pub role: &'a str,
}

fn reject_blank(field: &str, value: &Option<String>) -> AppResult<()> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::validation(format!("`{field}` must not be blank")))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2099-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
        );
        assert!(parse_date("01/01/2099").is_err());
        assert!(parse_date("2099-02-30").is_err());
    }

    #[test]
    fn club_patch_ignores_unknown_fields() {
        let patch: ClubPatch =
            serde_json::from_str(r#"{"category":"Academic","clubName":"Renamed","foo":1}"#)
                .unwrap();
        assert_eq!(patch.category.as_deref(), Some("Academic"));
        assert!(patch.description.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn club_patch_rejects_blank_values() {
        let patch = ClubPatch {
            meeting_location: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(AppError::Validation(_))));
        assert!(ClubPatch::default().validate().is_ok());
        assert!(ClubPatch::default().is_empty());
    }

    #[test]
    fn media_type_is_lowercase_on_the_wire() {
        let kind: MediaType = serde_json::from_str(r#""video""#).unwrap();
        assert_eq!(kind, MediaType::Video);
        assert_eq!(kind.as_str(), "video");
        assert!(serde_json::from_str::<MediaType>(r#""audio""#).is_err());
    }

    #[test]
    fn club_serializes_with_id_suffix() {
        let club = Club {
            club_id: 7,
            club_name: "Chess Club".into(),
            description: "Openings and endgames".into(),
            category: "Academic".into(),
            meeting_time: "Mon 5 PM".into(),
            meeting_location: "Room 4".into(),
        };
        let value = serde_json::to_value(&club).unwrap();
        assert_eq!(value["clubID"], 7);
        assert_eq!(value["clubName"], "Chess Club");
        assert_eq!(value["meetingLocation"], "Room 4");
    }
}
