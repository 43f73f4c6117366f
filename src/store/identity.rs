//! Registration and credential checks for the two principal kinds.

use crate::{
    auth,
    error::{AppError, AppResult},
    models::{
        Club, ClubAdministrator, NewClub, NewClubAdministrator, NewStudent, Student,
    },
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

/// Placeholder for meeting details a club did not provide at registration.
pub const TBA: &str = "TBA";

const STUDENT_CONFLICTS: &[(&str, &str)] = &[
    ("students_pkey", "Student ID already registered"),
    ("students_email_key", "Email already registered"),
];

const CLUB_CONFLICTS: &[(&str, &str)] = &[
    ("clubs_club_name_key", "Club name already registered"),
    ("club_administrators_email_key", "Email already registered"),
    ("club_administrators_club_id_key", "Club already has an administrator"),
];

#[derive(Debug, Clone)]
pub struct StudentRegistration {
    pub student_id: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub major: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClubRegistration {
    pub club_name: String,
    pub description: String,
    pub category: String,
    pub email: String,
    pub password: String,
    pub meeting_time: Option<String>,
    pub meeting_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub major: Option<String>,
    pub year: Option<String>,
}

impl From<Student> for StudentProfile {
    fn from(student: Student) -> Self {
        Self {
            student_id: student.student_id,
            email: student.email,
            first_name: student.first_name,
            last_name: student.last_name,
            major: student.major,
            year: student.year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubAdminProfile {
    #[serde(rename = "clubAdminID")]
    pub club_admin_id: i32,
    #[serde(rename = "clubID")]
    pub club_id: i32,
    pub email: String,
    pub club_name: String,
}

impl ClubAdminProfile {
    fn new(admin: ClubAdministrator, club_name: String) -> Self {
        Self {
            club_admin_id: admin.club_admin_id,
            club_id: admin.club_id,
            email: admin.email,
            club_name,
        }
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum Principal {
    Student(StudentProfile),
    Club(ClubAdminProfile),
}

pub async fn register_student(
    conn: &mut AsyncPgConnection,
    reg: &StudentRegistration,
) -> AppResult<StudentProfile> {
    let password_hash = auth::hash_password(&reg.password)?;

    let student = conn
        .transaction::<_, AppError, _>(|conn| {
            async move {
                diesel::insert_into(students::table)
                    .values(NewStudent {
                        student_id: &reg.student_id,
                        email: &reg.email,
                        password_hash: &password_hash,
                        first_name: &reg.first_name,
                        last_name: &reg.last_name,
                        major: reg.major.as_deref(),
                        year: reg.year.as_deref(),
                    })
                    .returning(Student::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(|e| AppError::on_unique(e, STUDENT_CONFLICTS))
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(student_id = %student.student_id, "registered student");
    Ok(student.into())
}

/// Creates a club and its administrator account. Both rows are written in one
/// transaction; if either insert fails neither is kept.
pub async fn register_club(
    conn: &mut AsyncPgConnection,
    reg: &ClubRegistration,
) -> AppResult<(Club, ClubAdminProfile)> {
    let password_hash = auth::hash_password(&reg.password)?;

    let (club, admin) = conn
        .transaction::<_, AppError, _>(|conn| {
            async move {
                let club = diesel::insert_into(clubs::table)
                    .values(NewClub {
                        club_name: &reg.club_name,
                        description: &reg.description,
                        category: &reg.category,
                        meeting_time: reg.meeting_time.as_deref().unwrap_or(TBA),
                        meeting_location: reg.meeting_location.as_deref().unwrap_or(TBA),
                    })
                    .returning(Club::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(|e| AppError::on_unique(e, CLUB_CONFLICTS))?;

                let admin = diesel::insert_into(club_administrators::table)
                    .values(NewClubAdministrator {
                        club_id: club.club_id,
                        email: &reg.email,
                        password_hash: &password_hash,
                    })
                    .returning(ClubAdministrator::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(|e| AppError::on_unique(e, CLUB_CONFLICTS))?;

                Ok((club, admin))
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(club_id = club.club_id, club_name = %club.club_name, "registered club");
    let profile = ClubAdminProfile::new(admin, club.club_name.clone());
    Ok((club, profile))
}

/// Checks credentials against students first, then club administrators.
pub async fn login(
    conn: &mut AsyncPgConnection,
    email: &str,
    password: &str,
) -> AppResult<Principal> {
    if let Some(student) = find_student_by_email(conn, email).await? {
        if auth::verify_password(password, &student.password_hash)? {
            return Ok(Principal::Student(student.into()));
        }
    }

    let admin = club_administrators::table
        .inner_join(clubs::table)
        .filter(club_administrators::email.eq(email))
        .select((ClubAdministrator::as_select(), clubs::club_name))
        .first::<(ClubAdministrator, String)>(conn)
        .await
        .optional()?;

    if let Some((admin, club_name)) = admin {
        if auth::verify_password(password, &admin.password_hash)? {
            return Ok(Principal::Club(ClubAdminProfile::new(admin, club_name)));
        }
    }

    tracing::debug!(email, "rejected login");
    Err(AppError::Unauthorized)
}

pub async fn find_student(
    conn: &mut AsyncPgConnection,
    student_id: &str,
) -> AppResult<Option<Student>> {
    Ok(students::table
        .find(student_id)
        .select(Student::as_select())
        .first(conn)
        .await
        .optional()?)
}

pub async fn find_student_by_email(
    conn: &mut AsyncPgConnection,
    email: &str,
) -> AppResult<Option<Student>> {
    Ok(students::table
        .filter(students::email.eq(email))
        .select(Student::as_select())
        .first(conn)
        .await
        .optional()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principals_are_tagged_with_user_type() {
        let student = Principal::Student(StudentProfile {
            student_id: "S100".into(),
            email: "ada@x.edu".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            major: None,
            year: Some("Senior".into()),
        });
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["userType"], "student");
        assert_eq!(value["studentID"], "S100");
        assert_eq!(value["firstName"], "Ada");

        let club = Principal::Club(ClubAdminProfile {
            club_admin_id: 3,
            club_id: 9,
            email: "chess@x.edu".into(),
            club_name: "Chess Club".into(),
        });
        let value = serde_json::to_value(&club).unwrap();
        assert_eq!(value["userType"], "club");
        assert_eq!(value["clubAdminID"], 3);
        assert_eq!(value["clubName"], "Chess Club");
    }
}
