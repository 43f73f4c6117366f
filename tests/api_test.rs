mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use club_hub::{db, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn router(url: &str) -> Router {
    let pool = db::connect_to_db(url, 2).expect("failed to build pool");
    club_hub::app(AppState::new(pool))
}

#[tokio::test]
async fn chess_club_scenario() {
    let Some(url) = common::database_url() else {
        return;
    };
    let app = router(&url);
    let key = common::unique();
    let club_name = format!("Chess Club {key}");
    let email = format!("chess-{key}@x.edu");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register/club",
        Some(json!({
            "clubName": club_name,
            "description": "Openings, endgames and blitz",
            "category": "Academic",
            "email": email,
            "password": "pw123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["userType"], "club");
    let club_id = body["club"]["clubID"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/clubs?category=Academic", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert!(listed.iter().any(|c| c["clubID"] == club_id));
    assert!(listed.iter().all(|c| c["category"] == "Academic"));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/clubs/{club_id}/events"),
        Some(json!({
            "description": "Tourney",
            "eventDate": "2099-01-01",
            "eventTime": "5-7PM",
            "eventLocation": "Room 4"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let event_id = body["event"]["eventID"].clone();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/events?club_id={club_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["eventID"], event_id);
    assert_eq!(events[0]["eventDate"], "2099-01-01");
    assert_eq!(events[0]["clubName"], club_name.as_str());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": email, "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["clubID"], club_id);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": email, "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Club not found");
}

#[tokio::test]
async fn student_journey() {
    let Some(url) = common::database_url() else {
        return;
    };
    let app = router(&url);
    let key = common::unique();
    let student_id = format!("S{key}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register/club",
        Some(json!({
            "clubName": format!("Film Society {key}"),
            "description": "Weekly screenings",
            "category": "Culture",
            "email": format!("film-{key}@x.edu"),
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let club_id = body["club"]["clubID"].as_i64().unwrap();

    let registration = json!({
        "studentID": student_id,
        "email": format!("{key}@x.edu"),
        "password": "secret",
        "firstName": "Grace",
        "lastName": "Hopper"
    });
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register/student",
        Some(registration.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["userType"], "student");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register/student",
        Some(registration),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Student ID already registered");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/clubs/{club_id}/members"),
        Some(json!({ "studentID": student_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["membership"]["role"], "Member");

    let bookmark = json!({ "studentID": student_id, "clubID": club_id });
    let (status, _) = send(&app, Method::POST, "/api/bookmarks", Some(bookmark.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/api/bookmarks", Some(bookmark)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Club already bookmarked");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({
            "senderID": student_id,
            "clubID": club_id,
            "messageText": "When is the next screening?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let message_id = body["data"]["messageID"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/messages/{message_id}/read"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &format!("/api/clubs/{club_id}/messages"), None).await;
    assert_eq!(body[0]["isRead"], true);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/students/{student_id}/bookmarks"),
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["memberCount"], 1);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/students/{student_id}/memberships"),
        None,
    )
    .await;
    assert_eq!(body[0]["clubID"], club_id);

    let (status, body) = send(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["totalClubs"].as_i64().unwrap() >= 1);
    assert!(body["clubsByCategory"]["Culture"].as_i64().unwrap() >= 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/students/{student_id}/messages"),
        None,
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn club_routes_and_blank_event_filters() {
    let Some(url) = common::database_url() else {
        return;
    };
    let app = router(&url);
    let key = common::unique();
    let club_name = format!("Debate Society {key}");
    let category = format!("Forensics {key}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register/club",
        Some(json!({
            "clubName": club_name,
            "description": "Weekly motions",
            "category": category,
            "email": format!("debate-{key}@x.edu"),
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let club_id = body["club"]["clubID"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/clubs/categories", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == category.as_str()));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/clubs/{club_id}"),
        Some(json!({ "meetingTime": "Fri 9", "clubName": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["club"]["meetingTime"], "Fri 9");
    assert_eq!(body["club"]["clubName"], club_name.as_str());
    assert_eq!(body["club"]["description"], "Weekly motions");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/clubs/{club_id}/events"),
        Some(json!({
            "description": "Qualifier",
            "eventDate": "2099-03-01",
            "eventTime": "6 PM",
            "eventLocation": "Hall"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/events?club_id=&start_date=&end_date=",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["clubID"] == club_id));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/clubs/{club_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
