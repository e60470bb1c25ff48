//! Integration tests for workout sessions

mod common;

use axum::http::StatusCode;
use common::{TestApp, TestUser};
use serde_json::{json, Value};
use top_tier_shared::workout::{ExercisePlan, WorkoutSession};

fn plan() -> Vec<ExercisePlan> {
    vec![
        ExercisePlan {
            name: "Bench press".to_string(),
            sets: 2,
            reps: 8,
            rest_seconds: 0,
        },
        ExercisePlan {
            name: "Pull-up".to_string(),
            sets: 1,
            reps: 10,
            rest_seconds: 0,
        },
    ]
}

async fn start(app: &TestApp, user: &TestUser) -> String {
    let body = json!({ "workout_name": "Push pull", "exercises": plan() });
    let (status, response) = app
        .post_auth("/api/v1/workout-sessions", &body.to_string(), &user.token)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);

    let response = common::json(&response);
    assert_eq!(response["status"], "in_progress");
    response["id"].as_str().unwrap().to_string()
}

fn finished_snapshot() -> Value {
    let mut session = WorkoutSession::new(plan()).unwrap();
    for _ in 0..90 {
        session.tick();
    }
    while !session.is_completed() {
        session.complete_set().unwrap();
    }
    serde_json::to_value(session.snapshot()).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_is_stored() {
    let app = TestApp::new().await;
    let user = app.member();
    let id = start(&app, &user).await;

    let mut session = WorkoutSession::new(plan()).unwrap();
    session.complete_set().unwrap();
    let body = json!({ "snapshot": session.snapshot() });

    let path = format!("/api/v1/workout-sessions/{}/progress", id);
    let (status, response) = app.put_auth(&path, &body.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::OK, "{}", response);
    let response = common::json(&response);
    assert_eq!(response["snapshot"]["completed_sets"], json!([1, 0]));
    assert!(response["progress_percent"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_oversized_plan_rejected() {
    let app = TestApp::new().await;
    let user = app.member();

    let body = json!({
        "workout_name": "Endless",
        "exercises": [{ "name": "Curl", "sets": 2, "reps": u32::MAX }]
    });
    let (status, response) = app
        .post_auth("/api/v1/workout-sessions", &body.to_string(), &user.token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", response);
    assert_eq!(common::json(&response)["error"]["field"], "exercises");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_inconsistent_snapshot_rejected() {
    let app = TestApp::new().await;
    let user = app.member();
    let id = start(&app, &user).await;

    let mut snapshot = serde_json::to_value(WorkoutSession::new(plan()).unwrap().snapshot()).unwrap();
    snapshot["completed_sets"] = json!([2, 0, 0]);

    let path = format!("/api/v1/workout-sessions/{}/progress", id);
    let (status, response) = app
        .put_auth(&path, &json!({ "snapshot": snapshot }).to_string(), &user.token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(common::json(&response)["error"]["field"], "snapshot");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_complete_twice_conflicts() {
    let app = TestApp::new().await;
    let user = app.member();
    let id = start(&app, &user).await;
    let body = json!({ "snapshot": finished_snapshot() }).to_string();
    let path = format!("/api/v1/workout-sessions/{}/complete", id);

    let (status, response) = app.post_auth(&path, &body, &user.token).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    let response = common::json(&response);
    assert_eq!(response["status"], "completed");
    assert_eq!(response["summary"]["sets_completed"], 3);
    assert_eq!(response["summary"]["total_reps"], 26);

    let (status, _) = app.post_auth(&path, &body, &user.token).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unfinished_session_cannot_complete() {
    let app = TestApp::new().await;
    let user = app.member();
    let id = start(&app, &user).await;

    let snapshot = WorkoutSession::new(plan()).unwrap().snapshot().clone();
    let path = format!("/api/v1/workout-sessions/{}/complete", id);
    let (status, _) = app
        .post_auth(&path, &json!({ "snapshot": snapshot }).to_string(), &user.token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_sessions_are_private() {
    let app = TestApp::new().await;
    let owner = app.member();
    let other = app.member();
    let id = start(&app, &owner).await;

    let path = format!("/api/v1/workout-sessions/{}", id);
    let (status, _) = app.get_auth(&path, &other.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get_auth(&path, &owner.token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_stats_after_completion() {
    let app = TestApp::new().await;
    let user = app.member();
    let id = start(&app, &user).await;
    start(&app, &user).await;

    let path = format!("/api/v1/workout-sessions/{}/complete", id);
    let body = json!({ "snapshot": finished_snapshot() }).to_string();
    app.post_auth(&path, &body, &user.token).await;

    let (status, stats) = app.get_auth("/api/v1/workout-sessions/stats", &user.token).await;
    assert_eq!(status, StatusCode::OK);

    let stats = common::json(&stats);
    assert_eq!(stats["total_sessions"], 2);
    assert_eq!(stats["completed_sessions"], 1);
    assert_eq!(stats["total_minutes"], 1);
    assert_eq!(stats["total_sets"], 3);
    assert_eq!(stats["weekly_streak"], 1);

    let (_, list) = app.get_auth("/api/v1/workout-sessions?limit=1", &user.token).await;
    assert_eq!(common::json(&list).as_array().unwrap().len(), 1);
}
