//! Integration tests for the prelaunch lead endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_capture_lead_is_public() {
    let app = common::TestApp::new().await;
    let email = common::unique_email();

    let body = json!({ "email": email.to_uppercase(), "name": "Rick", "source": "landing" });
    let (status, response) = app.post("/api/v1/prelaunch-leads", &body.to_string()).await;

    assert_eq!(status, StatusCode::CREATED);
    let response = common::json(&response);
    assert_eq!(response["email"], email.to_lowercase());
    assert_eq!(response["source"], "landing");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_lead_conflicts() {
    let app = common::TestApp::new().await;
    let body = json!({ "email": common::unique_email() }).to_string();

    let (first, _) = app.post("/api/v1/prelaunch-leads", &body).await;
    let (second, response) = app.post("/api/v1/prelaunch-leads", &body).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(common::json(&response)["error"]["code"], "CONFLICT");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_email_names_field() {
    let app = common::TestApp::new().await;

    let (status, response) = app
        .post("/api/v1/prelaunch-leads", &json!({ "email": "geen-email" }).to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(common::json(&response)["error"]["field"], "email");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_without_match_succeeds_with_empty_list() {
    let app = common::TestApp::new().await;
    let admin = app.admin();

    let path = format!("/api/v1/prelaunch-leads?email={}", common::unique_email());
    let (status, response) = app.delete_auth(&path, &admin.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&response), json!({ "success": true, "deleted": [] }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_returns_removed_leads() {
    let app = common::TestApp::new().await;
    let admin = app.admin();
    let email = common::unique_email();
    app.post("/api/v1/prelaunch-leads", &json!({ "email": email }).to_string())
        .await;

    let path = format!("/api/v1/prelaunch-leads?email={}", email);
    let (status, response) = app.delete_auth(&path, &admin.token).await;

    assert_eq!(status, StatusCode::OK);
    let response = common::json(&response);
    assert_eq!(response["success"], true);
    assert_eq!(response["deleted"][0]["email"], email.to_lowercase());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_and_export_are_admin_only() {
    let app = common::TestApp::new().await;
    let member = app.member();
    let admin = app.admin();
    let email = common::unique_email();
    app.post("/api/v1/prelaunch-leads", &json!({ "email": email }).to_string())
        .await;

    let (status, _) = app.get_auth("/api/v1/prelaunch-leads", &member.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get_auth("/api/v1/prelaunch-leads", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&email.to_lowercase()));

    let (status, csv) = app.get_auth("/api/v1/prelaunch-leads/export", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(csv.starts_with("email,name,source,created_at"));
    assert!(csv.contains(&email.to_lowercase()));
}
