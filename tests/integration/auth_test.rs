//! Integration tests for authentication and access control.

use http::StatusCode;

use foldergate_core::traits::access::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &app.folder_url("/children"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            &app.folder_url("/children"),
            None,
            Some("not-a-token"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_secret_is_unauthorized() {
    let app = TestApp::new().await;
    let forged = foldergate_api::extractors::auth::encode_token(
        uuid::Uuid::new_v4(),
        "intruder",
        UserRole::Admin,
        "some-other-secret",
        15,
    )
    .unwrap();

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&forged))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_can_read() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Viewer);

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_viewer_cannot_write() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Viewer);

    let response = app
        .request(
            "POST",
            &app.folder_url("/delete"),
            Some(serde_json::json!({ "path": "", "name": "file1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "ACCESS_DENIED");
}
