//! Integration tests for the backend configuration endpoints.

use http::StatusCode;

use foldergate_core::config::storage::BackendConfig;
use foldergate_core::traits::access::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_list_backends() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Viewer);

    let response = app.request("GET", "/api/backends", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["code"], "tmp_dir");
    assert_eq!(items[0]["protocol"], "local");
    assert_eq!(items[0]["default_for_folder_content"], true);
}

#[tokio::test]
async fn test_get_backend_and_health() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Viewer);

    let response = app
        .request("GET", "/api/backends/tmp_dir", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Temp");

    let response = app
        .request("GET", "/api/backends/tmp_dir/health", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["healthy"], true);

    let response = app
        .request("GET", "/api/backends/ghost", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_default_requires_admin() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "PUT",
            "/api/backends/tmp_dir/default",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_second_default_fails_validation() {
    let app = TestApp::new().await;
    let admin = app.token(UserRole::Admin);

    let dir = tempfile::tempdir().unwrap();
    app.registry
        .register(BackendConfig {
            name: "Second".to_string(),
            code: "second".to_string(),
            protocol: "local".to_string(),
            root: dir.path().to_str().unwrap().to_string(),
            options: serde_json::Value::Null,
            default_for_folder_content: false,
            sanitize_names: true,
            sanitize_replace_char: "_".to_string(),
        })
        .await
        .unwrap();

    // tmp_dir already carries the flag, so flagging another backend fails.
    let response = app
        .request("PUT", "/api/backends/second/default", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    // Re-flagging the current default is accepted.
    let response = app
        .request("PUT", "/api/backends/tmp_dir/default", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["backends"]["tmp_dir"], true);
}
