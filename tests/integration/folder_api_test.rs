//! Integration tests for the folder-field content API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::StatusCode;

use foldergate_core::traits::access::UserRole;
use foldergate_core::traits::filesystem::FileSystem;

use crate::helpers::{TestApp, listed_names};

#[tokio::test]
async fn test_list_children_at_root() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(listed_names(&response.body), vec!["file1", "file2", "nested2"]);
}

#[tokio::test]
async fn test_list_children_trims_sub_path_prefix() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "GET",
            &app.folder_url("/children?path=nested2"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(listed_names(&response.body), vec!["file1", "file2"]);

    // Full root-relative paths stay available alongside the trimmed names.
    let paths: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"nested2/file1"));
}

#[tokio::test]
async fn test_root_info_does_not_leak_backend_path() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request("GET", &app.folder_url("/root"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "");
    assert_eq!(response.body["data"]["type"], "directory");
}

#[tokio::test]
async fn test_unknown_model_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "GET",
            &format!("/api/folder/ghost/{}/documents/children", app.record_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rename_delete_folder_flow() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "POST",
            &app.folder_url("/folders"),
            Some(serde_json::json!({ "path": "", "name": "reports" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            &app.folder_url("/rename"),
            Some(serde_json::json!({ "path": "", "name": "reports", "new_name": "archive" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            &app.folder_url("/delete"),
            Some(serde_json::json!({ "path": "", "name": "archive" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&token))
        .await;
    assert_eq!(listed_names(&response.body), vec!["file1", "file2", "nested2"]);
}

#[tokio::test]
async fn test_move_and_copy() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    // Moving within the same parent is a no-op.
    let response = app
        .request(
            "POST",
            &app.folder_url("/move"),
            Some(serde_json::json!({ "origin_path": "nested2", "path": "nested2", "entry": "file1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            &app.folder_url("/move"),
            Some(serde_json::json!({ "origin_path": "nested2", "path": "", "entry": "file2" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            &app.folder_url("/copy"),
            Some(serde_json::json!({ "origin_path": "", "path": "nested2", "entry": "file1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&token))
        .await;
    assert_eq!(listed_names(&response.body), vec!["file1", "file2", "nested2"]);

    // nested2 lost file2 to the move and had file1 copied over it.
    let response = app
        .request(
            "GET",
            &app.folder_url("/children?path=nested2"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(listed_names(&response.body), vec!["file1"]);
}

#[tokio::test]
async fn test_upload_download_roundtrip() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "POST",
            &app.folder_url("/upload"),
            Some(serde_json::json!({
                "path": "nested2",
                "name": "test.txt",
                "data": BASE64.encode(b"hello"),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &app.folder_url("/file?path=nested2/test.txt"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.bytes[..], b"hello");
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "text/plain"
    );
    assert!(
        response
            .headers
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("inline")
    );
    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers.get("etag").is_some());
}

#[tokio::test]
async fn test_download_disposition_and_conditional_get() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "GET",
            &app.folder_url("/file?path=file1&download=1"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let disposition = response
        .headers
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("file1"));

    // Replaying the request with the returned ETag yields 304.
    let etag = response.headers.get("etag").unwrap().to_str().unwrap().to_string();
    let request = http::Request::builder()
        .method("GET")
        .uri(app.folder_url("/file?path=file1"))
        .header("authorization", format!("Bearer {token}"))
        .header("if-none-match", &etag)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::util::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_update_content() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "PUT",
            &app.folder_url("/content"),
            Some(serde_json::json!({
                "path": "file1",
                "data": BASE64.encode(b"hello\nnew content"),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let fs = app.registry.get_fs("tmp_dir").await.unwrap();
    assert_eq!(
        &fs.read_bytes("nested/file1").await.unwrap()[..],
        b"hello\nnew content"
    );
}

#[tokio::test]
async fn test_invalid_base64_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "PUT",
            &app.folder_url("/content"),
            Some(serde_json::json!({ "path": "file1", "data": "%%%" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_value_lifecycle() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);
    let base = format!("/api/folder/project/{}/attachments", app.record_id);

    // Unset value reads as null.
    let response = app
        .request("GET", &format!("{base}/value"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].is_null());

    // Initialize creates the folder and returns the projection.
    let response = app
        .request("POST", &format!("{base}/initialize"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["reference"], "nested_content");
    assert_eq!(response.body["data"]["backend_code"], "tmp_dir");
    assert_eq!(response.body["data"]["protocol"], "local");

    // A second initialize conflicts.
    let response = app
        .request("POST", &format!("{base}/initialize"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // Removing the value keeps the folder on disk.
    let response = app
        .request("DELETE", &format!("{base}/value"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let fs = app.registry.get_fs("tmp_dir").await.unwrap();
    assert!(fs.exists("nested_content").await.unwrap());
}

#[tokio::test]
async fn test_delete_folder_removes_content_and_value() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request("DELETE", &app.folder_url(""), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let fs = app.registry.get_fs("tmp_dir").await.unwrap();
    assert!(!fs.exists("nested").await.unwrap());

    use foldergate_core::traits::record::FieldValueStore;
    assert_eq!(
        app.store
            .get_value("project", app.record_id, "documents")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_listing_vanished_folder_is_user_facing_error() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    // The folder disappears on the external storage.
    let fs = app.registry.get_fs("tmp_dir").await.unwrap();
    fs.rm("nested", true).await.unwrap();

    let response = app
        .request("GET", &app.folder_url("/children"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("moved, renamed or deleted")
    );
}

#[tokio::test]
async fn test_sandbox_escape_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.token(UserRole::Editor);

    let response = app
        .request(
            "GET",
            &app.folder_url("/file?path=..%2Fescape.txt"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
