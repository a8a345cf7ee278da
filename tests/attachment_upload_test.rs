//! Attachment upload through the relay: relaying and staging cleanup.

mod common;

use axum::http::StatusCode;
use mockito::Matcher;
use serde_json::json;
use tower::ServiceExt;

use common::{
    body_json, config_for, multipart_body, multipart_post, relay, staged_files, temp_dir, AUTH,
};

#[tokio::test]
async fn test_upload_success_removes_staged_file() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/3/issue/ABC-1/attachments")
        .match_header("authorization", AUTH)
        .match_header("x-atlassian-token", "no-check")
        .match_body(Matcher::Regex("quarterly numbers".to_string()))
        .with_status(200)
        .with_body(r#"[{"id":"10001","filename":"report.txt","size":17}]"#)
        .expect(1)
        .create_async()
        .await;
    let staging = temp_dir();
    let config = config_for(&server.url(), staging.path());

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(Some("ABC-1"), Some(("report.txt", b"quarterly numbers".as_slice()))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{ "id": "10001", "filename": "report.txt", "size": 17 }])
    );
    assert_eq!(staged_files(staging.path()), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_remote_failure_removes_staged_file() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/api/3/issue/ABC-1/attachments")
        .with_status(404)
        .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
        .create_async()
        .await;
    let staging = temp_dir();
    let config = config_for(&server.url(), staging.path());

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(Some("ABC-1"), Some(("report.txt", b"numbers".as_slice()))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["errorMessages"][0],
        "Issue does not exist"
    );
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_upload_transport_failure_removes_staged_file() {
    let staging = temp_dir();
    let config = config_for("http://127.0.0.1:1", staging.path());

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(Some("ABC-1"), Some(("report.txt", b"numbers".as_slice()))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_issue_key_after_file_is_accepted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/api/3/issue/XYZ-9/attachments")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let staging = temp_dir();
    let config = config_for(&server.url(), staging.path());

    let boundary = common::BOUNDARY;
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\r\nabc\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"issueKey\"\r\n\r\nXYZ-9\r\n\
         --{boundary}--\r\n"
    );

    let response = relay(&config)
        .oneshot(multipart_post("/add-attachment", Some(AUTH), body.into()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(staged_files(staging.path()), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_file_is_rejected_and_removed() {
    let mut server = mockito::Server::new_async().await;
    let no_calls = common::expect_no_calls(&mut server).await;
    let staging = temp_dir();
    let mut config = config_for(&server.url(), staging.path());
    config.uploads.max_file_bytes = 16;

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(Some("ABC-1"), Some(("big.bin", [7u8; 64].as_slice()))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(staged_files(staging.path()), 0);
    common::assert_all(&no_calls).await;
}

#[tokio::test]
async fn test_missing_file_or_issue_key_is_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let no_calls = common::expect_no_calls(&mut server).await;
    let staging = temp_dir();
    let config = config_for(&server.url(), staging.path());

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(Some("ABC-1"), None),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing required field: file");

    let response = relay(&config)
        .oneshot(multipart_post(
            "/add-attachment",
            Some(AUTH),
            multipart_body(None, Some(("a.txt", b"abc".as_slice()))),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(staged_files(staging.path()), 0);

    common::assert_all(&no_calls).await;
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let staging = temp_dir();
    let config = config_for("http://127.0.0.1:1", staging.path());

    let response = relay(&config)
        .oneshot(common::json_post(
            "/add-attachment",
            &json!({ "issueKey": "ABC-1" }),
            Some(AUTH),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
