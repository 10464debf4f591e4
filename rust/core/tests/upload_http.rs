// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upload over real HTTP against an in-process stub of the conversion API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bimconv_core::{
    ClientConfig, Error, ReqwestTransport, SelectedFile, UploadBridge, UploadSession,
    UPLOAD_FAILED_MESSAGE,
};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Received {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

/// Accepts a `file` field and names the artifact after it.
async fn convert(
    State(received): State<Received>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.ifc").to_string();
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            let stem = file_name.trim_end_matches(".ifc").to_string();
            received
                .files
                .lock()
                .unwrap()
                .push((file_name, bytes.to_vec()));
            return Ok(Json(serde_json::json!({ "fileName": format!("{stem}.wexbim") })));
        }
    }
    Err(StatusCode::BAD_REQUEST)
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn wrong_shape() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve `router` on an ephemeral port and return the API base.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/bimconversion")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("bimconv_core=debug")
        .with_test_writer()
        .try_init();
}

fn bridge(api_base: &str) -> UploadBridge<ReqwestTransport> {
    let config = ClientConfig {
        api_base: api_base.to_string(),
        ..ClientConfig::default()
    };
    UploadBridge::new(config, ReqwestTransport::new())
}

fn house() -> SelectedFile {
    SelectedFile::new("house.ifc", b"ISO-10303-21;\nHEADER;\nENDSEC;".to_vec())
}

#[tokio::test]
async fn test_end_to_end_upload() {
    init_tracing();
    let received = Received::default();
    let router = Router::new()
        .route("/api/bimconversion/convert", post(convert))
        .with_state(received.clone());
    let base = spawn_stub(router).await;
    let bridge = bridge(&base);

    let mut session = UploadSession::new();
    session.select_file(Some(house()));
    let result = session.upload(&bridge).await.unwrap();

    assert_eq!(result.artifact_name, "house.wexbim");
    assert_eq!(result.retrieval_url, format!("{base}/files/house.wexbim"));
    assert_eq!(session.result(), Some(&result));
    assert_eq!(session.error(), None);

    let files = received.files.lock().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "house.ifc");
    assert_eq!(files[0].1, house().bytes.to_vec());
}

#[tokio::test]
async fn test_server_error_keeps_previous_result() {
    let router = Router::new().route("/api/bimconversion/convert", post(broken));
    let base = spawn_stub(router).await;
    let bridge = bridge(&base);

    let mut session = UploadSession::new();
    session.record(&Ok(bridge.result_for("earlier.wexbim")));
    session.select_file(Some(house()));

    let err = session.upload(&bridge).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 500, .. }));
    assert_eq!(session.error(), Some(UPLOAD_FAILED_MESSAGE));
    assert_eq!(session.result().unwrap().artifact_name, "earlier.wexbim");
}

#[tokio::test]
async fn test_unexpected_body_is_malformed() {
    let router = Router::new().route("/api/bimconversion/convert", post(wrong_shape));
    let base = spawn_stub(router).await;

    let err = bridge(&base).submit(Some(&house())).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert_eq!(err.user_message(), UPLOAD_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind and drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = UploadSession::new();
    session.select_file(Some(house()));
    let err = session
        .upload(&bridge(&format!("http://{addr}/api/bimconversion")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(session.error(), Some(UPLOAD_FAILED_MESSAGE));
    assert_eq!(session.result(), None);
}

#[tokio::test]
async fn test_no_file_never_connects() {
    // Port 9 (discard) is never contacted: validation fails first.
    let mut session = UploadSession::new();
    let err = session
        .upload(&bridge("http://127.0.0.1:9/api/bimconversion"))
        .await
        .unwrap_err();
    assert_eq!(err, Error::NoFileSelected);
    assert_eq!(session.error(), Some(bimconv_core::NO_FILE_MESSAGE));
}
