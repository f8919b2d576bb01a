mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{app, get};
use http_body_util::BodyExt;
use tower::ServiceExt;

const BOUNDARY: &str = "prep-test-boundary";

struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    content_type: &'a str,
    bytes: Vec<u8>,
}

fn file<'a>(file_name: &'a str, content_type: &'a str, bytes: Vec<u8>) -> Part<'a> {
    Part {
        name: "file",
        file_name: Some(file_name),
        content_type,
        bytes,
    }
}

fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-user-id", "user_42")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn accepted_file_is_stored_and_served() {
    let app = app();
    let req = multipart(
        "/uploads/documentUploader",
        &[file("notes.txt", "text/plain", b"ownership and borrowing".to_vec())],
    );
    let reply = app.send(req).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    assert_eq!(reply.body["success"], true);

    let data = &reply.body["data"];
    assert_eq!(data["name"], "notes.txt");
    assert_eq!(data["size"], 23);
    assert_eq!(data["contentType"], "text/plain");
    assert_eq!(data["uploadedBy"], "user_42");
    assert_eq!(
        common::header_str(&reply.headers, header::CACHE_CONTROL),
        "no-cache, no-store, must-revalidate"
    );

    let url = data["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/files/"));
    assert!(url.ends_with("-notes.txt"));

    let stored = url.trim_start_matches("/uploads/files/");
    let on_disk = std::fs::read(app.uploads.path().join(stored)).unwrap();
    assert_eq!(on_disk, b"ownership and borrowing");

    let resp = app.router.clone().oneshot(get(url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ownership and borrowing");
}

#[tokio::test]
async fn unknown_uploader_is_not_found() {
    let app = app();
    let req = multipart(
        "/uploads/videoUploader",
        &[file("clip.mp4", "video/mp4", vec![0; 16])],
    );
    let reply = app.send(req).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["success"], false);
}

#[tokio::test]
async fn unaccepted_type_is_rejected() {
    let app = app();
    let req = multipart(
        "/uploads/resumeUploader",
        &[file("me.png", "image/png", vec![0; 16])],
    );
    let reply = app.send(req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let app = app();
    let req = multipart(
        "/uploads/imageUploader",
        &[file("huge.png", "image/png", vec![7; 4 * 1024 * 1024 + 1])],
    );
    let reply = app.send(req).await;
    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(std::fs::read_dir(app.uploads.path()).unwrap().count(), 0);

    let req = multipart(
        "/uploads/imageUploader",
        &[file("fits.png", "image/png", vec![7; 4 * 1024 * 1024])],
    );
    assert_eq!(app.send(req).await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn exactly_one_file_is_required() {
    let app = app();
    let two = multipart(
        "/uploads/pdfUploader",
        &[
            file("a.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
            file("b.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
        ],
    );
    let reply = app.send(two).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["message"], "Only one file may be uploaded per request");

    let none = multipart(
        "/uploads/pdfUploader",
        &[Part {
            name: "comment",
            file_name: None,
            content_type: "text/plain",
            bytes: b"no file here".to_vec(),
        }],
    );
    let reply = app.send(none).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["message"], "Multipart form must include a file");
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let app = app();
    let reply = app
        .post("/uploads/pdfUploader", serde_json::json!({"file": "nope"}))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}
