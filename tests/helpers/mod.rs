#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use case_timeline::db::connect_and_migrate;
use case_timeline::routes::create_routes;
use case_timeline::services::storage::MemoryStorage;
use case_timeline::services::timelines::TimelineService;
use case_timeline::state::AppState;

pub const BOUNDARY: &str = "case-timeline-test-boundary";
const UPLOAD_MAX_BYTES: usize = 4 * 1024 * 1024;

pub struct TestApp {
    pub router: Router,
    pub storage: MemoryStorage,
    pub timelines: TimelineService,
}

impl TestApp {
    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("router never fails")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(&self, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
        self.request(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }
}

/// Fresh app on an in-memory SQLite database and an in-memory object store.
pub async fn setup_test_app() -> TestApp {
    let db = connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database");
    let storage = MemoryStorage::new();
    let state = AppState::new(db, Arc::new(storage.clone()), UPLOAD_MAX_BYTES);
    let timelines = state.timelines.clone();

    TestApp {
        router: create_routes(state),
        storage,
        timelines,
    }
}

pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8] },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { name, file_name, content_type, data } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub async fn text_body(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
