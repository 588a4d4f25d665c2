//! Embedded static assets
//!
//! The chat UI is compiled into the binary; in development, missing assets
//! fall back to the filesystem so the page can be edited without rebuilding.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    response::IntoResponse,
};
use rust_embed::Embed;
use std::path::Path;

#[derive(Embed)]
#[folder = "ui/dist"]
struct Assets;

const UI_DIR: &str = "ui/dist";

fn file_response(path: &str, bytes: Vec<u8>) -> Response<Body> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(bytes))
        .unwrap_or_default()
}

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(req: Request<Body>) -> impl IntoResponse {
    let path = req.uri().path().trim_start_matches('/');

    if let Some(content) = Assets::get(path) {
        return file_response(path, content.data.to_vec());
    }

    if let Ok(bytes) = std::fs::read(Path::new(UI_DIR).join(path)) {
        return file_response(path, bytes);
    }

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("Not found"))
        .unwrap_or_default()
}

/// Get the index.html content (embedded or from filesystem)
pub fn get_index_html() -> Option<String> {
    if let Some(content) = Assets::get("index.html") {
        return String::from_utf8(content.data.to_vec()).ok();
    }

    std::fs::read_to_string(Path::new(UI_DIR).join("index.html")).ok()
}
