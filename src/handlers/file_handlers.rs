//! Download and JSON metadata endpoints.
//! Downloads stream straight from disk; listings and volume statistics are
//! computed from filesystem attributes on every call.

use crate::{
    errors::AppError,
    services::{
        AppState,
        storage_service::{StorageError, sanitize_name},
    },
};
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::info;

#[derive(Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub created: String,
    pub download_url: String,
}

#[derive(Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileInfo>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct StorageInfoResponse {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub total_gb: u64,
    pub used_gb: u64,
    pub free_gb: u64,
    pub usage_percent: f64,
}

/// `GET /download/{filename}` — stream a stored file as an attachment.
///
/// The name goes through the same sanitizer as uploads before touching the
/// filesystem. A missing file is a plain-text 404, the one endpoint that
/// uses a distinct status instead of a structured error body.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (size_bytes, file) = match state.storage.open(&filename).await {
        Ok(opened) => opened,
        Err(StorageError::FileNotFound(_)) => {
            return Ok((StatusCode::NOT_FOUND, "File not found").into_response());
        }
        Err(err) => return Err(err.into()),
    };

    info!(name = %filename, size_bytes, "download");

    let disposition = format!("attachment; filename=\"{}\"", sanitize_name(&filename));
    let stream = ReaderStream::new(file);
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&size_bytes.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    Ok(response)
}

/// `GET /api/files` — machine-readable listing for the page scripts.
pub async fn api_files(State(state): State<AppState>) -> Result<Json<FileListResponse>, AppError> {
    let files: Vec<FileInfo> = state
        .storage
        .list()
        .await?
        .into_iter()
        .map(|file| FileInfo {
            download_url: format!("/download/{}", file.name),
            created: file.created.to_rfc3339_opts(SecondsFormat::Secs, false),
            size_bytes: file.size_bytes,
            size_mb: file.size_mb(),
            filename: file.name,
        })
        .collect();
    let count = files.len();

    Ok(Json(FileListResponse { files, count }))
}

/// `GET /storage-info` — volume statistics for the storage root.
pub async fn storage_info(
    State(state): State<AppState>,
) -> Result<Json<StorageInfoResponse>, AppError> {
    let usage = state.storage.disk_usage()?;
    Ok(Json(StorageInfoResponse {
        total_bytes: usage.total_bytes,
        used_bytes: usage.used_bytes,
        free_bytes: usage.free_bytes,
        total_gb: usage.total_gb(),
        used_gb: usage.used_gb(),
        free_gb: usage.free_gb(),
        usage_percent: usage.usage_percent(),
    }))
}
