//! Defines routes for the file hub.
//!
//! ## Structure
//! - **Pages**
//!   - `GET  /`      — upload page (HTML)
//!   - `GET  /files` — listing page (HTML)
//!
//! - **Upload endpoints**
//!   - `POST /upload`          — native multipart form, field `file` (HTML result)
//!   - `POST /upload-multiple` — scripted multipart, field `files` (JSON)
//!   - `POST /download-url`    — fetch a remote URL into storage (JSON)
//!
//! - **Retrieval endpoints**
//!   - `GET /download/{filename}` — attachment download
//!   - `GET /storage-info`        — volume statistics (JSON)
//!   - `GET /api/files`           — file listing (JSON)

use crate::{
    handlers::{
        file_handlers::{api_files, download_file, storage_info},
        health_handlers::{healthz, readyz},
        page_handlers::{files_page, upload_page},
        upload_handlers::{download_url, upload_form, upload_multiple},
    },
    services::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Build and return the router for all endpoints.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Pages
        .route("/", get(upload_page))
        .route("/files", get(files_page))
        // Upload endpoints
        .route("/upload", post(upload_form))
        .route("/upload-multiple", post(upload_multiple))
        .route("/download-url", post(download_url))
        // Retrieval endpoints
        .route("/download/{filename}", get(download_file))
        .route("/storage-info", get(storage_info))
        .route("/api/files", get(api_files))
        // Uploads are bounded only by disk space, not by a request-body cap.
        .layer(DefaultBodyLimit::disable())
}
