//! Server-rendered pages: the upload page and the file listing.

use crate::{errors::AppError, pages, services::AppState};
use axum::{extract::State, response::Html};

/// `GET /` — upload page.
///
/// Disk usage and the file count are read synchronously so the first paint
/// already shows them; the recent-files panel loads via `/api/files`.
pub async fn upload_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let usage = state.storage.disk_usage()?;
    let file_count = state.storage.file_count().await?;
    Ok(Html(pages::render_upload_page(&usage, file_count)))
}

/// `GET /files` — listing page.
///
/// Rows are rendered server-side; storage info is fetched by the page
/// script after the initial render.
pub async fn files_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let files = state.storage.list().await?;
    Ok(Html(pages::render_files_page(&files)))
}
