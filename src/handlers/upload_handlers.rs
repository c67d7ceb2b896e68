//! Upload entry points: the native browser form, the scripted multipart
//! upload, and the remote-URL fetch.
//!
//! Every failure here is converted into a structured response — an HTML
//! fragment for the form path, `{success: false, message}` JSON for the
//! scripted paths. Nothing propagates as a process fault.

use crate::{
    models::stored_file::strip_timestamp_prefix,
    pages,
    services::AppState,
};
use axum::{
    Json,
    extract::{Multipart, State},
    response::Html,
};
use futures::stream;
use serde::{Deserialize, Serialize};
use std::io;
use tracing::{info, warn};

/// Multipart field name used by the native browser form.
const FORM_FIELD: &str = "file";

/// Multipart field name used by the page script.
const SCRIPT_FIELD: &str = "files";

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

#[derive(Deserialize)]
pub struct DownloadUrlRequest {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct DownloadUrlResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// `POST /upload` — native form submission, field `file` (repeatable).
///
/// Responds with a small result page listing the uploaded names, or a
/// message fragment when nothing was selected or a write failed.
pub async fn upload_form(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Html<String> {
    match save_parts(&state, &mut multipart, FORM_FIELD).await {
        Ok(names) if names.is_empty() => Html(pages::render_no_files_fragment()),
        Ok(names) => {
            info!(count = names.len(), "form upload complete");
            Html(pages::render_upload_result_page(&names))
        }
        Err(message) => {
            warn!(%message, "form upload failed");
            Html(pages::render_upload_failed_fragment(&message))
        }
    }
}

/// `POST /upload-multiple` — scripted upload, field `files` (repeatable).
///
/// Always responds 200 with a structured JSON body; an empty part list is
/// a successful zero-count upload, not an error.
///
/// On failure the response carries `count: 0` even when parts earlier in
/// the request were already written to disk, so `count` is not the number
/// of files persisted. Callers should re-list to see what landed.
pub async fn upload_multiple(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Json<UploadResponse> {
    match save_parts(&state, &mut multipart, SCRIPT_FIELD).await {
        Ok(names) => {
            info!(count = names.len(), "scripted upload complete");
            Json(UploadResponse {
                success: true,
                count: names.len(),
                message: format!("Successfully uploaded {} file(s)", names.len()),
            })
        }
        Err(message) => {
            warn!(%message, "scripted upload failed");
            Json(UploadResponse {
                success: false,
                count: 0,
                message,
            })
        }
    }
}

/// `POST /download-url` — fetch a remote file into storage.
///
/// The body is parsed leniently: anything that is not JSON carrying a
/// non-empty `url` string is reported as "No URL provided" rather than
/// rejected at the framework boundary.
pub async fn download_url(
    State(state): State<AppState>,
    body: String,
) -> Json<DownloadUrlResponse> {
    let url = serde_json::from_str::<DownloadUrlRequest>(&body)
        .ok()
        .and_then(|req| req.url)
        .filter(|url| !url.is_empty());

    let Some(url) = url else {
        return Json(DownloadUrlResponse {
            success: false,
            message: "No URL provided".into(),
            filename: None,
        });
    };

    match state.fetcher.fetch_to_storage(&url, &state.storage).await {
        Ok(fetched) => Json(DownloadUrlResponse {
            success: true,
            message: format!("Downloaded: {}", fetched.filename),
            filename: Some(fetched.stored_name),
        }),
        Err(err) => {
            warn!(url, error = %err, "remote fetch failed");
            Json(DownloadUrlResponse {
                success: false,
                message: err.to_string(),
                filename: None,
            })
        }
    }
}

/// Drain `multipart`, saving every non-empty file part under `field_name`.
///
/// Returns the display names of the saved files, or the first failure as a
/// human-readable message. Parts under other field names and parts without
/// a filename are skipped.
async fn save_parts(
    state: &AppState,
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Vec<String>, String> {
    let mut saved = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(err.to_string()),
        };
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };
        if original.is_empty() {
            continue;
        }

        // Hand the part to storage as a chunk stream; nothing is buffered.
        let stream = stream::unfold(field, |mut field| async move {
            match field.chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), field)),
                Ok(None) => None,
                Err(err) => Some((Err(io::Error::other(err)), field)),
            }
        });

        match state.storage.save(&original, stream).await {
            Ok(stored) => saved.push(strip_timestamp_prefix(&stored).to_string()),
            Err(err) => return Err(err.to_string()),
        }
    }
    Ok(saved)
}
