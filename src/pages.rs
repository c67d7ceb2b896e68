//! Server-rendered HTML for the two pages and the upload-result views.
//!
//! Each page is a self-contained document: inline styles plus a small
//! script that switches between the native form (mobile) and fetch-based
//! uploads (desktop), and pulls `/api/files` and `/storage-info` after the
//! initial render. Templates are plain strings with `{token}` placeholders
//! filled per request; every client-controlled value passes through
//! [`html_escape`] first.

use crate::models::{disk_usage::DiskUsage, stored_file::StoredFile};

const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>File Hub</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
            font-size: 12px; line-height: 1.4; color: #000; background: #fff;
            height: 100vh; overflow: hidden;
        }
        .container { display: flex; height: 100vh; }
        .sidebar {
            width: 200px; background: #000; color: #fff; padding: 20px;
            position: fixed; height: 100vh; overflow: hidden;
        }
        .sidebar h1 {
            font-size: 14px; font-weight: normal; margin-bottom: 30px;
            text-transform: uppercase; letter-spacing: 1px;
        }
        .nav-item { margin-bottom: 15px; font-size: 11px; }
        .nav-item a { color: #fff; text-decoration: none; }
        .nav-item a:hover { text-decoration: underline; }
        .storage-info { margin-top: 40px; font-size: 11px; color: #ccc; }
        .content {
            margin-left: 200px; padding: 20px; height: 100vh;
            overflow-y: auto; flex: 1;
        }
        .upload-form { border: 1px solid #000; padding: 20px; margin-bottom: 20px; max-width: 400px; }
        .form-title {
            font-size: 12px; font-weight: normal; margin-bottom: 15px;
            text-transform: uppercase; letter-spacing: 1px;
        }
        .form-group { margin-bottom: 15px; }
        .form-control {
            width: 100%; padding: 8px; border: 1px solid #000; background: #fff;
            font-size: 11px; font-family: inherit;
        }
        .form-control:focus { outline: none; background: #f9f9f9; }
        .btn {
            background: #000; color: #fff; border: none; padding: 8px 16px;
            font-size: 11px; cursor: pointer; text-transform: uppercase; letter-spacing: 1px;
        }
        .btn:hover { background: #333; }
        .upload-status { margin-top: 15px; font-size: 11px; padding: 8px; display: none; }
        .upload-status.success { background: #f0f0f0; border: 1px solid #000; }
        .upload-status.error { background: #000; color: #fff; border: 1px solid #000; }
        .file-entry { padding: 10px 0; border-bottom: 1px solid #eee; font-size: 11px; }
        .file-entry:last-child { border-bottom: none; }
        .file-name { color: #000; text-decoration: none; font-weight: normal; }
        .file-name:hover { text-decoration: underline; }
        .file-meta { color: #666; margin-top: 2px; }
        @media (max-width: 768px) {
            .sidebar { width: 100%; height: auto; position: relative; padding: 15px; }
            .content { margin-left: 0; padding: 15px; }
            .container { flex-direction: column; height: auto; }
            body { overflow: auto; }
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="sidebar">
            <h1>File Hub</h1>
            <div class="nav-item"><a href="/files">View Files</a></div>
            <div class="nav-item"><a href="/">Upload</a></div>
            <div class="storage-info">
                Storage<br>{free_gb}GB free<br>{total_gb}GB total
            </div>
        </div>
        <div class="content">
            <!-- Mobile form -->
            <form id="mobileForm" method="post" action="/upload" enctype="multipart/form-data" style="display: none;">
                <div class="upload-form">
                    <div class="form-title">Upload Files</div>
                    <div class="form-group">
                        <input type="file" name="file" class="form-control" multiple>
                    </div>
                    <button type="submit" class="btn">Upload</button>
                    <div class="upload-status" id="mobileStatus"></div>
                </div>
            </form>
            <!-- Desktop upload -->
            <div id="desktopUpload">
                <div class="upload-form">
                    <div class="form-title">Upload Files</div>
                    <input type="file" id="fileInput" multiple style="width: 100%; padding: 8px; border: 1px solid #000; background: #fff; font-size: 11px;">
                    <div class="upload-status" id="uploadStatus"></div>
                </div>
                <div class="upload-form">
                    <div class="form-title">Download from URL</div>
                    <div class="form-group">
                        <input type="url" id="urlInput" class="form-control" placeholder="https://example.com/file.pdf">
                    </div>
                    <button class="btn" onclick="downloadFromUrl()">Download</button>
                    <div class="upload-status" id="urlStatus"></div>
                </div>
            </div>
            <div style="margin-top: 30px;">
                <div class="form-title">Recent Files ({file_count})</div>
                <div id="recentFiles">Loading...</div>
            </div>
        </div>
    </div>
    <script>
        const isMobile = /Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini/i.test(navigator.userAgent) || window.innerWidth <= 768;

        if (isMobile) {
            document.getElementById('mobileForm').style.display = 'block';
            document.getElementById('desktopUpload').style.display = 'none';
        } else {
            document.getElementById('fileInput').addEventListener('change', (e) => {
                const files = e.target.files;
                if (files.length > 0) uploadFiles(files);
            });
        }

        function uploadFiles(files) {
            const formData = new FormData();
            for (let i = 0; i < files.length; i++) {
                formData.append('files', files[i]);
            }
            showStatus('uploadStatus', 'Uploading...', 'success');
            fetch('/upload-multiple', { method: 'POST', body: formData })
            .then(response => response.json())
            .then(data => {
                if (data.success) {
                    showStatus('uploadStatus', `Uploaded ${data.count} file(s)`, 'success');
                    loadRecentFiles();
                } else {
                    showStatus('uploadStatus', data.message, 'error');
                }
            })
            .catch(error => showStatus('uploadStatus', 'Upload failed', 'error'));
        }

        function downloadFromUrl() {
            const url = document.getElementById('urlInput').value;
            if (!url) { showStatus('urlStatus', 'Enter URL', 'error'); return; }
            showStatus('urlStatus', 'Downloading...', 'success');
            fetch('/download-url', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({url: url})
            })
            .then(response => response.json())
            .then(data => {
                if (data.success) {
                    showStatus('urlStatus', 'Downloaded', 'success');
                    document.getElementById('urlInput').value = '';
                    loadRecentFiles();
                } else {
                    showStatus('urlStatus', data.message, 'error');
                }
            })
            .catch(error => showStatus('urlStatus', 'Download failed', 'error'));
        }

        function showStatus(elementId, message, type) {
            const element = document.getElementById(elementId);
            element.textContent = message;
            element.className = `upload-status ${type}`;
            element.style.display = 'block';
            setTimeout(() => element.style.display = 'none', 3000);
        }

        function loadRecentFiles() {
            fetch('/api/files')
            .then(response => response.json())
            .then(data => {
                const container = document.getElementById('recentFiles');
                if (data.files.length === 0) {
                    container.innerHTML = 'No files uploaded yet';
                    return;
                }
                container.innerHTML = data.files.slice(0, 10).map(file => {
                    const displayName = file.filename.includes('_') ? file.filename.split('_').slice(2).join('_') : file.filename;
                    const date = new Date(file.created).toLocaleDateString();
                    return `<div class="file-entry">
                        <a href="/download/${file.filename}" class="file-name">${displayName || file.filename}</a>
                        <div class="file-meta">${file.size_mb}MB &#8226; ${date}</div>
                    </div>`;
                }).join('');
            })
            .catch(() => {
                document.getElementById('recentFiles').innerHTML = 'Error loading files';
            });
        }
        loadRecentFiles();
    </script>
</body>
</html>
"#;

const FILES_PAGE: &str = r#"<!DOCTYPE html><html><head><title>File Library</title>
    <style>
    * {margin: 0; padding: 0; box-sizing: border-box;}
    body {font-family: -apple-system, BlinkMacSystemFont, sans-serif; font-size: 12px; color: #000; background: #fff; height: 100vh; overflow: hidden;}
    .container {display: flex; height: 100vh;}
    .sidebar {width: 200px; background: #000; color: #fff; padding: 20px; position: fixed; height: 100vh;}
    .sidebar h1 {font-size: 14px; font-weight: normal; margin-bottom: 30px; text-transform: uppercase; letter-spacing: 1px;}
    .nav-item {margin-bottom: 15px; font-size: 11px;}
    .nav-item a {color: #fff; text-decoration: none;}
    .nav-item a:hover {text-decoration: underline;}
    .storage-info {margin-top: 40px; font-size: 11px; color: #ccc;}
    .content {margin-left: 200px; padding: 20px; height: 100vh; overflow-y: auto;}
    .file-entry {padding: 8px 0; border-bottom: 1px solid #eee; font-size: 11px;}
    .file-name {color: #000; text-decoration: none; display: block;}
    .file-name:hover {text-decoration: underline;}
    .file-meta {color: #666; margin-top: 2px;}
    .page-title {font-size: 12px; font-weight: normal; margin-bottom: 20px; text-transform: uppercase; letter-spacing: 1px;}
    </style></head><body>
    <div class="container">
        <div class="sidebar">
            <h1>File Hub</h1>
            <div class="nav-item"><a href="/files">View Files</a></div>
            <div class="nav-item"><a href="/">Upload</a></div>
            <div class="storage-info">Storage<br>Loading...</div>
        </div>
        <div class="content">
            <div class="page-title">All Files</div>{file_rows}</div></div>
    <script>
    fetch('/storage-info').then(r=>r.json()).then(d=>{
        document.querySelector('.storage-info').innerHTML=`Storage<br>${d.free_gb}GB free<br>${d.total_gb}GB total`;
    }).catch(()=>{document.querySelector('.storage-info').innerHTML='Storage<br>Info unavailable';});
    </script></body></html>
"#;

const UPLOAD_RESULT_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Upload Complete</title>
<style>
body {font-family: -apple-system, BlinkMacSystemFont, sans-serif; font-size: 12px; color: #000; background: #fff; margin: 0; padding: 20px;}
.container {max-width: 400px; margin: 50px auto; padding: 20px; border: 1px solid #000;}
.title {font-size: 12px; font-weight: normal; margin-bottom: 20px; text-transform: uppercase; letter-spacing: 1px;}
.file-list ul {list-style: none; padding: 0;}
.file-list li {padding: 4px 0; font-size: 11px; border-bottom: 1px solid #eee;}
.btn {background: #000; color: #fff; border: none; padding: 8px 16px; font-size: 11px; text-decoration: none; text-transform: uppercase; letter-spacing: 1px; margin-right: 10px; display: inline-block; margin-bottom: 10px;}
</style></head><body>
<div class="container">
    <div class="title">Upload Complete</div>
    <p>Successfully uploaded {uploaded_count} file(s):</p>
    <div class="file-list"><ul>{uploaded_items}</ul></div>
    <div><a href="/files" class="btn">View Files</a><a href="/" class="btn">Upload More</a></div>
</div></body></html>
"#;

/// Upload page with the sidebar storage figures and file count filled in.
pub fn render_upload_page(usage: &DiskUsage, file_count: usize) -> String {
    UPLOAD_PAGE
        .replace("{free_gb}", &usage.free_gb().to_string())
        .replace("{total_gb}", &usage.total_gb().to_string())
        .replace("{file_count}", &file_count.to_string())
}

/// Listing page with one row per stored file, or a placeholder when empty.
pub fn render_files_page(files: &[StoredFile]) -> String {
    let mut rows = String::new();
    for file in files {
        rows.push_str(&format!(
            r#"<div class="file-entry"><a href="/download/{name}" class="file-name">{display}</a><div class="file-meta">{size}MB &#8226; {date}</div></div>"#,
            name = html_escape(&file.name),
            display = html_escape(file.display_name()),
            size = file.size_mb_display(),
            date = file.created.format("%Y-%m-%d"),
        ));
    }
    if files.is_empty() {
        rows.push_str(r#"<div class="file-entry">No files uploaded yet</div>"#);
    }
    FILES_PAGE.replace("{file_rows}", &rows)
}

/// Result page for the native form, listing the uploaded display names.
pub fn render_upload_result_page(names: &[String]) -> String {
    let items: String = names
        .iter()
        .map(|name| format!("<li>{}</li>", html_escape(name)))
        .collect();
    UPLOAD_RESULT_PAGE
        .replace("{uploaded_count}", &names.len().to_string())
        .replace("{uploaded_items}", &items)
}

/// Fragment shown when the native form is submitted without files.
pub fn render_no_files_fragment() -> String {
    r#"No files selected<br><a href="/">Back</a>"#.to_string()
}

/// Fragment shown when a native-form upload fails.
pub fn render_upload_failed_fragment(message: &str) -> String {
    format!(
        r#"Upload failed: {}<br><a href="/">Back</a>"#,
        html_escape(message)
    )
}

/// Escape a value for embedding in HTML text or attribute position.
pub fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::disk_usage::DiskUsage;
    use crate::models::stored_file::StoredFile;
    use chrono::Local;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            html_escape(r#"<b a="1">&'x'</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;x&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn upload_page_fills_storage_figures() {
        let usage = DiskUsage {
            total_bytes: 500 * 1024 * 1024 * 1024,
            used_bytes: 100 * 1024 * 1024 * 1024,
            free_bytes: 400 * 1024 * 1024 * 1024,
        };
        let page = render_upload_page(&usage, 7);
        assert!(page.contains("400GB free"));
        assert!(page.contains("500GB total"));
        assert!(page.contains("Recent Files (7)"));
        assert!(!page.contains("{file_count}"));
    }

    #[test]
    fn files_page_shows_placeholder_when_empty() {
        let page = render_files_page(&[]);
        assert!(page.contains("No files uploaded yet"));
    }

    #[test]
    fn files_page_escapes_names() {
        let files = vec![StoredFile {
            name: "20250830_120000_<script>.txt".to_string(),
            size_bytes: 1024,
            created: Local::now(),
        }];
        let page = render_files_page(&files);
        assert!(page.contains("&lt;script&gt;.txt"));
        assert!(!page.contains("<script>.txt"));
    }

    #[test]
    fn result_page_lists_uploaded_names() {
        let names = vec!["a.txt".to_string(), "b & c.pdf".to_string()];
        let page = render_upload_result_page(&names);
        assert!(page.contains("Successfully uploaded 2 file(s)"));
        assert!(page.contains("<li>a.txt</li>"));
        assert!(page.contains("<li>b &amp; c.pdf</li>"));
    }
}
