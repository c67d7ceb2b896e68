//! src/services/storage_service.rs
//!
//! StorageService — file storage backed by a single flat directory. There is
//! no separate metadata store: sizes and timestamps are read back from
//! filesystem attributes on every request, and the on-disk name
//! `<YYYYMMDD_HHMMSS>_<sanitized original name>` is the only identifier.

use crate::models::{disk_usage::DiskUsage, stored_file::StoredFile};
use bytes::Bytes;
use chrono::{DateTime, Local};
use futures::{Stream, StreamExt, pin_mut};
use std::{
    ffi::CString,
    io::{self, ErrorKind},
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// Fallback when sanitization leaves nothing of a client-supplied name.
const FALLBACK_NAME: &str = "file";

/// Prefix for staging files. These must never show up in listings and are
/// removed on every failed write path.
const TMP_PREFIX: &str = ".tmp-";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file `{0}` not found")]
    FileNotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// StorageService provides the filesystem operations behind every endpoint:
/// - Save an uploaded byte stream under a timestamped name
/// - List stored files newest-first
/// - Open a stored file for a streamed download
/// - Report volume statistics for the storage root
///
/// The root directory is an explicit handle passed in at construction, so
/// tests can point an instance at a temporary directory.
#[derive(Clone, Debug)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    /// Create a new StorageService over `root`. The directory is not
    /// created here; call [`ensure_root`](Self::ensure_root) at startup.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root (and parents) if missing.
    pub async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve a client-supplied filename to a path under the root.
    ///
    /// The name is sanitized first, so the result can never escape the
    /// storage root. Existence is not checked.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(sanitize_name(name))
    }

    /// Compute the on-disk name for an upload arriving now.
    ///
    /// Second-granularity wall clock plus the sanitized original name.
    /// Two uploads of the same name within the same second collide; the
    /// later write overwrites the earlier one (accepted limitation).
    fn stored_name(original_name: &str) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}", timestamp, sanitize_name(original_name))
    }

    /// Stream-save an upload under a timestamped name.
    ///
    /// - Writes chunks incrementally to a `.tmp-*` staging file.
    /// - Flushes and fsyncs before renaming into the final location.
    /// - Removes the staging file on every error path.
    ///
    /// Returns the stored name.
    pub async fn save<S>(&self, original_name: &str, stream: S) -> StorageResult<String>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let stored_name = Self::stored_name(original_name);
        let file_path = self.root.join(&stored_name);
        let tmp_path = self.root.join(format!("{}{}", TMP_PREFIX, Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut size_bytes: u64 = 0;
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(StorageError::Io(err));
                }
            };
            size_bytes += chunk.len() as u64;
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io(err));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        }

        debug!(name = %stored_name, size_bytes, "stored file");
        Ok(stored_name)
    }

    /// List stored files, reverse-sorted by name.
    ///
    /// The timestamp prefix makes reverse name order approximate
    /// newest-first. Staging files and subdirectories are skipped, as are
    /// entries that disappear between the scan and the stat.
    pub async fn list(&self) -> StorageResult<Vec<StoredFile>> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(TMP_PREFIX) {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(StorageError::Io(err)),
            };
            if metadata.is_dir() {
                continue;
            }
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| Local::now());

            entries.push(StoredFile {
                name,
                size_bytes: metadata.len(),
                created,
            });
        }

        entries.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(entries)
    }

    /// Number of stored files, for the upload page's initial render.
    pub async fn file_count(&self) -> StorageResult<usize> {
        Ok(self.list().await?.len())
    }

    /// Open a stored file for reading.
    ///
    /// Returns the size and an opened handle ready for streaming out, or
    /// `FileNotFound` for missing names and directories.
    pub async fn open(&self, name: &str) -> StorageResult<(u64, File)> {
        let path = self.resolve(name);
        let file = File::open(&path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StorageError::FileNotFound(name.to_string())
            } else {
                StorageError::Io(err)
            }
        })?;
        let metadata = file.metadata().await?;
        if metadata.is_dir() {
            return Err(StorageError::FileNotFound(name.to_string()));
        }
        Ok((metadata.len(), file))
    }

    /// Query volume statistics for the filesystem holding the root.
    ///
    /// Matches `statvfs` semantics: total from `f_blocks`, used from
    /// `f_blocks - f_bfree`, free from `f_bavail` (blocks available to
    /// unprivileged callers), all scaled by the fragment size.
    pub fn disk_usage(&self) -> StorageResult<DiskUsage> {
        let path = CString::new(self.root.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "path contains a NUL byte"))?;
        let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
        // path is NUL-terminated and stats is a writable out-parameter.
        let rc = unsafe { libc::statvfs(path.as_ptr(), &mut stats) };
        if rc != 0 {
            return Err(StorageError::Io(io::Error::last_os_error()));
        }

        let frsize = stats.f_frsize as u64;
        let blocks = stats.f_blocks as u64;
        let bfree = stats.f_bfree as u64;
        let bavail = stats.f_bavail as u64;

        Ok(DiskUsage {
            total_bytes: blocks * frsize,
            used_bytes: blocks.saturating_sub(bfree) * frsize,
            free_bytes: bavail * frsize,
        })
    }
}

/// Sanitize a client-supplied filename for filesystem use.
///
/// Strips path separators, parent references, NUL and control bytes, then
/// trims leading dots and whitespace so the result can neither traverse out
/// of the root nor hide as a dotfile. An empty result falls back to a fixed
/// placeholder.
pub fn sanitize_name(name: &str) -> String {
    let cleaned = sanitize_filename::sanitize(name);
    let cleaned = cleaned.trim_start_matches(['.', ' ']).trim();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::tempdir;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = io::Result<Bytes>> + Send {
        let items: Vec<io::Result<Bytes>> = parts
            .iter()
            .map(|part| Ok(Bytes::from_static(part)))
            .collect();
        stream::iter(items)
    }

    #[test]
    fn sanitize_strips_traversal_sequences() {
        let cleaned = sanitize_name("../../etc/passwd");
        assert!(!cleaned.contains('/'));
        assert!(!cleaned.starts_with('.'));
        assert_eq!(cleaned, "etcpasswd");
    }

    #[test]
    fn sanitize_strips_nul_and_backslashes() {
        let cleaned = sanitize_name("a\0b\\..\\c.txt");
        assert!(!cleaned.contains('\0'));
        assert!(!cleaned.contains('\\'));
    }

    #[test]
    fn sanitize_empty_falls_back() {
        assert_eq!(sanitize_name(""), "file");
        assert_eq!(sanitize_name("../.."), "file");
        assert_eq!(sanitize_name("...."), "file");
    }

    #[test]
    fn resolve_never_escapes_root() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());
        for hostile in ["../../etc/passwd", "/etc/passwd", "..", "a/../../b"] {
            let resolved = storage.resolve(hostile);
            assert!(
                resolved.starts_with(temp.path()),
                "{hostile} resolved outside root: {}",
                resolved.display()
            );
        }
    }

    #[tokio::test]
    async fn save_and_list_roundtrip() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());

        let stored = storage
            .save("report.pdf", chunks(&[b"hello ", b"world"]))
            .await
            .expect("save");
        assert!(stored.ends_with("_report.pdf"));

        let entries = storage.list().await.expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, stored);
        assert_eq!(entries[0].size_bytes, 11);
        assert_eq!(entries[0].display_name(), "report.pdf");

        let on_disk = std::fs::read(temp.path().join(&stored)).expect("read back");
        assert_eq!(on_disk, b"hello world");
    }

    #[tokio::test]
    async fn save_failed_stream_leaves_no_files() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());

        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ]);
        let result = storage.save("big.bin", broken).await;
        assert!(result.is_err());

        let entries = storage.list().await.expect("list");
        assert!(entries.is_empty());
        // The staging file must be gone too.
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn list_is_reverse_name_ordered() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());

        for name in [
            "20240101_000000_a.txt",
            "20240102_000000_b.txt",
            "20240103_000000_c.txt",
        ] {
            std::fs::write(temp.path().join(name), b"x").expect("write");
        }

        let entries = storage.list().await.expect("list");
        let names: Vec<&str> = entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["c.txt", "b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn list_skips_staging_files_and_directories() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());

        std::fs::write(temp.path().join(".tmp-abc"), b"partial").expect("write");
        std::fs::create_dir(temp.path().join("subdir")).expect("mkdir");
        std::fs::write(temp.path().join("20240101_000000_real.txt"), b"x").expect("write");

        let entries = storage.list().await.expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name(), "real.txt");
    }

    #[tokio::test]
    async fn open_missing_file_is_not_found() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());
        let result = storage.open("never-uploaded.txt").await;
        assert!(matches!(result, Err(StorageError::FileNotFound(_))));
    }

    #[test]
    fn disk_usage_reports_sane_numbers() {
        let temp = tempdir().expect("tempdir");
        let storage = StorageService::new(temp.path());
        let usage = storage.disk_usage().expect("statvfs");
        assert!(usage.total_bytes > 0);
        assert!(usage.used_bytes <= usage.total_bytes);
        assert!(usage.free_bytes <= usage.total_bytes);
        let percent = usage.usage_percent();
        assert!((0.0..=100.0).contains(&percent));
    }
}
