//! Represents one file persisted in the storage root.

use chrono::{DateTime, Local};
use serde::Serialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Metadata for a single stored file.
///
/// Derived entirely from filesystem attributes at read time; the service
/// keeps no separate index, so nothing here is cached between requests.
#[derive(Serialize, Clone, Debug)]
pub struct StoredFile {
    /// On-disk name, `<YYYYMMDD_HHMMSS>_<sanitized original name>`.
    pub name: String,

    /// Size in bytes as reported by the filesystem.
    pub size_bytes: u64,

    /// Creation timestamp (metadata-change time where the filesystem does
    /// not report creation).
    pub created: DateTime<Local>,
}

impl StoredFile {
    /// Original filename, with the upload-timestamp prefix stripped.
    pub fn display_name(&self) -> &str {
        strip_timestamp_prefix(&self.name)
    }

    /// Size in megabytes, rounded to two decimals (JSON listing).
    pub fn size_mb(&self) -> f64 {
        (self.size_bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
    }

    /// Size in megabytes formatted with one decimal (HTML listing).
    pub fn size_mb_display(&self) -> String {
        format!("{:.1}", self.size_bytes as f64 / BYTES_PER_MB)
    }
}

/// Strip a leading `YYYYMMDD_HHMMSS_` segment when present.
///
/// Names that do not carry the full prefix (including a name that is
/// nothing but the prefix) come back unchanged.
pub fn strip_timestamp_prefix(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() > 16
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'_'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'_'
    {
        &name[16..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn file(name: &str, size_bytes: u64) -> StoredFile {
        StoredFile {
            name: name.to_string(),
            size_bytes,
            created: Local::now(),
        }
    }

    #[test]
    fn display_name_strips_timestamp_prefix() {
        let f = file("20250830_141503_report.pdf", 10);
        assert_eq!(f.display_name(), "report.pdf");
    }

    #[test]
    fn display_name_keeps_unprefixed_names() {
        assert_eq!(file("report.pdf", 10).display_name(), "report.pdf");
        assert_eq!(file("2025_report.pdf", 10).display_name(), "2025_report.pdf");
        // A bare prefix with no remainder is left alone.
        assert_eq!(
            file("20250830_141503_", 10).display_name(),
            "20250830_141503_"
        );
    }

    #[test]
    fn size_mb_rounds_to_two_decimals() {
        assert_eq!(file("a", 1_048_576).size_mb(), 1.0);
        assert_eq!(file("b", 1_572_864).size_mb(), 1.5);
        assert_eq!(file("c", 123).size_mb(), 0.0);
    }

    #[test]
    fn size_mb_display_uses_one_decimal() {
        assert_eq!(file("a", 1_048_576).size_mb_display(), "1.0");
        assert_eq!(file("b", 157_286).size_mb_display(), "0.2");
    }
}
