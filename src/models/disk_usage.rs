//! Volume statistics for the filesystem holding the storage root.

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Snapshot of the storage volume, queried at request time.
///
/// `used + free` may fall short of `total` on filesystems that reserve
/// blocks for root; callers should treat the sum as approximate.
#[derive(Clone, Copy, Debug)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl DiskUsage {
    pub fn total_gb(&self) -> u64 {
        self.total_bytes / BYTES_PER_GB
    }

    pub fn used_gb(&self) -> u64 {
        self.used_bytes / BYTES_PER_GB
    }

    pub fn free_gb(&self) -> u64 {
        self.free_bytes / BYTES_PER_GB
    }

    /// Used share of the volume as a percentage, rounded to one decimal.
    pub fn usage_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let percent = self.used_bytes as f64 / self.total_bytes as f64 * 100.0;
        (percent * 10.0).round() / 10.0
    }
}
