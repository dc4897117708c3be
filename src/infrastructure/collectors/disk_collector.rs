use std::sync::Mutex;

use sysinfo::Disks;

use crate::domain::entities::facts::DiskFacts;
use crate::domain::ports::collector::CollectionError;

/// Filesystem types to exclude from disk metrics.
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "sysfs",
    "proc",
    "cgroup2",
    "squashfs",
    "efivarfs",
    "bpf",
    "hugetlbfs",
    "mqueue",
    "pstore",
    "securityfs",
    "debugfs",
    "tracefs",
    "fusectl",
    "rpc_pipefs",
];

/// Looks up mounted volumes using the `sysinfo` crate.
pub struct DiskCollector {
    disks: Mutex<Disks>,
}

impl DiskCollector {
    /// Creates a new collector with a pre-refreshed disk list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            disks: Mutex::new(Disks::new_with_refreshed_list()),
        }
    }

    /// Usage of the real volume mounted at `mount_point`.
    ///
    /// Refreshes the list first so a volume mounted since startup is seen.
    /// Windows drive letters compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::MetricsUnavailable` if no real volume is
    /// mounted there or the internal mutex is poisoned.
    pub fn find(&self, mount_point: &str) -> Result<DiskFacts, CollectionError> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|e| CollectionError::MetricsUnavailable(format!("disk lock poisoned: {e}")))?;
        disks.refresh_list();

        disks
            .iter()
            .filter(|d| {
                let fs = d.file_system().to_string_lossy();
                !PSEUDO_FILESYSTEMS.iter().any(|&pseudo| fs == pseudo) && d.total_space() > 0
            })
            .find(|d| same_mount_point(&d.mount_point().to_string_lossy(), mount_point))
            .map(|disk| DiskFacts {
                mount_point: disk.mount_point().to_string_lossy().to_string(),
                filesystem: disk.file_system().to_string_lossy().to_string(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .ok_or_else(|| {
                CollectionError::MetricsUnavailable(format!("no volume mounted at {mount_point}"))
            })
    }
}

impl Default for DiskCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn same_mount_point(actual: &str, wanted: &str) -> bool {
    let normalize = |p: &str| {
        let trimmed = p.trim_end_matches(['\\', '/']);
        if trimmed.is_empty() { "/".to_string() } else { trimmed.to_lowercase() }
    };
    normalize(actual) == normalize(wanted)
}
