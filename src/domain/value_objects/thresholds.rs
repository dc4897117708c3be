use serde::{Deserialize, Serialize};

/// Thresholds used while collecting programs and checking system health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// A process above this CPU percentage counts as a heavy consumer
    pub process_cpu_percent: f32,
    /// A process above this share of total RAM counts as a heavy consumer
    pub process_memory_percent: f64,
    /// Maximum number of heavy consumers kept in the record
    pub top_processes: usize,
    /// Global CPU usage above this is reported as a problem
    pub max_cpu_percent: f64,
    /// RAM usage above this is reported as a problem
    pub max_memory_percent: f64,
    /// Free space on the primary volume below this (GiB) is reported as a problem
    pub min_free_disk_gb: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            process_cpu_percent: 10.0,
            process_memory_percent: 5.0,
            top_processes: 10,
            max_cpu_percent: 80.0,
            max_memory_percent: 80.0,
            min_free_disk_gb: 5.0,
        }
    }
}
