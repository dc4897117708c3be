use serde::{Deserialize, Serialize};

/// Resource usage of a running process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_mb: u64,
    /// Share of total physical memory
    pub memory_percent: f64,
}

/// Counts reported by the service manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCounts {
    pub total: usize,
    pub running: usize,
}

/// Processes and services snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramsSection {
    pub process_count: usize,
    /// Heaviest processes by CPU, bounded by the configured limit
    pub top_consumers: Vec<ProcessInfo>,
    pub services: ServiceCounts,
}

/// Processes above either threshold, heaviest CPU first, at most `limit` entries.
#[must_use]
pub fn heavy_consumers(
    processes: &[ProcessInfo],
    cpu_threshold: f32,
    memory_threshold: f64,
    limit: usize,
) -> Vec<ProcessInfo> {
    let mut heavy: Vec<ProcessInfo> = processes
        .iter()
        .filter(|p| p.cpu_percent > cpu_threshold || p.memory_percent > memory_threshold)
        .cloned()
        .collect();
    heavy.sort_by(|a, b| {
        b.cpu_percent
            .total_cmp(&a.cpu_percent)
            .then_with(|| b.memory_percent.total_cmp(&a.memory_percent))
            .then_with(|| a.pid.cmp(&b.pid))
    });
    heavy.truncate(limit);
    heavy
}
