//! Raw facts returned by the source ports, before the aggregator turns
//! them into record sections.

/// Operating system identification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsFacts {
    pub name: String,
    pub version: String,
    pub kernel: String,
}

/// Physical memory, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFacts {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

/// One mounted volume, in bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskFacts {
    pub mount_point: String,
    pub filesystem: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuFacts {
    pub brand: String,
    pub logical_cores: usize,
    pub usage_percent: f32,
}
