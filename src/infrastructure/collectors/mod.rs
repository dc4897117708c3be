pub mod disk_collector;
pub mod network_source;
pub mod sysinfo_collector;
