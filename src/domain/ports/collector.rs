use std::time::Duration;

use thiserror::Error;

use super::command::CommandError;
use crate::domain::entities::facts::{CpuFacts, DiskFacts, MemoryFacts, OsFacts};
use crate::domain::entities::process::{ProcessInfo, ServiceCounts};

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("failed to collect system metrics: {0}")]
    MetricsUnavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("timeout while collecting data")]
    Timeout,
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Operating system, hardware and session facts.
pub trait SystemSource: Send + Sync {
    /// Host name of the machine, if the OS reports one.
    fn hostname(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the OS identification is unavailable.
    fn os(&self) -> Result<OsFacts, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if CPU statistics are unavailable.
    fn cpu(&self) -> Result<CpuFacts, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if memory statistics are unavailable.
    fn memory(&self) -> Result<MemoryFacts, CollectionError>;

    /// Usage of the volume mounted at `mount_point`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if no such volume is mounted.
    fn disk(&self, mount_point: &str) -> Result<DiskFacts, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the boot time cannot be determined.
    fn uptime_secs(&self) -> Result<u64, CollectionError>;

    /// Number of interactive sessions currently open.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the session query fails.
    fn logged_in_users(&self) -> Result<usize, CollectionError>;
}

/// Reachability and interface facts.
pub trait NetworkSource: Send + Sync {
    /// Checks whether `host` answers within `timeout`.
    ///
    /// `Ok(false)` means the host did not answer; an error means the
    /// probe itself could not be carried out.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the probe could not be run.
    fn probe(&self, host: &str, timeout: Duration) -> Result<bool, CollectionError>;

    /// Raw IP configuration text as printed by the OS tool.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the configuration tool fails.
    fn ip_configuration(&self) -> Result<String, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the resolver configuration is unreadable.
    fn dns_servers(&self) -> Result<Vec<String>, CollectionError>;

    /// Names of interfaces whose link is up.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if interfaces cannot be listed.
    fn active_interfaces(&self) -> Result<Vec<String>, CollectionError>;
}

/// Process and service facts.
pub trait ProgramSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `CollectionError` if the process table cannot be read.
    fn processes(&self) -> Result<Vec<ProcessInfo>, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the service manager query fails.
    fn services(&self) -> Result<ServiceCounts, CollectionError>;
}
