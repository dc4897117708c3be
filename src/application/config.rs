use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::services::report::{ReportSettings, DEFAULT_PROBE_HOSTS};
use crate::domain::value_objects::{OutputEncoding, Platform, ProbeMethod, ReportFormat, ThresholdSet};

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connectivity probes and external command behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_probe_hosts")]
    pub probe_hosts: Vec<String>,
    #[serde(default)]
    pub probe_method: ProbeMethod,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Port used when `probe_method = "tcp"`
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// `gpupdate /force` may wait on the domain controller for minutes
    #[serde(default = "default_gpupdate_timeout")]
    pub gpupdate_timeout_secs: u64,
    /// Encoding of the native tools' output (`utf-8`, `latin1`, `cp850`
    /// or `cp1252`). Defaults to the console codepage of the platform.
    #[serde(default)]
    pub encoding: OutputEncoding,
}

/// Limits for heavy processes and system health findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_process_cpu")]
    pub process_cpu_percent: f32,
    #[serde(default = "default_process_memory")]
    pub process_memory_percent: f64,
    #[serde(default = "default_top_processes")]
    pub top_processes: usize,
    #[serde(default = "default_max_cpu")]
    pub max_cpu_percent: f64,
    #[serde(default = "default_max_memory")]
    pub max_memory_percent: f64,
    #[serde(default = "default_min_free_disk")]
    pub min_free_disk_gb: f64,
}

/// Report output (directory tilde-expanded at point of use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub default_format: ReportFormat,
    #[serde(default = "default_primary_volume")]
    pub primary_volume: String,
}

/// Log file written next to the stderr output. An empty `file` disables it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
}

// --- Defaults ---

fn default_probe_hosts() -> Vec<String> {
    DEFAULT_PROBE_HOSTS.iter().map(ToString::to_string).collect()
}

const fn default_probe_timeout() -> u64 {
    5
}

const fn default_tcp_port() -> u16 {
    443
}

const fn default_command_timeout() -> u64 {
    30
}

const fn default_gpupdate_timeout() -> u64 {
    300
}

fn default_log_file() -> String {
    "suporte_tecnico.log".into()
}

const fn default_process_cpu() -> f32 {
    10.0
}

const fn default_process_memory() -> f64 {
    5.0
}

const fn default_top_processes() -> usize {
    10
}

const fn default_max_cpu() -> f64 {
    80.0
}

const fn default_max_memory() -> f64 {
    80.0
}

const fn default_min_free_disk() -> f64 {
    5.0
}

fn default_output_dir() -> String {
    "reports".into()
}

fn default_primary_volume() -> String {
    Platform::current().primary_volume().into()
}

// --- Default impls ---

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_hosts: default_probe_hosts(),
            probe_method: ProbeMethod::default(),
            probe_timeout_secs: default_probe_timeout(),
            tcp_port: default_tcp_port(),
            command_timeout_secs: default_command_timeout(),
            gpupdate_timeout_secs: default_gpupdate_timeout(),
            encoding: OutputEncoding::default(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            process_cpu_percent: default_process_cpu(),
            process_memory_percent: default_process_memory(),
            top_processes: default_top_processes(),
            max_cpu_percent: default_max_cpu(),
            max_memory_percent: default_max_memory(),
            min_free_disk_gb: default_min_free_disk(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: ReportFormat::default(),
            primary_volume: default_primary_volume(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("suporte").join("config.toml"))
    }

    /// Per-probe timeout, at least one second.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.network.probe_timeout_secs.max(1))
    }

    /// Per-command timeout, at least one second.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.network.command_timeout_secs.max(1))
    }

    /// Timeout for the group policy refresh, at least one second.
    #[must_use]
    pub fn gpupdate_timeout(&self) -> Duration {
        Duration::from_secs(self.network.gpupdate_timeout_secs.max(1))
    }

    /// Log file path with `~` expanded, `None` when file logging is off.
    /// Relative paths resolve against the working directory.
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        let file = self.logging.file.trim();
        if file.is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(file).as_ref()))
    }

    /// Report directory with `~` expanded.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.report.output_dir).as_ref())
    }

    /// Settings handed to the diagnostic aggregator.
    #[must_use]
    pub fn report_settings(&self) -> ReportSettings {
        let probe_hosts: Vec<String> = self
            .network
            .probe_hosts
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        ReportSettings {
            probe_hosts,
            probe_timeout: self.probe_timeout(),
            thresholds: ThresholdSet::from(&self.thresholds),
            primary_volume: self.report.primary_volume.clone(),
            output_dir: self.output_dir(),
        }
    }
}

impl From<&ThresholdConfig> for ThresholdSet {
    fn from(config: &ThresholdConfig) -> Self {
        // A single process may exceed 100% CPU on multi-core machines
        Self {
            process_cpu_percent: config.process_cpu_percent.max(0.0),
            process_memory_percent: config.process_memory_percent.clamp(0.0, 100.0),
            top_processes: config.top_processes.clamp(1, 100),
            max_cpu_percent: config.max_cpu_percent.clamp(0.0, 100.0),
            max_memory_percent: config.max_memory_percent.clamp(0.0, 100.0),
            min_free_disk_gb: config.min_free_disk_gb.max(0.0),
        }
    }
}
