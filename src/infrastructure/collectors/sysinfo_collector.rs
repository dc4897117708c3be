use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use sysinfo::System;

use super::disk_collector::DiskCollector;
use crate::domain::entities::facts::{CpuFacts, DiskFacts, MemoryFacts, OsFacts};
use crate::domain::entities::process::{ProcessInfo, ServiceCounts};
use crate::domain::ports::collector::{CollectionError, ProgramSource, SystemSource};
use crate::domain::ports::command::CommandRunner;
use crate::domain::value_objects::Platform;
use crate::infrastructure::os::platform_commands;

const BYTES_PER_MB: u64 = 1_048_576;

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// Returns the arithmetic mean of `per_core` usages, or `0.0` when the slice is empty.
#[allow(clippy::cast_precision_loss)]
fn avg_cpu_usage(per_core: &[f32]) -> f32 {
    let count = per_core.len();
    if count > 0 {
        per_core.iter().sum::<f32>() / count as f32
    } else {
        0.0
    }
}

struct SysinfoState {
    sys: System,
    last_refresh: Instant,
}

/// System and program facts from the `sysinfo` crate.
///
/// Sessions and services have no portable API, so they go through the
/// native tools via the shared command runner.
pub struct SysinfoSource {
    state: Mutex<SysinfoState>,
    disk_collector: DiskCollector,
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
}

impl SysinfoSource {
    /// Creates a source with pre-initialized system data.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            state: Mutex::new(SysinfoState {
                sys,
                last_refresh: Instant::now(),
            }),
            disk_collector: DiskCollector::new(),
            runner,
            platform,
        }
    }

    /// Locks and refreshes the system data.
    ///
    /// CPU usage is a delta between two refreshes, so consecutive refreshes
    /// are kept at least `MINIMUM_CPU_UPDATE_INTERVAL` apart.
    fn refreshed(&self) -> Result<MutexGuard<'_, SysinfoState>, CollectionError> {
        let mut state = self.state.lock().map_err(|e| {
            CollectionError::MetricsUnavailable(format!("system lock poisoned: {e}"))
        })?;
        let elapsed = state.last_refresh.elapsed();
        if elapsed < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - elapsed);
        }
        state.sys.refresh_all();
        state.last_refresh = Instant::now();
        Ok(state)
    }
}

impl SystemSource for SysinfoSource {
    fn hostname(&self) -> Option<String> {
        System::host_name()
    }

    fn os(&self) -> Result<OsFacts, CollectionError> {
        let name = System::name().ok_or_else(|| {
            CollectionError::MetricsUnavailable("operating system name".to_string())
        })?;
        Ok(OsFacts {
            name,
            version: System::os_version().unwrap_or_default(),
            kernel: System::kernel_version().unwrap_or_default(),
        })
    }

    fn cpu(&self) -> Result<CpuFacts, CollectionError> {
        let state = self.refreshed()?;
        let cpus = state.sys.cpus();
        if cpus.is_empty() {
            return Err(CollectionError::MetricsUnavailable(
                "no CPU reported".to_string(),
            ));
        }
        let per_core_usage: Vec<f32> = cpus.iter().map(sysinfo::Cpu::cpu_usage).collect();
        Ok(CpuFacts {
            brand: cpus[0].brand().trim().to_string(),
            logical_cores: cpus.len(),
            usage_percent: avg_cpu_usage(&per_core_usage),
        })
    }

    fn memory(&self) -> Result<MemoryFacts, CollectionError> {
        let state = self.refreshed()?;
        let total_bytes = state.sys.total_memory();
        if total_bytes == 0 {
            return Err(CollectionError::MetricsUnavailable(
                "total memory reported as zero".to_string(),
            ));
        }
        Ok(MemoryFacts {
            total_bytes,
            used_bytes: state.sys.used_memory(),
            available_bytes: state.sys.available_memory(),
        })
    }

    fn disk(&self, mount_point: &str) -> Result<DiskFacts, CollectionError> {
        self.disk_collector.find(mount_point)
    }

    fn uptime_secs(&self) -> Result<u64, CollectionError> {
        match System::uptime() {
            0 => Err(CollectionError::MetricsUnavailable(
                "uptime not reported".to_string(),
            )),
            secs => Ok(secs),
        }
    }

    fn logged_in_users(&self) -> Result<usize, CollectionError> {
        let spec = platform_commands::logged_in_users(self.platform);
        let output = self.runner.run(&spec)?;
        // `query user` exits with 1 when nobody is logged in
        if !output.success() && output.stdout.trim().is_empty() {
            return Ok(0);
        }
        Ok(platform_commands::parse_session_count(
            self.platform,
            &output.stdout,
        ))
    }
}

impl ProgramSource for SysinfoSource {
    fn processes(&self) -> Result<Vec<ProcessInfo>, CollectionError> {
        let state = self.refreshed()?;
        let total_memory = state.sys.total_memory();
        Ok(state
            .sys
            .processes()
            .values()
            .map(|proc_info| ProcessInfo {
                pid: proc_info.pid().as_u32(),
                name: proc_info.name().to_string_lossy().to_string(),
                cpu_percent: proc_info.cpu_usage(),
                memory_mb: proc_info.memory() / BYTES_PER_MB,
                memory_percent: safe_percent(proc_info.memory(), total_memory),
            })
            .collect())
    }

    fn services(&self) -> Result<ServiceCounts, CollectionError> {
        let spec = platform_commands::services(self.platform);
        let output = self.runner.run(&spec)?.require_success(&spec)?;
        Ok(platform_commands::parse_services(
            self.platform,
            &output.stdout,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::ports::command::{CommandError, CommandOutput, CommandSpec};

    /// Replies with canned output keyed by program name.
    struct CannedRunner {
        replies: Vec<(&'static str, Result<CommandOutput, ()>)>,
    }

    impl CommandRunner for CannedRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            self.replies
                .iter()
                .find(|(program, _)| *program == spec.program)
                .map_or_else(
                    || Err(CommandError::NotFound(spec.program.clone())),
                    |(_, reply)| {
                        reply.clone().map_err(|()| CommandError::Timeout {
                            program: spec.program.clone(),
                            secs: 30,
                        })
                    },
                )
        }
    }

    fn output(code: i32, stdout: &str) -> Result<CommandOutput, ()> {
        Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    fn source(replies: Vec<(&'static str, Result<CommandOutput, ()>)>) -> SysinfoSource {
        SysinfoSource::new(Arc::new(CannedRunner { replies }), Platform::Linux)
    }

    #[test]
    fn memory_facts_are_consistent() {
        let memory = source(vec![]).memory().expect("memory should be readable");
        assert!(memory.total_bytes > 0, "total RAM should be > 0");
        assert!(memory.used_bytes <= memory.total_bytes);
    }

    #[test]
    fn cpu_reports_at_least_one_core() {
        let cpu = source(vec![]).cpu().expect("cpu should be readable");
        assert!(cpu.logical_cores > 0, "should have at least 1 core");
        assert!(cpu.usage_percent >= 0.0);
    }

    #[test]
    fn processes_include_self() {
        let processes = source(vec![]).processes().expect("process table");
        let my_pid = std::process::id();
        let me = processes.iter().find(|p| p.pid == my_pid);
        assert!(me.is_some(), "should find own process (pid {my_pid})");

        let me = me.expect("verified above");
        assert!(!me.name.is_empty(), "process name should not be empty");
        assert!((0.0..=100.0).contains(&me.memory_percent));
    }

    #[test]
    fn os_has_a_name() {
        let os = source(vec![]).os().expect("os name");
        assert!(!os.name.is_empty());
    }

    #[test]
    fn logged_in_users_counts_who_lines() {
        let source = source(vec![(
            "who",
            output(0, "ana  tty2  2026-10-16 08:00\nbeto pts/1 2026-10-16 09:00\n"),
        )]);
        assert_eq!(source.logged_in_users().expect("who output"), 2);
    }

    #[test]
    fn logged_in_users_propagates_runner_errors() {
        let err = source(vec![])
            .logged_in_users()
            .expect_err("who is missing");
        assert!(matches!(
            err,
            CollectionError::Command(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn services_parses_systemctl() {
        let source = source(vec![(
            "systemctl",
            output(
                0,
                "cron.service loaded active running Cron\nufw.service loaded active exited UFW\n",
            ),
        )]);
        let counts = source.services().expect("services");
        assert_eq!(counts, ServiceCounts { total: 2, running: 1 });
    }

    #[test]
    fn services_fails_on_non_zero_exit() {
        let source = source(vec![("systemctl", output(1, ""))]);
        assert!(source.services().is_err());
    }

    #[test]
    fn services_timeout_is_an_error() {
        let source = source(vec![("systemctl", Err(()))]);
        let err = source.services().expect_err("timed out");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn safe_percent_returns_zero_for_zero_denominator() {
        assert!((safe_percent(100, 0) - 0.0).abs() < f64::EPSILON);
        assert!((safe_percent(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn safe_percent_computes_correctly() {
        assert!((safe_percent(50, 100) - 50.0).abs() < f64::EPSILON);
        assert!((safe_percent(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn avg_cpu_usage_returns_zero_for_empty_slice() {
        assert!((avg_cpu_usage(&[]) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn avg_cpu_usage_computes_mean() {
        let usage = avg_cpu_usage(&[10.0, 20.0, 30.0]);
        assert!((usage - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn memory_returns_error_on_poisoned_mutex() {
        let source = source(vec![]);

        // Poison the mutex by panicking while holding the lock guard.
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = source.state.lock().expect("not yet poisoned");
            panic!("intentional panic to poison the mutex");
        }));

        assert!(source.memory().is_err(), "memory should fail on poisoned mutex");
    }
}
