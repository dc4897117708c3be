use std::io;
use std::path::Path;
use std::time::Duration;

use super::report::DiagnosticReport;
use crate::domain::ports::command::CommandRunner;
use crate::domain::value_objects::Platform;
use crate::infrastructure::os::platform_commands::{self, MaintenanceStep};

/// Result of a maintenance sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceOutcome {
    pub steps: usize,
    pub succeeded: usize,
}

impl MaintenanceOutcome {
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.steps == self.succeeded
    }

    /// Nothing to run on this platform.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps == 0
    }

    const fn record(&mut self, ok: bool) {
        self.steps += 1;
        if ok {
            self.succeeded += 1;
        }
    }
}

/// Flushes the resolver cache (and on Windows re-registers and renews the
/// lease), recording every step as an action in `report`.
///
/// A failing step does not stop the sequence.
pub fn flush_dns(
    runner: &dyn CommandRunner,
    platform: Platform,
    timeout: Duration,
    report: &mut DiagnosticReport<'_>,
) -> MaintenanceOutcome {
    run_steps(runner, &platform_commands::flush_dns(platform), timeout, report)
}

/// Forces a group policy refresh. Returns an empty outcome off Windows.
pub fn update_group_policy(
    runner: &dyn CommandRunner,
    platform: Platform,
    timeout: Duration,
    report: &mut DiagnosticReport<'_>,
) -> MaintenanceOutcome {
    run_steps(
        runner,
        &platform_commands::group_policy_update(platform),
        timeout,
        report,
    )
}

/// Stops the print spooler, discards queued jobs from `queue_dir`, starts
/// it again and checks that it is running.
///
/// Stopping may fail when the service is already down; the sequence
/// carries on regardless.
pub fn restart_print_spooler(
    runner: &dyn CommandRunner,
    platform: Platform,
    timeout: Duration,
    queue_dir: Option<&Path>,
    report: &mut DiagnosticReport<'_>,
) -> MaintenanceOutcome {
    let commands = platform_commands::print_spooler(platform);
    let mut outcome = MaintenanceOutcome {
        steps: 0,
        succeeded: 0,
    };

    outcome.record(run_step(runner, &commands.stop, timeout, report));

    if let Some(dir) = queue_dir {
        match clear_queue(dir) {
            Ok(removed) => {
                tracing::info!(dir = %dir.display(), removed, "fila de impressão limpa");
                report.add_action(
                    "Limpeza da fila de impressão",
                    format!("sucesso ({removed} arquivo(s) removido(s))"),
                );
                outcome.record(true);
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "falha ao limpar a fila: {e}");
                report.add_action("Limpeza da fila de impressão", format!("falhou: {e}"));
                outcome.record(false);
            }
        }
    }

    outcome.record(run_step(runner, &commands.start, timeout, report));

    let status = commands.status.timeout(timeout);
    let running = match runner.run(&status) {
        Ok(output) => {
            let running = platform_commands::parse_spooler_running(platform, &output.stdout);
            let result = if running {
                "em execução"
            } else {
                "não está em execução"
            };
            report.add_action("Verificação do spooler de impressão", result);
            running
        }
        Err(e) => {
            tracing::warn!(command = %status, "verificação do spooler: {e}");
            report.add_action("Verificação do spooler de impressão", format!("falhou: {e}"));
            false
        }
    };
    outcome.record(running);

    outcome
}

/// Whether the process runs with administrator (root) rights.
///
/// A check that cannot run counts as "no".
#[must_use]
pub fn has_admin_rights(runner: &dyn CommandRunner, platform: Platform, timeout: Duration) -> bool {
    let spec = platform_commands::privilege_check(platform).timeout(timeout);
    match runner.run(&spec) {
        Ok(output) => platform_commands::parse_privilege_check(platform, &output),
        Err(e) => {
            tracing::debug!(command = %spec, "verificação de privilégios: {e}");
            false
        }
    }
}

fn run_steps(
    runner: &dyn CommandRunner,
    steps: &[MaintenanceStep],
    timeout: Duration,
    report: &mut DiagnosticReport<'_>,
) -> MaintenanceOutcome {
    let mut outcome = MaintenanceOutcome {
        steps: 0,
        succeeded: 0,
    };
    for step in steps {
        outcome.record(run_step(runner, step, timeout, report));
    }
    outcome
}

fn run_step(
    runner: &dyn CommandRunner,
    step: &MaintenanceStep,
    timeout: Duration,
    report: &mut DiagnosticReport<'_>,
) -> bool {
    let spec = step.command.clone().timeout(timeout);
    let result = runner
        .run(&spec)
        .and_then(|output| output.require_success(&spec));
    match result {
        Ok(_) => {
            tracing::info!(command = %spec, "{}: sucesso", step.description);
            report.add_action(step.description, "sucesso");
            true
        }
        Err(e) => {
            tracing::warn!(command = %spec, "{}: {e}", step.description);
            report.add_action(step.description, format!("falhou: {e}"));
            false
        }
    }
}

/// Removes the regular files in `dir`, returning how many went away.
/// Files still locked by the spooler are skipped.
fn clear_queue(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::debug!(file = %path.display(), "não removido: {e}"),
        }
    }
    Ok(removed)
}
