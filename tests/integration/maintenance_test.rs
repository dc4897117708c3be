#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::time::Duration;

use suporte::application::services::maintenance::{
    flush_dns, restart_print_spooler, update_group_policy,
};
use suporte::application::services::report::{DiagnosticReport, ReportSettings};
use suporte::domain::entities::facts::{CpuFacts, DiskFacts, MemoryFacts, OsFacts};
use suporte::domain::entities::process::{ProcessInfo, ServiceCounts};
use suporte::domain::ports::collector::{
    CollectionError, NetworkSource, ProgramSource, SystemSource,
};
use suporte::domain::ports::command::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use suporte::domain::value_objects::{Platform, ProblemCategory, ReportFormat};

// ---------------------------------------------------------------------------
// Sources: an office PC whose network comes back after the flush
// ---------------------------------------------------------------------------

struct OfficePc {
    online: Mutex<bool>,
}

impl SystemSource for OfficePc {
    fn hostname(&self) -> Option<String> {
        Some("recepcao-01".into())
    }
    fn os(&self) -> Result<OsFacts, CollectionError> {
        Ok(OsFacts::default())
    }
    fn cpu(&self) -> Result<CpuFacts, CollectionError> {
        Ok(CpuFacts::default())
    }
    fn memory(&self) -> Result<MemoryFacts, CollectionError> {
        Err(CollectionError::PermissionDenied("memory".into()))
    }
    fn disk(&self, _mount_point: &str) -> Result<DiskFacts, CollectionError> {
        Err(CollectionError::PermissionDenied("disk".into()))
    }
    fn uptime_secs(&self) -> Result<u64, CollectionError> {
        Ok(0)
    }
    fn logged_in_users(&self) -> Result<usize, CollectionError> {
        Ok(1)
    }
}

impl NetworkSource for OfficePc {
    fn probe(&self, _host: &str, _timeout: Duration) -> Result<bool, CollectionError> {
        Ok(*self.online.lock().expect("lock"))
    }
    fn ip_configuration(&self) -> Result<String, CollectionError> {
        Ok("Endereço IPv4: 192.168.1.30".into())
    }
    fn dns_servers(&self) -> Result<Vec<String>, CollectionError> {
        Ok(vec!["192.168.1.1".into()])
    }
    fn active_interfaces(&self) -> Result<Vec<String>, CollectionError> {
        Ok(vec!["Ethernet".into()])
    }
}

impl ProgramSource for OfficePc {
    fn processes(&self) -> Result<Vec<ProcessInfo>, CollectionError> {
        Ok(Vec::new())
    }
    fn services(&self) -> Result<ServiceCounts, CollectionError> {
        Ok(ServiceCounts::default())
    }
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// Succeeds every command and brings the PC back online once the cache is flushed.
struct FixingRunner<'a> {
    pc: &'a OfficePc,
    seen: Mutex<Vec<String>>,
}

impl CommandRunner for FixingRunner<'_> {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.seen.lock().expect("lock").push(spec.to_string());
        if spec.args.iter().any(|a| a == "/flushdns") {
            *self.pc.online.lock().expect("lock") = true;
        }
        Ok(CommandOutput {
            code: Some(0),
            stdout: "Liberado com êxito o Cache do DNS Resolver.".into(),
            stderr: String::new(),
        })
    }
}

/// Every maintenance program is missing.
struct NothingInstalled;

impl CommandRunner for NothingInstalled {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        Err(CommandError::NotFound(spec.program.clone()))
    }
}

#[test]
fn flush_then_report_shows_actions_and_recovered_network() {
    let pc = OfficePc {
        online: Mutex::new(false),
    };
    let runner = FixingRunner {
        pc: &pc,
        seen: Mutex::new(Vec::new()),
    };
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = ReportSettings {
        output_dir: dir.path().to_path_buf(),
        ..ReportSettings::default()
    };

    let mut report = DiagnosticReport::new(&pc, &pc, &pc, &settings);
    report.collect_network();
    assert!(!report.record().network.has_internet());

    let outcome = flush_dns(&runner, Platform::Windows, Duration::from_secs(15), &mut report);
    assert!(outcome.all_succeeded());
    assert_eq!(
        *runner.seen.lock().expect("lock"),
        vec![
            "ipconfig /flushdns",
            "ipconfig /registerdns",
            "ipconfig /release",
            "ipconfig /renew"
        ]
    );

    report.collect_network();
    assert!(report.record().network.has_internet());

    let path = report.write(ReportFormat::Json, None).expect("written");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).expect("read")).expect("parse");
    let actions = value["actions"].as_array().expect("actions array");
    assert_eq!(actions.len(), 4);
    assert_eq!(actions[0]["action"], "Limpeza do cache DNS");
    assert_eq!(actions[3]["action"], "Renovação do endereço IP");
    assert_eq!(value["network"]["connectivity"][0]["reachable"], true);
}

#[test]
fn missing_tools_become_failed_actions_in_text_report() {
    let pc = OfficePc {
        online: Mutex::new(true),
    };
    let settings = ReportSettings::default();
    let mut report = DiagnosticReport::new(&pc, &pc, &pc, &settings);
    report.collect_system();

    let outcome = flush_dns(
        &NothingInstalled,
        Platform::Linux,
        Duration::from_secs(5),
        &mut report,
    );
    assert_eq!(outcome.succeeded, 0);

    let text = report.render(ReportFormat::Text).expect("render");
    assert!(text.contains("AÇÕES REALIZADAS"));
    assert!(text.contains("• Limpeza do cache DNS"));
    assert!(text.contains("Resultado: falhou: command not found: resolvectl"));
    // memory and disk were denied; maintenance adds no problems of its own
    assert_eq!(report.record().problems.len(), 2);
    assert_eq!(
        report.record().problems_in(ProblemCategory::System).count(),
        2
    );
}

#[test]
fn group_policy_and_spooler_actions_land_in_html_report() {
    let pc = OfficePc {
        online: Mutex::new(true),
    };
    let runner = FixingRunner {
        pc: &pc,
        seen: Mutex::new(Vec::new()),
    };
    let queue = tempfile::tempdir().expect("tempdir");
    std::fs::write(queue.path().join("00007.SPL"), b"stuck job").expect("write");
    let settings = ReportSettings::default();
    let mut report = DiagnosticReport::new(&pc, &pc, &pc, &settings);

    let policy = update_group_policy(&runner, Platform::Windows, Duration::from_secs(300), &mut report);
    let spooler = restart_print_spooler(
        &runner,
        Platform::Windows,
        Duration::from_secs(30),
        Some(queue.path()),
        &mut report,
    );

    assert!(policy.all_succeeded());
    // sc query prints no RUNNING state, so the final check fails
    assert_eq!(spooler.steps, 4);
    assert_eq!(spooler.succeeded, 3);
    assert_eq!(
        *runner.seen.lock().expect("lock"),
        vec![
            "gpupdate /force",
            "net stop spooler",
            "net start spooler",
            "sc query spooler"
        ]
    );
    assert!(!queue.path().join("00007.SPL").exists());

    let html = report.render(ReportFormat::Html).expect("render");
    assert!(html.contains("Atualização de políticas de grupo"));
    assert!(html.contains("Limpeza da fila de impressão"));
    assert!(html.contains("não está em execução"));
}

#[test]
fn spooler_without_service_manager_fails_every_step() {
    let pc = OfficePc {
        online: Mutex::new(true),
    };
    let settings = ReportSettings::default();
    let mut report = DiagnosticReport::new(&pc, &pc, &pc, &settings);

    let outcome = restart_print_spooler(
        &NothingInstalled,
        Platform::Linux,
        Duration::from_secs(5),
        None,
        &mut report,
    );

    assert_eq!(outcome.steps, 3);
    assert_eq!(outcome.succeeded, 0);
    let text = report.render(ReportFormat::Text).expect("render");
    assert!(text.contains("Resultado: falhou: command not found: systemctl"));
    assert!(report.record().problems.is_empty());
}

#[cfg(unix)]
mod with_real_processes {
    use super::*;
    use suporte::infrastructure::os::command_runner::SystemCommandRunner;

    /// Swaps each maintenance command for `true`, or `false` when its
    /// arguments contain `fail_on`, and runs it for real.
    struct Substitute {
        fail_on: &'static str,
        inner: SystemCommandRunner,
    }

    impl CommandRunner for Substitute {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            let program = if spec.args.iter().any(|a| a == self.fail_on) {
                "false"
            } else {
                "true"
            };
            self.inner
                .run(&CommandSpec::new(program).timeout(spec.timeout))
        }
    }

    #[test]
    fn exit_codes_drive_action_results() {
        let pc = OfficePc {
            online: Mutex::new(true),
        };
        let runner = Substitute {
            fail_on: "/registerdns",
            inner: SystemCommandRunner::default(),
        };
        let settings = ReportSettings::default();
        let mut report = DiagnosticReport::new(&pc, &pc, &pc, &settings);

        let outcome = flush_dns(&runner, Platform::Windows, Duration::from_secs(5), &mut report);

        assert_eq!(outcome.steps, 4);
        assert_eq!(outcome.succeeded, 3);
        let results: Vec<&str> = report
            .record()
            .actions
            .iter()
            .map(|a| a.result.as_str())
            .collect();
        assert_eq!(results[0], "sucesso");
        assert!(results[1].starts_with("falhou: ipconfig exited with code 1"));
        assert_eq!(results[2], "sucesso");
        assert_eq!(results[3], "sucesso");
    }
}
