#![allow(clippy::expect_used)]

use std::time::Duration;

use serde::Deserialize;

use suporte::application::services::report::{DiagnosticReport, ReportSettings};
use suporte::domain::entities::facts::{CpuFacts, DiskFacts, MemoryFacts, OsFacts};
use suporte::domain::entities::network::ConnectionKind;
use suporte::domain::entities::process::{ProcessInfo, ServiceCounts};
use suporte::domain::entities::record::DiagnosticRecord;
use suporte::domain::ports::collector::{
    CollectionError, NetworkSource, ProgramSource, SystemSource,
};
use suporte::domain::ports::command::CommandError;
use suporte::domain::value_objects::{ProblemCategory, ReportFormat};

// ---------------------------------------------------------------------------
// Fixture loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct OsFixture {
    name: String,
    version: String,
    kernel: String,
}

#[derive(Deserialize)]
struct CpuFixture {
    brand: String,
    logical_cores: usize,
    usage_percent: f32,
}

#[derive(Deserialize)]
struct MemoryFixture {
    total_bytes: u64,
    used_bytes: u64,
    available_bytes: u64,
}

#[derive(Deserialize)]
struct DiskFixture {
    mount_point: String,
    filesystem: String,
    total_bytes: u64,
    available_bytes: u64,
}

#[derive(Deserialize)]
struct Workstation {
    hostname: String,
    os: OsFixture,
    cpu: CpuFixture,
    memory: MemoryFixture,
    disk: DiskFixture,
    uptime_secs: u64,
    logged_in_users: usize,
    reachable_hosts: Vec<String>,
    ip_configuration: String,
    dns_servers: Vec<String>,
    interfaces: Vec<String>,
    processes: Vec<ProcessInfo>,
    services: ServiceCounts,
    /// Hosts whose probe cannot even be run
    #[serde(default)]
    broken_probes: Vec<String>,
}

fn load_fixture(name: &str) -> Workstation {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let json = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&json).expect("Failed to parse fixture")
}

// ---------------------------------------------------------------------------
// Fixture-backed sources
// ---------------------------------------------------------------------------

impl SystemSource for Workstation {
    fn hostname(&self) -> Option<String> {
        Some(self.hostname.clone())
    }
    fn os(&self) -> Result<OsFacts, CollectionError> {
        Ok(OsFacts {
            name: self.os.name.clone(),
            version: self.os.version.clone(),
            kernel: self.os.kernel.clone(),
        })
    }
    fn cpu(&self) -> Result<CpuFacts, CollectionError> {
        Ok(CpuFacts {
            brand: self.cpu.brand.clone(),
            logical_cores: self.cpu.logical_cores,
            usage_percent: self.cpu.usage_percent,
        })
    }
    fn memory(&self) -> Result<MemoryFacts, CollectionError> {
        Ok(MemoryFacts {
            total_bytes: self.memory.total_bytes,
            used_bytes: self.memory.used_bytes,
            available_bytes: self.memory.available_bytes,
        })
    }
    fn disk(&self, mount_point: &str) -> Result<DiskFacts, CollectionError> {
        if mount_point != self.disk.mount_point {
            return Err(CollectionError::MetricsUnavailable(format!(
                "no volume mounted at {mount_point}"
            )));
        }
        Ok(DiskFacts {
            mount_point: self.disk.mount_point.clone(),
            filesystem: self.disk.filesystem.clone(),
            total_bytes: self.disk.total_bytes,
            available_bytes: self.disk.available_bytes,
        })
    }
    fn uptime_secs(&self) -> Result<u64, CollectionError> {
        Ok(self.uptime_secs)
    }
    fn logged_in_users(&self) -> Result<usize, CollectionError> {
        Ok(self.logged_in_users)
    }
}

impl NetworkSource for Workstation {
    fn probe(&self, host: &str, _timeout: Duration) -> Result<bool, CollectionError> {
        if self.broken_probes.iter().any(|h| h == host) {
            return Err(CollectionError::Command(CommandError::NotFound(
                "ping".into(),
            )));
        }
        Ok(self.reachable_hosts.iter().any(|h| h == host))
    }
    fn ip_configuration(&self) -> Result<String, CollectionError> {
        Ok(self.ip_configuration.clone())
    }
    fn dns_servers(&self) -> Result<Vec<String>, CollectionError> {
        Ok(self.dns_servers.clone())
    }
    fn active_interfaces(&self) -> Result<Vec<String>, CollectionError> {
        Ok(self.interfaces.clone())
    }
}

impl ProgramSource for Workstation {
    fn processes(&self) -> Result<Vec<ProcessInfo>, CollectionError> {
        Ok(self.processes.clone())
    }
    fn services(&self) -> Result<ServiceCounts, CollectionError> {
        Ok(self.services)
    }
}

fn settings_for(dir: &std::path::Path) -> ReportSettings {
    ReportSettings {
        primary_volume: "C:\\".into(),
        output_dir: dir.to_path_buf(),
        ..ReportSettings::default()
    }
}

fn full_record(station: &Workstation, settings: &ReportSettings) -> DiagnosticRecord {
    let mut report = DiagnosticReport::new(station, station, station, settings);
    report.collect_system();
    report.collect_network();
    report.collect_programs();
    report.into_record()
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[test]
fn healthy_workstation_has_no_problems() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let record = full_record(&station, &settings_for(dir.path()));

    assert!(record.problems.is_empty(), "{:?}", record.problems);
    assert_eq!(record.metadata.hostname, "estacao-rh-04");

    let memory = record.system.memory.as_ref().expect("memory");
    assert!((memory.usage_percent - 50.0).abs() < f64::EPSILON);
    assert!((memory.total_gb - 8.0).abs() < f64::EPSILON);
    assert_eq!(record.system.uptime_secs, Some(183_600));
    assert_eq!(record.system.logged_in_users, Some(1));
}

#[test]
fn probes_follow_configured_order() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let record = full_record(&station, &settings_for(dir.path()));

    let probes: Vec<(&str, bool)> = record
        .network
        .connectivity
        .iter()
        .map(|p| (p.host.as_str(), p.reachable))
        .collect();
    assert_eq!(
        probes,
        vec![("8.8.8.8", true), ("google.com", true), ("github.com", false)]
    );
    assert!(record.network.has_internet());
}

#[test]
fn interfaces_are_classified() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let record = full_record(&station, &settings_for(dir.path()));

    let kinds: Vec<ConnectionKind> = record.network.connections.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConnectionKind::Wired, ConnectionKind::Wireless]);
    assert_eq!(record.network.active_interfaces.len(), 3);
    assert_eq!(record.network.dns_servers, vec!["10.0.0.10", "10.0.0.11"]);
}

#[test]
fn heavy_consumers_sorted_by_cpu() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let record = full_record(&station, &settings_for(dir.path()));

    let names: Vec<&str> = record
        .programs
        .top_consumers
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["chrome.exe", "Teams.exe", "OUTLOOK.EXE"]);
    assert_eq!(record.programs.process_count, 4);
    assert_eq!(record.programs.services.running, 121);
}

#[test]
fn unrunnable_probes_add_exactly_one_problem() {
    let mut station = load_fixture("workstation.json");
    station.broken_probes = vec!["google.com".into(), "github.com".into()];
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = settings_for(dir.path());

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_network();
    let record = report.record();

    let network: Vec<_> = record.problems_in(ProblemCategory::Network).collect();
    assert_eq!(network.len(), 1);
    assert!(network[0].details.contains("google.com"));
    assert!(network[0].details.contains("github.com"));
    assert_eq!(record.network.connectivity.len(), 3);
    assert!(record.network.connectivity[0].reachable);
    assert!(!record.network.connectivity[1].reachable);
}

#[test]
fn missing_primary_volume_keeps_other_system_facts() {
    let station = load_fixture("workstation.json");
    let settings = ReportSettings {
        primary_volume: "D:\\".into(),
        ..ReportSettings::default()
    };

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_system();
    let record = report.record();

    assert!(record.system.disk.is_none());
    assert!(record.system.memory.is_some());
    assert!(record.system.cpu.is_some());
    assert_eq!(record.problems_in(ProblemCategory::System).count(), 1);
}

#[test]
fn tight_thresholds_produce_health_findings() {
    let station = load_fixture("workstation.json");
    let mut settings = settings_for(std::path::Path::new("reports"));
    settings.thresholds.max_memory_percent = 40.0;
    settings.thresholds.max_cpu_percent = 10.0;
    settings.thresholds.min_free_disk_gb = 200.0;

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_system();

    let descriptions: Vec<&str> = report
        .record()
        .problems_in(ProblemCategory::System)
        .map(|p| p.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Uso de memória elevado",
            "Uso de CPU elevado",
            "Pouco espaço livre em disco"
        ]
    );
}

// ---------------------------------------------------------------------------
// Rendering and writing
// ---------------------------------------------------------------------------

#[test]
fn json_report_round_trips_the_record() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = settings_for(dir.path());

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_system();
    report.collect_network();
    report.collect_programs();
    report.add_action("Limpeza do cache DNS", "sucesso");

    let path = report.write(ReportFormat::Json, None).expect("written");
    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(name.starts_with("relatorio_diagnostico_"));
    assert!(name.ends_with(".json"));

    let json = std::fs::read_to_string(&path).expect("read report");
    let back: DiagnosticRecord = serde_json::from_str(&json).expect("parse report");
    assert_eq!(&back, report.record());
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse value");
    assert_eq!(value["system"]["memory"]["usage_percent"], 50.0);
    assert_eq!(value["actions"][0]["result"], "sucesso");
}

#[test]
fn text_report_lists_every_problem_category() {
    let station = load_fixture("workstation.json");
    let settings = settings_for(std::path::Path::new("reports"));

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_system();
    report.add_problem(ProblemCategory::Network, "Gateway sem resposta", "10.0.4.1");
    report.add_problem(ProblemCategory::Programs, "Antivírus desatualizado", "");

    let text = report.render(ReportFormat::Text).expect("render");
    assert!(text.contains("INFORMAÇÕES DO SISTEMA"));
    assert!(text.contains("PROBLEMAS DETECTADOS"));
    assert!(text.contains("Categoria: Rede"));
    assert!(text.contains("Categoria: Programas"));
    assert!(text.contains("Detalhes: 10.0.4.1"));
    assert!(text.contains("Uptime: 2 dias, 3 horas"));
}

#[test]
fn html_report_is_written_to_explicit_path() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = settings_for(dir.path());
    let path = dir.path().join("chamados").join("diagnostico.html");

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    report.collect_network();
    report.add_problem(ProblemCategory::Network, "Proxy <corp> recusou", "");

    let written = report.write(ReportFormat::Html, Some(&path)).expect("written");
    assert_eq!(written, path);

    let html = std::fs::read_to_string(&path).expect("read report");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Proxy &lt;corp&gt; recusou"));
    assert!(!html.contains("<corp>"));
}

#[test]
fn failed_write_is_recorded_not_raised() {
    let station = load_fixture("workstation.json");
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("ocupado");
    std::fs::write(&blocker, "arquivo comum").expect("write blocker");
    let settings = ReportSettings {
        output_dir: blocker.join("relatorios"),
        ..settings_for(dir.path())
    };

    let mut report = DiagnosticReport::new(&station, &station, &station, &settings);
    assert!(report.write(ReportFormat::Text, None).is_none());

    let problems: Vec<_> = report.record().problems_in(ProblemCategory::Report).collect();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].description, "Falha ao gravar relatório text");
}
