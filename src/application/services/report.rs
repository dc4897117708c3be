use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;

use crate::domain::entities::facts::{DiskFacts, MemoryFacts};
use crate::domain::entities::network::{classify_connections, NetworkSection, ProbeResult};
use crate::domain::entities::process::{heavy_consumers, ProgramsSection};
use crate::domain::entities::record::{DiagnosticRecord, Metadata};
use crate::domain::entities::system::{CpuInfo, DiskInfo, MemoryInfo, OsInfo, SystemSection};
use crate::domain::ports::collector::{CollectionError, NetworkSource, ProgramSource, SystemSource};
use crate::domain::ports::renderer::RenderError;
use crate::domain::value_objects::{Platform, ProblemCategory, ReportFormat, ThresholdSet};
use crate::infrastructure::renderers::renderer_for;

const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Characters of IP configuration text kept in the record.
pub const IP_CONFIG_MAX_CHARS: usize = 500;

pub const DEFAULT_PROBE_HOSTS: &[&str] = &["8.8.8.8", "google.com", "github.com"];

/// Everything the aggregator needs besides its sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Reachability targets, probed in this order
    pub probe_hosts: Vec<String>,
    pub probe_timeout: Duration,
    pub thresholds: ThresholdSet,
    /// Volume whose usage goes into the system section
    pub primary_volume: String,
    /// Directory for timestamp-named report files
    pub output_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            probe_hosts: DEFAULT_PROBE_HOSTS.iter().map(ToString::to_string).collect(),
            probe_timeout: Duration::from_secs(5),
            thresholds: ThresholdSet::default(),
            primary_volume: Platform::current().primary_volume().to_string(),
            output_dir: PathBuf::from("reports"),
        }
    }
}

/// Builds one diagnostic record: collect → accumulate problems/actions → render.
///
/// Collection never fails. Every query error becomes a problem entry in the
/// record and the affected field is left empty.
pub struct DiagnosticReport<'a> {
    system: &'a dyn SystemSource,
    network: &'a dyn NetworkSource,
    programs: &'a dyn ProgramSource,
    settings: &'a ReportSettings,
    record: DiagnosticRecord,
}

impl<'a> DiagnosticReport<'a> {
    #[must_use]
    pub fn new(
        system: &'a dyn SystemSource,
        network: &'a dyn NetworkSource,
        programs: &'a dyn ProgramSource,
        settings: &'a ReportSettings,
    ) -> Self {
        let metadata = Metadata::for_host(system.hostname());
        Self {
            system,
            network,
            programs,
            settings,
            record: DiagnosticRecord::new(metadata),
        }
    }

    #[must_use]
    pub const fn record(&self) -> &DiagnosticRecord {
        &self.record
    }

    #[must_use]
    pub fn into_record(self) -> DiagnosticRecord {
        self.record
    }

    /// Replaces the system section, then checks it against the thresholds.
    pub fn collect_system(&mut self) {
        let mut section = SystemSection::default();

        match self.system.os() {
            Ok(os) => {
                section.os = Some(OsInfo {
                    name: os.name,
                    version: os.version,
                    kernel: os.kernel,
                    hostname: self.record.metadata.hostname.clone(),
                });
            }
            Err(e) => self.query_failed(
                ProblemCategory::System,
                "Falha ao identificar o sistema operacional",
                &e,
            ),
        }

        match self.system.cpu() {
            Ok(cpu) => {
                section.cpu = Some(CpuInfo {
                    brand: cpu.brand,
                    logical_cores: cpu.logical_cores,
                    usage_percent: cpu.usage_percent,
                });
            }
            Err(e) => self.query_failed(ProblemCategory::System, "Falha ao ler dados da CPU", &e),
        }

        match self.system.memory() {
            Ok(memory) => section.memory = Some(memory_info(memory)),
            Err(e) => self.query_failed(ProblemCategory::System, "Falha ao ler dados de memória", &e),
        }

        match self.system.disk(&self.settings.primary_volume) {
            Ok(disk) => section.disk = Some(disk_info(disk)),
            Err(e) => self.query_failed(ProblemCategory::System, "Falha ao ler dados de disco", &e),
        }

        match self.system.uptime_secs() {
            Ok(secs) => section.uptime_secs = Some(secs),
            Err(e) => self.query_failed(
                ProblemCategory::System,
                "Falha ao obter o tempo de atividade",
                &e,
            ),
        }

        match self.system.logged_in_users() {
            Ok(count) => section.logged_in_users = Some(count),
            Err(e) => self.query_failed(
                ProblemCategory::System,
                "Falha ao listar usuários conectados",
                &e,
            ),
        }

        self.record.system = section;
        self.check_system_health();
    }

    /// Replaces the network section.
    ///
    /// Probe errors count as unreachable; all of them are reported together
    /// in a single problem entry.
    pub fn collect_network(&mut self) {
        let mut section = NetworkSection::default();
        let settings = self.settings;

        let mut probe_errors = Vec::new();
        for host in &settings.probe_hosts {
            let reachable = match self.network.probe(host, settings.probe_timeout) {
                Ok(reachable) => reachable,
                Err(e) => {
                    probe_errors.push(format!("{host}: {e}"));
                    false
                }
            };
            tracing::debug!(host = %host, reachable, "teste de conectividade");
            section.connectivity.push(ProbeResult {
                host: host.clone(),
                reachable,
            });
        }
        if !probe_errors.is_empty() {
            tracing::warn!("{} teste(s) de conectividade falharam", probe_errors.len());
            self.record.push_problem(
                ProblemCategory::Network,
                "Falha ao testar conectividade",
                probe_errors.join("; "),
            );
        }

        match self.network.ip_configuration() {
            Ok(text) => section.ip_configuration = Some(truncate_chars(&text, IP_CONFIG_MAX_CHARS)),
            Err(e) => self.query_failed(
                ProblemCategory::Network,
                "Falha ao obter a configuração IP",
                &e,
            ),
        }

        match self.network.dns_servers() {
            Ok(servers) => section.dns_servers = servers,
            Err(e) => self.query_failed(
                ProblemCategory::Network,
                "Falha ao listar servidores DNS",
                &e,
            ),
        }

        match self.network.active_interfaces() {
            Ok(interfaces) => {
                section.connections = classify_connections(&interfaces);
                section.active_interfaces = interfaces;
            }
            Err(e) => self.query_failed(
                ProblemCategory::Network,
                "Falha ao listar interfaces de rede",
                &e,
            ),
        }

        self.record.network = section;
    }

    /// Replaces the programs section. The running binary never counts as a
    /// heavy consumer.
    pub fn collect_programs(&mut self) {
        let mut section = ProgramsSection::default();
        let settings = self.settings;
        let thresholds = &settings.thresholds;

        match self.programs.processes() {
            Ok(mut processes) => {
                section.process_count = processes.len();
                let own_pid = std::process::id();
                processes.retain(|p| p.pid != own_pid);
                section.top_consumers = heavy_consumers(
                    &processes,
                    thresholds.process_cpu_percent,
                    thresholds.process_memory_percent,
                    thresholds.top_processes,
                );
            }
            Err(e) => self.query_failed(ProblemCategory::Programs, "Falha ao listar processos", &e),
        }

        match self.programs.services() {
            Ok(services) => section.services = services,
            Err(e) => self.query_failed(ProblemCategory::Programs, "Falha ao listar serviços", &e),
        }

        self.record.programs = section;
    }

    pub fn add_problem(
        &mut self,
        category: ProblemCategory,
        description: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.record.push_problem(category, description, details);
    }

    pub fn add_action(&mut self, action: impl Into<String>, result: impl Into<String>) {
        self.record.push_action(action, result);
    }

    /// Renders the current record.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the record cannot be serialized.
    pub fn render(&self, format: ReportFormat) -> Result<String, RenderError> {
        renderer_for(format).render(&self.record)
    }

    /// Renders and writes the report to `path`, or to a timestamp-named file
    /// in the output directory.
    ///
    /// Returns `None` after recording a `report` problem when rendering or
    /// writing fails.
    pub fn write(&mut self, format: ReportFormat, path: Option<&Path>) -> Option<PathBuf> {
        let path = path.map_or_else(|| self.default_path(format), Path::to_path_buf);

        let content = match self.render(format) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("falha ao gerar relatório {format}: {e}");
                self.record.push_problem(
                    ProblemCategory::Report,
                    format!("Falha ao gerar relatório {format}"),
                    e.to_string(),
                );
                return None;
            }
        };

        if let Err(e) = write_file(&path, &content) {
            tracing::warn!(path = %path.display(), "falha ao gravar relatório: {e}");
            self.record.push_problem(
                ProblemCategory::Report,
                format!("Falha ao gravar relatório {format}"),
                format!("{}: {e}", path.display()),
            );
            return None;
        }

        tracing::info!(path = %path.display(), "relatório gravado");
        Some(path)
    }

    fn default_path(&self, format: ReportFormat) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.settings.output_dir.join(format!(
            "relatorio_diagnostico_{stamp}.{}",
            format.extension()
        ))
    }

    fn query_failed(&mut self, category: ProblemCategory, description: &str, error: &CollectionError) {
        tracing::warn!(%category, "{description}: {error}");
        self.record
            .push_problem(category, description, error.to_string());
    }

    fn check_system_health(&mut self) {
        let settings = self.settings;
        let thresholds = &settings.thresholds;
        let mut findings = Vec::new();

        if let Some(memory) = &self.record.system.memory {
            if memory.usage_percent > thresholds.max_memory_percent {
                findings.push((
                    "Uso de memória elevado",
                    format!(
                        "{:.1}% em uso (limite {:.0}%)",
                        memory.usage_percent, thresholds.max_memory_percent
                    ),
                ));
            }
        }
        if let Some(cpu) = &self.record.system.cpu {
            if f64::from(cpu.usage_percent) > thresholds.max_cpu_percent {
                findings.push((
                    "Uso de CPU elevado",
                    format!(
                        "{:.1}% em uso (limite {:.0}%)",
                        cpu.usage_percent, thresholds.max_cpu_percent
                    ),
                ));
            }
        }
        if let Some(disk) = &self.record.system.disk {
            if disk.available_gb < thresholds.min_free_disk_gb {
                findings.push((
                    "Pouco espaço livre em disco",
                    format!(
                        "{}: {:.1} GB livres (mínimo {:.1} GB)",
                        disk.mount_point, disk.available_gb, thresholds.min_free_disk_gb
                    ),
                ));
            }
        }

        for (description, details) in findings {
            tracing::warn!("{description}: {details}");
            self.record
                .push_problem(ProblemCategory::System, description, details);
        }
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

#[allow(clippy::cast_precision_loss)]
fn to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn memory_info(facts: MemoryFacts) -> MemoryInfo {
    MemoryInfo {
        total_gb: to_gb(facts.total_bytes),
        used_gb: to_gb(facts.used_bytes),
        available_gb: to_gb(facts.available_bytes),
        usage_percent: percent(facts.used_bytes, facts.total_bytes),
    }
}

fn disk_info(facts: DiskFacts) -> DiskInfo {
    let used = facts.total_bytes.saturating_sub(facts.available_bytes);
    DiskInfo {
        mount_point: facts.mount_point,
        filesystem: facts.filesystem,
        total_gb: to_gb(facts.total_bytes),
        used_gb: to_gb(used),
        available_gb: to_gb(facts.available_bytes),
        usage_percent: percent(used, facts.total_bytes),
    }
}

/// First `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
