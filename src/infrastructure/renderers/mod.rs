pub mod html;
pub mod humanize;
pub mod json;
pub mod text;

use crate::domain::ports::renderer::ReportRenderer;
use crate::domain::value_objects::ReportFormat;

/// Renderer for `format`.
#[must_use]
pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Text => Box::new(text::TextRenderer),
        ReportFormat::Json => Box::new(json::JsonRenderer),
        ReportFormat::Html => Box::new(html::HtmlRenderer),
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> crate::domain::entities::record::DiagnosticRecord {
    use crate::domain::entities::network::{Connection, ConnectionKind, ProbeResult};
    use crate::domain::entities::process::{ProcessInfo, ServiceCounts};
    use crate::domain::entities::record::{DiagnosticRecord, Metadata};
    use crate::domain::entities::system::{MemoryInfo, OsInfo};
    use crate::domain::value_objects::ProblemCategory;

    let mut record = DiagnosticRecord::new(Metadata::for_host(Some("estacao-07".into())));
    record.system.os = Some(OsInfo {
        name: "Windows".into(),
        version: "11 (26100)".into(),
        kernel: "26100".into(),
        hostname: "estacao-07".into(),
    });
    record.system.memory = Some(MemoryInfo {
        total_gb: 8.0,
        used_gb: 4.0,
        available_gb: 4.0,
        usage_percent: 50.0,
    });
    record.system.uptime_secs = Some(26 * 3600);
    record.system.logged_in_users = Some(1);
    record.network.connectivity = vec![
        ProbeResult {
            host: "8.8.8.8".into(),
            reachable: true,
        },
        ProbeResult {
            host: "github.com".into(),
            reachable: false,
        },
    ];
    record.network.active_interfaces = vec!["Ethernet".into()];
    record.network.connections = vec![Connection {
        kind: ConnectionKind::Wired,
        interface: "Ethernet".into(),
    }];
    record.network.dns_servers = vec!["192.168.0.1".into()];
    record.programs.process_count = 212;
    record.programs.services = ServiceCounts {
        total: 300,
        running: 120,
    };
    record.programs.top_consumers = vec![ProcessInfo {
        pid: 4242,
        name: "chrome".into(),
        cpu_percent: 35.0,
        memory_mb: 1300,
        memory_percent: 16.2,
    }];
    record.push_problem(ProblemCategory::Network, "Host inacessível", "github.com");
    record.push_action("Limpeza do cache DNS", "sucesso");
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_matches_requested_format() {
        for format in [ReportFormat::Text, ReportFormat::Json, ReportFormat::Html] {
            assert_eq!(renderer_for(format).format(), format);
        }
    }
}
