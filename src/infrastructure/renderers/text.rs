use super::humanize::{format_uptime, local_timestamp};
use crate::domain::entities::network::NetworkSection;
use crate::domain::entities::process::ProgramsSection;
use crate::domain::entities::record::{Action, DiagnosticRecord, Problem, TOOL_NAME};
use crate::domain::entities::system::SystemSection;
use crate::domain::ports::renderer::{RenderError, ReportRenderer};
use crate::domain::value_objects::ReportFormat;

const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;
const NA: &str = "N/A";

/// Plain-text report with one block per record section.
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, record: &DiagnosticRecord) -> Result<String, RenderError> {
        let mut lines = Vec::new();
        let rule = "=".repeat(RULE_WIDTH);

        lines.push(rule.clone());
        lines.push(format!("{} - Relatório de Diagnóstico", record.metadata.tool));
        lines.push(format!("Versão: {}", record.metadata.version));
        lines.push(format!(
            "Data: {}",
            local_timestamp(record.metadata.generated_at)
        ));
        lines.push(format!(
            "Host: {} ({} {})",
            record.metadata.hostname, record.metadata.platform, record.metadata.architecture
        ));
        lines.push(rule.clone());
        lines.push(String::new());

        push_system(&mut lines, &record.system);
        push_network(&mut lines, &record.network);
        push_programs(&mut lines, &record.programs);
        push_problems(&mut lines, &record.problems);
        push_actions(&mut lines, &record.actions);

        lines.push(rule.clone());
        lines.push(format!("Relatório gerado automaticamente pelo {TOOL_NAME}"));
        lines.push(rule);

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

fn push_heading(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(SECTION_WIDTH));
}

fn push_system(lines: &mut Vec<String>, system: &SystemSection) {
    push_heading(lines, "📊 INFORMAÇÕES DO SISTEMA");

    match &system.os {
        Some(os) => {
            lines.push(format!("Sistema Operacional: {} {}", os.name, os.version));
            lines.push(format!("Kernel: {}", os.kernel));
            lines.push(format!("Hostname: {}", os.hostname));
        }
        None => lines.push(format!("Sistema Operacional: {NA}")),
    }

    lines.push(match &system.cpu {
        Some(cpu) => format!(
            "Processador: {} ({} núcleos lógicos, {:.1}% em uso)",
            cpu.brand, cpu.logical_cores, cpu.usage_percent
        ),
        None => format!("Processador: {NA}"),
    });

    lines.push(match &system.memory {
        Some(mem) => format!(
            "Memória: {:.1} GB usados de {:.1} GB ({:.1}%)",
            mem.used_gb, mem.total_gb, mem.usage_percent
        ),
        None => format!("Memória: {NA}"),
    });

    lines.push(match &system.disk {
        Some(disk) => format!(
            "Disco {}: {:.1} GB usados de {:.1} GB ({:.1}%), {:.1} GB livres",
            disk.mount_point, disk.used_gb, disk.total_gb, disk.usage_percent, disk.available_gb
        ),
        None => format!("Disco: {NA}"),
    });

    lines.push(format!(
        "Uptime: {}",
        system.uptime_secs.map_or_else(|| NA.to_string(), format_uptime)
    ));
    lines.push(format!(
        "Usuários conectados: {}",
        system
            .logged_in_users
            .map_or_else(|| NA.to_string(), |n| n.to_string())
    ));
    lines.push(String::new());
}

fn push_network(lines: &mut Vec<String>, network: &NetworkSection) {
    push_heading(lines, "🌐 INFORMAÇÕES DE REDE");

    if network.connectivity.is_empty() {
        lines.push("Conectividade: nenhum teste realizado".to_string());
    }
    for probe in &network.connectivity {
        let status = if probe.reachable {
            "✅ Conectado"
        } else {
            "❌ Desconectado"
        };
        lines.push(format!("{}: {status}", probe.host));
    }

    lines.push(format!("Servidores DNS: {}", join_or_none(&network.dns_servers)));
    lines.push(format!(
        "Interfaces ativas: {}",
        join_or_none(&network.active_interfaces)
    ));
    let connections: Vec<String> = network
        .connections
        .iter()
        .map(|c| format!("{} ({})", c.kind, c.interface))
        .collect();
    lines.push(format!("Tipo de conexão: {}", join_or_none(&connections)));

    if let Some(config) = &network.ip_configuration {
        lines.push("Configuração IP:".to_string());
        lines.extend(
            config
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| format!("  {}", l.trim_end())),
        );
    }
    lines.push(String::new());
}

fn push_programs(lines: &mut Vec<String>, programs: &ProgramsSection) {
    push_heading(lines, "💻 PROGRAMAS");

    lines.push(format!("Processos ativos: {}", programs.process_count));
    lines.push(format!(
        "Serviços: {} em execução de {}",
        programs.services.running, programs.services.total
    ));
    if programs.top_consumers.is_empty() {
        lines.push("Processos com alto consumo: nenhum".to_string());
    } else {
        lines.push("Processos com alto consumo:".to_string());
        for p in &programs.top_consumers {
            lines.push(format!(
                "  • {} (PID {}) - CPU: {:.1}%, RAM: {:.1}% ({} MB)",
                p.name, p.pid, p.cpu_percent, p.memory_percent, p.memory_mb
            ));
        }
    }
    lines.push(String::new());
}

fn push_problems(lines: &mut Vec<String>, problems: &[Problem]) {
    if problems.is_empty() {
        return;
    }
    push_heading(lines, "⚠️ PROBLEMAS DETECTADOS");
    for problem in problems {
        lines.push(format!("Categoria: {}", problem.category.label()));
        lines.push(format!("Descrição: {}", problem.description));
        if !problem.details.is_empty() {
            lines.push(format!("Detalhes: {}", problem.details));
        }
        lines.push(String::new());
    }
}

fn push_actions(lines: &mut Vec<String>, actions: &[Action]) {
    if actions.is_empty() {
        return;
    }
    push_heading(lines, "🎯 AÇÕES REALIZADAS");
    for action in actions {
        lines.push(format!("• {}", action.action));
        if !action.result.is_empty() {
            lines.push(format!("  Resultado: {}", action.result));
        }
    }
    lines.push(String::new());
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "nenhum".to_string()
    } else {
        items.join(", ")
    }
}
