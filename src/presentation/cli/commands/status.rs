use colored::Colorize;
use serde::Serialize;

use crate::application::services::report::DiagnosticReport;
use crate::domain::entities::process::ProgramsSection;
use crate::domain::entities::record::{DiagnosticRecord, Problem};
use crate::domain::entities::system::SystemSection;
use crate::infrastructure::renderers::humanize::format_uptime;
use crate::presentation::cli::formatters::status_fmt::{
    colorize_percent, format_problems, progress_bar, section_header,
};
use crate::presentation::cli::formatters::table_fmt::format_process_table;

#[derive(Serialize)]
struct StatusView<'a> {
    system: &'a SystemSection,
    programs: &'a ProgramsSection,
    problems: &'a [Problem],
}

/// Collects the system and programs sections and prints them.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_status(report: &mut DiagnosticReport<'_>, json: bool) -> anyhow::Result<()> {
    report.collect_system();
    report.collect_programs();
    let record = report.record();

    if json {
        let view = StatusView {
            system: &record.system,
            programs: &record.programs,
            problems: &record.problems,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", format_status(record));
    Ok(())
}

/// Terminal view of the system and programs sections.
#[must_use]
pub fn format_status(record: &DiagnosticRecord) -> String {
    let mut out = Vec::new();
    out.push(format!("{}", "suporte — Estado do Sistema".bold().cyan()));
    out.push("━".repeat(50));

    let system = &record.system;
    if let Some(os) = &system.os {
        out.push(format!("\n{}", section_header("🖥️  Sistema")));
        out.push(format!("  {} {} ({})", os.name, os.version, os.kernel));
        out.push(format!("  Host: {}", record.metadata.hostname));
    }
    if let Some(uptime) = system.uptime_secs {
        out.push(format!("  Tempo ligado: {}", format_uptime(uptime)));
    }
    if let Some(users) = system.logged_in_users {
        out.push(format!("  Usuários conectados: {users}"));
    }

    if let Some(mem) = &system.memory {
        out.push(format!("\n{}", section_header("💾 Memória RAM")));
        out.push(format!(
            "  {} {}",
            progress_bar(mem.usage_percent, 30),
            colorize_percent(mem.usage_percent)
        ));
        out.push(format!(
            "  Usado: {:.2} GB / {:.2} GB (Disponível: {:.2} GB)",
            mem.used_gb, mem.total_gb, mem.available_gb
        ));
    }

    if let Some(cpu) = &system.cpu {
        out.push(format!("\n{}", section_header("⚙️  CPU")));
        out.push(format!("  {}", cpu.brand));
        out.push(format!(
            "  Uso: {} ({} núcleos)",
            colorize_percent(f64::from(cpu.usage_percent)),
            cpu.logical_cores
        ));
    }

    if let Some(disk) = &system.disk {
        out.push(format!("\n{}", section_header("💿 Disco")));
        out.push(format!(
            "  {} {} {} ({:.2} GB livres)",
            disk.mount_point,
            progress_bar(disk.usage_percent, 20),
            colorize_percent(disk.usage_percent),
            disk.available_gb
        ));
    }

    let programs = &record.programs;
    out.push(format!("\n{}", section_header("📊 Programas")));
    out.push(format!("  Processos em execução: {}", programs.process_count));
    out.push(format!(
        "  Serviços: {} ({} em execução)",
        programs.services.total, programs.services.running
    ));
    if !programs.top_consumers.is_empty() {
        out.push(String::new());
        out.push(format_process_table(&programs.top_consumers));
    }

    out.push(String::new());
    out.push(format_problems(&record.problems));
    out.join("\n")
}
