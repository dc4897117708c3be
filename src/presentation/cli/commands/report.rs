use std::path::Path;

use colored::Colorize;

use crate::application::services::report::DiagnosticReport;
use crate::domain::value_objects::{ProblemCategory, ReportFormat};
use crate::presentation::cli::formatters::status_fmt::format_problems;

/// Collects the record and writes it in `format`.
///
/// Quick mode skips the programs section.
///
/// # Errors
///
/// Returns an error if the report could not be written; the problems
/// recorded so far are printed first.
pub fn run_report(
    report: &mut DiagnosticReport<'_>,
    format: ReportFormat,
    output: Option<&Path>,
    quick: bool,
) -> anyhow::Result<()> {
    println!("{}", "🔍 Coletando dados do sistema...".dimmed());
    report.collect_system();
    println!("{}", "🌐 Coletando dados de rede...".dimmed());
    report.collect_network();
    if !quick {
        println!("{}", "💻 Coletando dados de programas...".dimmed());
        report.collect_programs();
    }

    println!("{}", format!("📝 Gerando relatório {format}...").dimmed());
    let Some(path) = report.write(format, output) else {
        println!("{}", format_problems(&report.record().problems));
        anyhow::bail!("não foi possível gravar o relatório {format}");
    };

    println!(
        "\n{} {}",
        "✅ Relatório salvo em:".green().bold(),
        path.display()
    );
    println!("{}", summary_line(report));
    Ok(())
}

/// One-line count of the problems per category.
fn summary_line(report: &DiagnosticReport<'_>) -> String {
    let record = report.record();
    if record.problems.is_empty() {
        return format_problems(&record.problems);
    }
    let counts: Vec<String> = ProblemCategory::ALL
        .iter()
        .filter_map(|category| {
            let count = record.problems_in(*category).count();
            (count > 0).then(|| format!("{}: {count}", category.label()))
        })
        .collect();
    format!(
        "{} {}",
        format!("⚠️  {} problema(s) detectado(s)", record.problems.len())
            .yellow()
            .bold(),
        format!("({})", counts.join(", "))
    )
}
