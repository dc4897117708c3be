use crate::domain::entities::process::ProcessInfo;
use crate::infrastructure::renderers::humanize::format_size;
use colored::Colorize;

/// CPU share above which a row is highlighted.
const HOT_CPU_PERCENT: f32 = 50.0;

/// Formats processes as an aligned table, in the order given.
///
/// # Returns
///
/// A multi-line string with header, separator, and process rows.
#[must_use]
pub fn format_process_table(processes: &[ProcessInfo]) -> String {
    let header = format!(
        "{:<8} {:<24} {:>6} {:>6} {:>10}",
        "PID", "NOME", "CPU%", "RAM%", "RAM"
    );
    let separator = "─".repeat(header.chars().count());

    let mut rows = vec![header, separator];

    for p in processes {
        let name: String = p.name.chars().take(23).collect();
        let row = format!(
            "{:<8} {:<24} {:>6.1} {:>6.1} {:>10}",
            p.pid,
            name,
            p.cpu_percent,
            p.memory_percent,
            format_size(p.memory_mb.saturating_mul(1024 * 1024))
        );
        if p.cpu_percent >= HOT_CPU_PERCENT {
            rows.push(row.red().to_string());
        } else {
            rows.push(row);
        }
    }

    rows.join("\n")
}
