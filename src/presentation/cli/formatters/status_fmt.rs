use colored::{ColoredString, Colorize};

use crate::domain::entities::record::Problem;

#[must_use]
pub fn progress_bar(value: f64, width: usize) -> String {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_filled = "█".repeat(filled);
    let bar_empty = "░".repeat(empty);

    format!("{}{bar_empty}", paint_by_level(bar_filled, value))
}

#[must_use]
pub fn colorize_percent(value: f64) -> ColoredString {
    paint_by_level(format!("{value:.1}%"), value)
}

fn paint_by_level(text: String, value: f64) -> ColoredString {
    if value >= 90.0 {
        text.red().bold()
    } else if value >= 70.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Title line plus an underline of the same display width.
#[must_use]
pub fn section_header(title: &str) -> String {
    let display_width = title.chars().count();
    format!("{}\n{}", title.bold().cyan(), "─".repeat(display_width).cyan())
}

#[must_use]
pub fn connectivity_label(reachable: bool) -> ColoredString {
    if reachable {
        "✅ Conectado".green()
    } else {
        "❌ Desconectado".red()
    }
}

/// Problems as a bulleted list, or a success line when there are none.
#[must_use]
pub fn format_problems(problems: &[Problem]) -> String {
    if problems.is_empty() {
        return "✅ Nenhum problema detectado".green().bold().to_string();
    }
    let mut lines = vec![format!("⚠️  {} problema(s) detectado(s)", problems.len())
        .yellow()
        .bold()
        .to_string()];
    for problem in problems {
        let mut line = format!("  • [{}] {}", problem.category.label(), problem.description);
        if !problem.details.is_empty() {
            line.push_str(&format!(" ({})", problem.details));
        }
        lines.push(line);
    }
    lines.join("\n")
}
