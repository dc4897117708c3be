use super::humanize::{format_uptime, local_timestamp};
use crate::domain::entities::record::DiagnosticRecord;
use crate::domain::ports::renderer::{RenderError, ReportRenderer};
use crate::domain::value_objects::ReportFormat;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
.container { max-width: 1200px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.header { text-align: center; border-bottom: 2px solid #007acc; padding-bottom: 20px; margin-bottom: 30px; }
.section { margin-bottom: 30px; }
.section h2 { color: #007acc; border-bottom: 1px solid #ddd; padding-bottom: 10px; }
.info-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; }
.info-card { background-color: #f8f9fa; padding: 15px; border-radius: 5px; border-left: 4px solid #007acc; }
.problem { background-color: #fff3cd; border-left: 4px solid #ffc107; padding: 10px; margin: 10px 0; border-radius: 5px; }
.success { background-color: #d4edda; border-left: 4px solid #28a745; padding: 10px; margin: 10px 0; border-radius: 5px; }
.ok { color: #28a745; }
.fail { color: #dc3545; }
pre { white-space: pre-wrap; font-size: 0.85em; }
.timestamp { color: #666; font-size: 0.9em; }
";

/// Self-contained HTML page; every dynamic value is escaped.
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, record: &DiagnosticRecord) -> Result<String, RenderError> {
        let meta = &record.metadata;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "<title>Relatório de Diagnóstico - {}</title>\n",
            escape_html(&meta.tool)
        ));
        html.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
        html.push_str("<div class=\"container\">\n<div class=\"header\">\n");
        html.push_str(&format!("<h1>🔧 {}</h1>\n", escape_html(&meta.tool)));
        html.push_str("<h2>Relatório de Diagnóstico</h2>\n");
        html.push_str(&format!(
            "<p class=\"timestamp\">Gerado em: {}</p>\n",
            local_timestamp(meta.generated_at)
        ));
        html.push_str(&format!(
            "<p>Versão: {} &middot; {} ({} {})</p>\n</div>\n",
            escape_html(&meta.version),
            escape_html(&meta.hostname),
            escape_html(&meta.platform),
            escape_html(&meta.architecture)
        ));

        push_system(&mut html, record);
        push_network(&mut html, record);
        push_programs(&mut html, record);
        push_problems(&mut html, record);
        push_actions(&mut html, record);

        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }
}

/// Escapes the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>\n",
        escape_html(label),
        escape_html(value)
    )
}

fn card(title: &str, body: &str) -> String {
    format!(
        "<div class=\"info-card\">\n<h3>{}</h3>\n{body}</div>\n",
        escape_html(title)
    )
}

fn open_section(html: &mut String, title: &str) {
    html.push_str(&format!(
        "<div class=\"section\">\n<h2>{}</h2>\n",
        escape_html(title)
    ));
}

fn push_system(html: &mut String, record: &DiagnosticRecord) {
    let system = &record.system;
    open_section(html, "📊 Informações do Sistema");
    html.push_str("<div class=\"info-grid\">\n");

    let mut os = String::new();
    match &system.os {
        Some(info) => {
            os.push_str(&field("OS", &format!("{} {}", info.name, info.version)));
            os.push_str(&field("Kernel", &info.kernel));
            os.push_str(&field("Hostname", &info.hostname));
        }
        None => os.push_str(&field("OS", "N/A")),
    }
    os.push_str(&field(
        "Uptime",
        &system
            .uptime_secs
            .map_or_else(|| "N/A".to_string(), format_uptime),
    ));
    os.push_str(&field(
        "Usuários conectados",
        &system
            .logged_in_users
            .map_or_else(|| "N/A".to_string(), |n| n.to_string()),
    ));
    html.push_str(&card("Sistema Operacional", &os));

    let mut resources = String::new();
    if let Some(cpu) = &system.cpu {
        resources.push_str(&field("Processador", &cpu.brand));
        resources.push_str(&field(
            "CPU",
            &format!(
                "{} núcleos lógicos, {:.1}% em uso",
                cpu.logical_cores, cpu.usage_percent
            ),
        ));
    }
    if let Some(mem) = &system.memory {
        resources.push_str(&field("Memória Total", &format!("{:.1} GB", mem.total_gb)));
        resources.push_str(&field(
            "Memória Usada",
            &format!("{:.1}%", mem.usage_percent),
        ));
    }
    if let Some(disk) = &system.disk {
        resources.push_str(&field(
            &format!("Disco {}", disk.mount_point),
            &format!(
                "{:.1} GB de {:.1} GB ({:.1}%)",
                disk.used_gb, disk.total_gb, disk.usage_percent
            ),
        ));
    }
    if resources.is_empty() {
        resources.push_str(&field("Recursos", "N/A"));
    }
    html.push_str(&card("Recursos", &resources));

    html.push_str("</div>\n</div>\n");
}

fn push_network(html: &mut String, record: &DiagnosticRecord) {
    let network = &record.network;
    open_section(html, "🌐 Informações de Rede");
    html.push_str("<div class=\"info-grid\">\n");

    let mut probes = String::new();
    for probe in &network.connectivity {
        let (class, status) = if probe.reachable {
            ("ok", "✅ Conectado")
        } else {
            ("fail", "❌ Desconectado")
        };
        probes.push_str(&format!(
            "<p><strong>{}:</strong> <span class=\"{class}\">{status}</span></p>\n",
            escape_html(&probe.host)
        ));
    }
    if probes.is_empty() {
        probes.push_str(&field("Conectividade", "nenhum teste realizado"));
    }
    html.push_str(&card("Conectividade", &probes));

    let mut details = String::new();
    details.push_str(&field("Servidores DNS", &network.dns_servers.join(", ")));
    details.push_str(&field(
        "Interfaces ativas",
        &network.active_interfaces.join(", "),
    ));
    let connections: Vec<String> = network
        .connections
        .iter()
        .map(|c| format!("{} ({})", c.kind, c.interface))
        .collect();
    details.push_str(&field("Tipo de conexão", &connections.join(", ")));
    html.push_str(&card("Interfaces", &details));

    html.push_str("</div>\n");
    if let Some(config) = &network.ip_configuration {
        html.push_str(&format!(
            "<h3>Configuração IP</h3>\n<pre>{}</pre>\n",
            escape_html(config)
        ));
    }
    html.push_str("</div>\n");
}

fn push_programs(html: &mut String, record: &DiagnosticRecord) {
    let programs = &record.programs;
    open_section(html, "💻 Programas");

    let mut summary = field("Processos ativos", &programs.process_count.to_string());
    summary.push_str(&field(
        "Serviços",
        &format!(
            "{} em execução de {}",
            programs.services.running, programs.services.total
        ),
    ));
    html.push_str(&card("Resumo", &summary));

    if !programs.top_consumers.is_empty() {
        html.push_str("<h3>Processos com alto consumo</h3>\n<ul>\n");
        for p in &programs.top_consumers {
            html.push_str(&format!(
                "<li>{} (PID {}) - CPU: {:.1}%, RAM: {:.1}% ({} MB)</li>\n",
                escape_html(&p.name),
                p.pid,
                p.cpu_percent,
                p.memory_percent,
                p.memory_mb
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
}

fn push_problems(html: &mut String, record: &DiagnosticRecord) {
    if record.problems.is_empty() {
        return;
    }
    open_section(html, "⚠️ Problemas Detectados");
    for problem in &record.problems {
        html.push_str("<div class=\"problem\">\n");
        html.push_str(&format!("<h4>{}</h4>\n", escape_html(problem.category.label())));
        html.push_str(&field("Descrição", &problem.description));
        if !problem.details.is_empty() {
            html.push_str(&field("Detalhes", &problem.details));
        }
        html.push_str(&format!(
            "<p class=\"timestamp\">{}</p>\n</div>\n",
            local_timestamp(problem.timestamp)
        ));
    }
    html.push_str("</div>\n");
}

fn push_actions(html: &mut String, record: &DiagnosticRecord) {
    if record.actions.is_empty() {
        return;
    }
    open_section(html, "🎯 Ações Realizadas");
    for action in &record.actions {
        html.push_str("<div class=\"success\">\n");
        html.push_str(&format!("<h4>{}</h4>\n", escape_html(&action.action)));
        if !action.result.is_empty() {
            html.push_str(&field("Resultado", &action.result));
        }
        html.push_str(&format!(
            "<p class=\"timestamp\">{}</p>\n</div>\n",
            local_timestamp(action.timestamp)
        ));
    }
    html.push_str("</div>\n");
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProblemCategory;
    use crate::infrastructure::renderers::sample_record;

    fn render(record: &DiagnosticRecord) -> String {
        HtmlRenderer.render(record).expect("html never fails")
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("sem alterações"), "sem alterações");
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let mut record = sample_record();
        record.push_problem(
            ProblemCategory::Programs,
            "<script>alert(1)</script>",
            "a & b",
        );
        let html = render(&record);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn page_is_self_contained() {
        let html = render(&sample_record());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn has_the_same_sections_as_text() {
        let html = render(&sample_record());
        for heading in [
            "Informações do Sistema",
            "Informações de Rede",
            "Programas",
            "Problemas Detectados",
            "Ações Realizadas",
        ] {
            assert!(html.contains(heading), "missing section {heading}");
        }
    }

    #[test]
    fn problem_cards_use_category_labels() {
        let html = render(&sample_record());
        assert!(html.contains("<h4>Rede</h4>"));
    }
}
