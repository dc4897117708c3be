use colored::Colorize;

use crate::application::services::report::DiagnosticReport;
use crate::domain::entities::network::{ConnectionKind, NetworkSection};
use crate::domain::entities::record::DiagnosticRecord;
use crate::domain::value_objects::ProblemCategory;
use crate::presentation::cli::formatters::status_fmt::{
    connectivity_label, format_problems, section_header,
};

/// Collects the network section and prints a connectivity diagnosis.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_network(report: &mut DiagnosticReport<'_>, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("{}", "🔍 Verificando a conexão de rede...".dimmed());
    }
    report.collect_network();
    let record = report.record();

    if json {
        println!("{}", serde_json::to_string_pretty(&record.network)?);
        return Ok(());
    }

    println!("{}", format_network(record));
    Ok(())
}

/// Terminal view of the network section followed by the suggestions.
#[must_use]
pub fn format_network(record: &DiagnosticRecord) -> String {
    let network = &record.network;
    let mut out = Vec::new();

    out.push(section_header("📡 Conexões"));
    if network.connections.is_empty() {
        out.push("  Nenhuma conexão identificada".to_string());
    }
    for connection in &network.connections {
        let icon = match connection.kind {
            ConnectionKind::Wired => "🔌",
            ConnectionKind::Wireless => "📶",
        };
        out.push(format!(
            "  {icon} {}: {}",
            connection.kind.to_string().to_uppercase(),
            connection.interface
        ));
    }

    out.push(format!("\n{}", section_header("🌐 Conectividade")));
    for probe in &network.connectivity {
        out.push(format!("  {:<20} {}", probe.host, connectivity_label(probe.reachable)));
    }

    out.push(format!("\n{}", section_header("🧭 Servidores DNS")));
    if network.dns_servers.is_empty() {
        out.push("  N/A".to_string());
    } else {
        out.extend(network.dns_servers.iter().map(|s| format!("  {s}")));
    }

    let problems: Vec<_> = record
        .problems_in(ProblemCategory::Network)
        .cloned()
        .collect();
    if !problems.is_empty() {
        out.push(String::new());
        out.push(format_problems(&problems));
    }

    out.push(format!("\n{}", section_header("💡 Diagnóstico")));
    out.extend(suggestions(network).into_iter().map(|s| format!("  {s}")));
    out.join("\n")
}

/// Advice for the user derived from the link types and probe results.
#[must_use]
pub fn suggestions(network: &NetworkSection) -> Vec<String> {
    let wired = network
        .connections
        .iter()
        .any(|c| c.kind == ConnectionKind::Wired);
    let wireless = network
        .connections
        .iter()
        .any(|c| c.kind == ConnectionKind::Wireless);
    let reachable = network.connectivity.iter().filter(|p| p.reachable).count();

    let mut advice = Vec::new();

    if network.active_interfaces.is_empty() {
        advice.push("❌ Nenhuma conexão de rede detectada! Verifique se:".to_string());
        advice.push("   • Os cabos estão conectados".to_string());
        advice.push("   • O WiFi está ligado".to_string());
        advice.push("   • Os drivers de rede estão instalados".to_string());
        return advice;
    }

    match (wired, wireless) {
        (false, true) => {
            advice.push("⚠️  Você está usando WiFi.".to_string());
            advice.push(
                "   Problemas de rede corporativa precisam de conexão cabeada para aplicar as políticas de grupo corretamente."
                    .to_string(),
            );
            advice.push(
                "   Conecte o cabo e execute 'suporte gpupdate' para reaplicar as políticas.".to_string(),
            );
        }
        (true, true) => {
            advice.push(
                "💡 WiFi e cabo conectados. Recomendamos desconectar o WiFi para melhor resultado."
                    .to_string(),
            );
        }
        (true, false) => advice.push("🔌 Conexão cabeada detectada.".to_string()),
        (false, false) => {
            advice.push("❓ Tipo de conexão não identificado claramente.".to_string());
            advice.push("   Use conexão cabeada sempre que possível.".to_string());
        }
    }

    if network.connectivity.is_empty() {
        return advice;
    }
    if reachable == 0 {
        advice.push("❌ Sem acesso à internet.".to_string());
        advice.push("   • Reinicie o roteador ou verifique o cabo de rede".to_string());
        advice.push("   • Execute 'suporte flush-dns' para limpar o cache DNS".to_string());
        advice.push("   • Se o problema continuar, contate o suporte de TI".to_string());
    } else if reachable < network.connectivity.len() {
        advice.push("⚠️  Conectividade parcial: alguns destinos não responderam.".to_string());
        advice.push(
            "   Possível problema de DNS ou firewall. Tente 'suporte flush-dns'.".to_string(),
        );
    } else {
        advice.push("✅ Internet funcionando normalmente.".to_string());
    }
    advice
}
