use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::application::services::maintenance::{self, MaintenanceOutcome};
use crate::application::services::report::DiagnosticReport;
use crate::domain::ports::command::CommandRunner;
use crate::domain::value_objects::{Platform, ReportFormat};
use crate::infrastructure::os::platform_commands;

/// Maintenance sequences the CLI can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    FlushDns,
    GroupPolicy,
    PrintSpooler,
}

impl Task {
    const fn banner(self) -> &'static str {
        match self {
            Self::FlushDns => "🔄 Executando limpeza do cache DNS...",
            Self::GroupPolicy => "🔄 Executando: gpupdate /force",
            Self::PrintSpooler => "🖨️  Reiniciando o spooler de impressão...",
        }
    }

    const fn wait_hint(self) -> &'static str {
        match self {
            Self::GroupPolicy => "⏳ Esta operação pode demorar alguns minutos...",
            Self::FlushDns | Self::PrintSpooler => "⏳ Esta operação pode demorar alguns segundos.",
        }
    }

    const fn done(self) -> (&'static str, &'static str) {
        match self {
            Self::FlushDns => ("✅ LIMPEZA DO CACHE DNS CONCLUÍDA", "🌐 Teste sua conexão novamente!"),
            Self::GroupPolicy => (
                "✅ ATUALIZAÇÃO DE POLÍTICAS CONCLUÍDA",
                "💡 Reinicie o computador se as políticas não forem aplicadas.",
            ),
            Self::PrintSpooler => (
                "✅ REINICIALIZAÇÃO DO SPOOLER CONCLUÍDA",
                "🖨️  Tente imprimir novamente!",
            ),
        }
    }

    const fn fix_hint(self) -> &'static str {
        match self {
            Self::FlushDns => "Verifique se o serviço de resolução DNS está ativo",
            Self::GroupPolicy => "Verifique a conexão com o domínio",
            Self::PrintSpooler => "Verifique se há impressoras conectadas",
        }
    }
}

/// Runner and timeouts the maintenance commands depend on.
#[derive(Clone, Copy)]
pub struct MaintenanceContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub platform: Platform,
    pub command_timeout: Duration,
    pub gpupdate_timeout: Duration,
}

/// Runs `task`, printing each recorded step and the outcome.
///
/// With `report_format`, the network section is collected again afterwards
/// and a report is written to the default location.
///
/// # Errors
///
/// Returns an error if the requested report could not be written.
pub fn run_maintenance(
    report: &mut DiagnosticReport<'_>,
    ctx: &MaintenanceContext<'_>,
    task: Task,
    report_format: Option<ReportFormat>,
) -> anyhow::Result<()> {
    if !maintenance::has_admin_rights(ctx.runner, ctx.platform, ctx.command_timeout) {
        println!("{}", admin_warning().yellow());
    }

    println!("{}", task.banner().bold().cyan());
    println!("{}", task.wait_hint().dimmed());

    let first_step = report.record().actions.len();
    let outcome = match task {
        Task::FlushDns => {
            maintenance::flush_dns(ctx.runner, ctx.platform, ctx.command_timeout, report)
        }
        Task::GroupPolicy => maintenance::update_group_policy(
            ctx.runner,
            ctx.platform,
            ctx.gpupdate_timeout,
            report,
        ),
        Task::PrintSpooler => maintenance::restart_print_spooler(
            ctx.runner,
            ctx.platform,
            ctx.command_timeout,
            platform_commands::spooler_queue_dir(ctx.platform).map(Path::new),
            report,
        ),
    };

    for (i, action) in report.record().actions[first_step..].iter().enumerate() {
        let line = format!("  [{}/{}] {}: {}", i + 1, outcome.steps, action.action, action.result);
        if action.result.starts_with("falhou") || action.result.starts_with("não") {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.green());
        }
    }
    println!("\n{}", outcome_message(task, &outcome, ctx.platform));

    if let Some(format) = report_format {
        report.collect_network();
        let Some(path) = report.write(format, None) else {
            anyhow::bail!("não foi possível gravar o relatório {format}");
        };
        println!("📝 Relatório salvo em: {}", path.display());
    }
    Ok(())
}

fn admin_warning() -> &'static str {
    "\n⚠️  AVISO: Algumas funcionalidades podem requerer privilégios de administrador.\n   Para melhor resultado, execute como Administrador.\n"
}

fn outcome_message(task: Task, outcome: &MaintenanceOutcome, platform: Platform) -> String {
    if outcome.is_empty() {
        return format!("ℹ️  Nada a executar em {platform}: recurso exclusivo do Windows.");
    }
    if outcome.all_succeeded() {
        let (title, next) = task.done();
        return format!("{}\n{next}", title.green().bold());
    }
    format!(
        "{}\n💡 Possíveis soluções:\n   • Execute como Administrador\n   • {}",
        format!(
            "⚠️  {} de {} etapa(s) falharam",
            outcome.steps - outcome.succeeded,
            outcome.steps
        )
        .yellow()
        .bold(),
        task.fix_hint()
    )
}
