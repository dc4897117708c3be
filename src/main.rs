use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use suporte::application::config::AppConfig;
use suporte::application::services::report::DiagnosticReport;
use suporte::domain::ports::command::CommandRunner;
use suporte::domain::value_objects::Platform;
use suporte::infrastructure::collectors::network_source::HostNetworkSource;
use suporte::infrastructure::collectors::sysinfo_collector::SysinfoSource;
use suporte::infrastructure::logging;
use suporte::infrastructure::os::command_runner::SystemCommandRunner;
use suporte::presentation::cli::app::{Cli, Commands};
use suporte::presentation::cli::commands::maintenance::{run_maintenance, MaintenanceContext, Task};
use suporte::presentation::cli::commands::network::run_network;
use suporte::presentation::cli::commands::report::run_report;
use suporte::presentation::cli::commands::status::run_status;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  SUPORTE — Diagnóstico Técnico".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    logging::init(cli.verbose, config.log_file().as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "suporte iniciado");

    // Manual DI — main.rs is the only place that knows concrete types
    let platform = Platform::current();
    let runner: Arc<dyn CommandRunner> =
        Arc::new(SystemCommandRunner::new(config.network.encoding));
    let system = SysinfoSource::new(Arc::clone(&runner), platform);
    let network = HostNetworkSource::new(Arc::clone(&runner), platform)
        .with_probe(config.network.probe_method, config.network.tcp_port)
        .with_command_timeout(config.command_timeout());
    let settings = config.report_settings();
    let mut report = DiagnosticReport::new(&system, &network, &system, &settings);
    let maintenance = MaintenanceContext {
        runner: runner.as_ref(),
        platform,
        command_timeout: config.command_timeout(),
        gpupdate_timeout: config.gpupdate_timeout(),
    };

    let json_output = matches!(
        cli.command,
        Some(Commands::Status { json: true } | Commands::Network { json: true })
    );
    if !json_output {
        print_banner();
    }

    match cli.command {
        Some(Commands::Report {
            format,
            output,
            quick,
        }) => {
            let format = format.unwrap_or(config.report.default_format);
            run_report(&mut report, format, output.as_deref(), quick)?;
        }
        Some(Commands::Status { json }) => run_status(&mut report, json)?,
        Some(Commands::Network { json }) => run_network(&mut report, json)?,
        Some(Commands::FlushDns { report: format }) => {
            run_maintenance(&mut report, &maintenance, Task::FlushDns, format)?;
        }
        Some(Commands::Gpupdate { report: format }) => {
            run_maintenance(&mut report, &maintenance, Task::GroupPolicy, format)?;
        }
        Some(Commands::Spooler { report: format }) => {
            run_maintenance(&mut report, &maintenance, Task::PrintSpooler, format)?;
        }
        None => run_report(&mut report, config.report.default_format, None, false)?,
    }

    tracing::info!("suporte encerrado");
    Ok(())
}
