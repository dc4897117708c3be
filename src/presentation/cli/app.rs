use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::value_objects::ReportFormat;

/// suporte — helpdesk diagnostics
///
/// Collects system, network and process facts and writes
/// text, JSON or HTML diagnostic reports.
#[derive(Parser, Debug)]
#[command(name = "suporte")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (default: report)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gerar relatório de diagnóstico completo
    #[command(alias = "r")]
    Report {
        /// Formato de saída (text, json, html)
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Caminho do arquivo de saída
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Relatório rápido (sistema e rede apenas)
        #[arg(short, long)]
        quick: bool,
    },

    /// Mostrar estado atual do sistema
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnosticar a conexão de rede
    #[command(alias = "n")]
    Network {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Limpar o cache DNS
    #[command(alias = "f")]
    FlushDns {
        /// Gravar um relatório no formato indicado ao final
        #[arg(short, long)]
        report: Option<ReportFormat>,
    },

    /// Forçar a atualização das políticas de grupo (gpupdate /force)
    #[command(alias = "g")]
    Gpupdate {
        /// Gravar um relatório no formato indicado ao final
        #[arg(short, long)]
        report: Option<ReportFormat>,
    },

    /// Reiniciar o spooler de impressão e limpar a fila
    #[command(alias = "p")]
    Spooler {
        /// Gravar um relatório no formato indicado ao final
        #[arg(short, long)]
        report: Option<ReportFormat>,
    },
}
