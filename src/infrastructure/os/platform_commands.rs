//! Native diagnostic commands per platform and parsers for their output.
//!
//! Builders take the `Platform` explicitly so every variant can be tested
//! on any host.

use std::time::Duration;

use crate::domain::entities::process::ServiceCounts;
use crate::domain::ports::command::{CommandOutput, CommandSpec};
use crate::domain::value_objects::Platform;

/// Grace period added to a ping's own deadline before the runner kills it.
const PING_GRACE: Duration = Duration::from_secs(1);

/// Single echo request to `host`, answering within `timeout`.
#[must_use]
pub fn ping(platform: Platform, host: &str, timeout: Duration) -> CommandSpec {
    let secs = timeout.as_secs().max(1).to_string();
    let spec = match platform {
        Platform::Windows => CommandSpec::new("ping").args([
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().max(1).to_string(),
        ]),
        Platform::Linux => CommandSpec::new("ping").args(["-c", "1", "-W", secs.as_str()]),
        Platform::MacOs => CommandSpec::new("ping").args(["-c", "1", "-t", secs.as_str()]),
    };
    spec.args([host]).timeout(timeout + PING_GRACE)
}

#[must_use]
pub fn ip_configuration(platform: Platform) -> CommandSpec {
    match platform {
        Platform::Windows => CommandSpec::new("ipconfig"),
        Platform::Linux => CommandSpec::new("ip").args(["addr", "show"]),
        Platform::MacOs => CommandSpec::new("ifconfig"),
    }
}

/// Interactive `nslookup` session that prints the default server and exits.
#[must_use]
pub fn nslookup() -> CommandSpec {
    CommandSpec::new("nslookup").stdin("exit\n")
}

#[must_use]
pub fn logged_in_users(platform: Platform) -> CommandSpec {
    match platform {
        Platform::Windows => CommandSpec::new("query").args(["user"]),
        Platform::Linux | Platform::MacOs => CommandSpec::new("who"),
    }
}

#[must_use]
pub fn services(platform: Platform) -> CommandSpec {
    match platform {
        Platform::Windows => {
            CommandSpec::new("sc").args(["query", "type=", "service", "state=", "all"])
        }
        Platform::Linux => CommandSpec::new("systemctl").args([
            "list-units",
            "--type=service",
            "--all",
            "--no-legend",
            "--no-pager",
            "--plain",
        ]),
        Platform::MacOs => CommandSpec::new("launchctl").args(["list"]),
    }
}

/// One command of a maintenance sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceStep {
    /// Human-readable action recorded in the report
    pub description: &'static str,
    pub command: CommandSpec,
}

/// Commands that flush the resolver cache and renew addressing.
#[must_use]
pub fn flush_dns(platform: Platform) -> Vec<MaintenanceStep> {
    match platform {
        Platform::Windows => vec![
            MaintenanceStep {
                description: "Limpeza do cache DNS",
                command: CommandSpec::new("ipconfig").args(["/flushdns"]),
            },
            MaintenanceStep {
                description: "Registro DNS",
                command: CommandSpec::new("ipconfig").args(["/registerdns"]),
            },
            MaintenanceStep {
                description: "Liberação do endereço IP",
                command: CommandSpec::new("ipconfig").args(["/release"]),
            },
            MaintenanceStep {
                description: "Renovação do endereço IP",
                command: CommandSpec::new("ipconfig").args(["/renew"]),
            },
        ],
        Platform::Linux => vec![MaintenanceStep {
            description: "Limpeza do cache DNS",
            command: CommandSpec::new("resolvectl").args(["flush-caches"]),
        }],
        Platform::MacOs => vec![MaintenanceStep {
            description: "Limpeza do cache DNS",
            command: CommandSpec::new("dscacheutil").args(["-flushcache"]),
        }],
    }
}

/// Forced group policy refresh. Only Windows has group policies.
#[must_use]
pub fn group_policy_update(platform: Platform) -> Vec<MaintenanceStep> {
    match platform {
        Platform::Windows => vec![MaintenanceStep {
            description: "Atualização de políticas de grupo",
            command: CommandSpec::new("gpupdate").args(["/force"]),
        }],
        Platform::Linux | Platform::MacOs => Vec::new(),
    }
}

/// Print service control: stop, start and the status query confirming
/// the service came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolerCommands {
    pub stop: MaintenanceStep,
    pub start: MaintenanceStep,
    pub status: CommandSpec,
}

#[must_use]
pub fn print_spooler(platform: Platform) -> SpoolerCommands {
    let (stop, start, status) = match platform {
        Platform::Windows => (
            CommandSpec::new("net").args(["stop", "spooler"]),
            CommandSpec::new("net").args(["start", "spooler"]),
            CommandSpec::new("sc").args(["query", "spooler"]),
        ),
        Platform::Linux => (
            CommandSpec::new("systemctl").args(["stop", "cups"]),
            CommandSpec::new("systemctl").args(["start", "cups"]),
            CommandSpec::new("systemctl").args(["is-active", "cups"]),
        ),
        Platform::MacOs => (
            CommandSpec::new("launchctl").args(["stop", "org.cups.cupsd"]),
            CommandSpec::new("launchctl").args(["start", "org.cups.cupsd"]),
            CommandSpec::new("launchctl").args(["list", "org.cups.cupsd"]),
        ),
    };
    SpoolerCommands {
        stop: MaintenanceStep {
            description: "Parada do spooler de impressão",
            command: stop,
        },
        start: MaintenanceStep {
            description: "Início do spooler de impressão",
            command: start,
        },
        status,
    }
}

/// Directory of queued print jobs, cleared while the spooler is stopped.
///
/// CUPS keeps job control files next to history, so only Windows gets one.
#[must_use]
pub const fn spooler_queue_dir(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Windows => Some("C:\\Windows\\System32\\spool\\PRINTERS"),
        Platform::Linux | Platform::MacOs => None,
    }
}

/// Whether the status query reports the print service as running.
#[must_use]
pub fn parse_spooler_running(platform: Platform, output: &str) -> bool {
    match platform {
        Platform::Windows => output
            .lines()
            .any(|l| l.trim_start().starts_with("STATE") && l.contains("RUNNING")),
        Platform::Linux => output.trim() == "active",
        Platform::MacOs => output.lines().any(|l| l.trim_start().starts_with("\"PID\"")),
    }
}

/// Command whose exit status tells whether we run with administrator rights.
///
/// `net session` only succeeds from an elevated prompt.
#[must_use]
pub fn privilege_check(platform: Platform) -> CommandSpec {
    match platform {
        Platform::Windows => CommandSpec::new("net").args(["session"]),
        Platform::Linux | Platform::MacOs => CommandSpec::new("id").args(["-u"]),
    }
}

#[must_use]
pub fn parse_privilege_check(platform: Platform, output: &CommandOutput) -> bool {
    match platform {
        Platform::Windows => output.success(),
        Platform::Linux | Platform::MacOs => output.success() && output.stdout.trim() == "0",
    }
}

/// `nameserver` entries of a resolv.conf file, in file order.
#[must_use]
pub fn parse_resolv_conf(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => Some(addr.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// DNS servers announced by an `nslookup` session.
///
/// Each "Server:" line (also "Default Server:" and the localized
/// "Servidor:" forms) is paired with the address line that follows it;
/// the address wins when present.
#[must_use]
pub fn parse_nslookup_servers(output: &str) -> Vec<String> {
    let mut servers = Vec::new();
    let mut pending: Option<String> = None;

    for line in output.lines().map(str::trim) {
        if let Some(name) = field_value(line, &["Server:", "Servidor:", "Servidor Padrão:"]) {
            if let Some(previous) = pending.take() {
                servers.push(previous);
            }
            pending = Some(name.to_string());
        } else if let Some(addr) = field_value(line, &["Address:", "Endereço:", "Addresses:"]) {
            if pending.take().is_some() {
                servers.push(addr.to_string());
            }
        }
    }
    if let Some(name) = pending {
        servers.push(name);
    }
    servers.retain(|s| !s.is_empty());
    servers.dedup();
    servers
}

fn field_value<'a>(line: &'a str, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| line.split_once(key))
        .map(|(_, value)| value.trim())
}

/// Number of open sessions in `who` / `query user` output.
#[must_use]
pub fn parse_session_count(platform: Platform, output: &str) -> usize {
    let lines = output.lines().filter(|l| !l.trim().is_empty());
    match platform {
        // First line is the column header
        Platform::Windows => lines.skip(1).count(),
        Platform::Linux | Platform::MacOs => lines.count(),
    }
}

/// Total and running services in the service manager listing.
#[must_use]
pub fn parse_services(platform: Platform, output: &str) -> ServiceCounts {
    match platform {
        Platform::Windows => ServiceCounts {
            total: output
                .lines()
                .filter(|l| l.trim_start().starts_with("SERVICE_NAME:"))
                .count(),
            running: output
                .lines()
                .filter(|l| l.trim_start().starts_with("STATE") && l.contains("RUNNING"))
                .count(),
        },
        Platform::Linux => {
            let units: Vec<Vec<&str>> = output
                .lines()
                .map(|l| l.split_whitespace().collect::<Vec<_>>())
                .filter(|fields| fields.first().is_some_and(|u| u.ends_with(".service")))
                .collect();
            ServiceCounts {
                total: units.len(),
                running: units
                    .iter()
                    .filter(|fields| fields.get(3) == Some(&"running"))
                    .count(),
            }
        }
        Platform::MacOs => {
            let jobs: Vec<&str> = output
                .lines()
                .skip(1)
                .filter(|l| !l.trim().is_empty())
                .collect();
            ServiceCounts {
                total: jobs.len(),
                running: jobs
                    .iter()
                    .filter(|l| l.split_whitespace().next().is_some_and(|pid| pid != "-"))
                    .count(),
            }
        }
    }
}
