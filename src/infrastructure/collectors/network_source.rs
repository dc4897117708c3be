use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use sysinfo::Networks;

use crate::domain::ports::collector::{CollectionError, NetworkSource};
use crate::domain::ports::command::{CommandError, CommandRunner};
use crate::domain::value_objects::{Platform, ProbeMethod};
use crate::infrastructure::os::platform_commands;

const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Network facts from native tools, the resolver configuration and `sysinfo`.
pub struct HostNetworkSource {
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
    method: ProbeMethod,
    tcp_port: u16,
    command_timeout: Duration,
}

impl HostNetworkSource {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform) -> Self {
        Self {
            runner,
            platform,
            method: ProbeMethod::default(),
            tcp_port: 443,
            command_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_probe(mut self, method: ProbeMethod, tcp_port: u16) -> Self {
        self.method = method;
        self.tcp_port = tcp_port;
        self
    }

    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    fn ping(&self, host: &str, timeout: Duration) -> Result<bool, CollectionError> {
        let spec = platform_commands::ping(self.platform, host, timeout);
        match self.runner.run(&spec) {
            Ok(output) => Ok(output.success()),
            Err(CommandError::Timeout { .. }) => {
                tracing::debug!(host, "ping sem resposta dentro do prazo");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// TCP handshake with any address of `host`. Resolution and every
    /// connection attempt share the one `timeout`.
    fn tcp_connect(&self, host: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        resolve_within(host, self.tcp_port, timeout).is_some_and(|addrs| connect_any(addrs, deadline))
    }
}

/// Resolves `host` on a helper thread so a stalled resolver cannot
/// outlive `timeout`. The thread is left to finish on its own.
fn resolve_within(host: &str, port: u16, timeout: Duration) -> Option<Vec<SocketAddr>> {
    let (tx, rx) = mpsc::channel();
    let target = host.to_string();
    thread::spawn(move || {
        let result = (target.as_str(), port)
            .to_socket_addrs()
            .map(|addrs| addrs.collect::<Vec<_>>());
        // receiver may already have given up
        let _ = tx.send(result);
    });
    match rx.recv_timeout(timeout) {
        Ok(Ok(addrs)) => Some(addrs),
        Ok(Err(e)) => {
            tracing::debug!(host, "falha ao resolver: {e}");
            None
        }
        Err(_) => {
            tracing::debug!(host, "resolução sem resposta dentro do prazo");
            None
        }
    }
}

/// First successful connection wins; attempts stop once `deadline` passes.
fn connect_any(addrs: impl IntoIterator<Item = SocketAddr>, deadline: Instant) -> bool {
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::debug!(%addr, "prazo esgotado antes da conexão");
            break;
        }
        match TcpStream::connect_timeout(&addr, remaining) {
            Ok(_) => return true,
            Err(e) => tracing::debug!(%addr, "conexão recusada: {e}"),
        }
    }
    false
}

impl NetworkSource for HostNetworkSource {
    fn probe(&self, host: &str, timeout: Duration) -> Result<bool, CollectionError> {
        match self.method {
            ProbeMethod::Ping => self.ping(host, timeout),
            ProbeMethod::Tcp => Ok(self.tcp_connect(host, timeout)),
        }
    }

    fn ip_configuration(&self) -> Result<String, CollectionError> {
        let spec = platform_commands::ip_configuration(self.platform).timeout(self.command_timeout);
        let output = self.runner.run(&spec)?.require_success(&spec)?;
        Ok(output.stdout)
    }

    fn dns_servers(&self) -> Result<Vec<String>, CollectionError> {
        match self.platform {
            Platform::Windows => {
                let spec = platform_commands::nslookup().timeout(self.command_timeout);
                let output = self.runner.run(&spec)?.require_success(&spec)?;
                Ok(platform_commands::parse_nslookup_servers(&output.stdout))
            }
            Platform::Linux | Platform::MacOs => {
                let content = std::fs::read_to_string(RESOLV_CONF).map_err(|e| {
                    CollectionError::MetricsUnavailable(format!("{RESOLV_CONF}: {e}"))
                })?;
                Ok(platform_commands::parse_resolv_conf(&content))
            }
        }
    }

    fn active_interfaces(&self) -> Result<Vec<String>, CollectionError> {
        let networks = Networks::new_with_refreshed_list();
        let mut names: Vec<String> = networks
            .list()
            .iter()
            .filter(|(name, data)| {
                link_is_up(name, has_traffic(data.total_received(), data.total_transmitted()))
            })
            .map(|(name, _)| name.clone())
            .collect();
        if names.is_empty() && networks.list().is_empty() {
            return Err(CollectionError::MetricsUnavailable(
                "no network interfaces reported".to_string(),
            ));
        }
        names.sort();
        Ok(names)
    }
}

/// Counters are cumulative and may sit near `u64::MAX` on long-lived links.
const fn has_traffic(received: u64, transmitted: u64) -> bool {
    received.saturating_add(transmitted) > 0
}

/// Link state from `/sys/class/net` where available, traffic otherwise.
///
/// Loopback and some tunnels report "unknown"; those count when they
/// have carried traffic.
#[cfg(target_os = "linux")]
fn link_is_up(name: &str, has_traffic: bool) -> bool {
    match std::fs::read_to_string(format!("/sys/class/net/{name}/operstate")) {
        Ok(state) => match state.trim() {
            "up" => true,
            "unknown" => has_traffic,
            _ => false,
        },
        Err(_) => has_traffic,
    }
}

#[cfg(not(target_os = "linux"))]
fn link_is_up(_name: &str, has_traffic: bool) -> bool {
    has_traffic
}
