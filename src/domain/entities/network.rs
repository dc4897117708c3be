use serde::{Deserialize, Serialize};

/// Connectivity, addressing and interface state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSection {
    /// One entry per configured probe host, in configuration order
    pub connectivity: Vec<ProbeResult>,
    pub ip_configuration: Option<String>,
    pub dns_servers: Vec<String>,
    pub active_interfaces: Vec<String>,
    pub connections: Vec<Connection>,
}

impl NetworkSection {
    /// True when at least one probe target answered.
    #[must_use]
    pub fn has_internet(&self) -> bool {
        self.connectivity.iter().any(|p| p.reachable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub host: String,
    pub reachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Wired,
    Wireless,
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wired => write!(f, "cabo"),
            Self::Wireless => write!(f, "wifi"),
        }
    }
}

/// An active interface whose link type could be identified from its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub interface: String,
}

const WIRELESS_TERMS: &[&str] = &["wifi", "wi-fi", "wireless", "wlan"];
const WIRED_TERMS: &[&str] = &["ethernet", "eth", "local", "cable"];

/// Guesses the link type of an interface from its name.
///
/// Covers Windows adapter names ("Wi-Fi", "Ethernet 2") and predictable
/// Linux/macOS names (`wlp3s0`, `enp0s31f6`, `en0`). Returns `None` for
/// loopback, virtual and unrecognized interfaces.
#[must_use]
pub fn classify_interface(name: &str) -> Option<ConnectionKind> {
    let lower = name.to_lowercase();
    if WIRELESS_TERMS.iter().any(|t| lower.contains(t)) || lower.starts_with("wl") {
        Some(ConnectionKind::Wireless)
    } else if WIRED_TERMS.iter().any(|t| lower.contains(t)) || lower.starts_with("en") {
        Some(ConnectionKind::Wired)
    } else {
        None
    }
}

/// Classified connections among `interfaces`, preserving their order.
#[must_use]
pub fn classify_connections(interfaces: &[String]) -> Vec<Connection> {
    interfaces
        .iter()
        .filter_map(|name| {
            classify_interface(name).map(|kind| Connection {
                kind,
                interface: name.clone(),
            })
        })
        .collect()
}
