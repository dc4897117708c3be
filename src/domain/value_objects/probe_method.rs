use serde::{Deserialize, Serialize};

/// How reachability probes are performed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// One ICMP echo through the system `ping` command
    #[default]
    Ping,
    /// TCP connect to a fixed port, no subprocess needed
    Tcp,
}

impl std::fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}
