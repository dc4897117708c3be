use serde::{Deserialize, Serialize};

/// Operating system family, used to pick the native diagnostic commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Platform this binary was compiled for. Other unices are treated as Linux.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Mount point of the volume holding the operating system.
    #[must_use]
    pub const fn primary_volume(&self) -> &str {
        match self {
            Self::Windows => "C:\\",
            Self::Linux | Self::MacOs => "/",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::Linux => write!(f, "Linux"),
            Self::MacOs => write!(f, "macOS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_volume_per_platform() {
        assert_eq!(Platform::Windows.primary_volume(), "C:\\");
        assert_eq!(Platform::Linux.primary_volume(), "/");
        assert_eq!(Platform::MacOs.primary_volume(), "/");
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn current_matches_build_target() {
        assert_eq!(Platform::current(), Platform::Linux);
    }
}
