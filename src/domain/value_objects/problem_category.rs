use serde::{Deserialize, Serialize};

/// Section of the diagnostic record a problem belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProblemCategory {
    System,
    Network,
    Programs,
    /// Rendering or writing the report itself failed
    Report,
}

impl std::fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Network => write!(f, "network"),
            Self::Programs => write!(f, "programs"),
            Self::Report => write!(f, "report"),
        }
    }
}

impl ProblemCategory {
    /// Every category, in report order.
    pub const ALL: [Self; 4] = [Self::System, Self::Network, Self::Programs, Self::Report];

    /// Label shown to the operator in rendered reports.
    #[must_use]
    pub const fn label(&self) -> &str {
        match self {
            Self::System => "Sistema",
            Self::Network => "Rede",
            Self::Programs => "Programas",
            Self::Report => "Relatório",
        }
    }
}
