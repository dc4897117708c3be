use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::network::NetworkSection;
use super::process::ProgramsSection;
use super::system::SystemSection;
use crate::domain::value_objects::{Platform, ProblemCategory};

/// Name written into every report header.
pub const TOOL_NAME: &str = "Sistema de Suporte Técnico";

/// Placeholder used when the host name cannot be determined.
pub const UNKNOWN_HOST: &str = "desconhecido";

/// Facts fixed when the record is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub tool: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub platform: String,
    pub architecture: String,
    pub hostname: String,
}

impl Metadata {
    /// Metadata for the running binary on the current host.
    #[must_use]
    pub fn for_host(hostname: Option<String>) -> Self {
        let hostname = hostname
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| UNKNOWN_HOST.to_string());
        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            platform: Platform::current().to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            hostname,
        }
    }
}

/// A problem detected while collecting or rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub category: ProblemCategory,
    pub description: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// A corrective action performed during the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything a single report run has gathered.
///
/// Sections start empty and are replaced wholesale by the collectors;
/// `problems` and `actions` only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub metadata: Metadata,
    #[serde(default)]
    pub system: SystemSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub programs: ProgramsSection,
    #[serde(default)]
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl DiagnosticRecord {
    #[must_use]
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            system: SystemSection::default(),
            network: NetworkSection::default(),
            programs: ProgramsSection::default(),
            problems: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push_problem(
        &mut self,
        category: ProblemCategory,
        description: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.problems.push(Problem {
            category,
            description: description.into(),
            details: details.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn push_action(&mut self, action: impl Into<String>, result: impl Into<String>) {
        self.actions.push(Action {
            action: action.into(),
            result: result.into(),
            timestamp: Utc::now(),
        });
    }

    /// Problems recorded under `category`, in insertion order.
    pub fn problems_in(&self, category: ProblemCategory) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(move |p| p.category == category)
    }
}
