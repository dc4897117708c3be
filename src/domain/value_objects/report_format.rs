use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format of a rendered diagnostic report
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl ReportFormat {
    /// File extension used for timestamp-derived report paths.
    #[must_use]
    pub const fn extension(&self) -> &str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Html => write!(f, "html"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "texto" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" | "htm" => Ok(Self::Html),
            other => Err(format!(
                "formato desconhecido: '{other}'. Formatos válidos: text, json, html"
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("texto".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert_eq!("TXT".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert_eq!(" json ".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("html".parse::<ReportFormat>(), Ok(ReportFormat::Html));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "pdf".parse::<ReportFormat>().expect_err("pdf is not supported");
        assert!(err.contains("pdf"));
    }

    #[test]
    fn extensions() {
        assert_eq!(ReportFormat::Text.extension(), "txt");
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Html.extension(), "html");
    }

    #[test]
    fn default_is_text() {
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }
}
