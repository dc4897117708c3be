use thiserror::Error;

use crate::domain::entities::record::DiagnosticRecord;
use crate::domain::value_objects::ReportFormat;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to serialize report: {0}")]
    Serialization(String),
}

/// Serializes a diagnostic record to one output format.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    /// # Errors
    ///
    /// Returns `RenderError` if the record cannot be serialized.
    fn render(&self, record: &DiagnosticRecord) -> Result<String, RenderError>;
}
