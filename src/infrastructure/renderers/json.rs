use crate::domain::entities::record::DiagnosticRecord;
use crate::domain::ports::renderer::{RenderError, ReportRenderer};
use crate::domain::value_objects::ReportFormat;

/// Pretty-printed JSON of the whole record.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, record: &DiagnosticRecord) -> Result<String, RenderError> {
        serde_json::to_string_pretty(record).map_err(|e| RenderError::Serialization(e.to_string()))
    }
}
