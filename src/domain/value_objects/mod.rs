pub mod output_encoding;
pub mod platform;
pub mod probe_method;
pub mod problem_category;
pub mod report_format;
pub mod thresholds;

pub use output_encoding::OutputEncoding;
pub use platform::Platform;
pub use probe_method::ProbeMethod;
pub use problem_category::ProblemCategory;
pub use report_format::ReportFormat;
pub use thresholds::ThresholdSet;
