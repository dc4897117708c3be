pub mod status_fmt;
pub mod table_fmt;
