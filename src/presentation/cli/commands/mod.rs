pub mod maintenance;
pub mod network;
pub mod report;
pub mod status;
