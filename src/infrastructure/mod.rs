pub mod collectors;
pub mod logging;
pub mod os;
pub mod renderers;
