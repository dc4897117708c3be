pub mod collector;
pub mod command;
pub mod renderer;

pub use collector::{CollectionError, NetworkSource, ProgramSource, SystemSource};
pub use command::{CommandError, CommandOutput, CommandRunner, CommandSpec};
pub use renderer::{RenderError, ReportRenderer};
