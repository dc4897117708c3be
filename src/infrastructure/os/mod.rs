pub mod command_runner;
pub mod platform_commands;
