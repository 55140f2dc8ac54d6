//! 命令行接口模块

pub mod args;
pub mod commands;

pub use args::{Args, Commands, LogLevel, OutputFormat};
pub use commands::{CheckCommand, Command, ValidateCommand, VersionCommand};
