mod commands;
mod history;

pub use commands::Command;
pub use history::{CommandHistory, DEFAULT_MAX_DEPTH};

use crate::error::CommandError;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;
