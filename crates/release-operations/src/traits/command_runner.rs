use crate::Result;
use crate::types::{CommandOutput, CommandSpec};

pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion and captures its output. A non-zero
    /// exit is reported through [`CommandOutput::success`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}
