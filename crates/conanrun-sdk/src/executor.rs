//! Child-process execution.
//!
//! The runner hands each [`CommandSpec`] to a [`CommandExecutor`] and only
//! looks at the exit code it returns. [`ProcessExecutor`] spawns the real
//! process and waits for it; the child's stdout and stderr are inherited.

use std::io;
use std::process::ExitStatus;

use crate::command::CommandSpec;

/// Exit code recorded when the packaging tool cannot be started at all.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Runs one invocation to completion and reports its exit code.
pub trait CommandExecutor {
    /// Runs `command` synchronously.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only if the process could not be spawned or
    /// waited on. A process that ran and failed is reported through its exit
    /// code.
    fn execute(&mut self, command: &CommandSpec) -> io::Result<i32>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &mut E {
    fn execute(&mut self, command: &CommandSpec) -> io::Result<i32> {
        (**self).execute(command)
    }
}

/// Spawns real child processes with inherited standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    fn execute(&mut self, command: &CommandSpec) -> io::Result<i32> {
        let status = command.to_command().status()?;
        Ok(exit_code(status))
    }
}

/// Converts an exit status into a shell-style exit code.
///
/// A child terminated by a signal reports `128 + signal` on Unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
