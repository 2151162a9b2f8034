//! Staged command execution.
//!
//! [`Runner`] ties the pieces together: it assembles the commands for one or
//! more [`BuildRequest`]s, enters the staging directory, executes every
//! command in order, restores the working directory, and returns a
//! [`RunReport`] with each command's exit code.
//!
//! Validation happens before anything touches the filesystem: an unsupported
//! platform returns an error without creating the staging directory or
//! spawning a process. Once execution starts, every assembled command is
//! attempted even if an earlier one failed.
//!
//! # Example
//!
//! ```ignore
//! use conanrun_sdk::{BuildRequest, HostPlatform, PlatformProbe, Runner, Variant};
//!
//! let request = BuildRequest::parse(HostPlatform.probe(), "release")?;
//! let report = Runner::new(Variant::Install).run(&request)?;
//! std::process::exit(report.exit_code());
//! ```

use std::path::{Path, PathBuf};

use crate::builders::{CommandBuilder, ToolSettings};
use crate::command::CommandSpec;
use crate::executor::{CommandExecutor, ProcessExecutor, SPAWN_FAILURE_CODE};
use crate::staging::StagingDir;
use crate::types::{BuildRequest, RunnerError, Variant};

/// Exit code of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: CommandSpec,
    pub exit_code: i32,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Ordered outcomes of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<CommandOutcome>,
}

impl RunReport {
    /// Exit code of the last executed command, or 0 if nothing ran.
    pub fn exit_code(&self) -> i32 {
        self.outcomes.last().map_or(0, |o| o.exit_code)
    }

    /// Returns `true` if every executed command exited with 0.
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(CommandOutcome::success)
    }

    /// Outcomes of the commands that exited non-zero.
    pub fn failures(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.outcomes.iter().filter(|o| !o.success())
    }
}

/// Assembles, stages, and executes packaging-tool commands.
///
/// The executor defaults to [`ProcessExecutor`]; any [`CommandExecutor`] can
/// be supplied with [`Runner::with_executor`].
#[derive(Debug)]
pub struct Runner<E = ProcessExecutor> {
    builder: CommandBuilder,
    staging_dir: Option<PathBuf>,
    executor: E,
}

impl Runner<ProcessExecutor> {
    /// Creates a runner for `variant` that spawns real processes.
    ///
    /// The staging directory defaults to the variant's own
    /// ([`Variant::default_staging_dir`]).
    pub fn new(variant: Variant) -> Self {
        Self::with_executor(variant, ProcessExecutor)
    }
}

impl<E: CommandExecutor> Runner<E> {
    /// Creates a runner for `variant` that hands commands to `executor`.
    pub fn with_executor(variant: Variant, executor: E) -> Self {
        Self {
            builder: CommandBuilder::new(variant),
            staging_dir: variant.default_staging_dir().map(PathBuf::from),
            executor,
        }
    }

    /// Replaces the tool settings used for command assembly.
    pub fn settings(mut self, settings: ToolSettings) -> Self {
        self.builder = self.builder.settings(settings);
        self
    }

    /// Overrides the staging directory. `None` runs in the current directory.
    pub fn staging_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.staging_dir = dir;
        self
    }

    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    pub fn staging_path(&self) -> Option<&Path> {
        self.staging_dir.as_deref()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs the commands for a single request.
    pub fn run(&mut self, request: &BuildRequest) -> Result<RunReport, RunnerError> {
        self.run_all(std::slice::from_ref(request))
    }

    /// Runs the commands for every request as one staged batch.
    ///
    /// # Errors
    ///
    /// - [`RunnerError::UnsupportedPlatform`] if any request has no command
    ///   table; nothing is staged or executed.
    /// - [`RunnerError::Staging`] / [`RunnerError::Io`] if the staging
    ///   directory cannot be prepared; nothing is executed.
    ///
    /// Non-zero exit codes from the tool are not errors; inspect the returned
    /// [`RunReport`].
    pub fn run_all(&mut self, requests: &[BuildRequest]) -> Result<RunReport, RunnerError> {
        let commands = self.builder.commands_for_all(requests)?;

        let _staging = match &self.staging_dir {
            Some(dir) => Some(StagingDir::enter(dir)?),
            None => None,
        };

        let mut report = RunReport::default();
        for command in commands {
            println!("Running command: {}", command);
            let exit_code = match self.executor.execute(&command) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!(
                        "Failed to start {}: {}. Ensure the tool is installed and available on PATH.",
                        command.program(),
                        e
                    );
                    SPAWN_FAILURE_CODE
                }
            };
            if exit_code == 0 {
                log::info!("{} {} succeeded", command.program(), command.subcommand().as_str());
            } else {
                log::warn!(
                    "{} {} exited with code {}",
                    command.program(),
                    command.subcommand().as_str(),
                    exit_code
                );
            }
            report.outcomes.push(CommandOutcome { command, exit_code });
        }

        Ok(report)
    }
}
