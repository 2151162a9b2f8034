//! Conan command runner SDK
//!
//! `conanrun-sdk` assembles and runs the packaging-tool (Conan) invocations
//! used to install the dependencies of, and package, the Pulsar C++ client
//! library. The tool itself is treated as an opaque subprocess: this crate
//! decides *which* commands to run for a platform and build mode, runs them
//! inside a staging directory, and reports their exit codes.
//!
//! # Architecture
//!
//! - **Types**: [`BuildMode`], [`Platform`], [`BuildRequest`], [`Variant`], [`RunnerError`]
//! - **Platform**: [`PlatformProbe`] abstracts host detection ([`HostPlatform`], [`FixedPlatform`])
//! - **Command**: [`CommandSpec`] is a structured invocation that serializes to argv
//! - **Builders**: [`builders::CommandBuilder`] maps requests to commands per variant
//! - **Staging**: [`StagingDir`] enters a working directory and restores the previous one on drop
//! - **Executor**: [`CommandExecutor`] runs one command ([`ProcessExecutor`] spawns it)
//! - **Runner**: [`Runner`] validates, stages, executes, and returns a [`RunReport`]
//!
//! # Example
//!
//! ```ignore
//! use conanrun_sdk::{BuildRequest, HostPlatform, PlatformProbe, Runner, Variant};
//!
//! fn main() -> Result<(), conanrun_sdk::RunnerError> {
//!     let request = BuildRequest::parse(HostPlatform.probe(), "Release")?;
//!     let report = Runner::new(Variant::Install).run(&request)?;
//!     println!("INSTALL COMMAND FINISHED WITH CODE {}", report.exit_code());
//!     Ok(())
//! }
//! ```

// Public modules
pub mod builders;
pub mod command;
pub mod executor;
pub mod platform;
pub mod runner;
pub mod staging;
pub mod types;

// Re-export key types for convenience
pub use builders::{CommandBuilder, PackageChannel, ToolSettings};
pub use command::{CommandArg, CommandSpec, Subcommand};
pub use executor::{CommandExecutor, ProcessExecutor};
pub use platform::{FixedPlatform, HostPlatform, PlatformProbe};
pub use runner::{CommandOutcome, RunReport, Runner};
pub use staging::StagingDir;
pub use types::{BuildMode, BuildRequest, Platform, RunnerError, Variant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The process working directory is global, so tests that change it take
/// this lock and restore the directory on exit.
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    static CWD_LOCK: Mutex<()> = Mutex::new(());

    pub fn lock_cwd() -> MutexGuard<'static, ()> {
        CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub struct CwdRestore(PathBuf);

    impl CwdRestore {
        pub fn capture() -> Self {
            Self(std::env::current_dir().unwrap())
        }
    }

    impl Drop for CwdRestore {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }
}
