//! Command assembly for the packaging tool.
//!
//! This module maps a [`BuildRequest`] to the ordered list of
//! [`CommandSpec`]s that reproduce one workflow on the requested platform.
//!
//! ## Overview
//!
//! Every command is a fixed base invocation, followed by the mode-specific
//! settings and the platform-specific profile and runtime selections:
//!
//! | Variant | Platform | Extra arguments |
//! |---------|----------|-----------------|
//! | Install | Linux | none |
//! | Install | Windows | `-s compiler.runtime=dynamic` |
//! | ProfiledInstall | Linux | `--profile=../linuxprofile.txt`, `--no-imports` |
//! | ProfiledInstall | Windows | `--profile=../winprofile.txt`, `-s compiler.runtime=dynamic`, `--no-imports` |
//! | Create | Linux | `prod/test -u --profile=../linuxprofile.txt` |
//! | Create | Windows | `prod/test -u --profile=../winprofile.txt`, `-s compiler.runtime=MDd` or `MD` |
//!
//! Assembly is pure: the same request and settings always produce the same
//! commands, and nothing is executed here.
//!
//! ## Example
//!
//! ```
//! use conanrun_sdk::builders::CommandBuilder;
//! use conanrun_sdk::{BuildMode, BuildRequest, Platform, Variant};
//!
//! let builder = CommandBuilder::new(Variant::Install);
//! let request = BuildRequest::new(Platform::Linux, BuildMode::Release);
//! let commands = builder.commands(&request)?;
//!
//! assert_eq!(
//!     commands[0].to_argv(),
//!     ["conan", "install", "..", "--build=missing", "-s", "build_type=Release"]
//! );
//! # Ok::<(), conanrun_sdk::RunnerError>(())
//! ```

mod install;
mod package;

use crate::command::CommandSpec;
use crate::types::{BuildRequest, Platform, RunnerError, Variant};

/// Default packaging-tool executable.
pub const DEFAULT_PROGRAM: &str = "conan";

/// Channel half of the recipe reference, `<maturity>/<release_type>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageChannel {
    /// Either `dev`, `prod`, etc.
    pub maturity: String,
    /// Either `alpha`, `beta`, `test`, etc.
    pub release_type: String,
}

impl Default for PackageChannel {
    fn default() -> Self {
        Self {
            maturity: "prod".to_string(),
            release_type: "test".to_string(),
        }
    }
}

impl PackageChannel {
    /// Returns the `<maturity>/<release_type>` reference passed to `create`.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.maturity, self.release_type)
    }
}

/// Values the command tables are parameterized over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Packaging-tool executable name or path.
    pub program: String,
    /// Profile file used on Windows, relative to the working directory.
    pub windows_profile: String,
    /// Profile file used on Linux, relative to the working directory.
    pub linux_profile: String,
    /// Channel used by the create workflow.
    pub channel: PackageChannel,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            windows_profile: "../winprofile.txt".to_string(),
            linux_profile: "../linuxprofile.txt".to_string(),
            channel: PackageChannel::default(),
        }
    }
}

impl ToolSettings {
    /// Returns the profile file for a supported platform.
    pub(crate) fn profile_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Windows => Some(&self.windows_profile),
            Platform::Linux => Some(&self.linux_profile),
            Platform::Unknown(_) => None,
        }
    }
}

/// Maps build requests to packaging-tool invocations for one [`Variant`].
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    variant: Variant,
    settings: ToolSettings,
}

impl CommandBuilder {
    /// Creates a builder for `variant` with the default [`ToolSettings`].
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            settings: ToolSettings::default(),
        }
    }

    /// Replaces the tool settings.
    pub fn settings(mut self, settings: ToolSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Assembles the commands for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::UnsupportedPlatform`] if the request targets a
    /// platform without a command table. No commands are produced in that case.
    pub fn commands(&self, request: &BuildRequest) -> Result<Vec<CommandSpec>, RunnerError> {
        let platform = request.platform();
        if !platform.is_supported() {
            return Err(RunnerError::UnsupportedPlatform(platform.to_string()));
        }

        let command = match self.variant {
            Variant::Install => install::plain(&self.settings, request),
            Variant::ProfiledInstall => install::profiled(&self.settings, request),
            Variant::Create => package::create(&self.settings, request),
        };
        log::debug!(
            "assembled {:?} command for {} {}: {}",
            self.variant,
            platform,
            request.mode(),
            command
        );
        Ok(vec![command])
    }

    /// Assembles the commands for several requests, in order.
    ///
    /// Every request is validated before any command is returned, so an
    /// unsupported platform anywhere in the batch yields no commands at all.
    pub fn commands_for_all(
        &self,
        requests: &[BuildRequest],
    ) -> Result<Vec<CommandSpec>, RunnerError> {
        let mut commands = Vec::new();
        for request in requests {
            commands.extend(self.commands(request)?);
        }
        Ok(commands)
    }
}
