//! Core types for conanrun-sdk.
//!
//! This module defines the fundamental types used throughout the SDK:
//!
//! - [`RunnerError`] - Error types for validation, staging, and execution
//! - [`BuildMode`] - Build type passed to the packaging tool (Debug or Release)
//! - [`Platform`] - Host platform the commands are assembled for
//! - [`BuildRequest`] - The validated (platform, mode) pair driving assembly
//! - [`Variant`] - Which packaging-tool workflow is reproduced

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Error types for conanrun-sdk operations.
///
/// A non-zero exit code from the packaging tool is not an error here: it is
/// reported through [`crate::RunReport`] and propagated unchanged.
///
/// # Example
///
/// ```
/// use conanrun_sdk::{BuildMode, RunnerError};
///
/// match "fast".parse::<BuildMode>() {
///     Err(RunnerError::InvalidArgument(value)) => assert_eq!(value, "fast"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The build mode was missing or not one of `debug` / `release`.
    #[error("invalid build mode '{0}'. Enter debug or release")]
    InvalidArgument(String),

    /// The host platform has no command table.
    #[error("unsupported platform '{0}'. Supported platforms: Windows, Linux")]
    UnsupportedPlatform(String),

    /// The staging directory could not be created or entered.
    #[error(
        "failed to prepare staging directory {}: {}. Check permissions of the parent directory",
        .path.display(),
        .source
    )]
    Staging {
        /// Directory that was being created or entered.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}. Check file paths and permissions")]
    Io(#[from] std::io::Error),
}

/// Build type forwarded to the packaging tool as `-s build_type=<value>`.
///
/// Parsing is case-insensitive:
///
/// ```
/// use conanrun_sdk::BuildMode;
///
/// assert_eq!("DEBUG".parse::<BuildMode>().unwrap(), BuildMode::Debug);
/// assert_eq!("release".parse::<BuildMode>().unwrap(), BuildMode::Release);
/// assert!("".parse::<BuildMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Unoptimized build with debug information.
    Debug,
    /// Optimized build.
    Release,
}

impl BuildMode {
    /// Both modes, in the order the packaging workflow builds them.
    pub const ALL: [BuildMode; 2] = [BuildMode::Debug, BuildMode::Release];

    /// Returns the lowercase name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }

    /// Returns the value of the packaging tool's `build_type` setting.
    pub fn build_type(&self) -> &'static str {
        match self {
            BuildMode::Debug => "Debug",
            BuildMode::Release => "Release",
        }
    }
}

impl FromStr for BuildMode {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("debug") {
            Ok(BuildMode::Debug)
        } else if s.eq_ignore_ascii_case("release") {
            Ok(BuildMode::Release)
        } else {
            Err(RunnerError::InvalidArgument(s.to_string()))
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build_type())
    }
}

/// Host platform as seen by the command builder.
///
/// Only Windows and Linux have command tables; anything else is carried as
/// [`Platform::Unknown`] with the OS name so it can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    /// Any other OS, identified by its `std::env::consts::OS` name.
    Unknown(&'static str),
}

impl Platform {
    /// Maps an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &'static str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            other => Platform::Unknown(other),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unknown(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("Windows"),
            Platform::Linux => f.write_str("Linux"),
            Platform::Unknown(os) => f.write_str(os),
        }
    }
}

/// The validated (platform, mode) pair driving command assembly.
///
/// Built once per invocation and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    platform: Platform,
    mode: BuildMode,
}

impl BuildRequest {
    pub fn new(platform: Platform, mode: BuildMode) -> Self {
        Self { platform, mode }
    }

    /// Parses the caller's mode string and pairs it with the probed platform.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidArgument`] if `mode` is not a recognized
    /// build mode. The platform is not validated here; unsupported platforms
    /// are rejected when commands are assembled.
    pub fn parse(platform: Platform, mode: &str) -> Result<Self, RunnerError> {
        Ok(Self::new(platform, mode.parse()?))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }
}

/// Packaging-tool workflow reproduced by the builder.
///
/// | Variant | Subcommand | Staging directory |
/// |---------|------------|-------------------|
/// | [`Variant::Install`] | `install ..` | `build` |
/// | [`Variant::ProfiledInstall`] | `install .. --profile=... --no-imports` | `conan` |
/// | [`Variant::Create`] | `create . <maturity>/<release_type> -u --profile=...` | none |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Plain dependency install.
    #[default]
    Install,
    /// Dependency install using the per-platform profile file.
    ProfiledInstall,
    /// Package creation in the local cache, ready for upload.
    Create,
}

impl Variant {
    /// Returns the staging directory the workflow runs in, if any.
    pub fn default_staging_dir(&self) -> Option<&'static str> {
        match self {
            Variant::Install => Some("build"),
            Variant::ProfiledInstall => Some("conan"),
            Variant::Create => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        for raw in ["debug", "Debug", "DEBUG", "dEbUg"] {
            assert_eq!(raw.parse::<BuildMode>().unwrap(), BuildMode::Debug);
        }
        for raw in ["release", "Release", "RELEASE"] {
            assert_eq!(raw.parse::<BuildMode>().unwrap(), BuildMode::Release);
        }
    }

    #[test]
    fn test_mode_parsing_rejects_unknown_values() {
        for raw in ["", "fast", "relwithdebinfo", " debug", "debug "] {
            let err = raw.parse::<BuildMode>().unwrap_err();
            assert!(matches!(err, RunnerError::InvalidArgument(ref v) if v == raw));
        }
    }

    #[test]
    fn test_invalid_argument_message_has_hint() {
        let err = "fast".parse::<BuildMode>().unwrap_err();
        assert_eq!(err.to_string(), "invalid build mode 'fast'. Enter debug or release");
    }

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("macos"), Platform::Unknown("macos"));
        assert!(!Platform::from_os("freebsd").is_supported());
        assert_eq!(Platform::Unknown("macos").to_string(), "macos");
    }

    #[test]
    fn test_build_request_parse() {
        let request = BuildRequest::parse(Platform::Linux, "Release").unwrap();
        assert_eq!(request.platform(), Platform::Linux);
        assert_eq!(request.mode(), BuildMode::Release);

        assert!(BuildRequest::parse(Platform::Windows, "none").is_err());
    }

    #[test]
    fn test_variant_staging_dirs() {
        assert_eq!(Variant::Install.default_staging_dir(), Some("build"));
        assert_eq!(Variant::ProfiledInstall.default_staging_dir(), Some("conan"));
        assert_eq!(Variant::Create.default_staging_dir(), None);
        assert_eq!(Variant::default(), Variant::Install);
    }
}
