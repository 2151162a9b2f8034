//! Configuration file support for conanrun.
//!
//! This module provides support for `conanrun.toml` configuration files that
//! pin the packaging-tool settings for a checkout, so the wrappers keep the
//! single `--mode` flag on the command line.
//!
//! ## Configuration File Location
//!
//! The configuration file is searched for in the following order:
//! 1. Current working directory (`./conanrun.toml`)
//! 2. Parent directories (up to the repository root or filesystem root)
//!
//! ## Example Configuration
//!
//! ```toml
//! [tool]
//! program = "conan"
//!
//! [install]
//! variant = "profiled"
//! staging_dir = "conan"
//!
//! [profiles]
//! windows = "../winprofile.txt"
//! linux = "../linuxprofile.txt"
//!
//! [package]
//! name = "pulsar"
//! version = "3.1.1"
//! maturity = "prod"
//! release_type = "test"
//! remote_url = "https://example.jfrog.io/artifactory/api/conan/conan-local"
//! ```
//!
//! ## Environment
//!
//! `CONANRUN_TOOL` overrides `tool.program`. It may be set in `.env.local`
//! next to the configuration file.

use anyhow::{Context, Result};
use conanrun_sdk::{PackageChannel, ToolSettings, Variant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "conanrun.toml";

/// Environment variable overriding the packaging-tool executable.
pub const TOOL_ENV_VAR: &str = "CONANRUN_TOOL";

/// Root configuration structure for `conanrun.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConanrunConfig {
    /// Packaging-tool executable.
    pub tool: ToolConfig,

    /// Install workflow selection.
    pub install: InstallConfig,

    /// Per-platform profile files.
    pub profiles: ProfilesConfig,

    /// Package identity and publishing target.
    pub package: PackageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name or path. Defaults to "conan".
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: conanrun_sdk::builders::DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// Which install command table `conan-install` uses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallVariant {
    /// `install .. --build=missing ...`, staged in `build/`.
    #[default]
    Plain,
    /// `install .. --profile=... --no-imports`, staged in `conan/`.
    Profiled,
}

impl From<InstallVariant> for Variant {
    fn from(variant: InstallVariant) -> Self {
        match variant {
            InstallVariant::Plain => Variant::Install,
            InstallVariant::Profiled => Variant::ProfiledInstall,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Install command table. Defaults to `plain`.
    pub variant: InstallVariant,

    /// Staging directory, relative to the current directory.
    ///
    /// Defaults to `build` for `plain` and `conan` for `profiled`.
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Profile file passed on Windows.
    pub windows: String,
    /// Profile file passed on Linux.
    pub linux: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        let defaults = ToolSettings::default();
        Self {
            windows: defaults.windows_profile,
            linux: defaults.linux_profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Recipe name used in the upload reference.
    pub name: String,
    /// Recipe version used in the upload reference.
    pub version: String,
    /// Either dev, prod, etc.
    pub maturity: String,
    /// Either alpha, beta, test, etc.
    pub release_type: String,
    /// Remote repository URL shown in the publish instructions.
    pub remote_url: Option<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        let channel = PackageChannel::default();
        Self {
            name: "pulsar".to_string(),
            version: "3.1.1".to_string(),
            maturity: channel.maturity,
            release_type: channel.release_type,
            remote_url: None,
        }
    }
}

impl PackageConfig {
    pub fn channel(&self) -> PackageChannel {
        PackageChannel {
            maturity: self.maturity.clone(),
            release_type: self.release_type.clone(),
        }
    }

    /// Full upload reference, `<name>/<version>@<maturity>/<release_type>`.
    pub fn reference(&self) -> String {
        format!("{}/{}@{}", self.name, self.version, self.channel().reference())
    }
}

impl ConanrunConfig {
    /// Loads configuration from the specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: ConanrunConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Attempts to find and load configuration from the current directory
    /// or any parent directory.
    pub fn discover() -> Result<Option<(Self, PathBuf)>> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&cwd)
    }

    /// Attempts to find and load configuration starting from the specified directory.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((config, path)))` - Found and loaded configuration with its path
    /// * `Ok(None)` - No configuration file found
    /// * `Err` - If a config file was found but couldn't be parsed
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }
}

/// Configuration resolver that merges the config file with environment
/// overrides and built-in defaults.
///
/// Precedence: environment > config file > default.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// Loaded configuration, if any.
    pub config: Option<ConanrunConfig>,

    /// Path to the loaded config file, if any.
    pub config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Creates a new resolver by discovering and loading configuration.
    pub fn new() -> Result<Self> {
        match ConanrunConfig::discover()? {
            Some((config, path)) => {
                log::info!("loaded configuration from {}", path.display());
                Ok(Self {
                    config: Some(config),
                    config_path: Some(path),
                })
            }
            None => {
                log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    fn config(&self) -> ConanrunConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Directory holding the loaded config file.
    pub fn project_root(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }

    /// Builds the SDK tool settings. `program_override` wins over the file.
    pub fn tool_settings(&self, program_override: Option<String>) -> ToolSettings {
        let config = self.config();
        ToolSettings {
            program: program_override
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(config.tool.program),
            windows_profile: config.profiles.windows,
            linux_profile: config.profiles.linux,
            channel: config.package.channel(),
        }
    }

    /// Install workflow selected by `install.variant`.
    pub fn install_variant(&self) -> Variant {
        self.config
            .as_ref()
            .map(|c| c.install.variant)
            .unwrap_or_default()
            .into()
    }

    /// Staging directory for the install workflow.
    pub fn install_staging_dir(&self) -> Option<PathBuf> {
        self.config
            .as_ref()
            .and_then(|c| c.install.staging_dir.clone())
            .or_else(|| {
                self.install_variant()
                    .default_staging_dir()
                    .map(PathBuf::from)
            })
    }

    /// Package identity used for the publish instructions.
    pub fn package(&self) -> PackageConfig {
        self.config().package
    }
}
