//! # conanrun
//!
//! Command-line wrappers around Conan for the Pulsar C++ client build.
//!
//! ## Overview
//!
//! `conanrun` ships two binaries, one per workflow:
//!
//! | Binary | Description |
//! |--------|-------------|
//! | `conan-install` | Install the dependencies for one build mode into a staging directory |
//! | `conan-package` | Create the package in the local cache for Debug and Release |
//!
//! Both pick their command table from the host platform (Windows or Linux),
//! run the packaging tool as a child process with its output passed through,
//! and exit with the tool's exit code.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install dependencies into ./build
//! conan-install --mode release
//!
//! # Build the package for both modes, then print the upload commands
//! conan-package
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Every command succeeded (install: the command succeeded) |
//! | 1 | Missing or invalid `--mode`, unsupported platform, or a configuration error |
//! | other | Exit code of the last packaging-tool command |
//!
//! ## Configuration
//!
//! Settings are read from `conanrun.toml` (see [`config`]). The install
//! variant (plain or profiled) is chosen there, never guessed.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use conanrun_sdk::{
    BuildMode, BuildRequest, CommandExecutor, HostPlatform, PlatformProbe, ProcessExecutor,
    Runner, RunnerError, Variant,
};
use std::ffi::OsString;

pub mod config;

use config::{ConfigResolver, PackageConfig, TOOL_ENV_VAR};

/// Conan install script.
#[derive(Parser, Debug)]
#[command(name = "conan-install", author, version, about = "Conan 2 install script", long_about = None)]
pub struct InstallCli {
    /// Compile mode. Allowed modes are release and debug (case-insensitive).
    #[arg(short, long)]
    pub mode: Option<String>,
}

/// Conan package creation script.
#[derive(Parser, Debug)]
#[command(name = "conan-package", author, version, about = "Build the Conan package for every build mode", long_about = None)]
pub struct PackageCli {
    /// Package only this mode instead of both debug and release.
    #[arg(short, long)]
    pub mode: Option<String>,
}

/// Entry point of `conan-install`. Returns the process exit code.
pub fn install_main() -> i32 {
    finish(run_install(std::env::args_os()))
}

/// Entry point of `conan-package`. Returns the process exit code.
pub fn package_main() -> i32 {
    finish(run_package(std::env::args_os()))
}

fn finish(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Parses arguments, printing clap's output on failure.
///
/// `Err` carries the exit code: 0 for `--help`/`--version`, 1 otherwise.
fn parse_args<C, I, T>(args: I) -> std::result::Result<C, i32>
where
    C: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    C::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() { 1 } else { 0 }
    })
}

fn invalid_mode(raw: &str) -> i32 {
    println!("Invalid input '{}'. Enter debug or release", raw);
    1
}

/// Runs `conan-install` with explicit arguments (program name first).
pub fn run_install<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli: InstallCli = match parse_args(args) {
        Ok(cli) => cli,
        Err(code) => return Ok(code),
    };

    let Some(raw_mode) = cli.mode else {
        let _ = InstallCli::command().print_help();
        return Ok(1);
    };
    let mode = match raw_mode.parse::<BuildMode>() {
        Ok(mode) => mode,
        Err(_) => return Ok(invalid_mode(&raw_mode)),
    };
    println!("TYPE SELECTED: {}", raw_mode);

    let resolver = ConfigResolver::new()?;
    load_dotenv(&resolver);
    let code = install(
        &resolver,
        HostPlatform,
        mode,
        std::env::var(TOOL_ENV_VAR).ok(),
        ProcessExecutor,
    )?;

    println!("INSTALL COMMAND FINISHED WITH CODE {}", code);
    Ok(code)
}

/// Runs the install workflow for `mode` and returns the exit code.
///
/// An unsupported platform is reported and yields 1 without running
/// anything.
pub fn install<P, E>(
    resolver: &ConfigResolver,
    probe: P,
    mode: BuildMode,
    program_override: Option<String>,
    executor: E,
) -> Result<i32>
where
    P: PlatformProbe,
    E: CommandExecutor,
{
    let platform = probe.probe();
    println!("Running Conan 2 install script for {} platform.", platform);

    let mut runner = Runner::with_executor(resolver.install_variant(), executor)
        .settings(resolver.tool_settings(program_override))
        .staging_dir(resolver.install_staging_dir());

    match runner.run(&BuildRequest::new(platform, mode)) {
        Ok(report) => Ok(report.exit_code()),
        Err(RunnerError::UnsupportedPlatform(os)) => {
            println!("Unknown system platform {}.", os);
            Ok(1)
        }
        Err(e) => Err(e).context("Failed to run install command"),
    }
}

/// Runs `conan-package` with explicit arguments (program name first).
pub fn run_package<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli: PackageCli = match parse_args(args) {
        Ok(cli) => cli,
        Err(code) => return Ok(code),
    };

    let modes = match cli.mode {
        Some(raw_mode) => match raw_mode.parse::<BuildMode>() {
            Ok(mode) => vec![mode],
            Err(_) => return Ok(invalid_mode(&raw_mode)),
        },
        None => BuildMode::ALL.to_vec(),
    };

    let resolver = ConfigResolver::new()?;
    load_dotenv(&resolver);
    package(
        &resolver,
        HostPlatform,
        &modes,
        std::env::var(TOOL_ENV_VAR).ok(),
        ProcessExecutor,
    )
}

/// Creates the package for every mode in `modes`, in order.
///
/// All commands are attempted even if one fails. The publish instructions
/// are printed only when every command succeeded. Returns the exit code of
/// the last command.
pub fn package<P, E>(
    resolver: &ConfigResolver,
    probe: P,
    modes: &[BuildMode],
    program_override: Option<String>,
    executor: E,
) -> Result<i32>
where
    P: PlatformProbe,
    E: CommandExecutor,
{
    if let Ok(cwd) = std::env::current_dir() {
        log::info!("packaging from {}", cwd.display());
    }
    let platform = probe.probe();
    println!("Running package build on {} platform.", platform);

    let settings = resolver.tool_settings(program_override);
    let program = settings.program.clone();
    let requests: Vec<_> = modes
        .iter()
        .map(|mode| BuildRequest::new(platform, *mode))
        .collect();
    let mut runner = Runner::with_executor(Variant::Create, executor).settings(settings);

    match runner.run_all(&requests) {
        Ok(report) => {
            if report.succeeded() {
                println!("{}", publish_instructions(&program, &resolver.package()));
            } else {
                for failure in report.failures() {
                    eprintln!(
                        "Command failed with exit code {}: {}",
                        failure.exit_code, failure.command
                    );
                }
            }
            Ok(report.exit_code())
        }
        Err(RunnerError::UnsupportedPlatform(os)) => {
            println!("Unknown system platform {}.", os);
            Ok(1)
        }
        Err(e) => Err(e).context("Failed to run package commands"),
    }
}

/// Upload instructions printed after a successful package build.
pub fn publish_instructions(program: &str, package: &PackageConfig) -> String {
    let remote_url = package.remote_url.as_deref().unwrap_or("<remote_url>");
    format!(
        "Building process is finished.\n\
         Upload package with following commands.\n\
         Conan publish commands:\n\
         $ {program} remote add <remote_name> {remote_url}\n\
         $ {program} user -p <password> -r <remote_name> <username>\n\
         $ {program} upload {reference} -r <remote_name> --all --force",
        program = program,
        remote_url = remote_url,
        reference = package.reference(),
    )
}

/// Loads `.env.local` from the directory holding `conanrun.toml`, or the
/// current directory when there is no config file.
fn load_dotenv(resolver: &ConfigResolver) {
    let root = match resolver.project_root() {
        Some(root) => root.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(_) => return,
        },
    };
    let path = root.join(".env.local");
    if dotenvy::from_path(&path).is_ok() {
        log::debug!("loaded environment from {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conanrun_sdk::{CommandSpec, FixedPlatform, Platform};
    use std::env;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    static CWD_LOCK: Mutex<()> = Mutex::new(());

    fn lock_cwd() -> MutexGuard<'static, ()> {
        CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    struct Recorder {
        calls: Vec<(Vec<String>, PathBuf)>,
        code: i32,
    }

    impl Recorder {
        fn exiting_with(code: i32) -> Self {
            Self {
                calls: Vec::new(),
                code,
            }
        }
    }

    impl CommandExecutor for Recorder {
        fn execute(&mut self, command: &CommandSpec) -> io::Result<i32> {
            self.calls.push((command.to_argv(), env::current_dir()?));
            Ok(self.code)
        }
    }

    /// Runs `f` from inside a fresh temporary directory.
    fn in_temp_dir<R>(f: impl FnOnce(&std::path::Path) -> R) -> R {
        let _lock = lock_cwd();
        let original = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        env::set_current_dir(temp.path()).unwrap();
        let cwd = env::current_dir().unwrap();
        let result = f(&cwd);
        assert_eq!(env::current_dir().unwrap(), cwd);
        env::set_current_dir(original).unwrap();
        result
    }

    #[test]
    fn test_parses_short_and_long_mode() {
        let cli = InstallCli::try_parse_from(["conan-install", "-m", "Release"]).unwrap();
        assert_eq!(cli.mode.as_deref(), Some("Release"));
        let cli = InstallCli::try_parse_from(["conan-install", "--mode", "debug"]).unwrap();
        assert_eq!(cli.mode.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(InstallCli::try_parse_from(["conan-install", "--verbose"]).is_err());
        assert_eq!(run_install(["conan-install", "--target", "x"]).unwrap(), 1);
    }

    #[test]
    fn test_missing_mode_exits_with_one() {
        assert_eq!(run_install(["conan-install"]).unwrap(), 1);
    }

    #[test]
    fn test_invalid_mode_exits_with_one() {
        assert_eq!(run_install(["conan-install", "-m", "fast"]).unwrap(), 1);
        assert_eq!(run_install(["conan-install", "--mode", ""]).unwrap(), 1);
        assert_eq!(run_package(["conan-package", "-m", "fast"]).unwrap(), 1);
    }

    #[test]
    fn test_help_exits_with_zero() {
        assert_eq!(run_install(["conan-install", "--help"]).unwrap(), 0);
    }

    #[test]
    fn test_install_release_linux() {
        in_temp_dir(|cwd| {
            let mut recorder = Recorder::exiting_with(0);
            let code = install(
                &ConfigResolver::default(),
                FixedPlatform(Platform::Linux),
                BuildMode::Release,
                None,
                &mut recorder,
            )
            .unwrap();

            assert_eq!(code, 0);
            assert_eq!(recorder.calls.len(), 1);
            assert_eq!(
                recorder.calls[0].0,
                ["conan", "install", "..", "--build=missing", "-s", "build_type=Release"]
            );
            assert_eq!(recorder.calls[0].1, cwd.join("build"));
        });
    }

    #[test]
    fn test_install_profiled_from_config() {
        in_temp_dir(|cwd| {
            let mut file_config = config::ConanrunConfig::default();
            file_config.install.variant = config::InstallVariant::Profiled;
            let resolver = ConfigResolver {
                config: Some(file_config),
                config_path: None,
            };
            let mut recorder = Recorder::exiting_with(0);
            install(
                &resolver,
                FixedPlatform(Platform::Linux),
                BuildMode::Release,
                None,
                &mut recorder,
            )
            .unwrap();

            assert_eq!(
                recorder.calls[0].0,
                [
                    "conan",
                    "install",
                    "..",
                    "--profile=../linuxprofile.txt",
                    "--build=missing",
                    "-s",
                    "build_type=Release",
                    "--no-imports",
                ]
            );
            assert_eq!(recorder.calls[0].1, cwd.join("conan"));
        });
    }

    #[test]
    fn test_install_propagates_tool_exit_code() {
        in_temp_dir(|_| {
            let mut recorder = Recorder::exiting_with(42);
            let code = install(
                &ConfigResolver::default(),
                FixedPlatform(Platform::Windows),
                BuildMode::Debug,
                Some("conan2".to_string()),
                &mut recorder,
            )
            .unwrap();

            assert_eq!(code, 42);
            assert_eq!(recorder.calls[0].0[0], "conan2");
        });
    }

    #[test]
    fn test_install_unknown_platform_runs_nothing() {
        in_temp_dir(|cwd| {
            let mut recorder = Recorder::exiting_with(0);
            let code = install(
                &ConfigResolver::default(),
                FixedPlatform(Platform::Unknown("macos")),
                BuildMode::Release,
                None,
                &mut recorder,
            )
            .unwrap();

            assert_eq!(code, 1);
            assert!(recorder.calls.is_empty());
            assert!(!cwd.join("build").exists());
        });
    }

    #[test]
    fn test_package_runs_both_modes_in_place() {
        in_temp_dir(|cwd| {
            let mut recorder = Recorder::exiting_with(0);
            let code = package(
                &ConfigResolver::default(),
                FixedPlatform(Platform::Linux),
                &BuildMode::ALL,
                None,
                &mut recorder,
            )
            .unwrap();

            assert_eq!(code, 0);
            let build_types: Vec<_> = recorder
                .calls
                .iter()
                .map(|(argv, _)| argv.last().cloned().unwrap_or_default())
                .collect();
            assert_eq!(build_types, ["build_type=Debug", "build_type=Release"]);
            assert!(recorder.calls.iter().all(|(argv, _)| argv[3] == "prod/test"));
            assert!(recorder.calls.iter().all(|(_, dir)| dir == cwd));
        });
    }

    #[test]
    fn test_package_failure_returns_last_code() {
        in_temp_dir(|_| {
            let mut recorder = Recorder::exiting_with(3);
            let code = package(
                &ConfigResolver::default(),
                FixedPlatform(Platform::Windows),
                &[BuildMode::Release],
                None,
                &mut recorder,
            )
            .unwrap();

            assert_eq!(code, 3);
            assert_eq!(recorder.calls.len(), 1);
            assert!(recorder.calls[0].0.contains(&"compiler.runtime=MD".to_string()));
        });
    }

    #[test]
    fn test_publish_instructions() {
        let package = PackageConfig {
            remote_url: Some("https://repo.example.com/conan".to_string()),
            ..PackageConfig::default()
        };
        let text = publish_instructions("conan", &package);
        assert!(text.contains("$ conan remote add <remote_name> https://repo.example.com/conan"));
        assert!(text.contains("$ conan upload pulsar/3.1.1@prod/test -r <remote_name> --all --force"));

        let text = publish_instructions("conan", &PackageConfig::default());
        assert!(text.contains("<remote_url>"));
    }
}
