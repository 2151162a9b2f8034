//! Structured packaging-tool invocations.
//!
//! A [`CommandSpec`] keeps the program, subcommand, and each argument as a
//! typed [`CommandArg`], and only flattens them into an argument vector when
//! it is about to be executed or printed.
//!
//! ```
//! use conanrun_sdk::{CommandArg, CommandSpec, Subcommand};
//!
//! let spec = CommandSpec::new("conan", Subcommand::Install)
//!     .arg(CommandArg::positional(".."))
//!     .arg(CommandArg::option("build", "missing"))
//!     .arg(CommandArg::setting("build_type", "Release"));
//!
//! assert_eq!(
//!     spec.to_argv(),
//!     ["conan", "install", "..", "--build=missing", "-s", "build_type=Release"]
//! );
//! assert_eq!(spec.setting("build_type"), Some("Release"));
//! ```

use std::fmt;
use std::process::Command;

/// Packaging-tool subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Install,
    Create,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Install => "install",
            Subcommand::Create => "create",
        }
    }
}

/// One typed argument of a packaging-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArg {
    /// A bare token such as a path or recipe reference.
    Positional(String),
    /// A flag without a value, e.g. `-u`.
    Switch(&'static str),
    /// A long option rendered as `--name=value`.
    LongOption { name: &'static str, value: String },
    /// A tool setting rendered as the token pair `-s key=value`.
    Setting { key: &'static str, value: String },
}

impl CommandArg {
    pub fn positional(value: impl Into<String>) -> Self {
        CommandArg::Positional(value.into())
    }

    pub fn switch(flag: &'static str) -> Self {
        CommandArg::Switch(flag)
    }

    pub fn option(name: &'static str, value: impl Into<String>) -> Self {
        CommandArg::LongOption {
            name,
            value: value.into(),
        }
    }

    pub fn setting(key: &'static str, value: impl Into<String>) -> Self {
        CommandArg::Setting {
            key,
            value: value.into(),
        }
    }

    fn push_tokens(&self, out: &mut Vec<String>) {
        match self {
            CommandArg::Positional(value) => out.push(value.clone()),
            CommandArg::Switch(flag) => out.push((*flag).to_string()),
            CommandArg::LongOption { name, value } => out.push(format!("--{}={}", name, value)),
            CommandArg::Setting { key, value } => {
                out.push("-s".to_string());
                out.push(format!("{}={}", key, value));
            }
        }
    }
}

/// One external process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    subcommand: Subcommand,
    args: Vec<CommandArg>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, subcommand: Subcommand) -> Self {
        Self {
            program: program.into(),
            subcommand,
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: CommandArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Appends several arguments in order.
    pub fn args(mut self, args: impl IntoIterator<Item = CommandArg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn subcommand(&self) -> Subcommand {
        self.subcommand
    }

    pub fn arguments(&self) -> &[CommandArg] {
        &self.args
    }

    /// Returns the value of the `-s key=value` setting, if present.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            CommandArg::Setting { key: k, value } if *k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns the value of the `--name=value` option, if present.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            CommandArg::LongOption { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_switch(&self, flag: &str) -> bool {
        self.args
            .iter()
            .any(|arg| matches!(arg, CommandArg::Switch(f) if *f == flag))
    }

    /// Flattens the invocation into the final argument vector, program first.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = vec![self.program.clone(), self.subcommand.as_str().to_string()];
        for arg in &self.args {
            arg.push_tokens(&mut argv);
        }
        argv
    }

    /// Builds a [`Command`] for this invocation. Standard streams are inherited.
    pub fn to_command(&self) -> Command {
        let argv = self.to_argv();
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_argv().join(" "))
    }
}
