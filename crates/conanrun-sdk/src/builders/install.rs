//! Dependency-install command tables.
//!
//! Both install workflows run `install ..` from inside a staging directory so
//! the recipe in the parent directory is picked up and the generated files
//! land in the staging directory.

use super::ToolSettings;
use crate::command::{CommandArg, CommandSpec, Subcommand};
use crate::types::{BuildRequest, Platform};

/// Runtime linkage requested from MSVC for install workflows.
const WINDOWS_RUNTIME: &str = "dynamic";

fn base(settings: &ToolSettings) -> CommandSpec {
    CommandSpec::new(&settings.program, Subcommand::Install).arg(CommandArg::positional(".."))
}

/// `install .. --build=missing -s build_type=<M> [-s compiler.runtime=dynamic]`
pub(super) fn plain(settings: &ToolSettings, request: &BuildRequest) -> CommandSpec {
    let mut command = base(settings)
        .arg(CommandArg::option("build", "missing"))
        .arg(CommandArg::setting("build_type", request.mode().build_type()));
    if request.platform() == Platform::Windows {
        command = command.arg(CommandArg::setting("compiler.runtime", WINDOWS_RUNTIME));
    }
    command
}

/// `install .. --profile=<file> --build=missing -s build_type=<M> [-s compiler.runtime=dynamic] --no-imports`
pub(super) fn profiled(settings: &ToolSettings, request: &BuildRequest) -> CommandSpec {
    let mut command = base(settings);
    if let Some(profile) = settings.profile_for(request.platform()) {
        command = command.arg(CommandArg::option("profile", profile));
    }
    command = command
        .arg(CommandArg::option("build", "missing"))
        .arg(CommandArg::setting("build_type", request.mode().build_type()));
    if request.platform() == Platform::Windows {
        command = command.arg(CommandArg::setting("compiler.runtime", WINDOWS_RUNTIME));
    }
    command.arg(CommandArg::switch("--no-imports"))
}
