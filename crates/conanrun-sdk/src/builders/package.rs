//! Package-creation command table.

use super::ToolSettings;
use crate::command::{CommandArg, CommandSpec, Subcommand};
use crate::types::{BuildMode, BuildRequest, Platform};

/// MSVC runtime matching the build type for packaged binaries.
fn windows_runtime(mode: BuildMode) -> &'static str {
    match mode {
        BuildMode::Debug => "MDd",
        BuildMode::Release => "MD",
    }
}

/// `create . <maturity>/<release_type> -u --profile=<file> --build=missing -s build_type=<M> [-s compiler.runtime=<MDd|MD>]`
pub(super) fn create(settings: &ToolSettings, request: &BuildRequest) -> CommandSpec {
    let mut command = CommandSpec::new(&settings.program, Subcommand::Create)
        .arg(CommandArg::positional("."))
        .arg(CommandArg::positional(settings.channel.reference()))
        .arg(CommandArg::switch("-u"));
    if let Some(profile) = settings.profile_for(request.platform()) {
        command = command.arg(CommandArg::option("profile", profile));
    }
    command = command
        .arg(CommandArg::option("build", "missing"))
        .arg(CommandArg::setting("build_type", request.mode().build_type()));
    if request.platform() == Platform::Windows {
        command = command.arg(CommandArg::setting(
            "compiler.runtime",
            windows_runtime(request.mode()),
        ));
    }
    command
}
