//! Library and application errors

use std::{io, process::ExitStatus};

use miette::Diagnostic;
use thiserror::Error;

/// All possible errors returned by esptool-bridge
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    /// Redirecting the process-wide output streams failed before the tool
    /// was ever invoked.
    #[error("Failed to capture the standard output streams")]
    #[diagnostic(code(esptool_bridge::capture_setup))]
    CaptureSetup(#[source] io::Error),

    /// The flashing tool reported a failure in its own words.
    #[error("{0}")]
    #[diagnostic(code(esptool_bridge::tool_failure))]
    Tool(String),

    #[error("esptool exited with {0}")]
    #[diagnostic(
        code(esptool_bridge::tool_exit),
        help("The tool's diagnostic output usually names the cause; check the port and arguments")
    )]
    ToolExit(ExitStatus),

    #[error("Failed to launch '{program}'")]
    #[diagnostic(
        code(esptool_bridge::tool_spawn),
        help("Make sure esptool is installed and on the PATH, or set the `tool` configuration key")
    )]
    ToolSpawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
