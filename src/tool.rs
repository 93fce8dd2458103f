//! The external flashing tool and the seam it is invoked through

use std::process::{Command, Stdio};

use log::debug;

use crate::{config::Config, context, error::Error};

/// Command-line entry point of an external flashing tool.
///
/// Implementations write their human-readable diagnostics to the process
/// standard output and error streams, block for however long the flashing
/// operation takes, and signal failure through `Err`. The bridge captures
/// the streams around the call and never inspects them here.
pub trait FlashTool {
    fn run(&self, args: &[String]) -> Result<(), Error>;
}

/// Runs the `esptool` executable as a child process.
///
/// The child inherits the process streams, so its output lands in whatever
/// capture is in flight. The bound [ExecutionContext](crate::ExecutionContext)
/// is forwarded through esptool's own environment interface: `ESPTOOL_PORT`,
/// `ESPTOOL_BAUD`, plus any extra entries the context carries.
#[derive(Debug, Clone)]
pub struct EspTool {
    program: String,
    leading_args: Vec<String>,
}

impl EspTool {
    /// The `esptool` executable found on the PATH.
    pub fn new() -> Self {
        Self {
            program: "esptool".into(),
            leading_args: Vec::new(),
        }
    }

    /// Tool named by the configuration, e.g. `tool = "python -m esptool"`.
    pub fn from_config(config: &Config) -> Self {
        match config.tool.as_deref() {
            Some(spec) => Self::from_command_line(spec),
            None => Self::new(),
        }
    }

    /// Parse a whitespace-separated command line into program plus leading
    /// arguments. An all-whitespace spec falls back to the default tool.
    pub fn from_command_line(spec: &str) -> Self {
        let mut tokens = spec.split_whitespace().map(str::to_owned);
        match tokens.next() {
            Some(program) => Self {
                program,
                leading_args: tokens.collect(),
            },
            None => Self::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for EspTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashTool for EspTool {
    fn run(&self, args: &[String]) -> Result<(), Error> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args).args(args).stdin(Stdio::null());

        if let Some(ctx) = context::current() {
            if let Some(port) = ctx.port() {
                cmd.env("ESPTOOL_PORT", port);
            }
            if let Some(baud) = ctx.baud() {
                cmd.env("ESPTOOL_BAUD", baud.to_string());
            }
            for (key, value) in ctx.env() {
                cmd.env(key, value);
            }
        }

        debug!("running {} with {:?}", self.program, args);

        // Blocks until the flashing operation finishes; retries and timeouts
        // are the tool's own business.
        let status = cmd.status().map_err(|source| Error::ToolSpawn {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::ToolExit(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_splits_into_program_and_leading_args() {
        let tool = EspTool::from_command_line("python -m esptool");
        assert_eq!(tool.program(), "python");
        assert_eq!(tool.leading_args, vec!["-m", "esptool"]);
    }

    #[test]
    fn blank_command_line_falls_back_to_the_default() {
        let tool = EspTool::from_command_line("   ");
        assert_eq!(tool.program(), "esptool");
        assert!(tool.leading_args.is_empty());
    }
}
