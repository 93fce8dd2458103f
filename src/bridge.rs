//! The delegating invoker
//!
//! The one visible operation of this crate: bind the host's execution
//! context into the tool's platform state, split the raw argument string
//! into tokens, invoke the tool with the process streams captured, and fold
//! whatever happened into a single string result. Failures never escape —
//! the caller always gets a string.

use std::{
    any::Any,
    fmt::{self, Display, Formatter},
    panic::{catch_unwind, AssertUnwindSafe},
};

use log::{debug, warn};

use crate::{
    capture::OutputCapture,
    config::Config,
    context::{self, ExecutionContext},
    tool::{EspTool, FlashTool},
};

/// Returned when the tool finished without producing any output.
pub const SUCCESS_SENTINEL: &str = "ESPTool completed successfully";

/// Prefix carried by every failure result.
pub const EXCEPTION_PREFIX: &str = "ESPTool Exception: ";

/// Outcome of one delegated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool returned normally; holds the trimmed diagnostic text, empty
    /// when the tool was silent.
    Completed(String),
    /// The tool (or the plumbing around it) failed; holds the description.
    Failed(String),
}

impl Outcome {
    /// Render the fixed string contract: the captured text, the success
    /// sentinel for a silent run, or the prefixed failure description.
    pub fn render(&self) -> String {
        match self {
            Outcome::Completed(text) if text.is_empty() => SUCCESS_SENTINEL.into(),
            Outcome::Completed(text) => text.clone(),
            Outcome::Failed(description) => format!("{EXCEPTION_PREFIX}{description}"),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Invoke `tool` with the whitespace-split `arguments`, capturing everything
/// it writes to the process output streams.
///
/// `ctx` is bound into the process-wide platform state first and stays bound
/// after the call. The capture guard restores the original stream
/// descriptors on every exit path, including a panicking tool.
///
/// The streams and the platform binding are process-wide, so concurrent
/// invocations would corrupt each other's capture; run at most one at a
/// time per process.
pub fn run(tool: &dyn FlashTool, ctx: ExecutionContext, arguments: &str) -> Outcome {
    context::bind(ctx);

    let args = split_arguments(arguments);
    debug!("invoking the flash tool with {} argument(s)", args.len());

    let capture = match OutputCapture::redirect() {
        Ok(capture) => capture,
        Err(err) => return Outcome::Failed(err.to_string()),
    };

    match catch_unwind(AssertUnwindSafe(|| tool.run(&args))) {
        Ok(Ok(())) => {
            let (out, err) = capture.finish();
            Outcome::Completed(format!("{out}{err}").trim().to_owned())
        }
        Ok(Err(err)) => {
            // Partially captured text is discarded with the guard.
            drop(capture);
            Outcome::Failed(err.to_string())
        }
        Err(panic) => {
            drop(capture);
            Outcome::Failed(panic_description(panic))
        }
    }
}

/// Forward `arguments` to esptool and hand back its diagnostic output.
///
/// This is the host-facing entry point: it runs the esptool executable named
/// by the crate [Config] and always returns a string, one of
///
/// - the trimmed diagnostic text the tool wrote,
/// - [SUCCESS_SENTINEL] when the tool was silent, or
/// - [EXCEPTION_PREFIX] followed by the failure description.
///
/// Splitting is naive whitespace splitting: runs of whitespace collapse, and
/// arguments containing embedded whitespace cannot be expressed. No shell
/// quoting is interpreted.
pub fn upload_firmware(ctx: ExecutionContext, arguments: &str) -> String {
    let tool = match Config::load() {
        Ok(config) => EspTool::from_config(&config),
        Err(err) => {
            warn!("falling back to the default tool configuration: {err}");
            EspTool::new()
        }
    };

    run(&tool, ctx, arguments).render()
}

fn split_arguments(arguments: &str) -> Vec<String> {
    arguments.split_whitespace().map(str::to_owned).collect()
}

fn panic_description(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the flash tool panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse_without_empty_tokens() {
        assert_eq!(
            split_arguments("  write_flash   0x1000\t\napp.bin "),
            vec!["write_flash", "0x1000", "app.bin"]
        );
        assert!(split_arguments("").is_empty());
        assert!(split_arguments(" \t ").is_empty());
    }

    #[test]
    fn silent_completion_renders_the_sentinel() {
        assert_eq!(Outcome::Completed(String::new()).render(), SUCCESS_SENTINEL);
    }

    #[test]
    fn diagnostic_text_renders_verbatim() {
        let outcome = Outcome::Completed("Chip is ESP32".into());
        assert_eq!(outcome.render(), "Chip is ESP32");
        assert_eq!(outcome.to_string(), "Chip is ESP32");
    }

    #[test]
    fn failures_render_with_the_fixed_prefix() {
        let outcome = Outcome::Failed("No such file or directory: 'bad.bin'".into());
        assert_eq!(
            outcome.render(),
            "ESPTool Exception: No such file or directory: 'bad.bin'"
        );
    }
}
