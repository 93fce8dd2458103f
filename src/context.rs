//! Host execution context and the process-wide platform binding
//!
//! The host application supplies an [ExecutionContext] describing the
//! transport facilities the external tool needs (serial port, baud rate,
//! extra environment entries). [bind] installs it into process-wide state,
//! where it stays until overwritten by a later call — the tool reads it back
//! through [current] when it is invoked.

use std::sync::Mutex;

/// Transport facts supplied by the host platform for one invocation.
///
/// The bridge itself never inspects the contents; it only forwards the
/// context into the tool's platform state.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    port: Option<String>,
    baud: Option<u32>,
    env: Vec<(String, String)>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serial port the target device is connected to.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Baud rate at which to talk to the target device.
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = Some(baud);
        self
    }

    /// Additional environment entry forwarded to the tool verbatim.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn baud(&self) -> Option<u32> {
        self.baud
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }
}

static PLATFORM_CONTEXT: Mutex<Option<ExecutionContext>> = Mutex::new(None);

/// Bind `ctx` into the process-wide platform state.
///
/// The binding outlives the invocation that installed it and stays valid
/// until a later call replaces it.
pub fn bind(ctx: ExecutionContext) {
    *lock() = Some(ctx);
}

/// The currently bound context, if any.
pub fn current() -> Option<ExecutionContext> {
    lock().clone()
}

fn lock() -> std::sync::MutexGuard<'static, Option<ExecutionContext>> {
    PLATFORM_CONTEXT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
