//! Bridge a host application to the esptool firmware flasher.
//!
//! The crate does one thing: it takes a command-line-style argument string
//! plus an [ExecutionContext] from the host, forwards the arguments to the
//! external esptool, captures everything the tool writes to the standard
//! output streams, and hands the combined text back as a single string. The
//! flashing protocol, serial transport, chip detection, and image handling
//! all live in the tool being invoked.
//!
//! ```no_run
//! use esptool_bridge::{upload_firmware, ExecutionContext};
//!
//! let ctx = ExecutionContext::new().with_port("/dev/ttyUSB0").with_baud(460_800);
//! let result = upload_firmware(ctx, "write_flash 0x0 firmware.bin");
//! println!("{result}");
//! ```

mod bridge;
mod capture;
mod config;
pub mod context;
mod error;
pub mod tool;

pub use bridge::{run, upload_firmware, Outcome, EXCEPTION_PREFIX, SUCCESS_SENTINEL};
pub use config::Config;
pub use context::ExecutionContext;
pub use error::Error;
