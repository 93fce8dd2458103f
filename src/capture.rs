//! Scoped capture of the process-wide standard output streams
//!
//! [OutputCapture] redirects file descriptors 1 and 2 into fresh in-memory
//! buffers and restores the prior descriptors when released. Working at the
//! descriptor level (rather than swapping Rust's `io::stdout` handle, which
//! cannot be rebound) means text written by child processes is captured too.
//!
//! The descriptors are process-wide singletons, so at most one capture may
//! be in flight per process; serializing callers is the caller's job.

use std::{
    fs::File,
    io::{self, Read, Write},
    os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
    thread::{self, JoinHandle},
};

use log::warn;

use crate::error::Error;

/// One redirected descriptor: the saved original, and the drain thread
/// accumulating everything written to the replacement pipe.
struct Redirected {
    target: RawFd,
    saved: Option<OwnedFd>,
    drain: Option<JoinHandle<Vec<u8>>>,
}

impl Redirected {
    fn capture(target: RawFd) -> Result<Self, Error> {
        flush_std_handle(target);

        let mut fds = [0; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(Error::CaptureSetup(io::Error::last_os_error()));
        }
        let [read_fd, write_fd] = fds;

        let saved = unsafe { libc::dup(target) };
        if saved < 0 {
            let err = io::Error::last_os_error();
            unsafe {
                libc::close(read_fd);
                libc::close(write_fd);
            }
            return Err(Error::CaptureSetup(err));
        }
        let saved = unsafe { OwnedFd::from_raw_fd(saved) };

        if unsafe { libc::dup2(write_fd, target) } < 0 {
            let err = io::Error::last_os_error();
            unsafe {
                libc::close(read_fd);
                libc::close(write_fd);
            }
            return Err(Error::CaptureSetup(err));
        }
        // The descriptor at `target` is now the only write end we keep open;
        // closing the original end lets the drain see EOF once `target` is
        // restored.
        unsafe { libc::close(write_fd) };

        let mut reader = unsafe { File::from_raw_fd(read_fd) };
        let drain = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            buf
        });

        Ok(Self {
            target,
            saved: Some(saved),
            drain: Some(drain),
        })
    }

    /// Restore the saved descriptor and collect whatever was captured.
    /// Idempotent; returns nothing on the second call.
    fn release(&mut self) -> Vec<u8> {
        let Some(saved) = self.saved.take() else {
            return Vec::new();
        };

        flush_std_handle(self.target);
        if unsafe { libc::dup2(saved.as_raw_fd(), self.target) } < 0 {
            warn!(
                "failed to restore descriptor {}: {}",
                self.target,
                io::Error::last_os_error()
            );
        }
        drop(saved);

        match self.drain.take() {
            Some(drain) => drain.join().unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

impl Drop for Redirected {
    fn drop(&mut self) {
        self.release();
    }
}

/// Flush the buffered Rust handle for `target` so pending text lands on
/// whichever side of the swap it was written on.
fn flush_std_handle(target: RawFd) {
    if target == libc::STDOUT_FILENO {
        let _ = io::stdout().flush();
    } else {
        let _ = io::stderr().flush();
    }
}

/// In-flight capture of both standard output streams.
///
/// Dropping the guard restores the original descriptors and discards the
/// captured text; [OutputCapture::finish] restores them and returns it.
pub struct OutputCapture {
    stdout: Redirected,
    stderr: Redirected,
}

impl OutputCapture {
    /// Redirect stdout and stderr into fresh in-memory buffers, saving the
    /// current descriptors for restoration.
    pub fn redirect() -> Result<Self, Error> {
        let stdout = Redirected::capture(libc::STDOUT_FILENO)?;
        let stderr = Redirected::capture(libc::STDERR_FILENO)?;

        Ok(Self { stdout, stderr })
    }

    /// Restore the original descriptors and return the captured
    /// (stdout, stderr) text.
    pub fn finish(mut self) -> (String, String) {
        let out = self.stdout.release();
        let err = self.stderr.release();

        (
            String::from_utf8_lossy(&out).into_owned(),
            String::from_utf8_lossy(&err).into_owned(),
        )
    }
}
