// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Resize collaborator — SIGWINCH flag plus terminal size query.
//
// The terminal delivers resize as an asynchronous signal, outside the
// normal control flow, so the notification is recorded in one
// process-wide atomic flag: the single piece of shared mutable state
// in this crate. The memory-ordering contract is release on signal-set,
// acquire on poll — a plain unsynchronized boolean would be unsound
// across the handler/main-flow boundary even within one thread.
//
// The reader consults [`WinchWatcher::poll_resize`] before every
// blocking wait, so a resize is never delayed behind a stalled or
// absent input stream.
//
// Safety: `sigaction(2)` and `ioctl(TIOCGWINSZ)` are the standard POSIX
// interfaces for signal registration and size queries; there is no safe
// alternative. The handler body is a single atomic store, one of the
// few operations permitted in async-signal context.

#[cfg(unix)]
use std::sync::Once;
#[cfg(unix)]
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::Size;

/// Non-blocking resize notification.
///
/// A positive read clears the "occurred" state, so each resize is
/// reported exactly once.
pub trait ResizeSource {
    /// The new terminal size, if a resize happened since the last poll.
    fn poll_resize(&mut self) -> Option<Size>;
}

// ─── SIGWINCH flag ──────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, consumed by [`WinchWatcher::poll_resize`].
#[cfg(unix)]
static WINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
static INSTALL_HANDLER: Once = Once::new();

#[cfg(unix)]
extern "C" fn winch_handler(_sig: libc::c_int) {
    WINCH_RECEIVED.store(true, Ordering::Release);
}

/// Install the SIGWINCH handler. Idempotent.
#[cfg(unix)]
fn install_winch_handler() {
    INSTALL_HANDLER.call_once(|| unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = winch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    });
}

// ─── Terminal queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            width: ws.ws_col,
            height: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub const fn is_tty() -> bool {
    false
}

// ─── WinchWatcher ───────────────────────────────────────────────────────────

/// [`ResizeSource`] backed by the process-wide SIGWINCH flag.
#[derive(Debug)]
pub struct WinchWatcher {
    _private: (),
}

impl WinchWatcher {
    /// Install the signal handler (first call only) and return a watcher.
    #[must_use]
    pub fn install() -> Self {
        #[cfg(unix)]
        install_winch_handler();
        Self { _private: () }
    }
}

impl ResizeSource for WinchWatcher {
    #[cfg(unix)]
    fn poll_resize(&mut self) -> Option<Size> {
        if WINCH_RECEIVED.swap(false, Ordering::Acquire) {
            query_size()
        } else {
            None
        }
    }

    #[cfg(not(unix))]
    fn poll_resize(&mut self) -> Option<Size> {
        None
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let _a = WinchWatcher::install();
        let _b = WinchWatcher::install(); // Second install must not panic.
    }

    /// Flag mechanics live in one test: the flag is a process-wide
    /// static, and parallel tests poking it would race.
    #[cfg(unix)]
    #[test]
    fn poll_consumes_the_flag() {
        let mut watcher = WinchWatcher::install();

        WINCH_RECEIVED.store(true, Ordering::Release);
        // The size query may fail when the test has no TTY, but the flag
        // must be consumed either way.
        let _ = watcher.poll_resize();
        assert!(!WINCH_RECEIVED.load(Ordering::Acquire));

        // A quiet flag reports nothing.
        assert!(watcher.poll_resize().is_none());
    }

    #[test]
    fn query_size_does_not_panic_without_a_tty() {
        let _ = query_size();
    }
}
