// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The reader — accumulation buffer, bounded event queue, and the
// blocking-with-timeout pull API.
//
// Bytes arrive in bursts from the input source and flow through the
// classifier one at a time. The reader owns the only two pieces of
// mutable state in the pipeline: the `pending` buffer holding a
// sequence still in flight, and the bounded FIFO of completed events.
//
// Buffer lifecycle per byte: append, classify the whole buffer, then
//   - complete  → queue the event, clear the buffer
//   - malformed → clear the buffer, resume at the next byte
//   - incomplete at the end of a burst → dead end; nothing will ever
//     finish the sequence, so the buffer is cleared there too
//
// Error propagation is mode-selected per reader: strict surfaces the
// first decode failure, lenient records a diagnostic and keeps going.
// Queue overflow is surfaced in both modes — dropping an event silently
// would desynchronize the application's view of terminal state.
//
// Safety: `TtySource` uses `poll(2)` and `read(2)` on the stdin
// descriptor directly; these are the standard POSIX interfaces for
// readiness-polled terminal input and have no safe alternative. Each
// unsafe block is minimal.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::error::{InputError, ParseError};
use crate::event::Event;
use crate::parse::parse_event;
use crate::resize::ResizeSource;

/// Scratch buffer for a single read from the input source.
///
/// A keypress is 1–6 bytes and even a dense mouse-drag burst stays well
/// under a kilobyte per read.
const SCRATCH_SIZE: usize = 1024;

/// Default bound for the completed-event queue.
const DEFAULT_QUEUE_CAPACITY: usize = 100;

// ─── Collaborator interfaces ────────────────────────────────────────────────

/// Source of raw input bytes, polled for readiness with a timeout.
pub trait EventSource {
    /// Wait until input is ready, up to `timeout`.
    ///
    /// `None` blocks indefinitely; a zero duration polls without
    /// blocking. Returns `Ok(false)` on expiry — a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying wait primitive fails.
    fn poll_ready(&mut self, timeout: Option<Duration>) -> io::Result<bool>;

    /// Read available bytes into `buf`. Returns 0 at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

// ─── Reader ─────────────────────────────────────────────────────────────────

/// What to do when a sequence fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Surface the first decode failure to the caller. The reader stays
    /// usable; only the current ingestion call is aborted.
    Strict,
    /// Record a diagnostic and keep decoding the rest of the burst.
    #[default]
    Lenient,
}

/// Reader tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ReaderConfig {
    /// Capacity of the completed-event queue.
    pub capacity: usize,
    /// Decode-failure propagation policy.
    pub mode: ParseMode,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            mode: ParseMode::Lenient,
        }
    }
}

/// Turns a raw terminal byte stream into a queue of typed [`Event`]s.
///
/// Owned exclusively by one caller; nothing here is shared or locked.
/// An application that wants the event stream on multiple threads must
/// serialize access itself.
#[derive(Debug)]
pub struct Reader<S, R> {
    source: S,
    resize: R,
    /// Bytes of a sequence still in flight.
    pending: Vec<u8>,
    /// Completed events awaiting [`pull`](Self::pull).
    queue: VecDeque<Event>,
    config: ReaderConfig,
}

impl<S: EventSource, R: ResizeSource> Reader<S, R> {
    /// Create a reader with the default queue bound and lenient mode.
    #[must_use]
    pub fn new(source: S, resize: R) -> Self {
        Self::with_config(source, resize, ReaderConfig::default())
    }

    /// Create a reader with explicit tuning.
    #[must_use]
    pub fn with_config(source: S, resize: R, config: ReaderConfig) -> Self {
        Self {
            source,
            resize,
            pending: Vec::with_capacity(64),
            queue: VecDeque::with_capacity(config.capacity),
            config,
        }
    }

    /// Pull the next event, waiting up to `timeout` for input.
    ///
    /// `None` blocks indefinitely; a zero duration polls without
    /// blocking. Returns `Ok(None)` when the wait expires or the input
    /// stream has closed — both are first-class outcomes, and the
    /// caller decides whether to keep polling.
    ///
    /// Resize is checked before blocking: it costs nothing to poll and
    /// must not be starved by a busy input stream, so a pending resize
    /// is returned directly, bypassing queue and buffer.
    ///
    /// # Errors
    ///
    /// [`InputError::QueueOverflow`] if the event queue filled mid-burst,
    /// [`InputError::Parse`] in strict mode on a malformed sequence, and
    /// [`InputError::Io`] if the source itself fails.
    pub fn pull(&mut self, timeout: Option<Duration>) -> Result<Option<Event>, InputError> {
        if let Some(event) = self.queue.pop_front() {
            return Ok(Some(event));
        }

        if let Some(size) = self.resize.poll_resize() {
            return Ok(Some(Event::Resize(size)));
        }

        if !self.source.poll_ready(timeout)? {
            return Ok(None);
        }

        let mut scratch = [0u8; SCRATCH_SIZE];
        let count = self.source.read(&mut scratch)?;
        if count == 0 {
            return Ok(None);
        }

        self.feed(&scratch[..count])?;
        Ok(self.queue.pop_front())
    }

    /// Ingest one burst of raw bytes.
    ///
    /// Applications driving their own I/O loop can call this directly;
    /// [`pull`](Self::pull) calls it with each fresh read.
    ///
    /// # Errors
    ///
    /// [`InputError::QueueOverflow`] in both modes; [`InputError::Parse`]
    /// in strict mode on the first malformed sequence.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), InputError> {
        for (index, &byte) in bytes.iter().enumerate() {
            let more = index + 1 < bytes.len();
            self.ingest(byte, more)?;
        }
        Ok(())
    }

    /// Append one byte and resolve the accumulated buffer.
    fn ingest(&mut self, byte: u8, more: bool) -> Result<(), InputError> {
        self.pending.push(byte);

        match parse_event(&self.pending, more) {
            Ok(Some(event)) => {
                self.pending.clear();
                if self.queue.len() >= self.config.capacity {
                    return Err(InputError::QueueOverflow);
                }
                self.queue.push_back(event);
            }
            Ok(None) => {
                if !more {
                    // End of burst with an unfinished sequence: no byte
                    // will arrive to complete it, so it is unrecoverable.
                    self.pending.clear();
                    match self.config.mode {
                        ParseMode::Strict => {
                            return Err(ParseError::MalformedSequence.into());
                        }
                        ParseMode::Lenient => {
                            tracing::trace!("discarded sequence stalled at end of burst");
                        }
                    }
                }
            }
            Err(err) => {
                self.pending.clear();
                match self.config.mode {
                    ParseMode::Strict => return Err(err.into()),
                    ParseMode::Lenient => {
                        tracing::debug!(error = %err, "discarded malformed sequence");
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(unix)]
impl Reader<TtySource, crate::resize::WinchWatcher> {
    /// A reader over stdin with SIGWINCH resize tracking — the default
    /// wiring for a terminal application.
    #[must_use]
    pub fn from_tty() -> Self {
        Self::new(TtySource::stdin(), crate::resize::WinchWatcher::install())
    }
}

// ─── TTY input source ───────────────────────────────────────────────────────

/// [`EventSource`] over the process's stdin descriptor.
#[cfg(unix)]
#[derive(Debug)]
pub struct TtySource {
    fd: libc::c_int,
}

#[cfg(unix)]
impl TtySource {
    /// A source reading from stdin.
    #[must_use]
    pub const fn stdin() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
        }
    }
}

#[cfg(unix)]
impl EventSource for TtySource {
    fn poll_ready(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        let timeout_ms = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));

        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };

        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                // A signal (typically SIGWINCH) cut the wait short; report
                // it as expiry so the caller re-polls the resize flag.
                return Ok(false);
            }
            return Err(err);
        }

        Ok(ready > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let count = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
            if count >= 0 {
                #[allow(clippy::cast_sign_loss)] // count >= 0 checked above.
                return Ok(count as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
