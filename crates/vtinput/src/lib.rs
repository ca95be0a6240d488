// SPDX-License-Identifier: MIT
//
// vtinput — terminal input decoding for interactive applications.
//
// Turns the raw byte stream a terminal sends on its input channel into
// a typed stream of discrete events: key presses, mouse actions, focus
// changes, resizes, and the reply sequences terminals send during
// capability negotiation. Handles every protocol a modern terminal
// multiplexes onto that one stream:
//
// - Legacy CSI sequences (arrows, function keys, editing keys)
// - SS3 sequences (F1–F4 alternate encoding from some terminals)
// - Three coexisting mouse encodings: X10/normal, RXVT, and SGR
// - Kitty keyboard protocol (unambiguous codepoints, modifiers,
//   press/repeat/release, functional keys)
// - Focus reporting and cursor-position / enhancement-flag replies
//
// # Design
//
// There is no framing on a terminal's input channel beyond the
// sequence grammar itself, so the decoder works incrementally: the
// [`Reader`] accumulates bytes one at a time and the classifier in
// [`parse`] decides at every byte boundary whether the prefix is a
// complete event, a plausible sequence still in flight, or garbage to
// discard. A lone ESC is the canonical ambiguity — Escape keypress or
// sequence introducer? — and resolves by whether more bytes are already
// waiting in the same burst.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of decoding the wire formats directly. Every
// byte the terminal sends is accounted for.
//
// Literal character input is handled byte-at-a-time: multi-byte UTF-8
// is not reassembled into single scalar values. Known limitation.

pub mod error;
pub mod event;
mod kitty;
mod mouse;
pub mod parse;
pub mod reader;
pub mod resize;

pub use error::{InputError, ParseError};
pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, Modifiers, MouseButton,
    MouseEvent, MouseEventKind, Size,
};
pub use parse::parse_event;
pub use reader::{EventSource, ParseMode, Reader, ReaderConfig};
#[cfg(unix)]
pub use reader::TtySource;
pub use resize::{ResizeSource, WinchWatcher, is_tty, query_size};
