// SPDX-License-Identifier: MIT
//
// Error taxonomy for sequence decoding and event delivery.
//
// Parse errors are never fatal: the reader discards the accumulated
// bytes and resumes at the next byte. Whether a parse error reaches the
// caller at all depends on the reader's mode — strict surfaces the first
// failure, lenient records a diagnostic and keeps going. Queue overflow
// is the exception: it is surfaced in both modes, because silently
// dropping an event (a missed focus-lost, a missed button release)
// desynchronizes the application's view of terminal state.

use std::io;

use thiserror::Error;

/// A byte sequence that cannot be (or can no longer become) a valid event.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The sequence matches no known grammar, or stalled before its
    /// terminator with no further bytes coming.
    #[error("malformed escape sequence")]
    MalformedSequence,

    /// The mouse button field decodes to no known button or motion.
    #[error("unrecognized mouse button encoding {0:#04x}")]
    InvalidMouseButton(u8),

    /// An RXVT or SGR mouse report with a bad field count or value.
    #[error("invalid mouse report")]
    InvalidMouseReport,

    /// A `CSI code ~` special key with a code outside every known range.
    #[error("unrecognized special key code {0}")]
    InvalidSpecialKey(u32),

    /// A modifier-suffix sequence with an unrecognized final byte.
    #[error("unrecognized modifier-suffix final byte {0:#04x}")]
    InvalidModifierSuffix(u8),

    /// A cursor position report with a missing or zero field (the wire
    /// format is 1-based, so zero is a protocol violation, not position 0).
    #[error("invalid cursor position report")]
    InvalidCursorPositionReport,

    /// A `CSI .. u` key whose codepoint is not a Unicode scalar value.
    #[error("invalid kitty keyboard encoding")]
    InvalidKittyEncoding,
}

/// Failure surfaced by the reader's ingestion and pull paths.
#[derive(Debug, Error)]
pub enum InputError {
    /// The bounded event queue was full when a new event completed.
    /// The new event is the one rejected; queued events are intact.
    #[error("event queue is full")]
    QueueOverflow,

    /// A sequence failed to decode (strict mode only).
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input source failed. Timeout expiry and end-of-stream are
    /// not errors and never take this path.
    #[error("input source error: {0}")]
    Io(#[from] io::Error),
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_render_their_payload() {
        assert_eq!(
            ParseError::InvalidMouseButton(0x49).to_string(),
            "unrecognized mouse button encoding 0x49"
        );
        assert_eq!(
            ParseError::InvalidSpecialKey(99).to_string(),
            "unrecognized special key code 99"
        );
    }

    #[test]
    fn parse_error_converts_into_input_error() {
        let err: InputError = ParseError::MalformedSequence.into();
        assert!(matches!(err, InputError::Parse(ParseError::MalformedSequence)));
    }

    #[test]
    fn io_error_converts_into_input_error() {
        let err: InputError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, InputError::Io(_)));
    }
}
