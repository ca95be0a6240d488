// SPDX-License-Identifier: MIT
//
// Escape-sequence classifier — turns an accumulated byte prefix into a
// verdict: complete event, need more bytes, or malformed.
//
// The classifier is called once per appended byte with the *entire*
// accumulated buffer, so every decoder below sees the full prefix and
// decides from scratch. That keeps them pure: no decoder carries state
// between calls, and feeding a sequence byte-at-a-time resolves to the
// same event as feeding it whole.
//
// Return convention, used by every decoder in this crate:
//
//   Ok(Some(event))  the buffer is a complete sequence
//   Ok(None)         a plausible prefix — keep accumulating
//   Err(_)           definitively malformed — discard the buffer
//
// The `more` flag says whether additional bytes from the same read are
// already waiting. It exists for exactly one ambiguity: a lone ESC with
// nothing behind it IS the Escape key, while a lone ESC with bytes
// still queued is the start of a sequence in flight.
//
// Number parsing works directly on `&[u8]` — no intermediate `String`
// allocation for CSI parameter decoding.

use crate::error::ParseError;
use crate::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, Modifiers};
use crate::{kitty, mouse};

/// Classify the accumulated buffer as an event, an incomplete prefix,
/// or a malformed sequence.
///
/// `more` reports whether further bytes from the same burst are already
/// available; it decides the lone-ESC and stalled-parameter cases.
///
/// # Errors
///
/// Returns the decoder-specific [`ParseError`] when the buffer can never
/// become a valid sequence.
///
/// # Panics
///
/// Panics if `buffer` is empty (the reader never calls it that way).
pub fn parse_event(buffer: &[u8], more: bool) -> Result<Option<Event>, ParseError> {
    assert!(!buffer.is_empty(), "classifier called with an empty buffer");

    match buffer[0] {
        0x1B => parse_escape(buffer, more),
        b'\r' | b'\n' => Ok(Some(press(KeyCode::Enter))),
        b'\t' => Ok(Some(press(KeyCode::Tab))),
        0x7F => Ok(Some(press(KeyCode::Backspace))),
        // Ctrl-A .. Ctrl-Z, minus the bytes claimed above (Tab, Enter).
        b @ (0x01..=0x08 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Ok(Some(ctrl_key(KeyCode::Char((b - 0x01 + b'a') as char))))
        }
        // Legacy Ctrl-\, Ctrl-], Ctrl-^, Ctrl-_ arrive as Ctrl+4..Ctrl+7.
        b @ 0x1C..=0x1F => Ok(Some(ctrl_key(KeyCode::Char((b - 0x1C + b'4') as char)))),
        // Anything else is a literal character from the byte value.
        // Multi-byte UTF-8 is NOT reassembled: each byte becomes its own
        // character event. Known limitation for non-ASCII input.
        b => Ok(Some(press(KeyCode::Char(b as char)))),
    }
}

// ─── ESC dispatch ───────────────────────────────────────────────────────────

fn parse_escape(buffer: &[u8], more: bool) -> Result<Option<Event>, ParseError> {
    debug_assert_eq!(buffer[0], 0x1B);

    if buffer.len() == 1 {
        // A lone, unfollowed ESC is the Escape key; with bytes behind it,
        // it is the introducer of a sequence still in flight.
        return if more {
            Ok(None)
        } else {
            Ok(Some(press(KeyCode::Escape)))
        };
    }

    match buffer[1] {
        b'[' => parse_csi(buffer, more),
        b'O' => parse_ss3(buffer),
        _ => Err(ParseError::MalformedSequence),
    }
}

/// SS3 function keys: `ESC O P..S` → F1–F4. The legacy compatibility
/// path some terminals still use, independent of the Kitty encoding.
fn parse_ss3(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    if buffer.len() == 2 {
        return Ok(None);
    }
    match buffer[2] {
        b'P' => Ok(Some(press(KeyCode::F(1)))),
        b'Q' => Ok(Some(press(KeyCode::F(2)))),
        b'R' => Ok(Some(press(KeyCode::F(3)))),
        b'S' => Ok(Some(press(KeyCode::F(4)))),
        _ => Err(ParseError::MalformedSequence),
    }
}

// ─── CSI dispatch ───────────────────────────────────────────────────────────

/// Route a `ESC [ ..` buffer by its third byte.
fn parse_csi(buffer: &[u8], more: bool) -> Result<Option<Event>, ParseError> {
    debug_assert!(buffer.len() >= 2 && buffer[1] == b'[');

    if buffer.len() == 2 {
        return Ok(None);
    }

    match buffer[2] {
        b'A' => Ok(Some(press(KeyCode::Up))),
        b'B' => Ok(Some(press(KeyCode::Down))),
        b'C' => Ok(Some(press(KeyCode::Right))),
        b'D' => Ok(Some(press(KeyCode::Left))),
        b'H' => Ok(Some(press(KeyCode::Home))),
        b'F' => Ok(Some(press(KeyCode::End))),
        b'I' => Ok(Some(Event::FocusGained)),
        b'O' => Ok(Some(Event::FocusLost)),
        // No-modifier compatibility form; overlaps Kitty's plain form.
        b'P' => Ok(Some(press(KeyCode::F(1)))),
        b'Q' => Ok(Some(press(KeyCode::F(2)))),
        b'S' => Ok(Some(press(KeyCode::F(4)))),
        b'M' => mouse::parse_x10(buffer),
        b'<' => mouse::parse_sgr(buffer),
        b'?' => parse_enhancement_flags(buffer),
        b'0'..=b'9' => parse_csi_numeric(buffer, more),
        _ => Err(ParseError::MalformedSequence),
    }
}

/// Numeric-prefixed CSI: the real meaning is decided by the final byte
/// once a terminator (0x40–0x7E) arrives.
fn parse_csi_numeric(buffer: &[u8], more: bool) -> Result<Option<Event>, ParseError> {
    let last = buffer[buffer.len() - 1];

    if !(0x40..=0x7E).contains(&last) {
        // Still inside the parameter bytes. A numeric CSI that stops
        // mid-digit with nothing following is unrecoverable.
        return if more {
            Ok(None)
        } else {
            Err(ParseError::MalformedSequence)
        };
    }

    match last {
        b'M' => mouse::parse_rxvt(buffer),
        b'~' => parse_special_key(buffer),
        b'u' => kitty::parse_csi_u(buffer),
        b'R' => parse_cursor_position(buffer),
        _ => parse_modifier_suffix(buffer),
    }
}

// ─── Special keys (CSI code ~) ──────────────────────────────────────────────

/// `ESC [ code ; modmask[:event] ~` — editing keys and F5+ function keys,
/// mapped through the legacy xterm code table.
fn parse_special_key(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    let params = parse_csi_params(&buffer[2..buffer.len() - 1]);
    let code = params.first().map_or(0, |p| p.0);
    let (modifiers, kind) = modifiers_and_kind(params.get(1));

    let key = match code {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        c @ 11..=15 => KeyCode::F(offset_f(c, 10)),
        c @ 17..=21 => KeyCode::F(offset_f(c, 11)),
        c @ 23..=26 => KeyCode::F(offset_f(c, 12)),
        c @ 28..=29 => KeyCode::F(offset_f(c, 13)),
        c @ 31..=34 => KeyCode::F(offset_f(c, 14)),
        c => return Err(ParseError::InvalidSpecialKey(c)),
    };

    Ok(Some(Event::Key(KeyEvent {
        code: key,
        modifiers,
        kind,
    })))
}

/// Function-key number from a special-key code and its range offset.
/// The caller's range match guarantees the result fits F1–F20.
#[allow(clippy::cast_possible_truncation)]
const fn offset_f(code: u32, offset: u32) -> u8 {
    (code - offset) as u8
}

// ─── Modifier-suffix form (CSI 1 ; modmask letter) ──────────────────────────

/// `ESC [ 1 ; modmask[:event] <letter>` — arrows, Home/End, F1–F4 with
/// modifiers. Shortest complete form is six bytes (`ESC [ 1 ; 2 A`).
fn parse_modifier_suffix(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    if buffer.len() < 6 {
        return Ok(None);
    }

    let last = buffer[buffer.len() - 1];
    let params = parse_csi_params(&buffer[2..buffer.len() - 1]);
    let (modifiers, kind) = modifiers_and_kind(params.get(1));

    let key = match last {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'F' => KeyCode::End,
        b'H' => KeyCode::Home,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        // Shadowed by the cursor-position report in dispatch; kept for
        // callers that reach this decoder directly.
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b => return Err(ParseError::InvalidModifierSuffix(b)),
    };

    Ok(Some(Event::Key(KeyEvent {
        code: key,
        modifiers,
        kind,
    })))
}

// ─── Cursor position report (CSI row ; col R) ───────────────────────────────

/// `ESC [ row ; col R`, 1-based on the wire. A zero (or missing) field
/// is a protocol violation, never wrapped to a huge coordinate.
fn parse_cursor_position(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    let params = parse_csi_params(&buffer[2..buffer.len() - 1]);
    if params.len() < 2 {
        return Err(ParseError::InvalidCursorPositionReport);
    }

    let row = params[0].0;
    let col = params[1].0;
    if row == 0 || col == 0 {
        return Err(ParseError::InvalidCursorPositionReport);
    }

    Ok(Some(Event::CursorPos {
        x: saturate_u16(col - 1),
        y: saturate_u16(row - 1),
    }))
}

// ─── Keyboard enhancement flags report (CSI ? bits u) ───────────────────────

/// `ESC [ ? bits u` — the terminal's reply to a flags query. The bits
/// are the [`KeyboardEnhancementFlags`] layout verbatim: no bias, no
/// inversion, unlike modifier masks elsewhere.
fn parse_enhancement_flags(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    debug_assert!(buffer.len() >= 3 && buffer[2] == b'?');

    if buffer.len() == 3 {
        return Ok(None);
    }

    let last = buffer[buffer.len() - 1];
    if !(0x40..=0x7E).contains(&last) {
        return Ok(None);
    }
    if last != b'u' {
        return Err(ParseError::MalformedSequence);
    }

    let digits = &buffer[3..buffer.len() - 1];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(ParseError::MalformedSequence);
    }

    let (bits, _) = parse_u32_at(digits, 0);
    #[allow(clippy::cast_possible_truncation)] // Only the low byte carries flags.
    let flags = KeyboardEnhancementFlags::from_bits_truncate((bits & 0xFF) as u8);
    Ok(Some(Event::KeyboardEnhancementFlags(flags)))
}

// ─── Shared helpers ─────────────────────────────────────────────────────────

/// Create a simple key press event with no modifiers.
pub(crate) const fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

/// Create a Ctrl+key press event.
const fn ctrl_key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::with_modifiers(code, Modifiers::CTRL))
}

/// CSI parameter: `(main_value, first_colon_sub_parameter)`.
///
/// The colon sub-parameter carries the Kitty event type within the
/// modifier parameter (`modmask:event`). Further colon sub-fields
/// (alternate key codes, associated text) are consumed but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CsiParam(pub u32, pub u32);

/// Parse semicolon-separated CSI parameters with colon sub-params.
///
/// Examples:
/// - `1;2` → `[(1,0), (2,0)]`
/// - `97;5:2` → `[(97,0), (5,2)]`
/// - `97:65;2` → `[(97,65), (2,0)]` (extra alternates dropped)
/// - (empty) → `[]`
pub(crate) fn parse_csi_params(raw: &[u8]) -> Vec<CsiParam> {
    let mut params = Vec::with_capacity(4);
    if raw.is_empty() {
        return params;
    }

    let mut pos = 0;
    loop {
        let (main, next) = parse_u32_at(raw, pos);
        pos = next;

        // First colon sub-parameter is meaningful; the rest are skipped
        // so a trailing alternate list cannot swallow later parameters.
        let mut sub = 0;
        let mut first_sub = true;
        while pos < raw.len() && raw[pos] == b':' {
            let (value, next) = parse_u32_at(raw, pos + 1);
            if first_sub {
                sub = value;
                first_sub = false;
            }
            pos = next;
        }

        params.push(CsiParam(main, sub));

        if pos < raw.len() && raw[pos] == b';' {
            pos += 1;
        } else {
            break;
        }
    }

    params
}

/// Parse a u32 from bytes starting at `start`, stopping at the first
/// non-digit. Returns `(value, next_position)`.
pub(crate) fn parse_u32_at(buf: &[u8], start: usize) -> (u32, usize) {
    let mut value: u32 = 0;
    let mut pos = start;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(buf[pos] - b'0'));
        pos += 1;
    }
    (value, pos)
}

/// Decode a wire modifier mask into [`Modifiers`].
///
/// The encoding is `1 + bitmask` (xterm and Kitty agree on this); a
/// mask of 0 or 1 means no modifiers, and 0 must not underflow.
#[allow(clippy::cast_possible_truncation)] // Flags live in the low byte.
pub(crate) const fn decode_modifiers(mask: u32) -> Modifiers {
    Modifiers::from_bits_truncate((mask.saturating_sub(1) & 0xFF) as u8)
}

/// Modifier mask and event kind from an optional `modmask[:event]` param.
pub(crate) fn modifiers_and_kind(param: Option<&CsiParam>) -> (Modifiers, KeyEventKind) {
    param.map_or((Modifiers::empty(), KeyEventKind::Press), |p| {
        (decode_modifiers(p.0), KeyEventKind::from_wire(p.1))
    })
}

/// Clamp a decoded coordinate into `u16`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn saturate_u16(value: u32) -> u16 {
    if value > u16::MAX as u32 {
        u16::MAX
    } else {
        value as u16
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
