// SPDX-License-Identifier: MIT
//
// Kitty keyboard protocol decoder — `CSI codepoint ; modifiers ; text u`.
//
// One decoder serves both shapes the protocol produces: the full form
// with modifier/event-type/text fields, and the plain form where only a
// codepoint arrives. Alternate key codes (colon sub-fields of the first
// parameter) and the associated-text parameter are accepted on the wire
// and dropped here; this core reports key identity, modifiers, and
// press state only.
//
// Codepoint resolution order:
//   1. the functional-key table (Unicode Private Use Area, 57358+)
//   2. literal control codepoints (Esc, Enter, Tab/Backtab, Backspace)
//   3. any remaining Unicode scalar value as a character key

use crate::error::ParseError;
use crate::event::{Event, KeyCode, KeyEvent, Modifiers};
use crate::parse::{modifiers_and_kind, parse_csi_params};

/// Decode a `CSI .. u` key report (terminator already seen).
pub(crate) fn parse_csi_u(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    let params = parse_csi_params(&buffer[2..buffer.len() - 1]);
    let Some(first) = params.first() else {
        return Err(ParseError::InvalidKittyEncoding);
    };

    // Only the primary codepoint is interpreted; `first.1` would be the
    // shifted alternate, which this core does not report.
    let codepoint = first.0;
    let (modifiers, kind) = modifiers_and_kind(params.get(1));

    let code = match translate_functional(codepoint) {
        Some(code) => code,
        None => match codepoint {
            27 => KeyCode::Escape,
            13 | 10 => KeyCode::Enter,
            9 if modifiers.contains(Modifiers::SHIFT) => KeyCode::BackTab,
            9 => KeyCode::Tab,
            127 => KeyCode::Backspace,
            cp => char::from_u32(cp)
                .map(KeyCode::Char)
                .ok_or(ParseError::InvalidKittyEncoding)?,
        },
    };

    Ok(Some(Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
    })))
}

// ─── Functional-key translation table ───────────────────────────────────────

/// Map a Kitty functional-key codepoint (Unicode PUA) to a named key.
///
/// Returns `None` for codepoints outside every known range so the
/// caller can fall through to literal-character handling.
#[allow(clippy::cast_possible_truncation)] // F-key ranges bound the arithmetic.
pub(crate) fn translate_functional(cp: u32) -> Option<KeyCode> {
    let code = match cp {
        57358 => KeyCode::CapsLock,
        57359 => KeyCode::ScrollLock,
        57360 => KeyCode::NumLock,
        57361 => KeyCode::PrintScreen,
        57362 => KeyCode::Pause,
        57363 => KeyCode::Menu,
        // F13–F35.
        cp @ 57376..=57398 => KeyCode::F((cp - 57376 + 13) as u8),
        // Keypad digits 0–9.
        cp @ 57399..=57408 => KeyCode::Char((b'0' + (cp - 57399) as u8) as char),
        // Keypad operators.
        57409 => KeyCode::Char('.'),
        57410 => KeyCode::Char('/'),
        57411 => KeyCode::Char('*'),
        57412 => KeyCode::Char('-'),
        57413 => KeyCode::Char('+'),
        57414 => KeyCode::Enter,
        57415 => KeyCode::Char('='),
        57416 => KeyCode::Char(','),
        // Keypad navigation duplicates.
        57417 => KeyCode::Left,
        57418 => KeyCode::Right,
        57419 => KeyCode::Up,
        57420 => KeyCode::Down,
        57421 => KeyCode::PageUp,
        57422 => KeyCode::PageDown,
        57423 => KeyCode::Home,
        57424 => KeyCode::End,
        57425 => KeyCode::Insert,
        57426 => KeyCode::Delete,
        57427 => KeyCode::KeypadBegin,
        // Media controls.
        57428 => KeyCode::MediaPlay,
        57429 => KeyCode::MediaPause,
        57430 => KeyCode::MediaPlayPause,
        57432 => KeyCode::MediaStop,
        57433 => KeyCode::MediaFastForward,
        57434 => KeyCode::MediaRewind,
        57435 => KeyCode::MediaTrackNext,
        57436 => KeyCode::MediaTrackPrevious,
        57438 => KeyCode::MediaLowerVolume,
        57439 => KeyCode::MediaRaiseVolume,
        57440 => KeyCode::MediaMute,
        // Modifier keys reported as their own events.
        57441 => KeyCode::LeftShift,
        57442 => KeyCode::LeftControl,
        57443 => KeyCode::LeftAlt,
        57444 => KeyCode::LeftSuper,
        57445 => KeyCode::LeftHyper,
        57446 => KeyCode::LeftMeta,
        57447 => KeyCode::RightShift,
        57448 => KeyCode::RightControl,
        57449 => KeyCode::RightAlt,
        57450 => KeyCode::RightSuper,
        57451 => KeyCode::RightHyper,
        57452 => KeyCode::RightMeta,
        57453 => KeyCode::IsoLevel3Shift,
        57454 => KeyCode::IsoLevel5Shift,
        _ => return None,
    };
    Some(code)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
