// SPDX-License-Identifier: MIT
//
// Mouse report decoders — the three xterm tracking encodings that can
// coexist on one input stream.
//
// All three share one button/modifier layout in the `cb` field; they
// differ in how `cb`, `x`, and `y` travel on the wire:
//
// - X10/normal: raw bytes biased by +32, fixed six-byte form. Caps
//   coordinates at 255-32 and cannot express release-per-button.
// - RXVT: decimal, semicolon-separated, `cb` still biased by +32.
// - SGR: decimal, semicolon-separated, unbiased `cb`; release travels
//   in the terminator (`m`) instead of the button field, which is why
//   a decoded `Down` must be flipped to `Up` on an `m`.
//
// Coordinates are 1-based on the wire for RXVT and SGR (subtract one,
// saturating) and 32-biased for X10 (subtract 32, saturating).

use crate::error::ParseError;
use crate::event::{Event, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::parse::{parse_csi_params, saturate_u16};

/// Decoded button field: what happened, and which modifiers were held.
type ButtonState = (MouseEventKind, Modifiers);

/// Decode the shared `cb` button/modifier field.
///
/// Button identity spreads across the low two bits plus two high bits;
/// bit 5 marks motion. Modifier bits ride in the middle of the byte.
/// Folded button values past the scroll set have no mapping here.
pub(crate) fn decode_cb(cb: u8) -> Result<ButtonState, ParseError> {
    let button = (cb & 0b0000_0011) | ((cb & 0b1100_0000) >> 4);
    let dragging = cb & 0b0010_0000 != 0;

    let kind = match (dragging, button) {
        (false, 0) => MouseEventKind::Down(MouseButton::Left),
        (false, 1) => MouseEventKind::Down(MouseButton::Middle),
        (false, 2) => MouseEventKind::Down(MouseButton::Right),
        // X10 release reports do not identify the button.
        (false, 3) => MouseEventKind::Up(MouseButton::Left),
        (false, 4) => MouseEventKind::ScrollUp,
        (false, 5) => MouseEventKind::ScrollDown,
        (false, 6) => MouseEventKind::ScrollLeft,
        (false, 7) => MouseEventKind::ScrollRight,
        (true, 0) => MouseEventKind::Drag(MouseButton::Left),
        (true, 1) => MouseEventKind::Drag(MouseButton::Middle),
        (true, 2) => MouseEventKind::Drag(MouseButton::Right),
        (true, 3..=5) => MouseEventKind::Moved,
        _ => return Err(ParseError::InvalidMouseButton(cb)),
    };

    let mut modifiers = Modifiers::empty();
    if cb & 0b0000_0100 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 0b0000_1000 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if cb & 0b0001_0000 != 0 {
        modifiers |= Modifiers::CTRL;
    }

    Ok((kind, modifiers))
}

// ─── X10 / normal tracking ──────────────────────────────────────────────────

/// `ESC [ M cb x y` — the legacy fixed-length report. Every payload
/// byte is biased by +32 on the wire.
pub(crate) fn parse_x10(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    debug_assert!(buffer.len() >= 3 && buffer[2] == b'M');

    if buffer.len() < 6 {
        return Ok(None);
    }

    let cb = buffer[3].saturating_sub(32);
    let (kind, modifiers) = decode_cb(cb)?;

    Ok(Some(Event::Mouse(MouseEvent {
        kind,
        x: u16::from(buffer[4].saturating_sub(32)),
        y: u16::from(buffer[5].saturating_sub(32)),
        modifiers,
    })))
}

// ─── RXVT tracking ──────────────────────────────────────────────────────────

/// `ESC [ cb ; x ; y M` — decimal fields, `cb` biased by +32 like X10,
/// coordinates 1-based.
pub(crate) fn parse_rxvt(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    let params = parse_csi_params(&buffer[2..buffer.len() - 1]);
    if params.len() != 3 {
        return Err(ParseError::InvalidMouseReport);
    }

    let cb = params[0]
        .0
        .checked_sub(32)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or(ParseError::InvalidMouseReport)?;
    let (kind, modifiers) = decode_cb(cb)?;

    Ok(Some(Event::Mouse(MouseEvent {
        kind,
        x: saturate_u16(params[1].0.saturating_sub(1)),
        y: saturate_u16(params[2].0.saturating_sub(1)),
        modifiers,
    })))
}

// ─── SGR tracking ───────────────────────────────────────────────────────────

/// `ESC [ < cb ; x ; y M|m` — decimal fields, unbiased `cb`,
/// coordinates 1-based, press/release split across the terminator.
pub(crate) fn parse_sgr(buffer: &[u8]) -> Result<Option<Event>, ParseError> {
    debug_assert!(buffer.len() >= 3 && buffer[2] == b'<');

    // Scan for the terminator; everything between must be digits or
    // separators or the report can never become valid.
    let last = buffer[buffer.len() - 1];
    if last != b'M' && last != b'm' {
        if buffer.len() > 3 && !last.is_ascii_digit() && last != b';' {
            return Err(ParseError::InvalidMouseReport);
        }
        return Ok(None);
    }

    let params = parse_csi_params(&buffer[3..buffer.len() - 1]);
    if params.len() != 3 {
        return Err(ParseError::InvalidMouseReport);
    }

    let cb = u8::try_from(params[0].0).map_err(|_| ParseError::InvalidMouseReport)?;
    let (mut kind, modifiers) = decode_cb(cb)?;

    // SGR encodes release only via the terminator, not the button field.
    if last == b'm' {
        if let MouseEventKind::Down(button) = kind {
            kind = MouseEventKind::Up(button);
        }
    }

    Ok(Some(Event::Mouse(MouseEvent {
        kind,
        x: saturate_u16(params[1].0.saturating_sub(1)),
        y: saturate_u16(params[2].0.saturating_sub(1)),
        modifiers,
    })))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::parse_event;

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        })
    }

    fn parse_one(data: &[u8]) -> Event {
        parse_event(data, false)
            .expect("report should parse")
            .expect("report should be complete")
    }

    // ── decode_cb ───────────────────────────────────────────────────────

    #[test]
    fn cb_buttons_and_scroll() {
        assert_eq!(
            decode_cb(0).unwrap().0,
            MouseEventKind::Down(MouseButton::Left)
        );
        assert_eq!(
            decode_cb(1).unwrap().0,
            MouseEventKind::Down(MouseButton::Middle)
        );
        assert_eq!(
            decode_cb(2).unwrap().0,
            MouseEventKind::Down(MouseButton::Right)
        );
        assert_eq!(decode_cb(3).unwrap().0, MouseEventKind::Up(MouseButton::Left));
        assert_eq!(decode_cb(64).unwrap().0, MouseEventKind::ScrollUp);
        assert_eq!(decode_cb(65).unwrap().0, MouseEventKind::ScrollDown);
        assert_eq!(decode_cb(66).unwrap().0, MouseEventKind::ScrollLeft);
        assert_eq!(decode_cb(67).unwrap().0, MouseEventKind::ScrollRight);
    }

    #[test]
    fn cb_motion_bit() {
        assert_eq!(
            decode_cb(32).unwrap().0,
            MouseEventKind::Drag(MouseButton::Left)
        );
        assert_eq!(
            decode_cb(33).unwrap().0,
            MouseEventKind::Drag(MouseButton::Middle)
        );
        assert_eq!(
            decode_cb(34).unwrap().0,
            MouseEventKind::Drag(MouseButton::Right)
        );
        assert_eq!(decode_cb(35).unwrap().0, MouseEventKind::Moved);
        assert_eq!(decode_cb(32 + 64).unwrap().0, MouseEventKind::Moved);
        assert_eq!(decode_cb(33 + 64).unwrap().0, MouseEventKind::Moved);
    }

    #[test]
    fn cb_modifier_bits() {
        assert_eq!(decode_cb(4).unwrap().1, Modifiers::SHIFT);
        assert_eq!(decode_cb(8).unwrap().1, Modifiers::ALT);
        assert_eq!(decode_cb(16).unwrap().1, Modifiers::CTRL);
        assert_eq!(
            decode_cb(4 + 16).unwrap().1,
            Modifiers::SHIFT | Modifiers::CTRL
        );
    }

    #[test]
    fn cb_unknown_button_is_rejected() {
        // Extended button range (bits 6-7 without 0-1) past the scroll set.
        assert_eq!(
            decode_cb(0b1000_0000),
            Err(ParseError::InvalidMouseButton(0b1000_0000))
        );
        // Motion with an extended button.
        assert_eq!(
            decode_cb(0b1010_0010),
            Err(ParseError::InvalidMouseButton(0b1010_0010))
        );
    }

    // ── X10 ─────────────────────────────────────────────────────────────

    #[test]
    fn x10_left_press() {
        let seq = [0x1B, b'[', b'M', 32, 32, 32 + 5];
        assert_eq!(
            parse_one(&seq),
            mouse(MouseEventKind::Down(MouseButton::Left), 0, 5)
        );
    }

    #[test]
    fn x10_biasing_holds_across_range() {
        for (cb, kind) in [
            (0_u8, MouseEventKind::Down(MouseButton::Left)),
            (1, MouseEventKind::Down(MouseButton::Middle)),
            (2, MouseEventKind::Down(MouseButton::Right)),
            (3, MouseEventKind::Up(MouseButton::Left)),
        ] {
            for (x, y) in [(0_u8, 0_u8), (10, 20), (100, 50), (223, 223)] {
                let seq = [0x1B, b'[', b'M', 32 + cb, 32 + x, 32 + y];
                assert_eq!(
                    parse_one(&seq),
                    mouse(kind, u16::from(x), u16::from(y)),
                    "cb={cb} x={x} y={y}"
                );
            }
        }
    }

    #[test]
    fn x10_is_incomplete_until_six_bytes() {
        assert_eq!(parse_event(b"\x1b[M", true), Ok(None));
        assert_eq!(parse_event(&[0x1B, b'[', b'M', 32, 42], true), Ok(None));
    }

    #[test]
    fn x10_underflowing_payload_saturates_to_zero() {
        // Bytes below the +32 bias decode to coordinate 0 rather than wrap.
        let seq = [0x1B, b'[', b'M', 32, 10, 10];
        assert_eq!(
            parse_one(&seq),
            mouse(MouseEventKind::Down(MouseButton::Left), 0, 0)
        );
    }

    // ── RXVT ────────────────────────────────────────────────────────────

    #[test]
    fn rxvt_press_and_coordinates() {
        assert_eq!(
            parse_one(b"\x1b[32;10;20M"),
            mouse(MouseEventKind::Down(MouseButton::Left), 9, 19)
        );
        assert_eq!(
            parse_one(b"\x1b[34;1;1M"),
            mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)
        );
    }

    #[test]
    fn rxvt_drag() {
        assert_eq!(
            parse_one(b"\x1b[64;5;6M"),
            mouse(MouseEventKind::Drag(MouseButton::Left), 4, 5)
        );
    }

    #[test]
    fn rxvt_with_modifier_bits() {
        assert_eq!(
            parse_one(b"\x1b[36;10;10M"),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                x: 9,
                y: 9,
                modifiers: Modifiers::SHIFT,
            })
        );
    }

    #[test]
    fn rxvt_bad_field_count_is_rejected() {
        assert_eq!(
            parse_event(b"\x1b[32;10M", false),
            Err(ParseError::InvalidMouseReport)
        );
        assert_eq!(
            parse_event(b"\x1b[32;10;20;30M", false),
            Err(ParseError::InvalidMouseReport)
        );
    }

    #[test]
    fn rxvt_cb_below_bias_is_rejected() {
        assert_eq!(
            parse_event(b"\x1b[3;10;20M", false),
            Err(ParseError::InvalidMouseReport)
        );
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn sgr_press_then_release_terminator() {
        assert_eq!(
            parse_one(b"\x1b[<0;5;5M"),
            mouse(MouseEventKind::Down(MouseButton::Left), 4, 4)
        );
        assert_eq!(
            parse_one(b"\x1b[<0;5;5m"),
            mouse(MouseEventKind::Up(MouseButton::Left), 4, 4)
        );
    }

    #[test]
    fn sgr_release_keeps_non_press_kinds() {
        // Scroll on an `m` terminator stays a scroll; only Down flips.
        assert_eq!(
            parse_one(b"\x1b[<64;5;5m"),
            mouse(MouseEventKind::ScrollUp, 4, 4)
        );
    }

    #[test]
    fn sgr_drag_and_move() {
        assert_eq!(
            parse_one(b"\x1b[<32;15;25M"),
            mouse(MouseEventKind::Drag(MouseButton::Left), 14, 24)
        );
        assert_eq!(
            parse_one(b"\x1b[<35;15;25M"),
            mouse(MouseEventKind::Moved, 14, 24)
        );
    }

    #[test]
    fn sgr_scroll_directions() {
        assert_eq!(parse_one(b"\x1b[<64;1;1M"), mouse(MouseEventKind::ScrollUp, 0, 0));
        assert_eq!(
            parse_one(b"\x1b[<65;1;1M"),
            mouse(MouseEventKind::ScrollDown, 0, 0)
        );
        assert_eq!(
            parse_one(b"\x1b[<66;1;1M"),
            mouse(MouseEventKind::ScrollLeft, 0, 0)
        );
        assert_eq!(
            parse_one(b"\x1b[<67;1;1M"),
            mouse(MouseEventKind::ScrollRight, 0, 0)
        );
    }

    #[test]
    fn sgr_modifiers() {
        assert_eq!(
            parse_one(b"\x1b[<16;10;10M"),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                x: 9,
                y: 9,
                modifiers: Modifiers::CTRL,
            })
        );
    }

    #[test]
    fn sgr_large_coordinates() {
        assert_eq!(
            parse_one(b"\x1b[<0;300;150M"),
            mouse(MouseEventKind::Down(MouseButton::Left), 299, 149)
        );
    }

    #[test]
    fn sgr_is_incomplete_until_terminator() {
        assert_eq!(parse_event(b"\x1b[<", true), Ok(None));
        assert_eq!(parse_event(b"\x1b[<0;10", true), Ok(None));
        assert_eq!(parse_event(b"\x1b[<0;10;20", true), Ok(None));
    }

    #[test]
    fn sgr_stray_byte_is_rejected() {
        assert_eq!(
            parse_event(b"\x1b[<0;1x", true),
            Err(ParseError::InvalidMouseReport)
        );
    }

    #[test]
    fn sgr_bad_field_count_is_rejected() {
        assert_eq!(
            parse_event(b"\x1b[<0;5M", false),
            Err(ParseError::InvalidMouseReport)
        );
    }
}
