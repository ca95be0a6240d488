// SPDX-License-Identifier: MIT
//
// Event vocabulary — the typed output of the input decoder.
//
// Everything the decoder produces lives here: key presses, mouse actions,
// focus changes, terminal resizes, and the two reply sequences we decode
// (cursor position reports and keyboard enhancement flag reports). All of
// these are short-lived value types: a decoder builds one on a complete
// sequence, the reader queues it, the application consumes it by move.
//
// Two bit layouts in this module are wire-exact and must not be rearranged:
//
// - `Modifiers` matches the Kitty keyboard protocol bitmask. Terminals
//   send modifier masks as `1 + bits`, so decoding subtracts one and
//   reads the result directly as this layout.
// - `KeyboardEnhancementFlags` is the progressive-enhancement bit set
//   from the Kitty protocol, sent verbatim (no bias) in the `CSI ? .. u`
//   reply and echoed back verbatim when re-requesting the same flags.

use std::fmt;

use bitflags::bitflags;

// ─── Event ──────────────────────────────────────────────────────────────────

/// A decoded terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event (press, repeat, or release).
    Key(KeyEvent),
    /// A mouse event (button action or movement with position).
    Mouse(MouseEvent),
    /// The terminal window was resized.
    Resize(Size),
    /// Cursor position report (`CSI row ; col R`), zero-based.
    CursorPos {
        /// 0-indexed column.
        x: u16,
        /// 0-indexed row.
        y: u16,
    },
    /// Keyboard enhancement flags report (`CSI ? flags u`).
    KeyboardEnhancementFlags(KeyboardEnhancementFlags),
    /// Terminal window gained focus (`CSI I`).
    FocusGained,
    /// Terminal window lost focus (`CSI O`).
    FocusLost,
}

// ─── Keys ───────────────────────────────────────────────────────────────────

/// A keyboard event with key identity, modifiers, and press state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl, etc.).
    pub modifiers: Modifiers,
    /// Press, repeat, or release (Kitty keyboard protocol).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }
}

/// Key press / repeat / release distinction.
///
/// Terminals only report repeat and release when the Kitty keyboard
/// protocol's event-type reporting is active. Without it, every key
/// event arrives as [`Press`](KeyEventKind::Press).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    /// Initial key press (or legacy mode where state is unknown).
    #[default]
    Press,
    /// Key held down long enough to trigger auto-repeat.
    Repeat,
    /// Key released.
    Release,
}

impl KeyEventKind {
    /// Decode the wire event-type code (`1`/`2`/`3`).
    ///
    /// Anything out of range decodes to `Press` — terminals that send
    /// event types at all send valid ones, and a wrong guess of `Press`
    /// is harmless where a hard error would drop the whole key.
    #[must_use]
    pub const fn from_wire(code: u32) -> Self {
        match code {
            2 => Self::Repeat,
            3 => Self::Release,
            _ => Self::Press,
        }
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char). Function keys F1–F35 use [`F`](KeyCode::F)
/// (1-based). The media and modifier-as-key variants only arrive through
/// the Kitty keyboard protocol's functional-key codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    /// F1 through F35.
    F(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    /// Shift+Tab as reported by Kitty-protocol terminals.
    BackTab,
    Backspace,
    Escape,
    Insert,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Lock / system keys ──────────────────────────────────────
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Menu,
    /// Keypad `5` with num lock off ("keypad begin").
    KeypadBegin,
    // ── Media keys ──────────────────────────────────────────────
    MediaPlay,
    MediaPause,
    MediaPlayPause,
    MediaStop,
    MediaFastForward,
    MediaRewind,
    MediaTrackNext,
    MediaTrackPrevious,
    MediaLowerVolume,
    MediaRaiseVolume,
    MediaMute,
    // ── Modifier keys as standalone events ──────────────────────
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    LeftHyper,
    LeftMeta,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    RightHyper,
    RightMeta,
    IsoLevel3Shift,
    IsoLevel5Shift,
}

impl fmt::Display for KeyCode {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => write!(f, "Space"),
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Enter => write!(f, "Enter"),
            Self::Tab => write!(f, "Tab"),
            Self::BackTab => write!(f, "BackTab"),
            Self::Backspace => write!(f, "Backspace"),
            Self::Escape => write!(f, "Escape"),
            Self::Insert => write!(f, "Insert"),
            Self::Delete => write!(f, "Delete"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Home => write!(f, "Home"),
            Self::End => write!(f, "End"),
            Self::PageUp => write!(f, "PageUp"),
            Self::PageDown => write!(f, "PageDown"),
            Self::CapsLock => write!(f, "CapsLock"),
            Self::ScrollLock => write!(f, "ScrollLock"),
            Self::NumLock => write!(f, "NumLock"),
            Self::PrintScreen => write!(f, "PrintScreen"),
            Self::Pause => write!(f, "Pause"),
            Self::Menu => write!(f, "Menu"),
            Self::KeypadBegin => write!(f, "KeypadBegin"),
            Self::MediaPlay => write!(f, "Play"),
            Self::MediaPause => write!(f, "MediaPause"),
            Self::MediaPlayPause => write!(f, "PlayPause"),
            Self::MediaStop => write!(f, "Stop"),
            Self::MediaFastForward => write!(f, "FastForward"),
            Self::MediaRewind => write!(f, "Rewind"),
            Self::MediaTrackNext => write!(f, "TrackNext"),
            Self::MediaTrackPrevious => write!(f, "TrackPrevious"),
            Self::MediaLowerVolume => write!(f, "LowerVolume"),
            Self::MediaRaiseVolume => write!(f, "RaiseVolume"),
            Self::MediaMute => write!(f, "Mute"),
            Self::LeftShift => write!(f, "LeftShift"),
            Self::LeftControl => write!(f, "LeftControl"),
            Self::LeftAlt => write!(f, "LeftAlt"),
            Self::LeftSuper => write!(f, "LeftSuper"),
            Self::LeftHyper => write!(f, "LeftHyper"),
            Self::LeftMeta => write!(f, "LeftMeta"),
            Self::RightShift => write!(f, "RightShift"),
            Self::RightControl => write!(f, "RightControl"),
            Self::RightAlt => write!(f, "RightAlt"),
            Self::RightSuper => write!(f, "RightSuper"),
            Self::RightHyper => write!(f, "RightHyper"),
            Self::RightMeta => write!(f, "RightMeta"),
            Self::IsoLevel3Shift => write!(f, "IsoLevel3Shift"),
            Self::IsoLevel5Shift => write!(f, "IsoLevel5Shift"),
        }
    }
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// The bit positions are the Kitty keyboard protocol bitmask (also
    /// the xterm CSI modifier encoding, where `param = 1 + bitmask`).
    /// Lock-state bits only arrive from Kitty-protocol terminals.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT     = 0b0000_0001;
        const ALT       = 0b0000_0010;
        const CTRL      = 0b0000_0100;
        const SUPER     = 0b0000_1000;
        const HYPER     = 0b0001_0000;
        const META      = 0b0010_0000;
        const CAPS_LOCK = 0b0100_0000;
        const NUM_LOCK  = 0b1000_0000;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, flag) in [
            ("Ctrl", Self::CTRL),
            ("Alt", Self::ALT),
            ("Shift", Self::SHIFT),
            ("Super", Self::SUPER),
            ("Hyper", Self::HYPER),
            ("Meta", Self::META),
            ("CapsLock", Self::CAPS_LOCK),
            ("NumLock", Self::NUM_LOCK),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}+{}", self.modifiers, self.code)
        }
    }
}

// ─── Mouse ──────────────────────────────────────────────────────────────────

/// A mouse event with button/scroll/move action, position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// What happened (press, release, drag, move, scroll).
    pub kind: MouseEventKind,
    /// 0-indexed column.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    /// Active modifier keys during the mouse event.
    pub modifiers: Modifiers,
}

/// Mouse event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Mouse moved while a button is held.
    Drag(MouseButton),
    /// Mouse moved without any button held.
    Moved,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
    /// Scroll wheel left (horizontal scroll).
    ScrollLeft,
    /// Scroll wheel right (horizontal scroll).
    ScrollRight,
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Terminal replies ───────────────────────────────────────────────────────

bitflags! {
    /// Progressive keyboard enhancement flags (Kitty protocol).
    ///
    /// The terminal reports the active set in `CSI ? flags u`; the same
    /// bit values are pushed back verbatim when requesting enhancements.
    /// Unlike modifier masks there is no `+1` bias — [`bits`](Self::bits)
    /// round-trips through the wire unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct KeyboardEnhancementFlags: u8 {
        /// Report Esc, Ctrl-modified, and similar ambiguous keys as
        /// unambiguous escape codes.
        const DISAMBIGUATE_ESCAPE_CODES = 0b0000_0001;
        /// Report repeat and release events, not just presses.
        const REPORT_EVENT_TYPES = 0b0000_0010;
        /// Report shifted and base-layout alternate key codes.
        const REPORT_ALTERNATE_KEYS = 0b0000_0100;
        /// Report every key, including plain text, as an escape code.
        const REPORT_ALL_KEYS_AS_ESCAPE_CODES = 0b0000_1000;
        /// Embed the text a key would insert in its escape code.
        const REPORT_ASSOCIATED_TEXT = 0b0001_0000;
    }
}

/// Terminal dimensions in character cells.
///
/// Produced by the resize collaborator ([`crate::resize`]); the decoder
/// consumes it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Width in character cells (columns).
    pub width: u16,
    /// Height in character cells (rows).
    pub height: u16,
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── KeyEvent constructors ───────────────────────────────────

    #[test]
    fn new_key_event_defaults() {
        let ev = KeyEvent::new(KeyCode::Enter);
        assert_eq!(ev.code, KeyCode::Enter);
        assert_eq!(ev.modifiers, Modifiers::empty());
        assert_eq!(ev.kind, KeyEventKind::Press);
    }

    #[test]
    fn with_modifiers_sets_flags() {
        let ev = KeyEvent::with_modifiers(KeyCode::Char('x'), Modifiers::CTRL);
        assert_eq!(ev.modifiers, Modifiers::CTRL);
        assert_eq!(ev.kind, KeyEventKind::Press);
    }

    // ── KeyEventKind wire decoding ──────────────────────────────

    #[test]
    fn kind_from_wire_known_codes() {
        assert_eq!(KeyEventKind::from_wire(1), KeyEventKind::Press);
        assert_eq!(KeyEventKind::from_wire(2), KeyEventKind::Repeat);
        assert_eq!(KeyEventKind::from_wire(3), KeyEventKind::Release);
    }

    #[test]
    fn kind_from_wire_out_of_range_is_press() {
        assert_eq!(KeyEventKind::from_wire(0), KeyEventKind::Press);
        assert_eq!(KeyEventKind::from_wire(4), KeyEventKind::Press);
        assert_eq!(KeyEventKind::from_wire(u32::MAX), KeyEventKind::Press);
    }

    // ── Modifier bit layout (wire contract) ─────────────────────

    #[test]
    fn modifier_bits_match_kitty_layout() {
        assert_eq!(Modifiers::SHIFT.bits(), 1);
        assert_eq!(Modifiers::ALT.bits(), 2);
        assert_eq!(Modifiers::CTRL.bits(), 4);
        assert_eq!(Modifiers::SUPER.bits(), 8);
        assert_eq!(Modifiers::HYPER.bits(), 16);
        assert_eq!(Modifiers::META.bits(), 32);
        assert_eq!(Modifiers::CAPS_LOCK.bits(), 64);
        assert_eq!(Modifiers::NUM_LOCK.bits(), 128);
    }

    #[test]
    fn enhancement_flag_bits_match_kitty_layout() {
        assert_eq!(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES.bits(), 1);
        assert_eq!(KeyboardEnhancementFlags::REPORT_EVENT_TYPES.bits(), 2);
        assert_eq!(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS.bits(), 4);
        assert_eq!(
            KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES.bits(),
            8
        );
        assert_eq!(KeyboardEnhancementFlags::REPORT_ASSOCIATED_TEXT.bits(), 16);
    }

    // ── Display rendering ───────────────────────────────────────

    #[test]
    fn keycode_display_char() {
        assert_eq!(KeyCode::Char('a').to_string(), "a");
        assert_eq!(KeyCode::Char(' ').to_string(), "Space");
    }

    #[test]
    fn keycode_display_function() {
        assert_eq!(KeyCode::F(7).to_string(), "F7");
    }

    #[test]
    fn modifiers_display_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods.to_string(), "Ctrl+Shift");
    }

    #[test]
    fn key_event_display_with_modifiers() {
        let ev = KeyEvent::with_modifiers(KeyCode::Char('q'), Modifiers::CTRL);
        assert_eq!(ev.to_string(), "Ctrl+q");
    }

    #[test]
    fn key_event_display_plain() {
        assert_eq!(KeyEvent::new(KeyCode::Escape).to_string(), "Escape");
    }

    // ── Value semantics ─────────────────────────────────────────

    #[test]
    fn events_compare_structurally() {
        let a = Event::CursorPos { x: 3, y: 7 };
        let b = Event::CursorPos { x: 3, y: 7 };
        assert_eq!(a, b);
        assert_ne!(a, Event::CursorPos { x: 7, y: 3 });
    }

    #[test]
    fn size_is_plain_data() {
        let s = Size {
            width: 80,
            height: 24,
        };
        assert_eq!(s, Size { width: 80, height: 24 });
    }
}
