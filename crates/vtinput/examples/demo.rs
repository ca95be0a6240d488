// SPDX-License-Identifier: MIT
//
// vtinput demo — a live event viewer that proves the pipeline works.
//
// This wires the complete path: TtySource → Reader → classifier →
// Events → stdout. Run it, press keys, resize the terminal. Ctrl-C or
// Escape to quit.
//
// The crate deliberately does not own terminal modes, so by default the
// line discipline buffers input until Enter. For the real byte-at-a-time
// experience, disable canonical mode first:
//
//   stty raw -echo; cargo run -p vtinput --example demo; stty sane
//
// Lenient-mode discard diagnostics are emitted via `tracing`; set
// RUST_LOG=vtinput=debug to see them.

use std::time::Duration;

use vtinput::{Event, KeyCode, KeyEvent, Modifiers, Reader};

fn main() {
    tracing_subscriber::fmt::init();

    let mut reader = Reader::from_tty();
    println!("vtinput demo — type, click, resize; Ctrl-C or Escape quits");

    loop {
        match reader.pull(Some(Duration::from_millis(100))) {
            Ok(Some(event)) => {
                describe(&event);
                if should_quit(&event) {
                    break;
                }
            }
            Ok(None) => {} // Timeout tick; nothing happened.
            Err(err) => {
                eprintln!("input error: {err}");
                break;
            }
        }
    }
}

fn describe(event: &Event) {
    match event {
        Event::Key(key) => println!("Key: {key} ({:?})", key.kind),
        Event::Mouse(mouse) => {
            println!("Mouse: {:?} at ({}, {})", mouse.kind, mouse.x, mouse.y);
        }
        Event::Resize(size) => println!("Resize: {}x{}", size.width, size.height),
        Event::CursorPos { x, y } => println!("Cursor: ({x}, {y})"),
        Event::KeyboardEnhancementFlags(flags) => {
            println!("Enhancement flags: {flags:?}");
        }
        Event::FocusGained => println!("Focus: gained"),
        Event::FocusLost => println!("Focus: lost"),
    }
}

fn should_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Escape,
            ..
        })
    ) || matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            ..
        }) if modifiers.contains(Modifiers::CTRL)
    )
}
