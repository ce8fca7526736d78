//! Plays the keyboard from a terminal.
//!
//! Terminals that support the kitty keyboard protocol report key releases,
//! so keys behave like held piano keys. Elsewhere every press toggles its
//! key on or off.

use std::collections::BTreeSet;
use std::io;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use tracing::{info, warn};

use crate::engine::{EngineCommand, EngineHandle, EngineUpdate};
use crate::keyboard::KeyId;
use crate::tuning::OctaveRange;

/// macOS virtual key code of a character on an ANSI layout.
pub fn mac_key_code(c: char) -> Option<KeyId> {
    let code = match c.to_ascii_lowercase() {
        'a' => 0,
        's' => 1,
        'd' => 2,
        'f' => 3,
        'h' => 4,
        'g' => 5,
        'z' => 6,
        'x' => 7,
        'c' => 8,
        'v' => 9,
        'b' => 11,
        'q' => 12,
        'w' => 13,
        'e' => 14,
        'r' => 15,
        'y' => 16,
        't' => 17,
        '1' => 18,
        '2' => 19,
        '3' => 20,
        '4' => 21,
        '6' => 22,
        '5' => 23,
        '=' => 24,
        '9' => 25,
        '7' => 26,
        '-' => 27,
        '8' => 28,
        '0' => 29,
        ']' => 30,
        'o' => 31,
        'u' => 32,
        '[' => 33,
        'i' => 34,
        'p' => 35,
        'l' => 37,
        'j' => 38,
        '\'' => 39,
        'k' => 40,
        ';' => 41,
        '\\' => 42,
        ',' => 43,
        '/' => 44,
        'n' => 45,
        'm' => 46,
        '.' => 47,
        '`' => 50,
        _ => return None,
    };
    Some(code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Command(EngineCommand),
    Quit,
    Ignore,
}

/// Turns terminal key events into engine commands.
struct KeyTranslator {
    reports_release: bool,
    toggled: BTreeSet<KeyId>,
}

impl KeyTranslator {
    fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            toggled: BTreeSet::new(),
        }
    }

    fn translate(&mut self, event: KeyEvent) -> Action {
        let quit = event.code == KeyCode::Esc
            || (event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            return Action::Quit;
        }

        match (event.code, event.kind) {
            (KeyCode::Up, KeyEventKind::Press) => Action::Command(EngineCommand::ShiftOctave(1)),
            (KeyCode::Down, KeyEventKind::Press) => {
                Action::Command(EngineCommand::ShiftOctave(-1))
            }
            (KeyCode::Char(c), kind) => match mac_key_code(c) {
                Some(key) => self.key(key, kind),
                None => Action::Ignore,
            },
            _ => Action::Ignore,
        }
    }

    fn key(&mut self, key: KeyId, kind: KeyEventKind) -> Action {
        match kind {
            KeyEventKind::Repeat => Action::Ignore,
            KeyEventKind::Release => Action::Command(EngineCommand::KeyUp(key)),
            KeyEventKind::Press if self.reports_release => {
                Action::Command(EngineCommand::KeyDown(key))
            }
            KeyEventKind::Press => {
                if self.toggled.remove(&key) {
                    Action::Command(EngineCommand::KeyUp(key))
                } else {
                    self.toggled.insert(key);
                    Action::Command(EngineCommand::KeyDown(key))
                }
            }
        }
    }
}

/// Raw mode, plus release reporting when available, undone on drop.
struct RawMode {
    enhanced: bool,
}

impl RawMode {
    fn enable(reports_release: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = RawMode { enhanced: false };
        if reports_release {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.enhanced = true;
        }
        Ok(guard)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
    }
}

/// An octave picker line such as `2 3 [4] 5 6`.
pub fn octave_display(octaves: OctaveRange, octave: i32) -> String {
    let selected = octaves.position(octave);
    octaves
        .iter()
        .enumerate()
        .map(|(i, o)| {
            if Some(i) == selected {
                format!("[{o}]")
            } else {
                o.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads keys until Esc or Ctrl-C, forwarding them to `engine`.
pub fn run(engine: &EngineHandle, octaves: OctaveRange) -> io::Result<()> {
    let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if !reports_release {
        warn!("terminal does not report key releases, keys will toggle");
    }
    info!("play on Z S X D C V G B H N J M , | octave 2 3 4 5 or Up/Down | Esc quits");

    let _raw_mode = RawMode::enable(reports_release)?;
    read_keys(engine, octaves, KeyTranslator::new(reports_release))
}

fn read_keys(
    engine: &EngineHandle,
    octaves: OctaveRange,
    mut translator: KeyTranslator,
) -> io::Result<()> {
    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };

        match translator.translate(key_event) {
            Action::Command(command) => {
                if engine.send(command).is_err() {
                    return Ok(());
                }
            }
            Action::Quit => return Ok(()),
            Action::Ignore => {}
        }

        for update in engine.update_rx.try_iter() {
            if let EngineUpdate::OctaveChanged { octave, .. } = update {
                info!("octave {}", octave_display(octaves, octave));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char(c), KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(c: char) -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char(c), KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn letters_map_to_mac_key_codes() {
        assert_eq!(mac_key_code('z'), Some(6));
        assert_eq!(mac_key_code('Z'), Some(6));
        assert_eq!(mac_key_code(','), Some(43));
        assert_eq!(mac_key_code('5'), Some(23));
        assert_eq!(mac_key_code('§'), None);
    }

    #[test]
    fn press_and_release_when_supported() {
        let mut translator = KeyTranslator::new(true);
        assert_eq!(
            translator.translate(press('z')),
            Action::Command(EngineCommand::KeyDown(6))
        );
        assert_eq!(
            translator.translate(KeyEvent::new_with_kind(
                KeyCode::Char('z'),
                KeyModifiers::NONE,
                KeyEventKind::Repeat
            )),
            Action::Ignore
        );
        assert_eq!(
            translator.translate(release('z')),
            Action::Command(EngineCommand::KeyUp(6))
        );
    }

    #[test]
    fn presses_toggle_without_release_events() {
        let mut translator = KeyTranslator::new(false);
        assert_eq!(
            translator.translate(press('n')),
            Action::Command(EngineCommand::KeyDown(45))
        );
        assert_eq!(
            translator.translate(press('n')),
            Action::Command(EngineCommand::KeyUp(45))
        );
    }

    #[test]
    fn octave_picker_marks_the_selection() {
        let octaves = OctaveRange::new(2, 6);
        assert_eq!(octave_display(octaves, 4), "2 3 [4] 5 6");
        assert_eq!(octave_display(octaves, 2), "[2] 3 4 5 6");
        assert_eq!(octave_display(octaves, 9), "2 3 4 5 6");
    }

    #[test]
    fn arrows_shift_and_escape_quits() {
        let mut translator = KeyTranslator::new(true);
        assert_eq!(
            translator.translate(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            Action::Command(EngineCommand::ShiftOctave(1))
        );
        assert_eq!(
            translator.translate(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Action::Quit
        );
        assert_eq!(
            translator.translate(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}
