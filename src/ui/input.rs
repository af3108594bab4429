/// Input translation.
///
/// Drains terminal events and maps them onto session actions:
///   - Keys: slider nudges, Next / Reset / Hint, quit
///   - Mouse: press or drag on a slider gauge (resolved by the renderer,
///     which owns the gauge layout)
///
/// Press and Repeat both count, so holding an arrow key keeps the slider
/// moving. Release events are ignored.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind, poll,
};

use crate::domain::combination::Slot;
use crate::sim::step::Action;

/// One user intent, in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Act(Action),
    Quit,
}

/// A raw input worth acting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Left button pressed or dragged at (column, row)
    Pointer { col: u16, row: u16 },
    Resize,
}

// ── Key Constants ──

const KEYS_A1_DOWN: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_A1_UP: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_A2_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_A2_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_NEXT: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Enter];
const KEYS_RESET: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_HINT: &[KeyCode] = &[KeyCode::Char('h'), KeyCode::Char('H'), KeyCode::Char('?')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

pub struct InputState {
    /// Events collected by the most recent `wait_events()`.
    pub events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { events: Vec::with_capacity(8) }
    }

    /// Block up to `timeout` for the first event, then drain whatever else
    /// is already queued.
    pub fn wait_events(&mut self, timeout: Duration) -> io::Result<()> {
        self.events.clear();

        if !poll(timeout)? {
            return Ok(());
        }
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    self.events.push(InputEvent::Key(key));
                }
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                        self.events.push(InputEvent::Pointer { col: m.column, row: m.row });
                    }
                    _ => {}
                },
                Event::Resize(_, _) => self.events.push(InputEvent::Resize),
                _ => {}
            }
            if !poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(())
    }
}

/// Map a key press to a command. `coarse_steps` is the stride used with
/// Shift or PageUp/PageDown.
pub fn map_key(key: &KeyEvent, coarse_steps: i32) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Command::Quit);
    }

    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    let stride = if shifted { coarse_steps } else { 1 };
    let nudge = |slot, steps| Some(Command::Act(Action::Nudge { slot, steps }));

    let code = key.code;
    if KEYS_A1_DOWN.contains(&code) {
        nudge(Slot::First, -stride)
    } else if KEYS_A1_UP.contains(&code) {
        nudge(Slot::First, stride)
    } else if KEYS_A2_DOWN.contains(&code) {
        nudge(Slot::Second, -stride)
    } else if KEYS_A2_UP.contains(&code) {
        nudge(Slot::Second, stride)
    } else if code == KeyCode::PageUp {
        nudge(Slot::Second, coarse_steps)
    } else if code == KeyCode::PageDown {
        nudge(Slot::Second, -coarse_steps)
    } else if code == KeyCode::Home {
        nudge(Slot::First, -coarse_steps)
    } else if code == KeyCode::End {
        nudge(Slot::First, coarse_steps)
    } else if KEYS_NEXT.contains(&code) {
        Some(Command::Act(Action::NextLevel))
    } else if KEYS_RESET.contains(&code) {
        Some(Command::Act(Action::Reset))
    } else if KEYS_HINT.contains(&code) {
        Some(Command::Act(Action::Hint))
    } else if KEYS_QUIT.contains(&code) {
        Some(Command::Quit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_nudge_sliders() {
        assert_eq!(
            map_key(&key(KeyCode::Right), 10),
            Some(Command::Act(Action::Nudge { slot: Slot::First, steps: 1 }))
        );
        assert_eq!(
            map_key(&key(KeyCode::Down), 10),
            Some(Command::Act(Action::Nudge { slot: Slot::Second, steps: -1 }))
        );
    }

    #[test]
    fn shift_uses_coarse_stride() {
        let k = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            map_key(&k, 10),
            Some(Command::Act(Action::Nudge { slot: Slot::Second, steps: 10 }))
        );
        assert_eq!(
            map_key(&key(KeyCode::Home), 4),
            Some(Command::Act(Action::Nudge { slot: Slot::First, steps: -4 }))
        );
    }

    #[test]
    fn buttons() {
        assert_eq!(map_key(&key(KeyCode::Char('n')), 10), Some(Command::Act(Action::NextLevel)));
        assert_eq!(map_key(&key(KeyCode::Char('r')), 10), Some(Command::Act(Action::Reset)));
        assert_eq!(map_key(&key(KeyCode::Char('h')), 10), Some(Command::Act(Action::Hint)));
        assert_eq!(map_key(&key(KeyCode::Esc), 10), Some(Command::Quit));
        assert_eq!(map_key(&key(KeyCode::Char('z')), 10), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let k = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&k, 10), Some(Command::Quit));
    }
}
