/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, so that:
///   - movement and buttons follow whatever is held at sample time
///   - reset and quit fire once on the initial press
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Intent;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Left];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Right];
const UP_KEYS: [KeyCode; 3] = [KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Up];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Char('s'), KeyCode::Char('S'), KeyCode::Down];
const PRIMARY_KEYS: [KeyCode; 2] = [KeyCode::Char('x'), KeyCode::Char('X')];
const MODIFIER_KEYS: [KeyCode; 2] = [KeyCode::Char('z'), KeyCode::Char('Z')];
const RESET_KEYS: [KeyCode; 2] = [KeyCode::Char('r'), KeyCode::Char('R')];
const QUIT_KEYS: [KeyCode; 3] = [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl-C detection.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,

    /// After this long without a Press/Repeat event a key counts as released.
    hold_timeout: Duration,
}

impl InputState {
    pub fn new(hold_timeout_ms: u64) -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
            hold_timeout: Duration::from_millis(hold_timeout_ms),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per poll, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        let now = Instant::now();
        let timeout = self.hold_timeout;
        self.last_active.retain(|_, t| now.duration_since(*t) < timeout);
    }

    fn apply(&mut self, key: KeyEvent, at: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // unreliable without enhancement; the timeout handles it
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, at);
                self.last_active.insert(key.code, at);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed during the last drain? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c_pressed() || self.any_pressed(&QUIT_KEYS)
    }

    pub fn reset_pressed(&self) -> bool {
        self.any_pressed(&RESET_KEYS)
    }

    /// Intent from the keys held right now. Opposing keys cancel.
    pub fn intent(&self) -> Intent {
        let axis = |neg: &[KeyCode], pos: &[KeyCode]| -> i8 {
            i8::from(self.any_held(pos)) - i8::from(self.any_held(neg))
        };
        Intent {
            move_x: axis(&LEFT_KEYS, &RIGHT_KEYS),
            move_y: axis(&DOWN_KEYS, &UP_KEYS),
            primary: self.any_held(&PRIMARY_KEYS),
            modifier: self.any_held(&MODIFIER_KEYS),
        }
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, at: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| at.saturating_duration_since(*t) < self.hold_timeout)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn held_keys_build_intent() {
        let mut kb = InputState::new(10_000);
        let now = Instant::now();
        kb.apply(press(KeyCode::Char('d')), now);
        kb.apply(press(KeyCode::Up), now);
        kb.apply(press(KeyCode::Char('x')), now);
        assert_eq!(
            kb.intent(),
            Intent { move_x: 1, move_y: 1, primary: true, modifier: false }
        );
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut kb = InputState::new(10_000);
        let now = Instant::now();
        kb.apply(press(KeyCode::Left), now);
        kb.apply(press(KeyCode::Right), now);
        assert_eq!(kb.intent().move_x, 0);
    }

    #[test]
    fn release_honored_only_with_enhancement() {
        let mut kb = InputState::new(10_000);
        let now = Instant::now();
        kb.apply(press(KeyCode::Char('z')), now);
        kb.apply(release(KeyCode::Char('z')), now);
        assert!(kb.intent().modifier);

        kb.honor_release = true;
        kb.apply(release(KeyCode::Char('z')), now);
        assert!(!kb.intent().modifier);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let mut kb = InputState::new(10_000);
        let now = Instant::now();
        kb.apply(press(KeyCode::Char('r')), now);
        assert!(kb.reset_pressed());
        kb.fresh_presses.clear();
        kb.apply(press(KeyCode::Char('r')), now);
        assert!(!kb.reset_pressed());
    }

    #[test]
    fn quit_keys() {
        let mut kb = InputState::new(10_000);
        kb.apply(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(kb.quit_pressed());

        let mut kb = InputState::new(10_000);
        kb.apply(press(KeyCode::Esc), Instant::now());
        assert!(kb.quit_pressed());
    }

    #[test]
    fn stale_keys_expire() {
        let mut kb = InputState::new(0);
        kb.apply(press(KeyCode::Char('a')), Instant::now());
        assert_eq!(kb.intent().move_x, 0);
    }
}
