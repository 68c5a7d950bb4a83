use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current keyboard state for the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows; forget held keys
                    // so the camera does not keep drifting.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::key(key, KeyState::Pressed));
    }

    fn release(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::key(key, KeyState::Released));
    }

    #[test]
    fn press_and_release_track_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::W);
        assert!(state.key_down(Key::W));
        assert!(frame.was_pressed(Key::W));

        frame.clear();
        release(&mut state, &mut frame, Key::W);
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
        assert!(!frame.was_pressed(Key::W));
    }

    #[test]
    fn os_repeat_does_not_report_a_second_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::ArrowUp);
        frame.clear();
        press(&mut state, &mut frame, Key::ArrowUp);

        assert!(state.key_down(Key::ArrowUp));
        assert!(frame.keys_pressed.is_empty());
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::A);
        press(&mut state, &mut frame, Key::ArrowDown);
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn key_events_refresh_modifiers() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::D, state: KeyState::Pressed, modifiers: shift, code: 0, repeat: false },
        );
        assert!(state.modifiers.any());
    }
}
