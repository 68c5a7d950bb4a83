//! Keyboard handling: camera pan and branch angle.

use arbor_engine::coords::Vec2;
use arbor_engine::input::{InputState, Key};

use crate::state::GameState;

/// Read-only view of which keys are held this frame.
pub trait KeySource {
    fn is_down(&self, key: Key) -> bool;
}

impl KeySource for InputState {
    fn is_down(&self, key: Key) -> bool {
        self.key_down(key)
    }
}

impl KeySource for [Key] {
    fn is_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// How the pan delta relates to frame time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PanMode {
    /// `delta * camera_speed * dt`: pan speed independent of frame rate.
    #[default]
    FrameScaled,
    /// One pixel per frame per axis, whatever the frame time.
    PerFrameStep,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyBindings {
    pub pan_left: Key,
    pub pan_right: Key,
    pub pan_up: Key,
    pub pan_down: Key,
    pub angle_up: Key,
    pub angle_down: Key,
    pub toggle_axes: Key,
    /// Closes the window when pressed. `None` disables it.
    pub exit: Option<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pan_left: Key::A,
            pan_right: Key::D,
            pan_up: Key::W,
            pan_down: Key::S,
            angle_up: Key::ArrowUp,
            angle_down: Key::ArrowDown,
            toggle_axes: Key::X,
            exit: Some(Key::Escape),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub bindings: KeyBindings,
    pub pan_mode: PanMode,
    /// Pan speed in screen pixels per second (`FrameScaled` only).
    pub camera_speed: f32,
    /// Angle change in degrees per second.
    pub angle_rate: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            pan_mode: PanMode::FrameScaled,
            camera_speed: 60.0,
            angle_rate: 10.0,
        }
    }
}

/// `-1` if `negative` is held, else `+1` if `positive` is held, else `0`.
///
/// Holding both yields the `negative` key's effect.
fn axis<K: KeySource + ?Sized>(keys: &K, negative: Key, positive: Key) -> f32 {
    if keys.is_down(negative) {
        -1.0
    } else if keys.is_down(positive) {
        1.0
    } else {
        0.0
    }
}

/// Applies one frame of held-key input to `state`. `dt` is in seconds.
pub fn poll_input<K: KeySource + ?Sized>(
    state: &mut GameState,
    keys: &K,
    dt: f32,
    controls: &Controls,
) {
    let b = &controls.bindings;

    // Right/down are checked first; the camera offset moves against the view.
    let delta = Vec2::new(
        axis(keys, b.pan_right, b.pan_left),
        axis(keys, b.pan_down, b.pan_up),
    );

    let step = match controls.pan_mode {
        PanMode::FrameScaled => delta * (controls.camera_speed * dt),
        PanMode::PerFrameStep => delta,
    };
    state.camera.offset += step;

    if keys.is_down(b.angle_up) {
        state.angle += controls.angle_rate * dt;
    } else if keys.is_down(b.angle_down) {
        state.angle -= controls.angle_rate * dt;
    }
}
