use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use super::free_camera::{FreeCamera, MoveDirection};
use crate::gfx::view::ProjectionMode;

/// Converts absolute cursor positions into drag deltas.
///
/// The first position after session start only seeds the tracking state;
/// reporting a delta for it would jerk the camera by the distance between the
/// window origin and wherever the cursor happened to enter.
#[derive(Debug, Clone, Copy)]
pub struct MouseTracker {
    last_x: f32,
    last_y: f32,
    seeded: bool,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self {
            last_x: 0.0,
            last_y: 0.0,
            seeded: false,
        }
    }

    /// Feeds an absolute cursor position, returning the `(dx, dy)` drag delta.
    ///
    /// `dy` is inverted: screen coordinates grow downward, world pitch grows
    /// upward. Returns `None` for the seeding event.
    pub fn track(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        if !self.seeded {
            self.last_x = x;
            self.last_y = y;
            self.seeded = true;
            return None;
        }

        let dx = x - self.last_x;
        let dy = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        Some((dx, dy))
    }
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates winit input events into camera and projection mutations.
///
/// Cursor and scroll events apply immediately; key-driven movement is applied
/// once per frame from the set of currently held keys, scaled by frame time,
/// mirroring a poll-style input loop.
pub struct CameraController {
    tracker: MouseTracker,
    held: HashSet<KeyCode>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            tracker: MouseTracker::new(),
            held: HashSet::new(),
        }
    }

    /// Records a key press or release.
    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held.insert(code);
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    /// Feeds an absolute cursor position and rotates the camera by the delta.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64, camera: &mut FreeCamera) {
        if let Some((dx, dy)) = self.tracker.track(x as f32, y as f32) {
            camera.process_mouse_movement(dx, dy);
        }
    }

    /// Scroll wheel adjusts travel speed.
    pub fn handle_scroll(&mut self, y_offset: f32, camera: &mut FreeCamera) {
        camera.process_scroll(y_offset);
    }

    /// Applies held keys for this frame: WASD planar movement, Q/E vertical,
    /// P/O projection selection.
    ///
    /// P and O react to key state, not edges; holding one re-applies the same
    /// mode, which is harmless.
    pub fn apply_held_keys(
        &self,
        camera: &mut FreeCamera,
        projection: &mut ProjectionMode,
        delta_time: f32,
    ) {
        const MOVEMENT: [(KeyCode, MoveDirection); 6] = [
            (KeyCode::KeyW, MoveDirection::Forward),
            (KeyCode::KeyS, MoveDirection::Backward),
            (KeyCode::KeyA, MoveDirection::Left),
            (KeyCode::KeyD, MoveDirection::Right),
            (KeyCode::KeyQ, MoveDirection::Up),
            (KeyCode::KeyE, MoveDirection::Down),
        ];

        for (code, direction) in MOVEMENT {
            if self.held.contains(&code) {
                camera.advance(direction, delta_time);
            }
        }

        if self.held.contains(&KeyCode::KeyP) {
            *projection = ProjectionMode::Perspective;
        }
        if self.held.contains(&KeyCode::KeyO) {
            *projection = ProjectionMode::Orthographic;
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
