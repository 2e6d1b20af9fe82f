use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

/// Pitch beyond this flips the view basis at the poles.
const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Movement speed may approach but never reach zero.
const MIN_MOVEMENT_SPEED: f32 = 0.1;

/// Directions the camera can be moved in, relative to its own basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-look camera: a continuously mutated position/orientation state vector.
///
/// Orientation is stored as yaw/pitch in degrees; `front`, `right`, and `up`
/// are derived from them and re-orthonormalized after every orientation change.
/// `zoom` is the field-of-view in degrees consumed by perspective projection,
/// unrelated to position.
#[derive(Debug, Clone, Copy)]
pub struct FreeCamera {
    pub position: Point3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

impl FreeCamera {
    /// Creates a camera looking along `front` from `position`.
    ///
    /// Yaw and pitch are derived from the given front vector so that later
    /// mouse input continues smoothly from the configured orientation.
    pub fn new(
        position: Point3<f32>,
        front: Vector3<f32>,
        world_up: Vector3<f32>,
        zoom: f32,
        movement_speed: f32,
    ) -> Self {
        let front = front.normalize();
        let mut camera = Self {
            position,
            front,
            up: world_up,
            right: Vector3::unit_x(),
            world_up,
            yaw: front.z.atan2(front.x).to_degrees(),
            pitch: front.y.asin().to_degrees(),
            movement_speed,
            mouse_sensitivity: 0.1,
            zoom,
        };
        camera.update_basis();
        camera
    }

    /// Applies a mouse-drag delta to the orientation.
    ///
    /// `x_offset`/`y_offset` are already in world convention (positive
    /// `y_offset` looks up); the caller handles the screen-Y inversion.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        self.update_basis();
    }

    /// Scroll adjusts how fast the camera travels, not what it sees.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.movement_speed = (self.movement_speed + y_offset).max(MIN_MOVEMENT_SPEED);
    }

    /// Moves the camera along its own basis, scaled by speed and frame time.
    pub fn advance(&mut self, direction: MoveDirection, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
            MoveDirection::Up => self.position += self.up * velocity,
            MoveDirection::Down => self.position -= self.up * velocity,
        }
    }

    /// Look-at view matrix from the current position and orientation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            self.position,
            self.position + self.front,
            self.up,
        )
    }

    /// Recomputes the orthonormal basis after yaw/pitch change.
    fn update_basis(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 5.0, 12.0),
            Vector3::new(0.0, -0.5, -2.0),
            Vector3::unit_y(),
            80.0,
            20.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basis_stays_orthonormal_under_drag() {
        let mut camera = FreeCamera::default();
        camera.process_mouse_movement(250.0, -130.0);

        assert_relative_eq!(camera.front.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.right.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.up.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.front.dot(camera.right), 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.front.dot(camera.up), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped_before_the_poles() {
        let mut camera = FreeCamera::default();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert!(camera.pitch <= 89.0);
        camera.process_mouse_movement(0.0, -100_000.0);
        assert!(camera.pitch >= -89.0);
    }

    #[test]
    fn scroll_floors_speed_at_a_positive_minimum() {
        let mut camera = FreeCamera::default();
        for _ in 0..1_000 {
            camera.process_scroll(-3.0);
        }
        assert!(camera.movement_speed > 0.0);
        assert_relative_eq!(camera.movement_speed, 0.1);

        // and speed can recover afterwards
        camera.process_scroll(5.0);
        assert_relative_eq!(camera.movement_speed, 5.1);
    }

    #[test]
    fn advance_moves_along_the_camera_basis() {
        let mut camera = FreeCamera::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
            80.0,
            10.0,
        );

        camera.advance(MoveDirection::Forward, 0.5);
        assert_relative_eq!(camera.position.z, -5.0, epsilon = 1e-5);

        camera.advance(MoveDirection::Right, 0.1);
        assert_relative_eq!(camera.position.x, 1.0, epsilon = 1e-5);

        camera.advance(MoveDirection::Down, 0.2);
        assert_relative_eq!(camera.position.y, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn view_matrix_looks_along_front() {
        let camera = FreeCamera::new(
            Point3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
            80.0,
            20.0,
        );
        let expected = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 4.0),
            Vector3::unit_y(),
        );
        assert_relative_eq!(camera.view_matrix(), expected, epsilon = 1e-5);
    }

    #[test]
    fn initial_orientation_matches_configured_front() {
        let front = Vector3::new(0.0, -0.5, -2.0);
        let camera = FreeCamera::new(
            Point3::new(0.0, 5.0, 12.0),
            front,
            Vector3::unit_y(),
            80.0,
            20.0,
        );
        let expected = front.normalize();
        assert_relative_eq!(camera.front, expected, epsilon = 1e-5);
    }
}
