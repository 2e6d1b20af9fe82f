//! Per-frame view and projection selection
//!
//! Owns the perspective/orthographic choice and turns window aspect ratio plus
//! camera state into the matrices the shader consumes. Matrices are pushed to
//! the sink unconditionally every frame; the sink has no dirty tracking, so
//! skipping an "unchanged" push would leave stale state visible.

use cgmath::{ortho, perspective, Deg, EuclideanSpace, Matrix4};

use super::camera::FreeCamera;
use super::shading::{uniforms, UniformSink};

/// Near clip plane shared by both projection modes.
const NEAR_PLANE: f32 = 0.1;
/// Far clip plane shared by both projection modes.
const FAR_PLANE: f32 = 100.0;
/// Vertical extent of the orthographic view volume, in world units.
const ORTHO_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    /// Name stored in the profile table.
    pub fn store_name(self) -> &'static str {
        match self {
            ProjectionMode::Perspective => "PERSPECTIVE",
            ProjectionMode::Orthographic => "ORTHO",
        }
    }
}

/// Viewport-dependent projection state, recomputed every frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrame {
    pub mode: ProjectionMode,
    aspect: f32,
}

impl ViewFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            aspect: aspect_ratio(width, height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Orthographic view volume width and height for the current aspect ratio.
    pub fn ortho_bounds(&self) -> (f32, f32) {
        (ORTHO_HEIGHT * self.aspect, ORTHO_HEIGHT)
    }

    /// Projection matrix for the current mode.
    ///
    /// `zoom_degrees` is the camera's field-of-view proxy; it only affects
    /// perspective projection.
    pub fn projection_matrix(&self, zoom_degrees: f32) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                perspective(Deg(zoom_degrees), self.aspect, NEAR_PLANE, FAR_PLANE)
            }
            ProjectionMode::Orthographic => {
                let (width, height) = self.ortho_bounds();
                ortho(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    NEAR_PLANE,
                    FAR_PLANE,
                )
            }
        }
    }

    /// Pushes view, projection, and camera position for this frame's draws.
    pub fn push<S: UniformSink>(&self, camera: &FreeCamera, sink: &mut S) {
        sink.set_mat4(uniforms::VIEW, camera.view_matrix());
        sink.set_mat4(uniforms::PROJECTION, self.projection_matrix(camera.zoom));
        sink.set_vec3(uniforms::VIEW_POSITION, camera.position.to_vec());
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSink;
    use approx::assert_relative_eq;

    #[test]
    fn toggling_projection_leaves_the_view_untouched() {
        let camera = FreeCamera::default();
        let mut frame = ViewFrame::new(1000, 800);

        let mut perspective_sink = RecordingSink::new();
        frame.push(&camera, &mut perspective_sink);

        frame.mode = ProjectionMode::Orthographic;
        let mut ortho_sink = RecordingSink::new();
        frame.push(&camera, &mut ortho_sink);

        assert_eq!(
            perspective_sink.mat4(uniforms::VIEW),
            ortho_sink.mat4(uniforms::VIEW)
        );
        assert_ne!(
            perspective_sink.mat4(uniforms::PROJECTION),
            ortho_sink.mat4(uniforms::PROJECTION)
        );
    }

    #[test]
    fn ortho_width_tracks_aspect_ratio() {
        let mut frame = ViewFrame::new(1000, 800);
        frame.mode = ProjectionMode::Orthographic;

        let (width, height) = frame.ortho_bounds();
        assert_relative_eq!(width, height * frame.aspect());

        frame.resize(2000, 800);
        let (width, height) = frame.ortho_bounds();
        assert_relative_eq!(height, 10.0);
        assert_relative_eq!(width, height * 2.5);
    }

    #[test]
    fn push_writes_all_three_slots_every_frame() {
        let camera = FreeCamera::default();
        let frame = ViewFrame::new(1000, 800);
        let mut sink = RecordingSink::new();

        frame.push(&camera, &mut sink);
        frame.push(&camera, &mut sink);

        // no dirty tracking: identical frames still write
        assert_eq!(sink.len(), 6);
        assert_eq!(
            sink.names()[..3],
            [
                uniforms::VIEW,
                uniforms::PROJECTION,
                uniforms::VIEW_POSITION
            ]
        );
    }

    #[test]
    fn perspective_uses_camera_zoom() {
        let mut camera = FreeCamera::default();
        let frame = ViewFrame::new(1000, 800);

        let wide = frame.projection_matrix(camera.zoom);
        camera.zoom = 30.0;
        let narrow = frame.projection_matrix(camera.zoom);
        assert!(narrow.x.x > wide.x.x);
    }

    #[test]
    fn store_names_match_the_profile_schema() {
        assert_eq!(ProjectionMode::Perspective.store_name(), "PERSPECTIVE");
        assert_eq!(ProjectionMode::Orthographic.store_name(), "ORTHO");
    }
}
