pub mod camera_controller;
pub mod free_camera;

// Re-export main types
pub use camera_controller::{CameraController, MouseTracker};
pub use free_camera::{FreeCamera, MoveDirection};
