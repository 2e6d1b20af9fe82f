// src/lib.rs
//! Deskview
//!
//! A small interactive 3D desk-scene viewer built on wgpu and winit: procedural
//! meshes, textures, Phong-style lighting, a free-look camera, and optional
//! SQLite-backed session persistence.

pub mod app;
pub mod config;
pub mod gfx;
pub mod persist;
pub mod wgpu_utils;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;

/// Creates a viewer with default configuration
pub fn default() -> ViewerApp {
    ViewerApp::new(ViewerConfig::default())
}
