//! Owned GPU-adjacent resources: textures, materials, and the light rig.

pub mod lighting;
pub mod material;
pub mod texture;

// Re-export main types
pub use lighting::LightRig;
pub use material::{Material, MaterialTable};
pub use texture::{GpuTexture, TextureError, TextureRegistry};
