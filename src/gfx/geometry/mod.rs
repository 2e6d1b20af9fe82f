//! # Procedural Mesh Geometry
//!
//! CPU-side geometry for the basic shapes the scene is composed from.
//! All shapes are generated with normals and texture coordinates in a
//! Y-up coordinate system.

pub mod primitives;

/// The procedural shapes the renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Box,
    Sphere,
    Plane,
    Cylinder,
    Cone,
    Torus,
    TaperedCylinder,
}

impl MeshKind {
    pub const ALL: [MeshKind; 7] = [
        MeshKind::Box,
        MeshKind::Sphere,
        MeshKind::Plane,
        MeshKind::Cylinder,
        MeshKind::Cone,
        MeshKind::Torus,
        MeshKind::TaperedCylinder,
    ];
}

/// Raw mesh data produced by the primitive generators.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generates the geometry for a mesh kind at its default resolution.
pub fn generate(kind: MeshKind) -> GeometryData {
    match kind {
        MeshKind::Box => primitives::generate_box(),
        MeshKind::Sphere => primitives::generate_sphere(32, 16),
        MeshKind::Plane => primitives::generate_plane(),
        MeshKind::Cylinder => primitives::generate_cylinder(24),
        MeshKind::Cone => primitives::generate_cone(24),
        MeshKind::Torus => primitives::generate_torus(32, 16),
        MeshKind::TaperedCylinder => primitives::generate_tapered_cylinder(24),
    }
}
