//! Uploaded procedural meshes, keyed by shape kind.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{self, GeometryData, MeshKind};

use super::vertex::Vertex3D;

/// Vertex and index buffers for one mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Interleaves geometry data and uploads it.
    pub fn from_geometry(device: &wgpu::Device, data: &GeometryData, label: &str) -> Self {
        let vertices: Vec<Vertex3D> = data
            .vertices
            .iter()
            .zip(&data.normals)
            .zip(&data.tex_coords)
            .map(|((position, normal), uv)| Vertex3D {
                position: *position,
                normal: *normal,
                uv: *uv,
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// All procedural meshes the scene can draw, uploaded once at startup.
pub struct MeshLibrary {
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
        }
    }

    /// Generates and uploads one mesh kind; reloading replaces the buffers.
    pub fn load(&mut self, device: &wgpu::Device, kind: MeshKind) {
        let data = geometry::generate(kind);
        let mesh = GpuMesh::from_geometry(device, &data, &format!("{kind:?}"));
        self.meshes.insert(kind, mesh);
    }

    /// Uploads every mesh kind the scene knows about.
    pub fn load_all(&mut self, device: &wgpu::Device) {
        for kind in MeshKind::ALL {
            self.load(device, kind);
        }
    }

    pub fn get(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new()
    }
}
