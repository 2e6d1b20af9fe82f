//! # Primitive Shape Generation
//!
//! Generator functions for the basic 3D shapes. All shapes use a Y-up
//! convention: the plane lies in XZ, cylinders and cones grow from y = 0
//! to y = 1, the sphere is a unit sphere at the origin, and the torus ring
//! lies in the XY plane.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit box centered at the origin
///
/// Vertices run from -0.5 to 0.5 on all axes. Each face has outward normals
/// and UV coordinates from 0 to 1.
pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face (positive Z)
        [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5],
        // Back face (negative Z)
        [0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5],
        // Left face (negative X)
        [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5],
        // Right face (positive X)
        [0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
        // Top face (positive Y)
        [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
        // Bottom face (negative Y)
        [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = normals.to_vec();

    // Same UV square on every face
    for _ in 0..6 {
        data.tex_coords.extend_from_slice(&[
            [0.0, 1.0],
            [1.0, 1.0],
            [1.0, 0.0],
            [0.0, 0.0],
        ]);
    }

    for face in 0..6u32 {
        let base = face * 4;
        data.indices.extend_from_slice(&[
            base, base + 1, base + 2,
            base + 2, base + 3, base,
        ]);
    }

    data
}

/// Generate a UV sphere of radius 1.0 centered at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            // Normal equals position on a unit sphere
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a plane in the XZ plane spanning -1..1, normal pointing up
pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::new();

    data.vertices = vec![
        [-1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, -1.0],
        [-1.0, 0.0, -1.0],
    ];
    data.normals = vec![[0.0, 1.0, 0.0]; 4];
    data.tex_coords = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    data.indices = vec![0, 1, 2, 2, 3, 0];

    data
}

/// Generate a cylinder of radius 1.0 from y = 0 to y = 1, with caps
pub fn generate_cylinder(segments: u32) -> GeometryData {
    lathe_cylinder(1.0, 1.0, segments)
}

/// Generate a cylinder whose top radius is half its base radius
pub fn generate_tapered_cylinder(segments: u32) -> GeometryData {
    lathe_cylinder(1.0, 0.5, segments)
}

/// Generate a cone: base radius 1.0 at y = 0, apex ring at y = 1
pub fn generate_cone(segments: u32) -> GeometryData {
    lathe_cylinder(1.0, 0.0, segments)
}

/// Shared lathe for the cylinder family
///
/// Side normals tilt with the taper so lighting stays correct on cones.
/// A degenerate top cap (radius 0) is skipped.
fn lathe_cylinder(base_radius: f32, top_radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let slope = base_radius - top_radius;

    // Side vertices, bottom and top ring per segment
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let u = i as f32 / segs as f32;

        let normal = normalize([cos_a, slope, sin_a]);

        data.vertices.push([base_radius * cos_a, 0.0, base_radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);

        data.vertices.push([top_radius * cos_a, 1.0, top_radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(top_current);
        data.indices.push(bottom_next);

        data.indices.push(top_current);
        data.indices.push(top_next);
        data.indices.push(bottom_next);
    }

    // Bottom cap
    let center_bottom = push_cap_ring(&mut data, base_radius, 0.0, [0.0, -1.0, 0.0], segs);
    for i in 0..segs {
        let current = center_bottom + 1 + i;
        let next = center_bottom + 1 + (i + 1) % (segs + 1);
        data.indices.push(center_bottom);
        data.indices.push(next);
        data.indices.push(current);
    }

    // Top cap, skipped when it degenerates to the apex of a cone
    if top_radius > 0.0 {
        let center_top = push_cap_ring(&mut data, top_radius, 1.0, [0.0, 1.0, 0.0], segs);
        for i in 0..segs {
            let current = center_top + 1 + i;
            let next = center_top + 1 + (i + 1) % (segs + 1);
            data.indices.push(center_top);
            data.indices.push(current);
            data.indices.push(next);
        }
    }

    data
}

/// Appends a cap center plus its ring, returning the center vertex index
fn push_cap_ring(
    data: &mut GeometryData,
    radius: f32,
    y: f32,
    normal: [f32; 3],
    segments: u32,
) -> u32 {
    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);
    data.tex_coords.push([0.5, 0.5]);

    for i in 0..=segments {
        let angle = i as f32 * 2.0 * PI / segments as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        data.vertices.push([radius * cos_a, y, radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a]);
    }

    center
}

/// Generate a torus in the XY plane: ring radius 1.0, tube radius 0.3
///
/// # Arguments
/// * `ring_segments` - Subdivisions around the main ring
/// * `tube_segments` - Subdivisions around the tube cross-section
pub fn generate_torus(ring_segments: u32, tube_segments: u32) -> GeometryData {
    const RING_RADIUS: f32 = 1.0;
    const TUBE_RADIUS: f32 = 0.3;

    let mut data = GeometryData::new();

    let ring_segs = ring_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for ring in 0..=ring_segs {
        let theta = ring as f32 * 2.0 * PI / ring_segs as f32;
        let ring_cos = theta.cos();
        let ring_sin = theta.sin();

        for tube in 0..=tube_segs {
            let phi = tube as f32 * 2.0 * PI / tube_segs as f32;
            let tube_cos = phi.cos();
            let tube_sin = phi.sin();

            // Tube center circle lies in XY; the tube extends radially and in Z
            let x = (RING_RADIUS + TUBE_RADIUS * tube_cos) * ring_cos;
            let y = (RING_RADIUS + TUBE_RADIUS * tube_cos) * ring_sin;
            let z = TUBE_RADIUS * tube_sin;

            data.vertices.push([x, y, z]);
            data.normals.push([tube_cos * ring_cos, tube_cos * ring_sin, tube_sin]);
            data.tex_coords.push([
                ring as f32 / ring_segs as f32,
                tube as f32 / tube_segs as f32,
            ]);
        }
    }

    for ring in 0..ring_segs {
        for tube in 0..tube_segs {
            let first = ring * (tube_segs + 1) + tube;
            let second = first + tube_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(data: &GeometryData) {
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        let max_index = *data.indices.iter().max().unwrap() as usize;
        assert!(max_index < data.vertices.len());
    }

    #[test]
    fn test_box_generation() {
        let data = generate_box();
        assert_eq!(data.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(data.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(data.triangle_count(), 12);
        assert_consistent(&data);
    }

    #[test]
    fn test_sphere_generation() {
        let data = generate_sphere(8, 6);
        assert!(data.vertex_count() > 0);
        assert_consistent(&data);
        // every normal matches its position on a unit sphere
        for (v, n) in data.vertices.iter().zip(&data.normals) {
            assert_eq!(v, n);
        }
    }

    #[test]
    fn test_plane_generation() {
        let data = generate_plane();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.triangle_count(), 2);
        for n in &data.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let data = generate_cylinder(12);
        assert_consistent(&data);
        // 13 ring pairs for the sides, plus two caps of 1 + 13 vertices
        assert_eq!(data.vertices.len(), 26 + 14 + 14);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let cone = generate_cone(12);
        let cylinder = generate_cylinder(12);
        assert_consistent(&cone);
        assert!(cone.vertex_count() < cylinder.vertex_count());
    }

    #[test]
    fn test_torus_generation() {
        let data = generate_torus(8, 6);
        assert_consistent(&data);
        assert_eq!(data.vertices.len(), 9 * 7);
        assert_eq!(data.triangle_count(), 8 * 6 * 2);
    }

    #[test]
    fn test_tapered_side_normals_tilt_upward() {
        let data = generate_tapered_cylinder(8);
        // side ring normals carry a positive Y component from the taper
        assert!(data.normals[0][1] > 0.0);
    }
}
