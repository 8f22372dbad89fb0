//! Low-poly mesh builders
//!
//! Every mesh is a flat-shaded, non-indexed triangle list: each triangle
//! carries its own face normal, which gives the faceted look the scene is
//! drawn in. Shapes are centred on the origin unless noted.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn push(&mut self, a: Vec3, b: Vec3, c: Vec3, normal: Vec3) {
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    /// Push a triangle wound counter-clockwise when seen from outside,
    /// where outside means away from `inside`.
    fn push_outward(&mut self, a: Vec3, b: Vec3, c: Vec3, inside: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let centroid = (a + b + c) / 3.0;
        if normal.dot(centroid - inside) < 0.0 {
            self.push(a, c, b, -normal);
        } else {
            self.push(a, b, c, normal);
        }
    }

    fn quad_outward(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, inside: Vec3) {
        self.push_outward(a, b, c, inside);
        self.push_outward(a, c, d, inside);
    }
}

/// Axis-aligned box of the given full size.
pub fn cuboid(size: Vec3) -> Mesh {
    let h = size * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let mut mesh = Mesh::default();
    for axis in 0..3 {
        for sign in [-1.0, 1.0] {
            let mut quad = [
                [sign, -1.0, -1.0],
                [sign, 1.0, -1.0],
                [sign, 1.0, 1.0],
                [sign, -1.0, 1.0],
            ];
            for p in &mut quad {
                p.rotate_right(axis);
            }
            let [a, b, c, d] = quad.map(|[x, y, z]| corner(x, y, z));
            mesh.quad_outward(a, b, c, d, Vec3::ZERO);
        }
    }
    mesh
}

/// Tapered cylinder along Y, capped at both ends.
pub fn cylinder(top_radius: f32, bottom_radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let top = height * 0.5;
    let ring = |r: f32, y: f32, i: u32| {
        let a = i as f32 / segments as f32 * TAU;
        Vec3::new(a.sin() * r, y, a.cos() * r)
    };
    let mut mesh = Mesh::default();
    for i in 0..segments {
        let (b0, b1) = (ring(bottom_radius, -top, i), ring(bottom_radius, -top, i + 1));
        let (t0, t1) = (ring(top_radius, top, i), ring(top_radius, top, i + 1));
        let axis = Vec3::new(0.0, (b0.y + t0.y) * 0.5, 0.0);
        mesh.quad_outward(b0, b1, t1, t0, axis);
        mesh.push_outward(Vec3::new(0.0, top, 0.0), t0, t1, Vec3::ZERO);
        mesh.push_outward(Vec3::new(0.0, -top, 0.0), b1, b0, Vec3::ZERO);
    }
    mesh
}

/// Unit triangular prism: a gable triangle in XY extruded along Z.
pub fn prism() -> Mesh {
    let tri = [Vec2::new(-0.5, -0.5), Vec2::new(0.5, -0.5), Vec2::new(0.0, 0.5)];
    let inside = Vec3::new(0.0, -1.0 / 6.0, 0.0);
    let front = tri.map(|p| p.extend(0.5));
    let back = tri.map(|p| p.extend(-0.5));
    let mut mesh = Mesh::default();
    mesh.push_outward(front[0], front[1], front[2], inside);
    mesh.push_outward(back[0], back[2], back[1], inside);
    for i in 0..3 {
        let j = (i + 1) % 3;
        mesh.quad_outward(front[i], back[i], back[j], front[j], inside);
    }
    mesh
}

/// Regular icosahedron of circumradius `radius`.
pub fn icosahedron(radius: f32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) * 0.5;
    let raw = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ];
    let v = raw.map(|p| Vec3::from_array(p).normalize() * radius);
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    let mut mesh = Mesh::default();
    for [a, b, c] in FACES {
        mesh.push_outward(v[a], v[b], v[c], Vec3::ZERO);
    }
    mesh
}

/// Latitude/longitude sphere; a handful of segments reads as a bulb.
pub fn sphere(radius: f32, longitude: u32, latitude: u32) -> Mesh {
    let (lon, lat) = (longitude.max(3), latitude.max(2));
    let point = |i: u32, j: u32| {
        let theta = i as f32 / lon as f32 * TAU;
        let phi = j as f32 / lat as f32 * std::f32::consts::PI;
        Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()) * radius
    };
    let mut mesh = Mesh::default();
    for j in 0..lat {
        for i in 0..lon {
            let (a, b) = (point(i, j), point(i + 1, j));
            let (c, d) = (point(i + 1, j + 1), point(i, j + 1));
            if j != 0 {
                mesh.push_outward(a, b, c, Vec3::ZERO);
            }
            if j + 1 != lat {
                mesh.push_outward(a, c, d, Vec3::ZERO);
            }
        }
    }
    mesh
}

/// Torus in the XY plane (axis along Z). `arc` below `TAU` gives an open bend.
pub fn torus(major: f32, minor: f32, radial: u32, tubular: u32, arc: f32) -> Mesh {
    let (radial, tubular) = (radial.max(3), tubular.max(3));
    let point = |i: u32, j: u32| {
        let u = i as f32 / tubular as f32 * arc;
        let v = j as f32 / radial as f32 * TAU;
        let r = major + minor * v.cos();
        Vec3::new(r * u.cos(), r * u.sin(), minor * v.sin())
    };
    let ring_centre = |u: f32| Vec3::new(major * u.cos(), major * u.sin(), 0.0);
    let mut mesh = Mesh::default();
    for i in 0..tubular {
        let u = (i as f32 + 0.5) / tubular as f32 * arc;
        let inside = ring_centre(u);
        for j in 0..radial {
            let (a, b) = (point(i, j), point(i + 1, j));
            let (c, d) = (point(i + 1, j + 1), point(i, j + 1));
            mesh.quad_outward(a, b, c, d, inside);
        }
    }
    mesh
}

/// Horizontal grid at y = 0 facing +Y, `width` along X and `depth` along Z.
pub fn plane(width: f32, depth: f32, segments_x: u32, segments_z: u32) -> Mesh {
    let (sx, sz) = (segments_x.max(1), segments_z.max(1));
    let point = |i: u32, j: u32| {
        Vec3::new(
            (i as f32 / sx as f32 - 0.5) * width,
            0.0,
            (j as f32 / sz as f32 - 0.5) * depth,
        )
    };
    let mut mesh = Mesh::default();
    for j in 0..sz {
        for i in 0..sx {
            let (a, b) = (point(i, j), point(i + 1, j));
            let (c, d) = (point(i + 1, j + 1), point(i, j + 1));
            mesh.push(a, d, c, Vec3::Y);
            mesh.push(a, c, b, Vec3::Y);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.vertices.chunks_exact(3) {
            let n = Vec3::from_array(tri[0].normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            let centroid = tri
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .sum::<Vec3>()
                / 3.0;
            assert!(n.dot(centroid) > -1e-4, "inward face at {centroid}");
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            assert!((b - a).cross(c - a).dot(n) > 0.0, "clockwise face at {centroid}");
        }
    }

    #[test]
    fn cuboid_has_six_outward_faces() {
        let mesh = cuboid(Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(mesh.vertex_count(), 36);
        assert_outward(&mesh);
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 1.0);
    }

    #[test]
    fn closed_shapes_face_outward() {
        assert_outward(&cylinder(0.15, 0.2, 3.0, 4));
        assert_outward(&icosahedron(1.5));
        assert_outward(&sphere(0.08, 4, 3));
        assert_eq!(cylinder(0.5, 0.5, 1.0, 12).vertex_count(), 12 * 12);
        assert_eq!(icosahedron(1.0).vertex_count(), 60);
    }

    #[test]
    fn prism_is_a_gable() {
        let mesh = prism();
        assert_eq!(mesh.vertex_count(), 3 + 3 + 3 * 6);
        let top = mesh.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(top, 0.5);
        for tri in mesh.vertices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            assert!((b - a).cross(c - a).dot(Vec3::from_array(tri[0].normal)) > 0.0);
        }
    }

    #[test]
    fn torus_normals_leave_the_tube() {
        let mesh = torus(0.35, 0.03, 5, 3, TAU);
        assert_eq!(mesh.vertex_count(), 3 * 5 * 6);
        let half = torus(0.25, 0.02, 3, 3, std::f32::consts::PI);
        let lowest = half.vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert!(lowest > -0.03);
    }

    #[test]
    fn plane_faces_up() {
        let mesh = plane(12.0, 1800.0, 4, 64);
        assert_eq!(mesh.vertex_count(), 4 * 64 * 6);
        for tri in mesh.vertices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }
}
