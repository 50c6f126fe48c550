//! Procedural geometry: indexed triangle meshes for the solids and
//! line lists for the helpers.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::math::hex_to_linear_rgb;
use crate::types::{LineVertex, Vertex};

/// Indexed triangle mesh (counter-clockwise front faces)
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Torus in the XY plane around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut vertices = Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);

        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let v = j as f32 / radial_segments as f32 * TAU;

                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - center).normalize();
                let uv = [
                    i as f32 / tubular_segments as f32,
                    1.0 - j as f32 / radial_segments as f32,
                ];

                vertices.push(Vertex::new(position.to_array(), normal.to_array(), uv));
            }
        }

        let row = tubular_segments + 1;
        let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 6) as usize);
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut geometry = Self { vertices, indices };
        geometry.compute_tangents();
        geometry
    }

    /// UV sphere centred on the origin, poles on the Y axis
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        let mut grid = Vec::with_capacity((height_segments + 1) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            // Pole rows get half-segment offsets so their texels stay centred
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity((width_segments + 1) as usize);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;

                let position = Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                );
                let normal = position.normalize_or_zero();

                row.push(vertices.len() as u32);
                vertices.push(Vertex::new(position.to_array(), normal.to_array(), [u + u_offset, v]));
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        let mut geometry = Self { vertices, indices };
        geometry.compute_tangents();
        geometry
    }

    /// Axis-aligned box centred on the origin, one quad per face
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;

        // (normal, u axis, v axis) with u x v = normal so quads wind CCW
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u_axis, v_axis) in faces {
            let base = vertices.len() as u32;
            for (cu, cv) in corners {
                let position = (normal + u_axis * cu + v_axis * cv) * half;
                // Image rows run top to bottom
                let uv = [(cu + 1.0) * 0.5, 1.0 - (cv + 1.0) * 0.5];
                let mut vertex = Vertex::new(position.to_array(), normal.to_array(), uv);
                vertex.tangent = [u_axis.x, u_axis.y, u_axis.z, 1.0];
                vertices.push(vertex);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Per-vertex tangents accumulated from triangle UV gradients
    pub fn compute_tangents(&mut self) {
        let mut tangents = vec![Vec3::ZERO; self.vertices.len()];
        let mut bitangents = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (v0, v1, v2) = (&self.vertices[i0], &self.vertices[i1], &self.vertices[i2]);

            let e1 = Vec3::from_array(v1.position) - Vec3::from_array(v0.position);
            let e2 = Vec3::from_array(v2.position) - Vec3::from_array(v0.position);
            let d1 = Vec2::from_array(v1.uv) - Vec2::from_array(v0.uv);
            let d2 = Vec2::from_array(v2.uv) - Vec2::from_array(v0.uv);

            let det = d1.x * d2.y - d2.x * d1.y;
            if det.abs() < 1e-12 {
                continue;
            }
            let r = 1.0 / det;
            let t = (e1 * d2.y - e2 * d1.y) * r;
            // V grows down the image; normal maps store +Y pointing up it
            let b = (e1 * d2.x - e2 * d1.x) * r;

            for i in [i0, i1, i2] {
                tangents[i] += t;
                bitangents[i] += b;
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let n = Vec3::from_array(vertex.normal);
            // Gram-Schmidt against the normal
            let t = (tangents[i] - n * n.dot(tangents[i])).normalize_or_zero();
            let t = if t == Vec3::ZERO { n.any_orthonormal_vector() } else { t };
            let w = if n.cross(t).dot(bitangents[i]) < 0.0 { -1.0 } else { 1.0 };
            vertex.tangent = [t.x, t.y, t.z, w];
        }
    }
}

/// Unindexed line list
#[derive(Debug, Clone, Default)]
pub struct LineGeometry {
    pub vertices: Vec<LineVertex>,
}

impl LineGeometry {
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 3]) {
        self.vertices.push(LineVertex::new(a.to_array(), color));
        self.vertices.push(LineVertex::new(b.to_array(), color));
    }

    /// Square grid on the XZ plane; the two centre lines use `center_color`
    pub fn grid(size: f32, divisions: u32, center_color: u32, line_color: u32) -> Self {
        let center = hex_to_linear_rgb(center_color);
        let other = hex_to_linear_rgb(line_color);
        let half = size * 0.5;
        let step = size / divisions as f32;

        let mut lines = Self::default();
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            let color = if i * 2 == divisions { center } else { other };
            lines.push_segment(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), color);
            lines.push_segment(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), color);
        }
        lines
    }

    /// Triangle edges of a mesh, drawn as a wireframe
    pub fn wireframe(mesh: &MeshGeometry, color: [f32; 3]) -> Self {
        let mut lines = Self::default();
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            lines.push_segment(p(tri[0]), p(tri[1]), color);
            lines.push_segment(p(tri[1]), p(tri[2]), color);
            lines.push_segment(p(tri[2]), p(tri[0]), color);
        }
        lines
    }

    /// Coarse wire sphere marking a point light
    pub fn light_marker(size: f32, color: [f32; 3]) -> Self {
        Self::wireframe(&MeshGeometry::sphere(size, 4, 2), color)
    }
}
