//! Declarative primitive geometry.
//!
//! Shapes are described by a small parameter set ([`BoxGeometry`],
//! [`CylinderGeometry`], [`ConeGeometry`]) and turned into CPU-side
//! [`MeshData`] with normals, texture coordinates and tangents. Triangles are
//! wound counter-clockwise when seen from outside, which is what the basic
//! pipeline culls against.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector2, Vector3, Zero};

use crate::data_structures::model::{MeshData, ModelVertex};

/// An axis-aligned box centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn build(&self) -> MeshData {
        let half = Vector3::new(self.width / 2.0, self.height / 2.0, self.depth / 2.0);
        // (normal, u axis, v axis) with u x v == normal
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let extent = |axis: Vector3<f32>| {
            axis.x.abs() * half.x + axis.y.abs() * half.y + axis.z.abs() * half.z
        };

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let (normal, u, v): (Vector3<f32>, Vector3<f32>, Vector3<f32>) =
                (normal.into(), u.into(), v.into());
            let centre = normal * extent(normal);
            let (du, dv) = (u * extent(u), v * extent(v));
            let base = vertices.len() as u32;
            // bottom-left, bottom-right, top-right, top-left
            for (su, sv, uv) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                vertices.push(ModelVertex {
                    position: (centre + du * su + dv * sv).into(),
                    tex_coords: uv,
                    normal: normal.into(),
                    ..Default::default()
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        compute_tangents(&mut vertices, &indices);
        MeshData {
            name: "box".to_string(),
            vertices,
            indices,
            material: 0,
        }
    }
}

/// A capped cylinder along the Y axis, centred on the origin.
///
/// A top radius of zero turns it into a cone; see [`ConeGeometry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderGeometry {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl CylinderGeometry {
    pub fn new(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn build(&self) -> MeshData {
        let segments = self.radial_segments.max(3);
        let half_height = self.height / 2.0;
        let slope = (self.radius_bottom - self.radius_top) / self.height;
        let point = |radius: f32, theta: f32, y: f32| {
            Vector3::new(radius * theta.sin(), y, radius * theta.cos())
        };

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // torso: one column of vertices per segment edge, bottom then top
        for j in 0..=segments {
            let u = j as f32 / segments as f32;
            let theta = u * TAU;
            let normal = Vector3::new(theta.sin(), slope, theta.cos()).normalize();
            for (radius, y, v) in [
                (self.radius_bottom, -half_height, 1.0),
                (self.radius_top, half_height, 0.0),
            ] {
                vertices.push(ModelVertex {
                    position: point(radius, theta, y).into(),
                    tex_coords: [u, v],
                    normal: normal.into(),
                    ..Default::default()
                });
            }
        }
        for j in 0..segments {
            let bottom_left = 2 * j;
            let top_left = bottom_left + 1;
            let bottom_right = bottom_left + 2;
            let top_right = bottom_left + 3;
            if self.radius_bottom > 0.0 {
                indices.extend_from_slice(&[bottom_left, bottom_right, top_right]);
            } else {
                indices.extend_from_slice(&[bottom_left, top_right, top_left]);
                continue;
            }
            if self.radius_top > 0.0 {
                indices.extend_from_slice(&[bottom_left, top_right, top_left]);
            }
        }

        if self.radius_top > 0.0 {
            self.cap(&mut vertices, &mut indices, true);
        }
        if self.radius_bottom > 0.0 {
            self.cap(&mut vertices, &mut indices, false);
        }

        compute_tangents(&mut vertices, &indices);
        MeshData {
            name: if self.radius_top == 0.0 { "cone" } else { "cylinder" }.to_string(),
            vertices,
            indices,
            material: 0,
        }
    }

    fn cap(&self, vertices: &mut Vec<ModelVertex>, indices: &mut Vec<u32>, top: bool) {
        let segments = self.radial_segments.max(3);
        let (radius, y, sign) = if top {
            (self.radius_top, self.height / 2.0, 1.0)
        } else {
            (self.radius_bottom, -self.height / 2.0, -1.0)
        };
        let normal = [0.0, sign, 0.0];
        let centre = vertices.len() as u32;
        vertices.push(ModelVertex {
            position: [0.0, y, 0.0],
            tex_coords: [0.5, 0.5],
            normal,
            ..Default::default()
        });
        for j in 0..=segments {
            let theta = j as f32 / segments as f32 * TAU;
            vertices.push(ModelVertex {
                position: [radius * theta.sin(), y, radius * theta.cos()],
                tex_coords: [theta.sin() * 0.5 + 0.5, theta.cos() * 0.5 * sign + 0.5],
                normal,
                ..Default::default()
            });
        }
        for j in 0..segments {
            let current = centre + 1 + j;
            let next = current + 1;
            if top {
                indices.extend_from_slice(&[centre, current, next]);
            } else {
                indices.extend_from_slice(&[centre, next, current]);
            }
        }
    }
}

/// A cone along the Y axis with its apex at `+height / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeGeometry {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl ConeGeometry {
    pub fn new(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius,
            height,
            radial_segments,
        }
    }

    pub fn build(&self) -> MeshData {
        CylinderGeometry::new(0.0, self.radius, self.height, self.radial_segments).build()
    }
}

/**
 * Primitive shapes and OBJ files don't come with tangents and bitangents so they have to be
 * calculated for normal maps to work correctly.
 *
 * Triangles with a degenerate UV mapping are skipped; vertices that end up without a tangent
 * get an arbitrary one perpendicular to their normal so the TBN matrix stays finite.
 */
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];
    let mut tangents = vec![Vector3::<f32>::zero(); vertices.len()];
    let mut bitangents = vec![Vector3::<f32>::zero(); vertices.len()];

    for c in indices.chunks_exact(3) {
        let (i0, i1, i2) = (c[0] as usize, c[1] as usize, c[2] as usize);
        let pos0: Vector3<f32> = vertices[i0].position.into();
        let pos1: Vector3<f32> = vertices[i1].position.into();
        let pos2: Vector3<f32> = vertices[i2].position.into();
        let uv0: Vector2<f32> = vertices[i0].tex_coords.into();
        let uv1: Vector2<f32> = vertices[i1].tex_coords.into();
        let uv2: Vector2<f32> = vertices[i2].tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        // delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped for right-handed normal maps with the wgpu texture coordinate system
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
            triangles_included[i] += 1;
        }
    }

    for (i, v) in vertices.iter_mut().enumerate() {
        let normal: Vector3<f32> = v.normal.into();
        let (tangent, bitangent) = if triangles_included[i] > 0 {
            let denom = 1.0 / triangles_included[i] as f32;
            (tangents[i] * denom, bitangents[i] * denom)
        } else {
            (Vector3::zero(), Vector3::zero())
        };
        let (tangent, bitangent) = if tangent.magnitude2() > f32::EPSILON
            && bitangent.magnitude2() > f32::EPSILON
        {
            (tangent, bitangent)
        } else {
            orthonormal_basis(normal)
        };
        v.tangent = tangent.into();
        v.bitangent = bitangent.into();
    }
}

fn orthonormal_basis(normal: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    if normal.magnitude2() <= f32::EPSILON {
        return (Vector3::unit_x(), Vector3::unit_y());
    }
    let normal = normal.normalize();
    let helper = if normal.x.abs() < 0.9 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let tangent = (helper - normal * normal.dot(helper)).normalize();
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}
