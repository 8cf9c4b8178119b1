//! Bounding sphere derivation used by culling and picking.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::data_structures::mesh::Mesh;

/// Sphere around the axis-aligned box of a model's local-space vertices.
///
/// `center` is in the unscaled local frame, so applying the model-to-world
/// matrix scales it exactly once. `radius` is already multiplied by the
/// model's scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vector3::zero(),
            radius: 0.0,
        }
    }
}

impl BoundingSphere {
    /// Sweep the min/max corners over every vertex of every mesh.
    ///
    /// Without any vertex the sphere stays at the origin with radius zero.
    pub fn from_meshes<'a>(meshes: impl IntoIterator<Item = &'a Mesh>, scale: f32) -> Self {
        Self::from_positions(meshes.into_iter().map(Mesh::positions), scale)
    }

    /// Same as [`Self::from_meshes`] over raw `x, y, z` position arrays.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a [f32]>, scale: f32) -> Self {
        let mut corners: Option<(Vector3<f32>, Vector3<f32>)> = None;
        for vertex in positions.into_iter().flat_map(|p| p.chunks_exact(3)) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            corners = Some(match corners {
                // seeded with the first vertex
                None => (v, v),
                Some((min, max)) => (
                    Vector3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
                    Vector3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
                ),
            });
        }

        let Some((min_corner, max_corner)) = corners else {
            return Self::default();
        };
        let r_vec = 0.5 * (max_corner - min_corner);
        Self {
            center: min_corner + r_vec,
            radius: scale * r_vec.magnitude(),
        }
    }
}
