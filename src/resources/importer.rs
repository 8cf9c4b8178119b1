//! The imported scene handed to the asset loader and the importer seam producing it.
//!
//! Importers parse an asset file into an [`ImportedScene`]: a node tree that
//! references meshes by index, a flat mesh table and a flat material table.
//! The post-processing requested through [`PostProcess`] is applied by the
//! importer, using the helpers in this module where the file format does not
//! already provide it.

use std::path::Path;

use cgmath::{InnerSpace, Vector3, Zero};

/// Importers report shininess multiplied by this factor, the asset loader divides it back out.
pub const SHININESS_SCALE: f32 = 4.0;

/// Post-processing steps the importer applies before handing out a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostProcess {
    /// Split every polygon into triangles.
    pub triangulate: bool,
    /// Deliver texture coordinates with the origin in the top-left corner.
    pub flip_uvs: bool,
    /// Compute smooth vertex normals for meshes that come without any.
    pub generate_normals: bool,
}

impl PostProcess {
    pub const STANDARD: PostProcess = PostProcess {
        triangulate: true,
        flip_uvs: true,
        generate_normals: true,
    };
}

impl Default for PostProcess {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedNode {
    pub name: String,
    /// Indices into [`ImportedScene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Either empty or one normal per position.
    pub normals: Vec<[f32; 3]>,
    /// UV channel 0, one pair per position.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub faces: Vec<Vec<u32>>,
    /// Index into [`ImportedScene::materials`].
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    /// Authored shininess times [`SHININESS_SCALE`].
    pub shininess: f32,
    /// Texture file names relative to the asset's directory.
    pub diffuse_textures: Vec<String>,
    pub specular_textures: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedScene {
    pub root: Option<ImportedNode>,
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
    /// Set when the importer could only read part of the file.
    pub incomplete: bool,
}

pub trait SceneImporter {
    fn import(&self, path: &Path, flags: PostProcess) -> anyhow::Result<ImportedScene>;
}

/**
 * Splits polygons into triangle fans around their first corner. Triangles pass
 * through unchanged, degenerate faces with fewer than three corners are dropped.
 */
pub fn triangulate(faces: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
    faces
        .into_iter()
        .flat_map(|face| {
            if face.len() == 3 {
                return vec![face];
            }
            (1..face.len().saturating_sub(1))
                .map(|i| vec![face[0], face[i], face[i + 1]])
                .collect()
        })
        .collect()
}

pub fn flip_v(tex_coords: &mut [[f32; 2]]) {
    for uv in tex_coords {
        uv[1] = 1.0 - uv[1];
    }
}

/**
 * Smooth per-vertex normals: every face adds its (area weighted) normal to its
 * corners and the sums are normalized. Vertices without any non-degenerate
 * face end up with a zero normal.
 */
pub fn generate_normals(positions: &[[f32; 3]], faces: &[Vec<u32>]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::<f32>::zero(); positions.len()];
    for face in faces {
        if face.len() < 3 || face.iter().any(|&i| i as usize >= positions.len()) {
            continue;
        }
        let p0: Vector3<f32> = positions[face[0] as usize].into();
        // fan over polygons so quads etc. contribute their full area
        for i in 1..face.len() - 1 {
            let p1: Vector3<f32> = positions[face[i] as usize].into();
            let p2: Vector3<f32> = positions[face[i + 1] as usize].into();
            let face_normal = (p1 - p0).cross(p2 - p0);
            for &corner in [face[0], face[i], face[i + 1]].iter() {
                normals[corner as usize] += face_normal;
            }
        }
    }
    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0; 3]
            }
        })
        .collect()
}

/// Apply the geometry related steps of `flags` to an imported mesh.
pub fn post_process(mesh: &mut ImportedMesh, flags: PostProcess) {
    if flags.triangulate && mesh.faces.iter().any(|f| f.len() != 3) {
        mesh.faces = triangulate(std::mem::take(&mut mesh.faces));
    }
    if flags.generate_normals && mesh.normals.is_empty() {
        mesh.normals = generate_normals(&mesh.positions, &mesh.faces);
    }
}
