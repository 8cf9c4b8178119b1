use std::path::Path;

use anyhow::Context;

use crate::resources::importer::{
    ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, PostProcess, SHININESS_SCALE,
    SceneImporter, flip_v, post_process,
};

/**
 * Wavefront OBJ importer backed by `tobj`.
 *
 * OBJ files have no node hierarchy, so the root node references every object of
 * the file in declaration order. OBJ texture coordinates have their origin in
 * the bottom-left corner and get flipped when `flip_uvs` is requested.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl SceneImporter for ObjImporter {
    fn import(&self, path: &Path, flags: PostProcess) -> anyhow::Result<ImportedScene> {
        let (models, obj_materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: flags.triangulate,
                // The indices are for positions, texels, and normals at once
                single_index: true,
                ignore_points: true,
                ignore_lines: true,
                ..Default::default()
            },
        )
        .with_context(|| format!("could not parse OBJ file {}", path.display()))?;

        // We rather render untextured than refuse the whole model when the mtl is missing
        let obj_materials = obj_materials.unwrap_or_else(|e| {
            log::warn!("materials of {} could not be loaded: {e}", path.display());
            Vec::new()
        });

        let meshes = models
            .into_iter()
            .map(|model| {
                let m = model.mesh;
                let positions: Vec<[f32; 3]> = m
                    .positions
                    .chunks_exact(3)
                    .map(|p| [p[0], p[1], p[2]])
                    .collect();
                let normals = if m.normals.len() == m.positions.len() {
                    m.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
                } else {
                    Vec::new()
                };
                let tex_coords = if !m.texcoords.is_empty() && m.texcoords.len() / 2 == positions.len() {
                    let mut uvs: Vec<[f32; 2]> =
                        m.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect();
                    if flags.flip_uvs {
                        flip_v(&mut uvs);
                    }
                    Some(uvs)
                } else {
                    None
                };
                // Without arities every face is a triangle
                let faces = if m.face_arities.is_empty() {
                    m.indices.chunks(3).map(<[u32]>::to_vec).collect()
                } else {
                    let mut start = 0;
                    m.face_arities
                        .iter()
                        .map(|&arity| {
                            let end = (start + arity as usize).min(m.indices.len());
                            let face = m.indices[start..end].to_vec();
                            start = end;
                            face
                        })
                        .collect()
                };
                let mut mesh = ImportedMesh {
                    name: model.name,
                    positions,
                    normals,
                    tex_coords,
                    faces,
                    material: m.material_id,
                };
                post_process(&mut mesh, flags);
                mesh
            })
            .collect::<Vec<_>>();

        let materials = obj_materials
            .into_iter()
            .map(|m| ImportedMaterial {
                name: m.name,
                shininess: m.shininess.unwrap_or(0.0) * SHININESS_SCALE,
                diffuse_textures: m.diffuse_texture.into_iter().collect(),
                specular_textures: m.specular_texture.into_iter().collect(),
            })
            .collect();

        let root = ImportedNode {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            meshes: (0..meshes.len()).collect(),
            children: Vec::new(),
        };

        Ok(ImportedScene {
            root: Some(root),
            meshes,
            materials,
            incomplete: false,
        })
    }
}
