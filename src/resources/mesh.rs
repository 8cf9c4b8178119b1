use crate::{
    data_structures::{
        mesh::MeshData,
        texture::{TextureId, TextureRef, TextureRole},
    },
    error::LoadError,
    resources::importer::{ImportedMaterial, ImportedMesh, SHININESS_SCALE},
};

/**
 * Converts one imported mesh into flat, vertex-major arrays.
 *
 * Meshes without UV channel 0 get `(0, 0)` for every vertex and meshes without
 * normals get zero normals. Every face must already be a triangle.
 *
 * `resolve` turns a material texture name into a cached texture. Diffuse maps are
 * resolved first, then specular maps, each in material order. Names it cannot
 * resolve are left out.
 */
pub fn to_mesh_data(
    imported: &ImportedMesh,
    material: Option<&ImportedMaterial>,
    mut resolve: impl FnMut(&str) -> Option<TextureId>,
) -> Result<MeshData, LoadError> {
    let malformed = |reason: String| LoadError::MalformedGeometry {
        mesh: imported.name.clone(),
        reason,
    };
    let vertex_count = imported.positions.len();

    let positions = imported.positions.iter().flatten().copied().collect::<Vec<_>>();

    let normals = match imported.normals.len() {
        n if n == vertex_count => imported.normals.iter().flatten().copied().collect(),
        0 => {
            log::debug!("mesh {} has no normals, using zero normals", imported.name);
            vec![0.0; 3 * vertex_count]
        }
        n => return Err(malformed(format!("{n} normals for {vertex_count} vertices"))),
    };

    let tex_coords = match &imported.tex_coords {
        Some(uvs) if uvs.len() == vertex_count => uvs.iter().flatten().copied().collect(),
        Some(uvs) => {
            return Err(malformed(format!(
                "{} tex coords for {vertex_count} vertices",
                uvs.len()
            )));
        }
        None => vec![0.0; 2 * vertex_count],
    };

    let mut indices = Vec::with_capacity(3 * imported.faces.len());
    for (i, face) in imported.faces.iter().enumerate() {
        if face.len() != 3 {
            return Err(malformed(format!("face {i} has {} corners", face.len())));
        }
        indices.extend_from_slice(face);
    }

    let (shininess, textures) = match material {
        Some(material) => {
            let diffuse = material
                .diffuse_textures
                .iter()
                .filter_map(|name| resolve(name))
                .map(|texture| TextureRef {
                    role: TextureRole::Diffuse,
                    texture,
                })
                .collect::<Vec<_>>();
            let specular = material
                .specular_textures
                .iter()
                .filter_map(|name| resolve(name))
                .map(|texture| TextureRef {
                    role: TextureRole::Specular,
                    texture,
                });
            (
                material.shininess / SHININESS_SCALE,
                diffuse.into_iter().chain(specular).collect(),
            )
        }
        None => (0.0, Vec::new()),
    };

    MeshData::new(
        &imported.name,
        positions,
        normals,
        tex_coords,
        indices,
        shininess,
        textures,
    )
}
