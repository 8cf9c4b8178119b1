use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::resources::importer::{
    ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, PostProcess, SceneImporter,
    post_process,
};

/**
 * glTF importer backed by the `gltf` crate.
 *
 * The node tree of the default scene is kept as is below a synthetic root, every
 * triangle-list primitive becomes one imported mesh. glTF texture coordinates
 * already have their origin in the top-left corner, so they are never flipped.
 * Node transforms are not read: placement is owned by the model instance.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl SceneImporter for GltfImporter {
    fn import(&self, path: &Path, flags: PostProcess) -> anyhow::Result<ImportedScene> {
        let gltf = gltf::Gltf::open(path)
            .with_context(|| format!("could not parse glTF file {}", path.display()))?;
        let buffers = gltf::import_buffers(&gltf.document, path.parent(), gltf.blob.clone())
            .with_context(|| format!("could not load buffers of {}", path.display()))?;

        let mut scene = ImportedScene {
            materials: gltf.document.materials().map(to_material).collect(),
            ..Default::default()
        };

        let Some(gltf_scene) = gltf
            .document
            .default_scene()
            .or_else(|| gltf.document.scenes().next())
        else {
            // no scene means no root node, the loader reports that
            return Ok(scene);
        };

        let mut converted = HashMap::new();
        let children = gltf_scene
            .nodes()
            .map(|node| to_node(node, &buffers, flags, &mut scene, &mut converted))
            .collect();
        scene.root = Some(ImportedNode {
            name: gltf_scene.name().unwrap_or("root").to_string(),
            meshes: Vec::new(),
            children,
        });
        Ok(scene)
    }
}

fn to_node(
    node: gltf::Node,
    buffers: &[gltf::buffer::Data],
    flags: PostProcess,
    scene: &mut ImportedScene,
    // glTF meshes can be referenced by several nodes but are converted once
    converted: &mut HashMap<usize, Vec<usize>>,
) -> ImportedNode {
    let meshes = match node.mesh() {
        Some(mesh) => converted
            .entry(mesh.index())
            .or_insert_with(|| {
                mesh.primitives()
                    .filter_map(|primitive| to_mesh(&mesh, &primitive, buffers, flags))
                    .map(|imported| {
                        scene.meshes.push(imported);
                        scene.meshes.len() - 1
                    })
                    .collect()
            })
            .clone(),
        None => Vec::new(),
    };
    let children = node
        .children()
        .map(|child| to_node(child, buffers, flags, scene, converted))
        .collect();

    ImportedNode {
        name: node.name().unwrap_or_default().to_string(),
        meshes,
        children,
    }
}

fn to_mesh(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    flags: PostProcess,
) -> Option<ImportedMesh> {
    let name = mesh.name().unwrap_or("unknown_mesh").to_string();
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!(
            "skipping primitive {} of mesh {name}: mode {:?} is not a triangle list",
            primitive.index(),
            primitive.mode()
        );
        return None;
    }
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let Some(positions) = reader.read_positions() else {
        log::warn!("skipping primitive {} of mesh {name}: no positions", primitive.index());
        return None;
    };
    let positions: Vec<[f32; 3]> = positions.collect();
    let normals = reader
        .read_normals()
        .map(|normals| normals.collect())
        .unwrap_or_default();
    let tex_coords = reader
        .read_tex_coords(0)
        .map(|tex_coords| tex_coords.into_f32().collect());
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut imported = ImportedMesh {
        name,
        positions,
        normals,
        tex_coords,
        faces: indices.chunks(3).map(<[u32]>::to_vec).collect(),
        material: primitive.material().index(),
    };
    post_process(&mut imported, flags);
    Some(imported)
}

/**
 * glTF materials are metallic-roughness and carry no Phong shininess, so the
 * imported shininess is zero. The base colour texture is the diffuse map.
 */
fn to_material(material: gltf::Material) -> ImportedMaterial {
    let name = material.name().unwrap_or("unnamed_material").to_string();
    let mut diffuse_textures = Vec::new();
    if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
        match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
                diffuse_textures.push(uri.to_string());
            }
            _ => log::warn!(
                "material {name}: embedded base colour images are not path addressable and are skipped"
            ),
        }
    }

    ImportedMaterial {
        name,
        shininess: 0.0,
        diffuse_textures,
        specular_textures: Vec::new(),
    }
}
