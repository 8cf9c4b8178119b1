use std::path::Path;

use crate::{
    data_structures::mesh::Mesh,
    error::LoadError,
    gpu::{GpuBackend, TextureDesc},
    resources::{
        image::ImageSource,
        importer::{ImportedNode, ImportedScene, PostProcess, SceneImporter},
        texture::TextureCache,
    },
};

/**
 * This module contains all logic for turning asset files into GPU meshes and textures.
 */
pub mod gltf_import;
pub mod image;
pub mod importer;
pub mod mesh;
pub mod obj_import;
pub mod texture;

/// The meshes of one asset file, uploaded and in scene traversal order.
#[derive(Debug)]
pub struct LoadedAsset {
    /// `path` up to its last `/`, empty for bare file names.
    pub directory: String,
    pub meshes: Vec<Mesh>,
}

/// Default importer: picks the format from the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetImporter;

impl SceneImporter for AssetImporter {
    fn import(&self, path: &Path, flags: PostProcess) -> anyhow::Result<ImportedScene> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "obj" => obj_import::ObjImporter.import(path, flags),
            "gltf" | "glb" => gltf_import::GltfImporter.import(path, flags),
            other => anyhow::bail!("unsupported asset format '{other}' for {}", path.display()),
        }
    }
}

/// Everything needed to load one asset: the importer, the image provider,
/// the shared texture cache and the GPU the meshes are uploaded to.
pub struct AssetLoader<'a> {
    pub importer: &'a dyn SceneImporter,
    pub images: &'a dyn ImageSource,
    pub textures: &'a mut TextureCache,
    pub gpu: &'a mut dyn GpuBackend,
    pub post_process: PostProcess,
    pub texture_desc: TextureDesc,
}

impl AssetLoader<'_> {
    /// Import `path`, convert its meshes and upload them.
    ///
    /// Textures are resolved relative to the asset's directory and go through the
    /// cache. When any mesh is malformed nothing is uploaded and the whole asset
    /// counts as failed; textures already cached stay cached.
    pub fn load(&mut self, path: &str) -> Result<LoadedAsset, LoadError> {
        let failed = |reason: String| {
            let error = LoadError::AssetLoadFailed {
                path: path.to_string(),
                reason,
            };
            log::error!("{error}");
            error
        };

        let scene = self
            .importer
            .import(Path::new(path), self.post_process)
            .map_err(|e| failed(format!("{e:#}")))?;
        if scene.incomplete {
            return Err(failed("the importer returned an incomplete scene".to_string()));
        }
        let Some(root) = &scene.root else {
            return Err(failed("the scene has no root node".to_string()));
        };

        let directory = match path.rfind('/') {
            Some(idx) => path[..idx].to_string(),
            None => String::new(),
        };

        let mut order = Vec::new();
        unfold_node(root, &mut order);

        let mut converted = Vec::with_capacity(order.len());
        for mesh_idx in order {
            let Some(imported) = scene.meshes.get(mesh_idx) else {
                return Err(failed(format!("node references missing mesh {mesh_idx}")));
            };
            let material = imported.material.and_then(|idx| scene.materials.get(idx));
            let data = mesh::to_mesh_data(imported, material, |name| {
                self.textures
                    .load(name, &directory, &self.texture_desc, &mut *self.gpu, self.images)
                    .ok()
            })
            .map_err(|e| {
                let error = e.into_asset_failure(path);
                log::error!("{error}");
                error
            })?;
            converted.push(data);
        }

        let meshes = converted
            .into_iter()
            .map(|data| data.upload(&mut *self.gpu))
            .collect::<Vec<_>>();
        log::debug!("loaded {} meshes from {path}", meshes.len());

        Ok(LoadedAsset { directory, meshes })
    }
}

/// Depth first: a node's own meshes in order, then its children in order.
fn unfold_node(node: &ImportedNode, order: &mut Vec<usize>) {
    order.extend_from_slice(&node.meshes);
    for child in &node.children {
        unfold_node(child, order);
    }
}
