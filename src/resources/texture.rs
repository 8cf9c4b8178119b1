//! Texture cache keyed by the file name a material references.
//!
//! Asset files routinely reference the same texture from several materials,
//! and models sharing a directory reference the same files too. The cache makes
//! sure every distinct name is decoded and uploaded once.

use std::{collections::HashMap, path::Path};

use crate::{
    data_structures::texture::{Texture, TextureId},
    error::LoadError,
    gpu::{GpuBackend, TextureDesc},
    resources::image::ImageSource,
};

#[derive(Debug, Default)]
pub struct TextureCache {
    textures: Vec<Texture>,
    by_name: HashMap<String, TextureId>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the texture for `filename`, loading it from `basepath/filename` on a miss.
    ///
    /// The key is `filename` alone, so the same name requested from another
    /// directory is a hit. Failed decodes are logged and not cached.
    pub fn load(
        &mut self,
        filename: &str,
        basepath: &str,
        desc: &TextureDesc,
        gpu: &mut dyn GpuBackend,
        images: &dyn ImageSource,
    ) -> Result<TextureId, LoadError> {
        if let Some(&id) = self.by_name.get(filename) {
            log::debug!("texture cache hit for {filename}");
            return Ok(id);
        }

        let resolved_path = Path::new(basepath).join(filename);
        let image = images.load_rgba(&resolved_path).map_err(|e| {
            let error = LoadError::ImageDecodeFailed {
                path: resolved_path.display().to_string(),
                reason: format!("{e:#}"),
            };
            log::error!("{error}");
            error
        })?;

        let handle = gpu.create_texture(filename, desc, &image);
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Texture {
            handle,
            path: filename.to_string(),
            resolved_path,
            width: image.width,
            height: image.height,
        });
        self.by_name.insert(filename.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn find(&self, filename: &str) -> Option<TextureId> {
        self.by_name.get(filename).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// All cached textures in load order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(i, texture)| (TextureId(i as u32), texture))
    }

    pub(crate) fn release_all(&mut self, gpu: &mut dyn GpuBackend) {
        for texture in self.textures.drain(..) {
            gpu.release_texture(texture.handle);
        }
        self.by_name.clear();
    }
}
