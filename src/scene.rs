//! The scene context: model registry, texture cache and GPU resource ownership.
//!
//! A [`Scene`] owns every model it constructs and every GPU handle created on
//! their behalf. Models are registered in exactly one render class at
//! construction and stay registered for the lifetime of the scene. Dropping the
//! scene (or calling [`Scene::teardown`]) releases all meshes and textures.

use cgmath::{Matrix4, Vector3};

use crate::{
    data_structures::{
        model::{Model, RenderClass},
        texture::{Texture, TextureId},
    },
    error::LoadError,
    gpu::{GpuBackend, TextureDesc},
    resources::{
        AssetImporter, AssetLoader,
        image::{FsImageSource, ImageSource},
        importer::{PostProcess, SceneImporter},
        texture::TextureCache,
    },
};

/// Stable identity of a model within its scene. Ids follow construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Asset pipeline settings shared by every model of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneOptions {
    pub post_process: PostProcess,
    pub texture: TextureDesc,
}

pub struct Scene<G: GpuBackend> {
    gpu: G,
    importer: Box<dyn SceneImporter>,
    images: Box<dyn ImageSource>,
    options: SceneOptions,
    textures: TextureCache,
    models: Vec<Model>,
    lit: Vec<ModelId>,
    flat: Vec<ModelId>,
}

impl<G: GpuBackend> Scene<G> {
    /// A scene reading OBJ/glTF assets and image files from disk.
    pub fn new(gpu: G) -> Self {
        Self::with_sources(gpu, AssetImporter, FsImageSource, SceneOptions::default())
    }

    pub fn with_sources(
        gpu: G,
        importer: impl SceneImporter + 'static,
        images: impl ImageSource + 'static,
        options: SceneOptions,
    ) -> Self {
        Self {
            gpu,
            importer: Box::new(importer),
            images: Box::new(images),
            options,
            textures: TextureCache::new(),
            models: Vec::new(),
            lit: Vec::new(),
            flat: Vec::new(),
        }
    }

    /**
     * Construct a model from the asset at `path`, placed at `world_coord` with
     * `rotation` and uniform `scale`, and register it in `render_class`.
     *
     * The model is registered even when loading fails. It then has no meshes,
     * a zero bounding sphere and reports the failure via [`Model::load_error`].
     * A `scale` that is not positive and finite fails the same way, without
     * touching the asset.
     */
    pub fn load_model(
        &mut self,
        path: &str,
        rotation: Matrix4<f32>,
        world_coord: Vector3<f32>,
        scale: f32,
        render_class: RenderClass,
    ) -> ModelId {
        let mut model = Model::new(path, rotation, world_coord, scale, render_class);

        if !(scale.is_finite() && scale > 0.0) {
            let error = LoadError::InvalidScale {
                path: path.to_string(),
                scale,
            };
            log::error!("{error}");
            model.set_load_error(error);
            return self.register(model);
        }

        let mut loader = AssetLoader {
            importer: self.importer.as_ref(),
            images: self.images.as_ref(),
            textures: &mut self.textures,
            gpu: &mut self.gpu,
            post_process: self.options.post_process,
            texture_desc: self.options.texture,
        };
        match loader.load(path) {
            Ok(asset) => model.set_asset(asset),
            Err(e) => model.set_load_error(e),
        }
        self.register(model)
    }

    fn register(&mut self, model: Model) -> ModelId {
        let id = ModelId(self.models.len());
        match model.render_class() {
            RenderClass::Lit => self.lit.push(id),
            RenderClass::Flat => self.flat.push(id),
        }
        self.models.push(model);
        id
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(id.0)
    }

    /// Lit models in construction order.
    pub fn get_loaded_models(&self) -> &[ModelId] {
        &self.lit
    }

    /// Flat models in construction order.
    pub fn get_loaded_flat_models(&self) -> &[ModelId] {
        &self.flat
    }

    pub fn lit_models(&self) -> impl Iterator<Item = &Model> {
        self.lit.iter().map(|id| &self.models[id.0])
    }

    pub fn flat_models(&self) -> impl Iterator<Item = &Model> {
        self.flat.iter().map(|id| &self.models[id.0])
    }

    pub fn loaded_textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id)
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    /// Release every mesh and texture of the scene and drop it.
    pub fn teardown(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        let mut meshes = 0;
        for model in &mut self.models {
            for mesh in model.take_meshes() {
                mesh.release(&mut self.gpu);
                meshes += 1;
            }
        }
        let textures = self.textures.len();
        self.textures.release_all(&mut self.gpu);
        if meshes + textures > 0 {
            log::debug!("released {meshes} meshes and {textures} textures");
        }
    }
}

impl<G: GpuBackend> Drop for Scene<G> {
    fn drop(&mut self) {
        self.release_all();
    }
}
