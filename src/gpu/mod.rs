//! The GPU seam used by the asset pipeline.
//!
//! Everything the core needs from a graphics API is expressed by
//! [`GpuBackend`]: static buffers, a vertex layout binding three attribute
//! buffers to fixed shader locations, and sampled 2D textures. Callers only
//! ever see the opaque handles returned here, so no API state leaks out of the
//! core. [`wgpu_backend::WgpuBackend`] is the production implementation.

pub mod wgpu_backend;

use crate::resources::image::PixelBuffer;

/// Shader location of the per-vertex position attribute (3 floats).
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of the per-vertex normal attribute (3 floats).
pub const NORMAL_LOCATION: u32 = 1;
/// Shader location of the per-vertex texture coordinate attribute (2 floats).
pub const TEX_COORD_LOCATION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Binds an index buffer and a set of attribute buffers for one indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexLayoutHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// One tightly packed `f32` attribute stream read from its own buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub buffer: BufferHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Storage format of an uploaded texture. The source is always 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalFormat {
    /// Colour only, the alpha channel of the source is discarded.
    Rgb,
    Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }
}

/// How a material texture is stored and sampled. Textures never carry mipmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub internal_format: InternalFormat,
    pub sampler: SamplerDesc,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            internal_format: InternalFormat::Rgb,
            sampler: SamplerDesc::default(),
        }
    }
}

/// Minimal graphics API surface consumed by the mesh upload and the texture cache.
///
/// All buffers are immutable once created. Release functions are only called
/// during teardown, and at most once per handle.
pub trait GpuBackend {
    fn create_index_buffer(&mut self, label: &str, indices: &[u32]) -> BufferHandle;

    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle;

    fn create_vertex_layout(
        &mut self,
        label: &str,
        index_buffer: BufferHandle,
        attributes: &[VertexAttribute],
    ) -> VertexLayoutHandle;

    fn create_texture(
        &mut self,
        label: &str,
        desc: &TextureDesc,
        image: &PixelBuffer,
    ) -> TextureHandle;

    fn release_buffer(&mut self, buffer: BufferHandle);

    fn release_vertex_layout(&mut self, layout: VertexLayoutHandle);

    fn release_texture(&mut self, texture: TextureHandle);
}
