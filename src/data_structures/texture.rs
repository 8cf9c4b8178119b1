//! Cached textures and the references meshes hold to them.
//!
//! A [`Texture`] is shared by every mesh whose material names the same file.
//! The role a texture plays (diffuse or specular) belongs to the referencing
//! mesh, so the same file can serve as diffuse map for one material and as
//! specular map for another without either overwriting the other.

use std::path::PathBuf;

use crate::gpu::TextureHandle;

/// Semantic slot a texture is bound to when a mesh is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    Diffuse,
    Specular,
}

/// Identity of a texture inside a [`TextureCache`](crate::resources::texture::TextureCache).
///
/// Two equal ids always refer to the same GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

/// A texture uploaded once and kept until the owning scene is torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub handle: TextureHandle,
    /// File name exactly as the material references it. This is the cache key.
    pub path: String,
    /// Where the pixels were read from (`basepath/path`).
    pub resolved_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub role: TextureRole,
    pub texture: TextureId,
}
