//! Error kinds produced while turning assets into GPU resources.
//!
//! None of these abort model construction. A failed asset load still yields a
//! registered [`Model`](crate::data_structures::model::Model) without meshes,
//! and a failed image decode only drops the affected texture slot.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    /// The importer produced no scene, an incomplete scene or a scene without root node.
    #[error("failed to load asset {path}: {reason}")]
    AssetLoadFailed { path: String, reason: String },

    /// The image provider could not produce pixels for a texture.
    #[error("failed to decode image {path}: {reason}")]
    ImageDecodeFailed { path: String, reason: String },

    /// The model was placed with a scale that is not a positive finite number.
    #[error("invalid scale {scale} for model {path}")]
    InvalidScale { path: String, scale: f32 },

    /// A mesh violated the triangle-list layout (non-triangular face, index out of range, ...).
    #[error("malformed geometry in mesh {mesh}: {reason}")]
    MalformedGeometry { mesh: String, reason: String },
}

impl LoadError {
    /// Geometry problems are reported to the caller as a failed asset load.
    pub fn into_asset_failure(self, path: &str) -> LoadError {
        match self {
            LoadError::MalformedGeometry { mesh, reason } => LoadError::AssetLoadFailed {
                path: path.to_string(),
                reason: format!("mesh {mesh}: {reason}"),
            },
            other => other,
        }
    }
}
