//! flow-models
//!
//! The model management core of a real-time rasterization renderer. This crate
//! ingests triangulated 3D assets from disk, uploads them into GPU-resident
//! meshes, deduplicates textures by their material-relative file name and keeps
//! per-instance world placement (translation, rotation, uniform scale) together
//! with the lights attached to each instance.
//!
//! High-level modules
//! - `data_structures`: meshes, textures, bounding spheres, transforms and models
//! - `error`: the load error kinds surfaced by the asset pipeline
//! - `gpu`: the minimal GPU seam and its wgpu implementation
//! - `lighting`: the light interface models push their positions to
//! - `resources`: scene importers, image decoding, the texture cache and the asset loader
//! - `scene`: the context owning the model registry, texture cache and GPU handles
//!

pub mod data_structures;
pub mod error;
pub mod gpu;
pub mod lighting;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector3};
pub use data_structures::model::{Model, RenderClass};
pub use error::LoadError;
pub use scene::{ModelId, Scene, SceneOptions};
