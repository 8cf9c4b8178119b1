//! Engine data structures: meshes, textures, bounds, transforms and models.
//!
//! This module contains the core data types of the model management core:
//!
//! - `texture` contains the cached texture record and per-mesh texture references
//! - `mesh` holds CPU-side geometry and the GPU handles created on upload
//! - `bounds` derives a bounding sphere from local-space vertex positions
//! - `instance` holds the translation/rotation/scale placement of a model
//! - `model` is a placed, loaded asset with attached lights

pub mod bounds;
pub mod instance;
pub mod mesh;
pub mod model;
pub mod texture;
