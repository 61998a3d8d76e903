//! Quarry Import - Model loading for staged assets
//!
//! This crate loads staged glTF/GLB files with the `gltf` crate and
//! applies the placement options (scale, recentering) expected by the
//! renderer that receives them.

mod gltf_import;
mod types;

pub use gltf_import::{import_gltf, GltfLoader};
pub use types::{ImportedMesh, LoadedModel, MeshBounds};
