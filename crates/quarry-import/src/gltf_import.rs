//! glTF/GLB file importer

use crate::types::{ImportedMesh, LoadedModel};
use quarry_core::{QuarryError, Result};
use quarry_ingest::{LoadOptions, ModelFormat, ModelLoader, StagedAsset};
use std::path::Path;

/// Import a glTF or GLB file without applying any placement options
pub fn import_gltf<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path).map_err(|e| {
        QuarryError::ImportError(format!("Failed to import glTF {}: {}", path.display(), e))
    })?;

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map(ModelFormat::from_extension)
        .unwrap_or(ModelFormat::Glb);

    let name = document
        .default_scene()
        .and_then(|s| s.name().map(String::from))
        .or_else(|| {
            path.file_stem()
                .and_then(|n| n.to_str())
                .map(String::from)
        })
        .unwrap_or_else(|| "unnamed".to_string());

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect())
                .unwrap_or_default();

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_default();

            meshes.push(ImportedMesh {
                name: mesh_name.clone(),
                positions,
                normals,
                uvs,
                indices,
                material_index: primitive.material().index(),
            });
        }
    }

    if meshes.is_empty() {
        return Err(QuarryError::ImportError(format!(
            "{} contains no meshes",
            path.display()
        )));
    }

    Ok(LoadedModel {
        name,
        format,
        meshes,
        material_count: document.materials().len(),
        texture_count: images.len(),
    })
}

/// `ModelLoader` that imports staged files with the `gltf` crate
#[derive(Debug, Clone, Default)]
pub struct GltfLoader {
    options: LoadOptions,
}

impl GltfLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }
}

impl ModelLoader for GltfLoader {
    type Model = LoadedModel;

    fn load(&self, asset: &StagedAsset) -> Result<LoadedModel> {
        let mut model = import_gltf(&asset.local_path)?;
        model.format = asset.format;
        model.apply_options(&self.options);
        tracing::debug!(
            name = %model.name,
            meshes = model.meshes.len(),
            vertices = model.vertex_count(),
            scale = self.options.scale,
            recenter = ?self.options.recenter,
            "loaded model"
        );
        Ok(model)
    }
}
