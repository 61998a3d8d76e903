//! Model ingestion command

use anyhow::{bail, Result};
use quarry_import::{GltfLoader, LoadedModel};
use quarry_ingest::{
    AssetIngestor, IngestError, LocalFileSource, MetadataResolver, ResourceHandle, StagedAsset,
};
use serde::Serialize;

pub struct IngestArgs {
    pub path: String,
    pub name: Option<String>,
    pub mime: Option<String>,
    pub staging_dir: Option<String>,
    pub load: bool,
    pub format: String,
}

/// Local file metadata with optional command-line overrides
struct OverrideResolver {
    inner: LocalFileSource,
    name: Option<String>,
    mime: Option<String>,
}

impl MetadataResolver for OverrideResolver {
    fn resolve_name(&self, handle: &ResourceHandle) -> Option<String> {
        self.name.clone().or_else(|| self.inner.resolve_name(handle))
    }

    fn resolve_mime_type(&self, handle: &ResourceHandle) -> Option<String> {
        self.mime.clone().or_else(|| self.inner.resolve_mime_type(handle))
    }
}

#[derive(Serialize)]
struct ModelSummary {
    name: String,
    meshes: usize,
    vertices: usize,
    triangles: usize,
    materials: usize,
    textures: usize,
    bounds: Option<String>,
}

impl From<&LoadedModel> for ModelSummary {
    fn from(model: &LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            meshes: model.meshes.len(),
            vertices: model.vertex_count(),
            triangles: model.triangle_count(),
            materials: model.material_count,
            textures: model.texture_count,
            bounds: model.bounds().map(|b| b.to_string()),
        }
    }
}

#[derive(Serialize)]
struct IngestReport {
    path: String,
    byte_length: u64,
    format: String,
    digest: String,
    glb_version: Option<u32>,
    declared_length: Option<u32>,
    warnings: Vec<String>,
    model: Option<ModelSummary>,
}

impl IngestReport {
    fn new(asset: &StagedAsset, model: Option<&LoadedModel>) -> Self {
        Self {
            path: asset.local_path.display().to_string(),
            byte_length: asset.byte_length,
            format: asset.format.to_string(),
            digest: asset.digest.to_prefixed_hex(),
            glb_version: asset.header.map(|h| h.version),
            declared_length: asset.header.map(|h| h.declared_length),
            warnings: asset.warnings.iter().map(|w| w.to_string()).collect(),
            model: model.map(ModelSummary::from),
        }
    }

    fn print_text(&self) {
        println!("Staged: {}", self.path);
        println!("  Format: {}", self.format);
        println!("  Size: {} bytes", self.byte_length);
        println!("  Digest: {}", self.digest);
        if let (Some(version), Some(declared)) = (self.glb_version, self.declared_length) {
            println!("  GLB version: {}, declared length: {}", version, declared);
        }
        for warning in &self.warnings {
            println!("  Warning: {}", warning);
        }
        if let Some(model) = &self.model {
            println!(
                "  Model: {} ({} meshes, {} vertices, {} triangles, {} materials, {} textures)",
                model.name,
                model.meshes,
                model.vertices,
                model.triangles,
                model.materials,
                model.textures
            );
            if let Some(bounds) = &model.bounds {
                println!("  Bounds: {}", bounds);
            }
        }
    }
}

pub fn run(args: IngestArgs) -> Result<()> {
    let config = super::load_config(args.staging_dir.as_deref())?;

    let resolver = OverrideResolver {
        inner: LocalFileSource::new(),
        name: args.name,
        mime: args.mime,
    };
    let ingestor = AssetIngestor::local(&config).with_resolver(resolver);
    let handle = ResourceHandle::new(args.path);

    let outcome = if args.load {
        let loader = GltfLoader::new(config.load);
        ingestor
            .ingest_and_load(&handle, &loader)
            .map(|loaded| IngestReport::new(&loaded.asset, Some(&loaded.model)))
    } else {
        ingestor
            .ingest(&handle)
            .map(|asset| IngestReport::new(&asset, None))
    };

    match outcome {
        Ok(report) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_text();
            }
            Ok(())
        }
        Err(err) => report_failure(&err, &args.format),
    }
}

fn report_failure(err: &IngestError, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(err)?);
    }
    bail!("Failed to ingest model: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_ingest::{ErrorKind, ModelFormat, TempStagingDir};
    use std::fs;

    #[test]
    fn test_overrides_take_precedence() {
        let resolver = OverrideResolver {
            inner: LocalFileSource::new(),
            name: Some("picked.gltf".to_string()),
            mime: None,
        };
        let meta = resolver.resolve(&ResourceHandle::new("/downloads/blob"));
        assert_eq!(meta.display_name.as_deref(), Some("picked.gltf"));

        let plain = OverrideResolver {
            inner: LocalFileSource::new(),
            name: None,
            mime: Some("model/gltf+json".to_string()),
        };
        let meta = plain.resolve(&ResourceHandle::new("/downloads/blob"));
        assert_eq!(meta.display_name.as_deref(), Some("blob"));
        assert_eq!(meta.mime_hint.as_deref(), Some("model/gltf+json"));
    }

    #[test]
    fn test_report_from_staged_asset() {
        let dir = std::env::temp_dir().join(format!("quarry_cli_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let source = dir.join("box.glb");
        let mut bytes = b"glTF".to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        fs::write(&source, &bytes).unwrap();

        let local = LocalFileSource::new();
        let ingestor = AssetIngestor::new(local.clone(), local, TempStagingDir::new(dir.join("staging")));
        let asset = ingestor.ingest(&ResourceHandle::from_path(&source)).unwrap();
        assert_eq!(asset.format, ModelFormat::Glb);

        let report = IngestReport::new(&asset, None);
        assert_eq!(report.byte_length, 16);
        assert_eq!(report.format, "glb");
        assert_eq!(report.glb_version, Some(2));
        assert!(report.digest.starts_with("sha256:"));
        assert!(report.warnings.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failure_is_an_error() {
        let err = IngestError::new(ErrorKind::UnsupportedFormat, "'.bin' is not a GLB or glTF file");
        let result = report_failure(&err, "text");
        assert!(result.unwrap_err().to_string().contains("unsupported format"));
    }
}
