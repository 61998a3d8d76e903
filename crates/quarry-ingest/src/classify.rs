//! Extension and format classification
//!
//! The display name's extension wins over the MIME hint. Without a usable
//! name, a MIME hint mentioning `gltf` selects `.gltf` and everything else
//! falls back to `.glb`.

use crate::types::{ModelFormat, ResolvedMetadata};

/// Extension used when neither name nor MIME says otherwise
pub const DEFAULT_EXTENSION: &str = "glb";

/// Extract the lower-cased extension after the last `.` of a display name.
///
/// Names with no dot, a single leading dot (`.glb`), or a trailing dot have
/// no extension.
pub fn extension_from_name(name: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    let ext = &name[dot + 1..];
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Extension implied by a MIME hint
pub fn extension_from_mime(mime: Option<&str>) -> &'static str {
    match mime {
        Some(m) if m.to_ascii_lowercase().contains("gltf") => "gltf",
        _ => DEFAULT_EXTENSION,
    }
}

/// Extension the staging file will carry
pub fn staging_extension(metadata: &ResolvedMetadata) -> String {
    metadata
        .display_name
        .as_deref()
        .and_then(extension_from_name)
        .unwrap_or_else(|| extension_from_mime(metadata.mime_hint.as_deref()).to_string())
}

/// Classify resolved metadata into a model format
pub fn classify(metadata: &ResolvedMetadata) -> ModelFormat {
    ModelFormat::from_extension(&staging_extension(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: Option<&str>, mime: Option<&str>) -> ResolvedMetadata {
        ResolvedMetadata {
            display_name: name.map(String::from),
            mime_hint: mime.map(String::from),
        }
    }

    #[test]
    fn test_extension_from_name() {
        assert_eq!(extension_from_name("model.GLB").as_deref(), Some("glb"));
        assert_eq!(extension_from_name("a.b.Gltf").as_deref(), Some("gltf"));
        assert_eq!(extension_from_name(".hidden.glb").as_deref(), Some("glb"));
        assert_eq!(extension_from_name(".glb"), None);
        assert_eq!(extension_from_name("noext"), None);
        assert_eq!(extension_from_name("trailing."), None);
    }

    #[test]
    fn test_gltf_name_wins_over_any_mime() {
        for name in ["scene.gltf", "SCENE.GLTF", "Scene.glTF"] {
            for mime in [None, Some("model/gltf-binary"), Some("application/octet-stream")] {
                assert_eq!(classify(&meta(Some(name), mime)), ModelFormat::GltfJson);
            }
        }
    }

    #[test]
    fn test_glb_name_wins_over_gltf_mime() {
        assert_eq!(
            classify(&meta(Some("model.glb"), Some("model/gltf+json"))),
            ModelFormat::Glb
        );
    }

    #[test]
    fn test_mime_fallback_without_name() {
        assert_eq!(classify(&meta(None, Some("model/gltf+json"))), ModelFormat::GltfJson);
        assert_eq!(classify(&meta(None, Some("MODEL/GLTF+JSON"))), ModelFormat::GltfJson);
        assert_eq!(classify(&meta(None, Some("application/octet-stream"))), ModelFormat::Glb);
        assert_eq!(classify(&meta(None, None)), ModelFormat::Glb);
    }

    #[test]
    fn test_mime_fallback_for_dotless_name() {
        assert_eq!(classify(&meta(Some("model"), Some("model/gltf+json"))), ModelFormat::GltfJson);
        assert_eq!(classify(&meta(Some(".glb"), None)), ModelFormat::Glb);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(classify(&meta(Some("mystery.bin"), None)), ModelFormat::Unknown);
        assert_eq!(staging_extension(&meta(Some("mystery.bin"), None)), "bin");
    }
}
