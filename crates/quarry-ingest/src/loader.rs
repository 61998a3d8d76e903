//! Hand-off from a staged asset to a model loader

use crate::types::StagedAsset;
use serde::{Deserialize, Serialize};

/// How a loaded model is moved relative to the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecenterMode {
    /// Keep the authored origin
    None,
    /// Move the bounds centre to the origin
    Center,
    /// Move the bottom-centre of the bounds to the origin
    #[default]
    Root,
}

/// Options applied by a loader to the model it builds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Uniform scale applied after recentering
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub recenter: RecenterMode,
}

fn default_scale() -> f32 {
    0.75
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            recenter: RecenterMode::default(),
        }
    }
}

/// Turns a staged file into whatever model representation the caller renders
pub trait ModelLoader {
    type Model;

    fn load(&self, asset: &StagedAsset) -> quarry_core::Result<Self::Model>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoadOptions::default();
        assert_eq!(options.scale, 0.75);
        assert_eq!(options.recenter, RecenterMode::Root);
    }

    #[test]
    fn test_options_from_toml() {
        let options: LoadOptions = toml::from_str(r#"recenter = "center""#).unwrap();
        assert_eq!(options.scale, 0.75);
        assert_eq!(options.recenter, RecenterMode::Center);
    }
}
