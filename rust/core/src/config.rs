// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.
//!
//! Browser hosts pass the configuration as JSON; native hosts read it from
//! environment variables. Every field has a default so an empty object is a
//! valid configuration.

use crate::error::{Error, Result};
use crate::viewer::ClipPlane;
use serde::{Deserialize, Serialize};

/// Default base address of the conversion API.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5084/api/bimconversion";

/// Default sample geometry asset.
pub const DEFAULT_SAMPLE_ASSET: &str = "/SampleHouse.wexbim";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base of the conversion API (without trailing slash).
    pub api_base: String,
    /// Viewer setup.
    pub viewer: ViewerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ClientConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.normalize();
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("BIMCONV_API_BASE") {
            config.api_base = base;
        }
        if let Ok(asset) = std::env::var("BIMCONV_SAMPLE_ASSET") {
            config.viewer.sample_asset = asset;
        }
        config.normalize();
        config
    }

    fn normalize(&mut self) {
        let trimmed = self.api_base.trim().trim_end_matches('/');
        if trimmed.len() != self.api_base.len() {
            self.api_base = trimmed.to_string();
        }
    }

    /// URL of the conversion endpoint.
    pub fn convert_url(&self) -> String {
        format!("{}/convert", self.api_base)
    }

    /// URL at which a converted artifact can be retrieved.
    ///
    /// The name is interpolated as-is; whether the artifact exists is not
    /// checked.
    pub fn artifact_url(&self, artifact_name: &str) -> String {
        format!("{}/files/{}", self.api_base, artifact_name)
    }
}

/// Viewer setup applied on mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Asset loaded when the uploaded artifact is not used.
    pub sample_asset: String,
    /// Load the uploaded artifact instead of the sample asset.
    pub load_uploaded_artifact: bool,
    /// Camera field of view in degrees.
    pub fov: f64,
    /// Background colour (RGBA).
    pub background: [f64; 4],
    /// Highlight elements under the pointer.
    pub hover_pick: bool,
    pub grid: GridStyle,
    pub cube: CubeStyle,
    /// Half-spaces of the bounding clip box.
    pub clip_box: Vec<ClipPlane>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sample_asset: DEFAULT_SAMPLE_ASSET.to_string(),
            load_uploaded_artifact: true,
            fov: 53.0,
            background: [0.0, 0.0, 0.0, 0.0],
            hover_pick: true,
            grid: GridStyle::default(),
            cube: CubeStyle::default(),
            clip_box: ClipPlane::default_box().to_vec(),
        }
    }
}

/// Reference grid appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridStyle {
    pub z_factor: f64,
    pub colour: [f64; 4],
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            z_factor: 20.0,
            colour: [0.0, 0.0, 0.0, 0.8],
        }
    }
}

/// Navigation cube appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CubeStyle {
    /// Size relative to the viewport.
    pub ratio: f64,
    pub passive_alpha: f64,
    pub active_alpha: f64,
    /// Minimum size in pixels.
    pub min_size: f64,
}

impl Default for CubeStyle {
    fn default() -> Self {
        Self {
            ratio: 0.05,
            passive_alpha: 1.0,
            active_alpha: 1.0,
            min_size: 150.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(
            config.convert_url(),
            "http://127.0.0.1:5084/api/bimconversion/convert"
        );
        assert_eq!(
            config.artifact_url("model.wexbim"),
            "http://127.0.0.1:5084/api/bimconversion/files/model.wexbim"
        );
    }

    #[test]
    fn test_from_json_partial_and_trailing_slash() {
        let config =
            ClientConfig::from_json(r#"{"apiBase": "https://bim.example.com/api/bimconversion/"}"#)
                .unwrap();
        assert_eq!(config.api_base, "https://bim.example.com/api/bimconversion");
        assert_eq!(config.viewer, ViewerConfig::default());
        assert_eq!(
            config.artifact_url("house.wexbim"),
            "https://bim.example.com/api/bimconversion/files/house.wexbim"
        );
    }

    #[test]
    fn test_from_json_viewer_overrides() {
        let config = ClientConfig::from_json(
            r#"{"viewer": {"loadUploadedArtifact": false, "fov": 45, "grid": {"zFactor": 10}}}"#,
        )
        .unwrap();
        assert!(!config.viewer.load_uploaded_artifact);
        assert_eq!(config.viewer.fov, 45.0);
        assert_eq!(config.viewer.grid.z_factor, 10.0);
        assert_eq!(config.viewer.grid.colour, [0.0, 0.0, 0.0, 0.8]);
        assert_eq!(config.viewer.clip_box.len(), 6);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ClientConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    // Only this test touches the BIMCONV_* variables.
    #[test]
    fn test_from_env() {
        std::env::remove_var("BIMCONV_API_BASE");
        std::env::remove_var("BIMCONV_SAMPLE_ASSET");
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());

        std::env::set_var("BIMCONV_API_BASE", " https://bim.example.com/api/bimconversion/ ");
        std::env::set_var("BIMCONV_SAMPLE_ASSET", "/models/Office.wexbim");
        let config = ClientConfig::from_env();
        std::env::remove_var("BIMCONV_API_BASE");
        std::env::remove_var("BIMCONV_SAMPLE_ASSET");

        assert_eq!(config.api_base, "https://bim.example.com/api/bimconversion");
        assert_eq!(
            config.convert_url(),
            "https://bim.example.com/api/bimconversion/convert"
        );
        assert_eq!(config.viewer.sample_asset, "/models/Office.wexbim");
        assert_eq!(config.viewer.fov, 53.0);
        assert!(config.viewer.load_uploaded_artifact);
    }
}
