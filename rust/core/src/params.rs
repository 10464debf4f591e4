// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-adjustable rendering parameters.
//!
//! Enum discriminants follow the numbering of the external viewer library
//! so they can be handed over without a lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pointer navigation mode of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationMode {
    #[default]
    Orbit,
    FreeOrbit,
    Pan,
    Zoom,
    LookAround,
    Walk,
}

impl NavigationMode {
    pub const ALL: [NavigationMode; 6] = [
        NavigationMode::Orbit,
        NavigationMode::FreeOrbit,
        NavigationMode::Pan,
        NavigationMode::Zoom,
        NavigationMode::LookAround,
        NavigationMode::Walk,
    ];

    /// Identifier understood by the viewer library.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::Orbit => "orbit",
            NavigationMode::FreeOrbit => "free-orbit",
            NavigationMode::Pan => "pan",
            NavigationMode::Zoom => "zoom",
            NavigationMode::LookAround => "look-around",
            NavigationMode::Walk => "walk",
        }
    }

    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            NavigationMode::Orbit => "Orbit",
            NavigationMode::FreeOrbit => "Free orbit",
            NavigationMode::Pan => "Pan",
            NavigationMode::Zoom => "Zoom",
            NavigationMode::LookAround => "Look around",
            NavigationMode::Walk => "Walk",
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NavigationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CameraType {
    #[default]
    Perspective = 0,
    Orthogonal = 1,
}

impl CameraType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraType::Perspective => "perspective",
            CameraType::Orthogonal => "orthogonal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CameraType::Perspective => "Perspective",
            CameraType::Orthogonal => "Orthographic",
        }
    }
}

impl FromStr for CameraType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perspective" | "0" => Ok(CameraType::Perspective),
            "orthogonal" | "orthographic" | "1" => Ok(CameraType::Orthogonal),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Named view preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ViewType {
    Top = 0,
    Bottom = 1,
    Front = 2,
    Back = 3,
    Left = 4,
    Right = 5,
    #[default]
    Default = 6,
}

impl ViewType {
    /// Presets in button order.
    pub const ALL: [ViewType; 7] = [
        ViewType::Default,
        ViewType::Front,
        ViewType::Back,
        ViewType::Top,
        ViewType::Bottom,
        ViewType::Left,
        ViewType::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Top => "top",
            ViewType::Bottom => "bottom",
            ViewType::Front => "front",
            ViewType::Back => "back",
            ViewType::Left => "left",
            ViewType::Right => "right",
            ViewType::Default => "default",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewType::Top => "Top",
            ViewType::Bottom => "Bottom",
            ViewType::Front => "Front",
            ViewType::Back => "Back",
            ViewType::Left => "Left",
            ViewType::Right => "Right",
            ViewType::Default => "Default",
        }
    }
}

impl FromStr for ViewType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewType::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown variant: {0:?}")]
pub struct UnknownVariant(pub String);

/// Inclusive range of a continuous post-processing level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const GAMMA: ParamRange = ParamRange {
        min: 0.0,
        max: 5.0,
        step: 0.1,
    };
    pub const CONTRAST: ParamRange = ParamRange {
        min: 0.0,
        max: 5.0,
        step: 0.1,
    };
    pub const BRIGHTNESS: ParamRange = ParamRange {
        min: -1.0,
        max: 1.0,
        step: 0.1,
    };

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Continuous post-processing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Gamma,
    Contrast,
    Brightness,
}

impl Level {
    pub fn range(&self) -> ParamRange {
        match self {
            Level::Gamma => ParamRange::GAMMA,
            Level::Contrast => ParamRange::CONTRAST,
            Level::Brightness => ParamRange::BRIGHTNESS,
        }
    }
}

/// Parse a slider value.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_level(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Rendering parameters mirrored into the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParameters {
    pub gamma: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub navigation_mode: NavigationMode,
    pub camera_type: CameraType,
    pub cube_stopped: bool,
    pub grid_stopped: bool,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            contrast: 1.0,
            brightness: 0.0,
            navigation_mode: NavigationMode::Orbit,
            camera_type: CameraType::Perspective,
            cube_stopped: false,
            grid_stopped: false,
        }
    }
}

impl RenderParameters {
    pub fn level(&self, level: Level) -> f64 {
        match level {
            Level::Gamma => self.gamma,
            Level::Contrast => self.contrast,
            Level::Brightness => self.brightness,
        }
    }

    /// Store a level, clamped into its range. Non-finite values are ignored.
    ///
    /// Returns the stored value.
    pub fn set_level(&mut self, level: Level, value: f64) -> f64 {
        if value.is_finite() {
            let value = level.range().clamp(value);
            match level {
                Level::Gamma => self.gamma = value,
                Level::Contrast => self.contrast = value,
                Level::Brightness => self.brightness = value,
            }
        }
        self.level(level)
    }

    /// Store a level from slider text. Unparsable text keeps the previous value.
    pub fn set_level_text(&mut self, level: Level, input: &str) -> f64 {
        match parse_level(input) {
            Some(value) => self.set_level(level, value),
            None => self.level(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_mode_strings() {
        for mode in NavigationMode::ALL {
            assert_eq!(mode.as_str().parse::<NavigationMode>(), Ok(mode));
        }
        assert_eq!("free-orbit".parse(), Ok(NavigationMode::FreeOrbit));
        assert!("fly".parse::<NavigationMode>().is_err());
    }

    #[test]
    fn test_enum_discriminants_match_viewer_library() {
        assert_eq!(CameraType::Perspective as u8, 0);
        assert_eq!(CameraType::Orthogonal as u8, 1);
        assert_eq!(ViewType::Top as u8, 0);
        assert_eq!(ViewType::Default as u8, 6);
        assert_eq!("orthographic".parse(), Ok(CameraType::Orthogonal));
        assert_eq!("FRONT".parse(), Ok(ViewType::Front));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("1.5"), Some(1.5));
        assert_eq!(parse_level(" -0.3 "), Some(-0.3));
        assert_eq!(parse_level("abc"), None);
        assert_eq!(parse_level(""), None);
        assert_eq!(parse_level("NaN"), None);
        assert_eq!(parse_level("inf"), None);
    }

    #[test]
    fn test_set_level_text_keeps_previous_on_garbage() {
        let mut params = RenderParameters::default();
        assert_eq!(params.set_level_text(Level::Gamma, "2.5"), 2.5);
        assert_eq!(params.set_level_text(Level::Gamma, "not-a-number"), 2.5);
        assert_eq!(params.gamma, 2.5);
    }

    #[test]
    fn test_set_level_clamps() {
        let mut params = RenderParameters::default();
        assert_eq!(params.set_level(Level::Contrast, 9.0), 5.0);
        assert_eq!(params.set_level(Level::Brightness, -3.0), -1.0);
        assert_eq!(params.set_level(Level::Brightness, f64::NAN), -1.0);
    }
}
