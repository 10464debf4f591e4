// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the external 3D viewer library.
//!
//! The panel never renders anything itself. It drives viewer instances and
//! their plugins through these traits; the browser crate implements them on
//! top of the JavaScript viewer, tests implement them with recording fakes.

use crate::config::{CubeStyle, GridStyle};
use crate::error::Result;
use crate::params::{CameraType, NavigationMode, ViewType};
use serde::{Deserialize, Serialize};

/// Column-major 4x4 model-view matrix.
pub type CameraTransform = [f32; 16];

/// Half-space used by the section box: keeps geometry behind the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane {
    pub direction: [f64; 3],
    pub location: [f64; 3],
}

impl ClipPlane {
    pub const fn new(direction: [f64; 3], location: [f64; 3]) -> Self {
        Self {
            direction,
            location,
        }
    }

    /// Fixed 6000 x 4000 x 2000 box centred on the origin.
    pub const fn default_box() -> [ClipPlane; 6] {
        [
            ClipPlane::new([1.0, 0.0, 0.0], [3000.0, 0.0, 0.0]),
            ClipPlane::new([0.0, 1.0, 0.0], [0.0, 2000.0, 0.0]),
            ClipPlane::new([0.0, 0.0, 1.0], [0.0, 0.0, 1000.0]),
            ClipPlane::new([-1.0, 0.0, 0.0], [-3000.0, 0.0, 0.0]),
            ClipPlane::new([0.0, -1.0, 0.0], [0.0, -2000.0, 0.0]),
            ClipPlane::new([0.0, 0.0, -1.0], [0.0, 0.0, -1000.0]),
        ]
    }
}

/// Ids of the two rendering surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surfaces {
    /// Main viewer canvas.
    pub primary: String,
    /// Picture-in-picture canvas following the main camera.
    pub secondary: String,
}

impl Default for Surfaces {
    fn default() -> Self {
        Self {
            primary: "xBIM-viewer".to_string(),
            secondary: "viewer2".to_string(),
        }
    }
}

/// Reference to one external viewer instance.
///
/// Clones refer to the same instance.
pub trait ViewerHandle: Clone {
    fn set_fov(&self, fov: f64);
    fn set_background(&self, rgba: [f64; 4]);
    fn set_hover_pick(&self, enabled: bool);

    fn set_gamma(&self, value: f64);
    fn set_contrast(&self, value: f64);
    fn set_brightness(&self, value: f64);

    fn set_navigation_mode(&self, mode: NavigationMode);
    fn set_camera_type(&self, camera: CameraType);

    /// Move the camera to a preset.
    fn show(&self, view: ViewType, animate: bool);
    fn zoom_to_selection(&self);
    /// Fit the camera to the whole model.
    fn zoom_to(&self);

    /// Remove any clipping applied through the clipping plane.
    fn unclip(&self);
    fn set_section_box(&self, planes: &[ClipPlane]);
    fn clear_section_box(&self);

    /// Start loading geometry. Completion is reported asynchronously.
    fn load(&self, url: &str);
    /// Start rendering.
    fn start(&self);

    /// Current camera transform, `None` while the viewer has no camera yet.
    fn camera_transform(&self) -> Option<CameraTransform>;
    fn set_camera_transform(&self, transform: &CameraTransform);
}

/// Loading-progress overlay.
pub trait Overlay {
    fn show(&self);
    fn hide(&self);
}

/// Plugin that can be paused and resumed.
pub trait Toggle {
    fn set_stopped(&self, stopped: bool);
}

/// Recurring per-frame task.
pub trait FrameLoop {
    /// Stop the task. Further calls are no-ops.
    fn cancel(&mut self);
    fn is_running(&self) -> bool;
}

/// Factory for viewer instances, plugins and frame loops.
pub trait ViewerBackend {
    type Viewer: ViewerHandle + 'static;
    type Overlay: Overlay;
    type Plugin: Toggle;
    type Frames: FrameLoop;

    /// Create a viewer bound to the surface with the given id.
    fn create_viewer(&mut self, surface_id: &str) -> Result<Self::Viewer>;

    fn add_overlay(&mut self, viewer: &Self::Viewer) -> Self::Overlay;
    fn add_clipping_plane(&mut self, viewer: &Self::Viewer) -> Self::Plugin;
    fn add_grid(&mut self, viewer: &Self::Viewer, style: &GridStyle) -> Self::Plugin;
    fn add_navigation_cube(&mut self, viewer: &Self::Viewer, style: &CubeStyle) -> Self::Plugin;

    /// Run `task` once per animation frame until the returned loop is cancelled.
    fn every_frame(&mut self, task: Box<dyn FnMut()>) -> Self::Frames;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_box_is_symmetric() {
        let planes = ClipPlane::default_box();
        for (pos, neg) in planes[..3].iter().zip(&planes[3..]) {
            for axis in 0..3 {
                assert_eq!(pos.direction[axis], -neg.direction[axis]);
                assert_eq!(pos.location[axis], -neg.location[axis]);
            }
        }
    }

    #[test]
    fn test_clip_plane_json_shape() {
        let json = serde_json::to_value(ClipPlane::default_box()[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"direction": [1.0, 0.0, 0.0], "location": [3000.0, 0.0, 0.0]})
        );
    }
}
