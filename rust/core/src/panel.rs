// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer control panel.
//!
//! Owns the render parameters and, once mounted, the viewer instances and
//! plugins they are pushed into. Every setter records the new value and
//! forwards it to the viewer if one exists; before mounting, setters only
//! record. Mounting replays the recorded parameters, so the last write wins.

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::params::{CameraType, Level, NavigationMode, RenderParameters, ViewType};
use crate::sync::{CameraSync, SyncHandle};
use crate::viewer::{Overlay, Surfaces, Toggle, ViewerBackend, ViewerHandle};

/// Everything created on mount.
pub struct MountedViewers<B: ViewerBackend> {
    pub primary: B::Viewer,
    pub secondary: B::Viewer,
    pub overlay: B::Overlay,
    pub clipping_plane: B::Plugin,
    pub grid: B::Plugin,
    pub cube: B::Plugin,
    sync: SyncHandle<B::Frames>,
    asset_url: String,
    generation: u64,
    loaded: bool,
}

impl<B: ViewerBackend> MountedViewers<B> {
    pub fn asset_url(&self) -> &str {
        &self.asset_url
    }

    /// Identifies this mount among all mounts of the panel.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_running()
    }
}

pub struct ViewerPanel<B: ViewerBackend> {
    config: ViewerConfig,
    params: RenderParameters,
    mounted: Option<MountedViewers<B>>,
    generation: u64,
}

impl<B: ViewerBackend> ViewerPanel<B> {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            params: RenderParameters::default(),
            mounted: None,
            generation: 0,
        }
    }

    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn mounted(&self) -> Option<&MountedViewers<B>> {
        self.mounted.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Create both viewers, register the plugins, start camera sync and
    /// begin loading `asset_url` into both viewers.
    ///
    /// A panel that is already mounted is torn down first. Returns the
    /// generation of the new mount, to be passed back to [`Self::on_loaded`].
    pub fn mount(&mut self, backend: &mut B, surfaces: &Surfaces, asset_url: &str) -> Result<u64> {
        self.unmount();
        self.generation += 1;

        let primary = backend.create_viewer(&surfaces.primary)?;
        let secondary = backend.create_viewer(&surfaces.secondary)?;

        let overlay = backend.add_overlay(&primary);
        overlay.show();

        primary.set_fov(self.config.fov);
        primary.set_background(self.config.background);
        primary.set_hover_pick(self.config.hover_pick);

        let clipping_plane = backend.add_clipping_plane(&primary);
        let grid = backend.add_grid(&primary, &self.config.grid);
        let cube = backend.add_navigation_cube(&primary, &self.config.cube);

        let mut camera_sync = CameraSync::new(primary.clone(), secondary.clone());
        let frames = backend.every_frame(Box::new(move || camera_sync.tick()));

        primary.load(asset_url);
        secondary.load(asset_url);

        tracing::info!(
            primary = %surfaces.primary,
            secondary = %surfaces.secondary,
            asset = %asset_url,
            generation = self.generation,
            "Viewer panel mounted"
        );

        self.mounted = Some(MountedViewers {
            primary,
            secondary,
            overlay,
            clipping_plane,
            grid,
            cube,
            sync: SyncHandle::new(frames),
            asset_url: asset_url.to_string(),
            generation: self.generation,
            loaded: false,
        });
        self.apply_all();
        Ok(self.generation)
    }

    /// Handle the "loaded" event of the primary viewer created by mount
    /// `generation`. Events from earlier mounts are ignored.
    pub fn on_loaded(&mut self, generation: u64) -> bool {
        let Some(m) = self.mounted.as_mut().filter(|m| m.generation == generation) else {
            tracing::debug!(generation, "Ignoring loaded event of a released viewer");
            return false;
        };
        m.primary.start();
        m.secondary.start();
        m.overlay.hide();
        m.primary.show(ViewType::Default, false);
        m.loaded = true;
        tracing::debug!(asset = %m.asset_url, generation, "Model loaded");
        true
    }

    /// Stop camera sync and release the viewers.
    pub fn unmount(&mut self) {
        if let Some(mut m) = self.mounted.take() {
            m.sync.cancel();
            tracing::info!(asset = %m.asset_url, "Viewer panel unmounted");
        }
    }

    fn apply_all(&self) {
        if let Some(m) = &self.mounted {
            let p = &self.params;
            m.primary.set_gamma(p.gamma);
            m.primary.set_contrast(p.contrast);
            m.primary.set_brightness(p.brightness);
            m.primary.set_navigation_mode(p.navigation_mode);
            m.primary.set_camera_type(p.camera_type);
            m.grid.set_stopped(p.grid_stopped);
            m.cube.set_stopped(p.cube_stopped);
        }
    }

    pub fn set_navigation_mode(&mut self, mode: NavigationMode) {
        self.params.navigation_mode = mode;
        if let Some(m) = &self.mounted {
            m.primary.set_navigation_mode(mode);
        }
    }

    pub fn set_camera_type(&mut self, camera: CameraType) {
        self.params.camera_type = camera;
        if let Some(m) = &self.mounted {
            m.primary.set_camera_type(camera);
        }
    }

    pub fn show(&self, view: ViewType) {
        if let Some(m) = &self.mounted {
            m.primary.show(view, true);
        }
    }

    pub fn zoom_to_selection(&self) {
        if let Some(m) = &self.mounted {
            m.primary.zoom_to_selection();
        }
    }

    pub fn set_grid_stopped(&mut self, stopped: bool) {
        self.params.grid_stopped = stopped;
        if let Some(m) = &self.mounted {
            m.grid.set_stopped(stopped);
        }
    }

    pub fn stop_grid(&mut self) {
        self.set_grid_stopped(true);
    }

    pub fn start_grid(&mut self) {
        self.set_grid_stopped(false);
    }

    pub fn set_cube_stopped(&mut self, stopped: bool) {
        self.params.cube_stopped = stopped;
        if let Some(m) = &self.mounted {
            m.cube.set_stopped(stopped);
        }
    }

    pub fn stop_cube(&mut self) {
        self.set_cube_stopped(true);
    }

    pub fn start_cube(&mut self) {
        self.set_cube_stopped(false);
    }

    /// Enable the interactive clipping plane.
    pub fn clip(&self) {
        if let Some(m) = &self.mounted {
            m.clipping_plane.set_stopped(false);
        }
    }

    /// Hide the clipping plane control, keeping the current cut.
    pub fn hide_clipping_control(&self) {
        if let Some(m) = &self.mounted {
            m.clipping_plane.set_stopped(true);
        }
    }

    /// Remove the cut and hide the control.
    pub fn unclip(&self) {
        if let Some(m) = &self.mounted {
            m.primary.unclip();
            m.clipping_plane.set_stopped(true);
        }
    }

    /// Clip to the configured box and fit the camera.
    pub fn clip_box(&self) {
        if let Some(m) = &self.mounted {
            m.primary.set_section_box(&self.config.clip_box);
            m.primary.zoom_to();
        }
    }

    pub fn release_clip_box(&self) {
        if let Some(m) = &self.mounted {
            m.primary.clear_section_box();
            m.primary.zoom_to();
        }
    }

    /// Set a post-processing level; the value is clamped into its range.
    pub fn set_level(&mut self, level: Level, value: f64) -> f64 {
        let value = self.params.set_level(level, value);
        self.push_level(level, value);
        value
    }

    /// Set a post-processing level from slider text.
    ///
    /// Text that is not a finite number leaves the level unchanged and is
    /// still re-applied, so the viewer never receives NaN.
    pub fn set_level_text(&mut self, level: Level, input: &str) -> f64 {
        let value = self.params.set_level_text(level, input);
        self.push_level(level, value);
        value
    }

    fn push_level(&self, level: Level, value: f64) {
        if let Some(m) = &self.mounted {
            match level {
                Level::Gamma => m.primary.set_gamma(value),
                Level::Contrast => m.primary.set_contrast(value),
                Level::Brightness => m.primary.set_brightness(value),
            }
        }
    }

    pub fn set_gamma(&mut self, value: f64) -> f64 {
        self.set_level(Level::Gamma, value)
    }

    pub fn set_contrast(&mut self, value: f64) -> f64 {
        self.set_level(Level::Contrast, value)
    }

    pub fn set_brightness(&mut self, value: f64) -> f64 {
        self.set_level(Level::Brightness, value)
    }
}

impl<B: ViewerBackend> Drop for ViewerPanel<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
