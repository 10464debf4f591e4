// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser implementation of the viewer backend on top of `@xbim/viewer`.

use crate::xbim;
use bimconv_core::{
    CameraTransform, CameraType, ClipPlane, CubeStyle, Error, FrameLoop, GridStyle,
    NavigationMode, Overlay, Result, Toggle, ViewType, ViewerBackend, ViewerHandle,
};
use js_sys::{Float32Array, Function};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Handle to one xBIM viewer.
#[derive(Debug, Clone)]
pub struct XbimViewer {
    inner: xbim::Viewer,
}

impl XbimViewer {
    /// Subscribe to a viewer event.
    pub fn on(&self, event: &str, callback: &Function) {
        self.inner.on(event, callback);
    }

    pub fn off(&self, event: &str, callback: &Function) {
        self.inner.off(event, callback);
    }
}

impl ViewerHandle for XbimViewer {
    fn set_fov(&self, fov: f64) {
        self.inner.camera_properties().set_fov(fov);
    }

    fn set_background(&self, rgba: [f64; 4]) {
        self.inner.set_background(&xbim::rgba(rgba));
    }

    fn set_hover_pick(&self, enabled: bool) {
        self.inner.set_hover_pick_enabled(enabled);
    }

    fn set_gamma(&self, value: f64) {
        self.inner.set_gamma(value);
    }

    fn set_contrast(&self, value: f64) {
        self.inner.set_contrast(value);
    }

    fn set_brightness(&self, value: f64) {
        self.inner.set_brightness(value);
    }

    fn set_navigation_mode(&self, mode: NavigationMode) {
        self.inner.set_navigation_mode(mode.as_str());
    }

    fn set_camera_type(&self, camera: CameraType) {
        self.inner.set_camera(camera as u8);
    }

    fn show(&self, view: ViewType, animate: bool) {
        self.inner
            .show(view as u8, JsValue::UNDEFINED, JsValue::UNDEFINED, animate);
    }

    fn zoom_to_selection(&self) {
        self.inner.zoom_to_selection();
    }

    fn zoom_to(&self) {
        self.inner.zoom_to();
    }

    fn unclip(&self) {
        self.inner.unclip();
    }

    fn set_section_box(&self, planes: &[ClipPlane]) {
        match serde_wasm_bindgen::to_value(planes) {
            Ok(planes) => self.inner.section_box().set_to_planes(&planes),
            Err(e) => web_sys::console::warn_1(&format!("Invalid clip planes: {}", e).into()),
        }
    }

    fn clear_section_box(&self) {
        self.inner.section_box().clear();
    }

    fn load(&self, url: &str) {
        self.inner.load(url);
    }

    fn start(&self) {
        self.inner.start();
    }

    fn camera_transform(&self) -> Option<CameraTransform> {
        let matrix: Float32Array = self.inner.mv_matrix().dyn_into().ok()?;
        if matrix.length() != 16 {
            return None;
        }
        let mut transform = [0.0f32; 16];
        matrix.copy_to(&mut transform);
        Some(transform)
    }

    fn set_camera_transform(&self, transform: &CameraTransform) {
        let matrix = Float32Array::from(&transform[..]);
        self.inner.set_mv_matrix(&matrix);
    }
}

/// Loading overlay registered on a viewer.
pub struct XbimOverlay(xbim::LoaderOverlay);

impl Overlay for XbimOverlay {
    fn show(&self) {
        self.0.show();
    }

    fn hide(&self) {
        self.0.hide();
    }
}

/// Pausable plugins registered on a viewer.
pub enum XbimPlugin {
    ClippingPlane(xbim::InteractiveClippingPlane),
    Grid(xbim::Grid),
    Cube(xbim::NavigationCube),
}

impl Toggle for XbimPlugin {
    fn set_stopped(&self, stopped: bool) {
        match self {
            XbimPlugin::ClippingPlane(plane) => plane.set_stopped(stopped),
            XbimPlugin::Grid(grid) => grid.set_stopped(stopped),
            XbimPlugin::Cube(cube) => cube.set_stopped(stopped),
        }
    }
}

/// Creates xBIM viewers on canvases of the current document.
#[derive(Debug, Default)]
pub struct XbimBackend;

impl ViewerBackend for XbimBackend {
    type Viewer = XbimViewer;
    type Overlay = XbimOverlay;
    type Plugin = XbimPlugin;
    type Frames = AnimationFrameLoop;

    fn create_viewer(&mut self, surface_id: &str) -> Result<XbimViewer> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::Viewer("No document available".into()))?;
        if document.get_element_by_id(surface_id).is_none() {
            return Err(Error::Viewer(format!("No canvas with id '{}'", surface_id)));
        }

        let inner = xbim::Viewer::new(surface_id)
            .map_err(|e| Error::Viewer(format!("Failed to create viewer: {:?}", e)))?;
        Ok(XbimViewer { inner })
    }

    fn add_overlay(&mut self, viewer: &XbimViewer) -> XbimOverlay {
        let overlay = xbim::LoaderOverlay::new();
        viewer.inner.add_plugin(&overlay);
        XbimOverlay(overlay)
    }

    fn add_clipping_plane(&mut self, viewer: &XbimViewer) -> XbimPlugin {
        let plane = xbim::InteractiveClippingPlane::new();
        viewer.inner.add_plugin(&plane);
        XbimPlugin::ClippingPlane(plane)
    }

    fn add_grid(&mut self, viewer: &XbimViewer, style: &GridStyle) -> XbimPlugin {
        let grid = xbim::Grid::new();
        grid.set_z_factor(style.z_factor);
        grid.set_colour(&xbim::rgba(style.colour));
        viewer.inner.add_plugin(&grid);
        XbimPlugin::Grid(grid)
    }

    fn add_navigation_cube(&mut self, viewer: &XbimViewer, style: &CubeStyle) -> XbimPlugin {
        let cube = xbim::NavigationCube::new();
        cube.set_ratio(style.ratio);
        cube.set_passive_alpha(style.passive_alpha);
        cube.set_active_alpha(style.active_alpha);
        cube.set_min_size(style.min_size);
        viewer.inner.add_plugin(&cube);
        XbimPlugin::Cube(cube)
    }

    fn every_frame(&mut self, task: Box<dyn FnMut()>) -> AnimationFrameLoop {
        AnimationFrameLoop::start(task)
    }
}

struct FrameState {
    running: Cell<bool>,
    request_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameState {
    fn request(&self) {
        let Some(window) = web_sys::window() else {
            self.running.set(false);
            return;
        };
        if let Some(callback) = self.callback.borrow().as_ref() {
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.request_id.set(Some(id)),
                Err(e) => {
                    web_sys::console::warn_2(&"requestAnimationFrame failed:".into(), &e);
                    self.running.set(false);
                }
            }
        }
    }
}

/// `requestAnimationFrame` loop that re-arms itself until cancelled.
///
/// The callback only holds a weak reference to the loop state, so dropping
/// the loop releases the closure.
pub struct AnimationFrameLoop {
    state: Rc<FrameState>,
}

impl AnimationFrameLoop {
    pub fn start(mut task: Box<dyn FnMut()>) -> Self {
        let state = Rc::new(FrameState {
            running: Cell::new(true),
            request_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak: Weak<FrameState> = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.request_id.set(None);
            if !state.running.get() {
                return;
            }
            task();
            if state.running.get() {
                state.request();
            }
        }) as Box<dyn FnMut()>);

        *state.callback.borrow_mut() = Some(callback);
        state.request();
        Self { state }
    }
}

impl FrameLoop for AnimationFrameLoop {
    fn cancel(&mut self) {
        self.state.running.set(false);
        if let (Some(id), Some(window)) = (self.state.request_id.take(), web_sys::window()) {
            if let Err(e) = window.cancel_animation_frame(id) {
                web_sys::console::warn_2(&"cancelAnimationFrame failed:".into(), &e);
            }
        }
    }

    fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

impl Drop for AnimationFrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
