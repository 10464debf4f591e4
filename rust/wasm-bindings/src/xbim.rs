// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bindings to the `@xbim/viewer` JavaScript library.
//!
//! Only the surface used by the control panel is declared.

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "@xbim/viewer")]
extern "C" {
    /// WebGL viewer bound to one canvas.
    #[derive(Debug, Clone)]
    pub type Viewer;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(canvas_id: &str) -> Result<Viewer, JsValue>;

    #[wasm_bindgen(method, js_name = addPlugin)]
    pub fn add_plugin(this: &Viewer, plugin: &JsValue);

    #[wasm_bindgen(method)]
    pub fn load(this: &Viewer, model: &str);

    #[wasm_bindgen(method)]
    pub fn start(this: &Viewer);

    /// `show(type, id, model, withAnimation)`
    #[wasm_bindgen(method)]
    pub fn show(this: &Viewer, view_type: u8, id: JsValue, model: JsValue, with_animation: bool);

    #[wasm_bindgen(method, js_name = zoomToSelection)]
    pub fn zoom_to_selection(this: &Viewer);

    #[wasm_bindgen(method, js_name = zoomTo)]
    pub fn zoom_to(this: &Viewer);

    #[wasm_bindgen(method)]
    pub fn unclip(this: &Viewer);

    #[wasm_bindgen(method)]
    pub fn on(this: &Viewer, event: &str, callback: &Function);

    #[wasm_bindgen(method)]
    pub fn off(this: &Viewer, event: &str, callback: &Function);

    #[wasm_bindgen(method, setter)]
    pub fn set_gamma(this: &Viewer, value: f64);

    #[wasm_bindgen(method, setter)]
    pub fn set_contrast(this: &Viewer, value: f64);

    #[wasm_bindgen(method, setter)]
    pub fn set_brightness(this: &Viewer, value: f64);

    #[wasm_bindgen(method, setter, js_name = navigationMode)]
    pub fn set_navigation_mode(this: &Viewer, mode: &str);

    #[wasm_bindgen(method, setter)]
    pub fn set_camera(this: &Viewer, camera: u8);

    #[wasm_bindgen(method, setter)]
    pub fn set_background(this: &Viewer, rgba: &Array);

    #[wasm_bindgen(method, setter, js_name = hoverPickEnabled)]
    pub fn set_hover_pick_enabled(this: &Viewer, enabled: bool);

    #[wasm_bindgen(method, getter, js_name = cameraProperties)]
    pub fn camera_properties(this: &Viewer) -> CameraProperties;

    #[wasm_bindgen(method, getter, js_name = mvMatrix)]
    pub fn mv_matrix(this: &Viewer) -> JsValue;

    #[wasm_bindgen(method, setter, js_name = mvMatrix)]
    pub fn set_mv_matrix(this: &Viewer, matrix: &JsValue);

    #[wasm_bindgen(method, getter, js_name = sectionBox)]
    pub fn section_box(this: &Viewer) -> SectionBox;

    #[derive(Debug, Clone)]
    pub type CameraProperties;

    #[wasm_bindgen(method, setter)]
    pub fn set_fov(this: &CameraProperties, fov: f64);

    #[derive(Debug, Clone)]
    pub type SectionBox;

    #[wasm_bindgen(method, js_name = setToPlanes)]
    pub fn set_to_planes(this: &SectionBox, planes: &JsValue);

    #[wasm_bindgen(method)]
    pub fn clear(this: &SectionBox);

    /// Loading-progress overlay.
    #[derive(Debug, Clone)]
    pub type LoaderOverlay;

    #[wasm_bindgen(constructor)]
    pub fn new() -> LoaderOverlay;

    #[wasm_bindgen(method)]
    pub fn show(this: &LoaderOverlay);

    #[wasm_bindgen(method)]
    pub fn hide(this: &LoaderOverlay);

    #[derive(Debug, Clone)]
    pub type Grid;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Grid;

    #[wasm_bindgen(method, setter, js_name = zFactor)]
    pub fn set_z_factor(this: &Grid, value: f64);

    #[wasm_bindgen(method, setter)]
    pub fn set_colour(this: &Grid, rgba: &Array);

    #[wasm_bindgen(method, setter)]
    pub fn set_stopped(this: &Grid, stopped: bool);

    #[derive(Debug, Clone)]
    pub type NavigationCube;

    #[wasm_bindgen(constructor)]
    pub fn new() -> NavigationCube;

    #[wasm_bindgen(method, setter)]
    pub fn set_ratio(this: &NavigationCube, value: f64);

    #[wasm_bindgen(method, setter, js_name = passiveAlpha)]
    pub fn set_passive_alpha(this: &NavigationCube, value: f64);

    #[wasm_bindgen(method, setter, js_name = activeAlpha)]
    pub fn set_active_alpha(this: &NavigationCube, value: f64);

    #[wasm_bindgen(method, setter, js_name = minSize)]
    pub fn set_min_size(this: &NavigationCube, value: f64);

    #[wasm_bindgen(method, setter)]
    pub fn set_stopped(this: &NavigationCube, stopped: bool);

    #[derive(Debug, Clone)]
    pub type InteractiveClippingPlane;

    #[wasm_bindgen(constructor)]
    pub fn new() -> InteractiveClippingPlane;

    #[wasm_bindgen(method, setter)]
    pub fn set_stopped(this: &InteractiveClippingPlane, stopped: bool);
}

/// Convert an RGBA colour into a plain JS array.
pub fn rgba(values: [f64; 4]) -> Array {
    values.iter().map(|v| JsValue::from_f64(*v)).collect()
}
