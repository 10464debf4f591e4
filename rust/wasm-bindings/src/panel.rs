// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the viewer control panel.

use crate::backend::XbimBackend;
use bimconv_core::{
    CameraType, Control, Level, NavigationMode, Surfaces, ViewType, ViewerConfig, ViewerPanel,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(crate) type SharedPanel = Rc<RefCell<ViewerPanel<XbimBackend>>>;

/// Panel state shared between the JS class and the DOM front-end.
pub(crate) struct PanelController {
    panel: SharedPanel,
    backend: XbimBackend,
    /// Forwards the current primary viewer's "loaded" event into the panel.
    on_loaded: Option<Closure<dyn FnMut()>>,
}

impl PanelController {
    pub(crate) fn new(config: ViewerConfig) -> Self {
        Self {
            panel: Rc::new(RefCell::new(ViewerPanel::new(config))),
            backend: XbimBackend,
            on_loaded: None,
        }
    }

    pub(crate) fn shared(&self) -> SharedPanel {
        self.panel.clone()
    }

    pub(crate) fn mount(&mut self, surfaces: &Surfaces, asset_url: &str) -> Result<(), JsValue> {
        self.unmount();

        let mut panel = self.panel.borrow_mut();
        let generation = panel
            .mount(&mut self.backend, surfaces, asset_url)
            .map_err(to_js_error)?;
        if let Some(mounted) = panel.mounted() {
            let listener = loaded_listener(Rc::downgrade(&self.panel), generation);
            mounted.primary.on("loaded", listener.as_ref().unchecked_ref());
            self.on_loaded = Some(listener);
        }
        Ok(())
    }

    /// Detach the "loaded" listener, stop camera sync and release the viewers.
    pub(crate) fn unmount(&mut self) {
        let mut panel = self.panel.borrow_mut();
        if let (Some(listener), Some(mounted)) = (self.on_loaded.take(), panel.mounted()) {
            mounted.primary.off("loaded", listener.as_ref().unchecked_ref());
        }
        panel.unmount();
    }
}

fn loaded_listener(
    panel: Weak<RefCell<ViewerPanel<XbimBackend>>>,
    generation: u64,
) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(panel) = panel.upgrade() else {
            return;
        };
        match panel.try_borrow_mut() {
            Ok(mut panel) => {
                panel.on_loaded(generation);
            }
            Err(_) => web_sys::console::warn_1(&"Viewer loaded during panel update".into()),
        };
    }) as Box<dyn FnMut()>)
}

pub(crate) fn to_js_error(err: bimconv_core::Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn unknown(err: bimconv_core::UnknownVariant) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Apply a slider value, given either as a number or as text.
pub(crate) fn set_level(panel: &SharedPanel, level: Level, value: &JsValue) -> f64 {
    let mut panel = panel.borrow_mut();
    match value.as_f64() {
        Some(number) => panel.set_level(level, number),
        None => panel.set_level_text(level, &value.as_string().unwrap_or_default()),
    }
}

/// Viewer control panel driving a main and a picture-in-picture xBIM viewer
///
/// Example:
/// ```javascript
/// const panel = new XbimViewerPanel();
/// panel.mount('xBIM-viewer', 'viewer2', upload.retrievalUrl);
/// panel.setNavigationMode('walk');
/// panel.setGamma(slider.value);
/// ```
#[wasm_bindgen]
pub struct XbimViewerPanel {
    controller: PanelController,
}

#[wasm_bindgen]
impl XbimViewerPanel {
    /// Create an unmounted panel. `config` is an optional viewer configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<XbimViewerPanel, JsValue> {
        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            controller: PanelController::new(config),
        })
    }

    /// Create both viewers on the given canvases and load `asset_url`.
    pub fn mount(&mut self, primary: &str, secondary: &str, asset_url: &str) -> Result<(), JsValue> {
        let surfaces = Surfaces {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        };
        self.controller.mount(&surfaces, asset_url)
    }

    /// Stop camera sync and release the viewers.
    pub fn dispose(&mut self) {
        self.controller.unmount();
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.controller.panel.borrow().is_mounted()
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.controller
            .panel
            .borrow()
            .mounted()
            .is_some_and(|m| m.is_loaded())
    }

    /// Current render parameters as a plain object.
    #[wasm_bindgen(getter)]
    pub fn params(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(
            self.controller.panel.borrow().params(),
        )?)
    }

    #[wasm_bindgen(js_name = setNavigationMode)]
    pub fn set_navigation_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: NavigationMode = mode.parse().map_err(unknown)?;
        self.apply(Control::Navigate(mode));
        Ok(())
    }

    #[wasm_bindgen(js_name = setCameraType)]
    pub fn set_camera_type(&self, camera: &str) -> Result<(), JsValue> {
        let camera: CameraType = camera.parse().map_err(unknown)?;
        self.apply(Control::Camera(camera));
        Ok(())
    }

    /// Move the camera to a named preset (`default`, `front`, `top`, ...).
    pub fn show(&self, view: &str) -> Result<(), JsValue> {
        let view: ViewType = view.parse().map_err(unknown)?;
        self.apply(Control::View(view));
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomToSelection)]
    pub fn zoom_to_selection(&self) {
        self.apply(Control::ZoomToSelection);
    }

    pub fn clip(&self) {
        self.apply(Control::Clip);
    }

    #[wasm_bindgen(js_name = hideClippingControl)]
    pub fn hide_clipping_control(&self) {
        self.apply(Control::HideClippingControl);
    }

    pub fn unclip(&self) {
        self.apply(Control::Unclip);
    }

    #[wasm_bindgen(js_name = clipBox)]
    pub fn clip_box(&self) {
        self.apply(Control::ClipBox);
    }

    #[wasm_bindgen(js_name = releaseClipBox)]
    pub fn release_clip_box(&self) {
        self.apply(Control::ReleaseClipBox);
    }

    #[wasm_bindgen(js_name = stopCube)]
    pub fn stop_cube(&self) {
        self.apply(Control::StopCube);
    }

    #[wasm_bindgen(js_name = startCube)]
    pub fn start_cube(&self) {
        self.apply(Control::StartCube);
    }

    #[wasm_bindgen(js_name = stopGrid)]
    pub fn stop_grid(&self) {
        self.apply(Control::StopGrid);
    }

    #[wasm_bindgen(js_name = startGrid)]
    pub fn start_grid(&self) {
        self.apply(Control::StartGrid);
    }

    /// Returns the gamma actually applied.
    #[wasm_bindgen(js_name = setGamma)]
    pub fn set_gamma(&self, value: JsValue) -> f64 {
        set_level(&self.controller.panel, Level::Gamma, &value)
    }

    #[wasm_bindgen(js_name = setContrast)]
    pub fn set_contrast(&self, value: JsValue) -> f64 {
        set_level(&self.controller.panel, Level::Contrast, &value)
    }

    #[wasm_bindgen(js_name = setBrightness)]
    pub fn set_brightness(&self, value: JsValue) -> f64 {
        set_level(&self.controller.panel, Level::Brightness, &value)
    }
}

impl XbimViewerPanel {
    fn apply(&self, control: Control) {
        let mut panel = self.controller.panel.borrow_mut();
        control.apply(&mut *panel);
    }
}
