// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOM front-end: upload form plus, after a successful conversion, the two
//! viewer canvases and the control panel.

use crate::panel::{set_level, PanelController, SharedPanel};
use crate::upload::{read_file, UploadForm};
use bimconv_core::{Control, Level, ParamRange, Surfaces};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
};

type Listener = Closure<dyn FnMut(Event)>;

const PRIMARY_SIZE: (u32, u32) = (1400, 900);

fn element<T: JsCast>(document: &Document, tag: &str) -> Result<T, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{}> has an unexpected type", tag)))
}

fn button(document: &Document, label: &str) -> Result<HtmlButtonElement, JsValue> {
    let button: HtmlButtonElement = element(document, "button")?;
    button.set_text_content(Some(label));
    Ok(button)
}

struct AppState {
    document: Document,
    form: UploadForm,
    controller: RefCell<PanelController>,
    surfaces: Surfaces,
    input: HtmlInputElement,
    upload_button: HtmlButtonElement,
    error_line: HtmlElement,
    result: HtmlElement,
    form_listeners: RefCell<Vec<Listener>>,
    /// Listeners of the viewer section, replaced on every render.
    panel_listeners: RefCell<Vec<Listener>>,
}

impl AppState {
    fn render_error(&self) {
        self.error_line
            .set_text_content(self.form.error().as_deref());
    }

    fn render_result(&self) -> Result<(), JsValue> {
        let (Some(name), Some(asset)) = (self.form.artifact_name(), self.form.view_asset()) else {
            return Ok(());
        };

        self.result.set_inner_html("");
        self.panel_listeners.borrow_mut().clear();

        let heading: HtmlElement = element(&self.document, "h3")?;
        heading.set_text_content(Some("Converted WEXBIM File: "));
        let name_line: HtmlElement = element(&self.document, "span")?;
        name_line.set_text_content(Some(&name));
        self.result.append_child(&heading)?;
        self.result.append_child(&name_line)?;

        let panel = self.controller.borrow().shared();
        let wrapper = self.viewer_layout(&panel)?;
        self.result.append_child(&wrapper)?;

        self.controller.borrow_mut().mount(&self.surfaces, &asset)
    }

    fn viewer_layout(&self, panel: &SharedPanel) -> Result<Element, JsValue> {
        let document = &self.document;
        let wrapper: HtmlElement = element(document, "div")?;
        wrapper.set_class_name("ViewerWrapper");

        let primary: HtmlCanvasElement = element(document, "canvas")?;
        primary.set_id(&self.surfaces.primary);
        primary.set_width(PRIMARY_SIZE.0);
        primary.set_height(PRIMARY_SIZE.1);
        wrapper.append_child(&primary)?;

        let inset: HtmlElement = element(document, "div")?;
        let style = inset.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("bottom", "0")?;
        style.set_property("width", "400px")?;
        style.set_property("height", "200px")?;
        let secondary: HtmlCanvasElement = element(document, "canvas")?;
        secondary.set_id(&self.surfaces.secondary);
        inset.append_child(&secondary)?;
        wrapper.append_child(&inset)?;

        let right: HtmlElement = element(document, "div")?;
        right.set_class_name("right-panel");
        for group in Control::groups() {
            let row: HtmlElement = element(document, "div")?;
            if let Some(title) = group.title {
                let caption: HtmlElement = element(document, "div")?;
                caption.set_text_content(Some(title));
                row.append_child(&caption)?;
            }
            for control in group.controls {
                let btn = button(document, control.label())?;
                let panel = panel.clone();
                let listener = Closure::wrap(Box::new(move |_event: Event| {
                    let mut panel = panel.borrow_mut();
                    control.apply(&mut *panel);
                }) as Box<dyn FnMut(Event)>);
                btn.set_onclick(Some(listener.as_ref().unchecked_ref()));
                self.panel_listeners.borrow_mut().push(listener);
                row.append_child(&btn)?;
            }
            right.append_child(&row)?;
        }
        let sliders: HtmlElement = self.sliders(panel)?;
        right.append_child(&sliders)?;
        wrapper.append_child(&right)?;

        Ok(wrapper.into())
    }

    fn sliders(&self, panel: &SharedPanel) -> Result<HtmlElement, JsValue> {
        let row: HtmlElement = element(&self.document, "div")?;
        let current = *panel.borrow().params();

        for (level, label, name) in [
            (Level::Gamma, "Gamma:", "gamma"),
            (Level::Contrast, "Contrast:", "contrast"),
            (Level::Brightness, "Brightness:", "brightness"),
        ] {
            let ParamRange { min, max, step } = level.range();
            let caption: HtmlElement = element(&self.document, "span")?;
            caption.set_text_content(Some(label));

            let slider: HtmlInputElement = element(&self.document, "input")?;
            slider.set_type("range");
            slider.set_name(name);
            slider.set_min(&min.to_string());
            slider.set_max(&max.to_string());
            slider.set_step(&step.to_string());
            slider.set_value(&current.level(level).to_string());

            let panel = panel.clone();
            let listener = Closure::wrap(Box::new(move |event: Event| {
                let value = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                set_level(&panel, level, &JsValue::from_str(&value));
            }) as Box<dyn FnMut(Event)>);
            slider.set_oninput(Some(listener.as_ref().unchecked_ref()));
            self.panel_listeners.borrow_mut().push(listener);

            row.append_child(&caption)?;
            row.append_child(&slider)?;
        }
        Ok(row)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.input.set_onchange(None);
        self.upload_button.set_onclick(None);
        self.result.set_inner_html("");
    }
}

fn on_file_change(weak: Weak<AppState>) -> Listener {
    Closure::wrap(Box::new(move |event: Event| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let file = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));

        spawn_local(async move {
            let selected = match &file {
                Some(file) => match read_file(file).await {
                    Ok(selected) => Some(selected),
                    Err(e) => {
                        web_sys::console::error_2(&"Failed to read file:".into(), &e);
                        None
                    }
                },
                None => None,
            };
            state.form.session().borrow_mut().select_file(selected);
            state.render_error();
        });
    }) as Box<dyn FnMut(Event)>)
}

fn on_upload_click(weak: Weak<AppState>) -> Listener {
    Closure::wrap(Box::new(move |_event: Event| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        spawn_local(async move {
            state.upload_button.set_disabled(true);
            let outcome = JsFuture::from(state.form.upload()).await;
            state.upload_button.set_disabled(false);
            state.render_error();
            if outcome.is_ok() {
                if let Err(e) = state.render_result() {
                    web_sys::console::error_2(&"Failed to show viewer:".into(), &e);
                }
            }
        });
    }) as Box<dyn FnMut(Event)>)
}

/// Running front-end. Dropping it detaches every handler.
#[wasm_bindgen]
pub struct FrontEnd {
    state: Rc<AppState>,
}

#[wasm_bindgen]
impl FrontEnd {
    /// Tear down the viewers and stop camera sync.
    pub fn dispose(&self) {
        self.state.controller.borrow_mut().unmount();
    }
}

/// Build the upload form inside the element `root_id`.
///
/// Example:
/// ```javascript
/// import init, { mountApp } from 'bimconv-wasm';
/// await init();
/// const app = mountApp('root', { apiBase: 'http://127.0.0.1:5084/api/bimconversion' });
/// ```
#[wasm_bindgen(js_name = mountApp)]
pub fn mount_app(root_id: &str, config: JsValue) -> Result<FrontEnd, JsValue> {
    let form = UploadForm::new(config)?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", root_id)))?;

    let heading: HtmlElement = element(&document, "h2")?;
    heading.set_text_content(Some("Upload IFC File to Convert to WEXBIM"));

    let input: HtmlInputElement = element(&document, "input")?;
    input.set_type("file");
    input.set_accept(".ifc");

    let upload_button = button(&document, "Upload and Convert")?;

    let error_line: HtmlElement = element(&document, "p")?;
    error_line.style().set_property("color", "red")?;

    let result: HtmlElement = element(&document, "div")?;

    root.append_child(&heading)?;
    root.append_child(&input)?;
    root.append_child(&upload_button)?;
    root.append_child(&error_line)?;
    root.append_child(&result)?;

    let controller = PanelController::new(form.config().viewer.clone());
    let state = Rc::new(AppState {
        document,
        form,
        controller: RefCell::new(controller),
        surfaces: Surfaces::default(),
        input,
        upload_button,
        error_line,
        result,
        form_listeners: RefCell::new(Vec::new()),
        panel_listeners: RefCell::new(Vec::new()),
    });

    let on_change = on_file_change(Rc::downgrade(&state));
    state
        .input
        .set_onchange(Some(on_change.as_ref().unchecked_ref()));
    let on_click = on_upload_click(Rc::downgrade(&state));
    state
        .upload_button
        .set_onclick(Some(on_click.as_ref().unchecked_ref()));
    state
        .form_listeners
        .borrow_mut()
        .extend([on_change, on_click]);

    Ok(FrontEnd { state })
}
