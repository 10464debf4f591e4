// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BimConv WebAssembly Front-End
//!
//! Upload form and xBIM viewer control panel built with wasm-bindgen.

use wasm_bindgen::prelude::*;

mod backend;
mod panel;
mod ui;
mod upload;
mod xbim;

pub use backend::{AnimationFrameLoop, XbimBackend, XbimOverlay, XbimPlugin, XbimViewer};
pub use panel::XbimViewerPanel;
pub use ui::{mount_app, FrontEnd};
pub use upload::UploadForm;

/// Route panics to the browser console
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    init_panic_hook();
}

/// Get the version of the front-end
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
