// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the upload form.

use bimconv_core::{ClientConfig, ReqwestTransport, SelectedFile, UploadBridge, UploadSession};
use js_sys::{Promise, Uint8Array};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Read a browser file into a [`SelectedFile`].
pub(crate) async fn read_file(file: &web_sys::File) -> Result<SelectedFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(SelectedFile::new(file.name(), bytes))
}

/// Upload form state: selected file, last conversion, error message
///
/// Example:
/// ```javascript
/// const form = new UploadForm();
/// await form.selectFile(input.files[0]);
/// try {
///   const { artifactName, retrievalUrl } = await form.upload();
/// } catch (message) {
///   errorLine.textContent = form.error;
/// }
/// ```
#[wasm_bindgen]
pub struct UploadForm {
    session: Rc<RefCell<UploadSession>>,
    bridge: Rc<UploadBridge<ReqwestTransport>>,
}

#[wasm_bindgen]
impl UploadForm {
    /// Create a form. `config` is an optional client configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<UploadForm, JsValue> {
        let config: ClientConfig = if config.is_undefined() || config.is_null() {
            ClientConfig::default()
        } else {
            let json = js_sys::JSON::stringify(&config)?
                .as_string()
                .unwrap_or_default();
            ClientConfig::from_json(&json).map_err(crate::panel::to_js_error)?
        };
        Ok(Self::with_config(config))
    }

    /// Select a file (or clear the selection with `undefined`). Resolves
    /// once the file content has been read.
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file: Option<web_sys::File>) -> Promise {
        let session = self.session.clone();
        Promise::new(&mut |resolve, reject| {
            let session = session.clone();
            let file = file.clone();
            spawn_local(async move {
                let selected = match &file {
                    Some(file) => match read_file(file).await {
                        Ok(selected) => Some(selected),
                        Err(e) => {
                            let _ = reject.call1(&JsValue::NULL, &e);
                            return;
                        }
                    },
                    None => None,
                };
                session.borrow_mut().select_file(selected);
                if let Err(e) = resolve.call0(&JsValue::NULL) {
                    let _ = reject.call1(&JsValue::NULL, &e);
                }
            });
        })
    }

    /// Upload the selected file. Resolves with `{ artifactName, retrievalUrl }`,
    /// rejects with the user-facing message. Rejected without a request while
    /// another upload is in flight.
    pub fn upload(&self) -> Promise {
        let session = self.session.clone();
        let bridge = self.bridge.clone();
        Promise::new(&mut |resolve, reject| {
            let session = session.clone();
            let bridge = bridge.clone();
            spawn_local(async move {
                let begun = session.borrow_mut().begin();
                let file = match begun {
                    Ok(file) => file,
                    Err(e) => {
                        if !e.is_validation() {
                            web_sys::console::warn_1(&format!("Upload not started: {}", e).into());
                        }
                        let _ = reject.call1(&JsValue::NULL, &e.user_message().into());
                        return;
                    }
                };

                let outcome = bridge.submit(Some(&file)).await;
                session.borrow_mut().record(&outcome);

                match outcome {
                    Ok(result) => match serde_wasm_bindgen::to_value(&result) {
                        Ok(value) => {
                            let _ = resolve.call1(&JsValue::NULL, &value);
                        }
                        Err(e) => {
                            let _ = reject.call1(&JsValue::NULL, &e.into());
                        }
                    },
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Error uploading file: {}", e).into(),
                        );
                        let _ = reject.call1(&JsValue::NULL, &e.user_message().into());
                    }
                }
            });
        })
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.session.borrow().error().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = artifactName)]
    pub fn artifact_name(&self) -> Option<String> {
        self.session
            .borrow()
            .result()
            .map(|r| r.artifact_name.clone())
    }

    #[wasm_bindgen(getter, js_name = retrievalUrl)]
    pub fn retrieval_url(&self) -> Option<String> {
        self.session
            .borrow()
            .result()
            .map(|r| r.retrieval_url.clone())
    }

    /// Asset the viewer should load, per configuration.
    #[wasm_bindgen(getter, js_name = viewAsset)]
    pub fn view_asset(&self) -> Option<String> {
        self.session
            .borrow()
            .view_asset(&self.bridge.config().viewer)
    }

    #[wasm_bindgen(getter, js_name = isUploading)]
    pub fn is_uploading(&self) -> bool {
        self.session.borrow().is_in_flight()
    }
}

impl UploadForm {
    pub(crate) fn with_config(config: ClientConfig) -> Self {
        Self {
            session: Rc::new(RefCell::new(UploadSession::new())),
            bridge: Rc::new(UploadBridge::new(config, ReqwestTransport::new())),
        }
    }

    pub(crate) fn session(&self) -> Rc<RefCell<UploadSession>> {
        self.session.clone()
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        self.bridge.config()
    }
}
