// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BimConv Core
//!
//! Browser-independent half of the IFC to WEXBIM conversion front-end.
//!
//! ## Overview
//!
//! - **Upload bridge**: posts a selected IFC file as `multipart/form-data` to
//!   the conversion API and derives the retrieval URL of the converted
//!   artifact ([`UploadBridge`], [`UploadSession`])
//! - **Viewer control panel**: owns the render parameters and pushes them
//!   into an external 3D viewer through the [`ViewerBackend`] seam
//!   ([`ViewerPanel`])
//! - **Camera sync**: per-frame copy of the main camera into a
//!   picture-in-picture viewer, cancelled when the panel is torn down
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bimconv_core::{ClientConfig, ReqwestTransport, SelectedFile, UploadBridge, UploadSession};
//!
//! let bridge = UploadBridge::new(ClientConfig::default(), ReqwestTransport::new());
//! let mut session = UploadSession::new();
//! session.select_file(Some(SelectedFile::new("house.ifc", bytes)));
//!
//! match session.upload(&bridge).await {
//!     Ok(result) => println!("Converted: {}", result.retrieval_url),
//!     Err(_) => println!("{}", session.error().unwrap_or_default()),
//! }
//! ```

pub mod config;
pub mod controls;
pub mod error;
pub mod panel;
pub mod params;
pub mod session;
pub mod sync;
pub mod upload;
pub mod viewer;

pub use config::{ClientConfig, CubeStyle, GridStyle, ViewerConfig};
pub use controls::{Control, ControlGroup};
pub use error::{
    Error, Result, INVALID_CONFIG_MESSAGE, NO_FILE_MESSAGE, UPLOAD_FAILED_MESSAGE,
    UPLOAD_IN_FLIGHT_MESSAGE, VIEWER_FAILED_MESSAGE,
};
pub use panel::{MountedViewers, ViewerPanel};
pub use params::{
    parse_level, CameraType, Level, NavigationMode, ParamRange, RenderParameters, UnknownVariant,
    ViewType,
};
pub use session::UploadSession;
pub use sync::{CameraSync, SyncHandle};
pub use upload::{
    ConversionResponse, ConversionTransport, ReqwestTransport, SelectedFile, TransportResponse,
    UploadBridge, UploadResult, FILE_FIELD,
};
pub use viewer::{
    CameraTransform, ClipPlane, FrameLoop, Overlay, Surfaces, Toggle, ViewerBackend, ViewerHandle,
};
