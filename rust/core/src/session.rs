// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State of the upload form.
//!
//! Three independent cells: the selected file, the last successful result
//! and the error message. A failed upload only touches the error message.

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::upload::{ConversionTransport, SelectedFile, UploadBridge, UploadResult};

#[derive(Debug, Default)]
pub struct UploadSession {
    selected: Option<SelectedFile>,
    result: Option<UploadResult>,
    error: Option<String>,
    in_flight: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection and clear the error message.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        if let Some(file) = &file {
            tracing::debug!(file = %file.name, size = file.len(), "File selected");
        }
        self.selected = file;
        self.error = None;
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&UploadResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start an upload: hand out the selection, or record the validation error.
    ///
    /// Refused while another upload is in flight; the state is left as is.
    pub fn begin(&mut self) -> Result<SelectedFile> {
        if self.in_flight {
            tracing::debug!("Upload already in progress");
            return Err(Error::UploadInFlight);
        }
        match &self.selected {
            Some(file) => {
                self.in_flight = true;
                Ok(file.clone())
            }
            None => {
                let err = Error::NoFileSelected;
                self.error = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }

    /// Apply the outcome of an upload.
    pub fn record(&mut self, outcome: &Result<UploadResult>) {
        self.in_flight = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    /// Run a complete upload against `bridge`.
    pub async fn upload<T: ConversionTransport>(
        &mut self,
        bridge: &UploadBridge<T>,
    ) -> Result<UploadResult> {
        let file = self.begin()?;
        let outcome = bridge.submit(Some(&file)).await;
        self.record(&outcome);
        outcome
    }

    /// Asset the viewer should load, once a conversion has succeeded.
    pub fn view_asset(&self, viewer: &ViewerConfig) -> Option<String> {
        self.result.as_ref().map(|result| {
            if viewer.load_uploaded_artifact {
                result.retrieval_url.clone()
            } else {
                viewer.sample_asset.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NO_FILE_MESSAGE, UPLOAD_FAILED_MESSAGE};

    fn result(name: &str) -> UploadResult {
        UploadResult {
            artifact_name: name.to_string(),
            retrieval_url: format!("http://localhost/files/{name}"),
        }
    }

    #[test]
    fn test_begin_without_file() {
        let mut session = UploadSession::new();
        assert_eq!(session.begin(), Err(Error::NoFileSelected));
        assert_eq!(session.error(), Some(NO_FILE_MESSAGE));
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_selecting_clears_error() {
        let mut session = UploadSession::new();
        let _ = session.begin();
        session.select_file(Some(SelectedFile::new("a.ifc", vec![1u8])));
        assert_eq!(session.error(), None);
        assert!(session.begin().is_ok());
        assert!(session.is_in_flight());
    }

    #[test]
    fn test_begin_refused_while_in_flight() {
        let mut session = UploadSession::new();
        session.select_file(Some(SelectedFile::new("a.ifc", vec![1u8])));
        assert!(session.begin().is_ok());
        assert_eq!(session.begin(), Err(Error::UploadInFlight));
        assert_eq!(session.error(), None);
        assert!(session.is_in_flight());

        session.record(&Ok(result("a.wexbim")));
        assert!(!session.is_in_flight());
        assert!(session.begin().is_ok());
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let mut session = UploadSession::new();
        session.record(&Ok(result("first.wexbim")));
        session.record(&Err(Error::Transport("reset".into())));
        assert_eq!(session.error(), Some(UPLOAD_FAILED_MESSAGE));
        assert_eq!(session.result(), Some(&result("first.wexbim")));

        session.record(&Ok(result("second.wexbim")));
        assert_eq!(session.error(), None);
        assert_eq!(session.result().unwrap().artifact_name, "second.wexbim");
    }

    #[test]
    fn test_view_asset() {
        let mut session = UploadSession::new();
        let mut viewer = ViewerConfig::default();
        assert_eq!(session.view_asset(&viewer), None);

        session.record(&Ok(result("house.wexbim")));
        assert_eq!(
            session.view_asset(&viewer).as_deref(),
            Some("http://localhost/files/house.wexbim")
        );

        viewer.load_uploaded_artifact = false;
        assert_eq!(session.view_asset(&viewer).as_deref(), Some("/SampleHouse.wexbim"));
    }
}
