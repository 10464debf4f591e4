// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upload bridge to the conversion API.
//!
//! A selected IFC file is posted as `multipart/form-data` to the conversion
//! endpoint. The JSON answer names the converted artifact, from which the
//! retrieval URL is derived.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// File chosen by the user, held until the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Name of the converted artifact as returned by the server.
    pub artifact_name: String,
    /// Where the artifact can be fetched.
    pub retrieval_url: String,
}

/// Body returned by the conversion endpoint.
///
/// The artifact is named by `fileName`, or by `name` when `fileName` is
/// absent. Other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ConversionResponse {
    /// Non-empty artifact name, preferring `fileName`.
    pub fn artifact_name(self) -> Option<String> {
        [self.file_name, self.name]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
    }
}

/// Raw HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam of the bridge: posts one file as a multipart form.
#[allow(async_fn_in_trait)]
pub trait ConversionTransport {
    async fn send(&self, url: &str, file: &SelectedFile) -> Result<TransportResponse>;
}

/// `reqwest` transport, usable natively and on `wasm32`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversionTransport for ReqwestTransport {
    async fn send(&self, url: &str, file: &SelectedFile) -> Result<TransportResponse> {
        let part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        let form = Form::new().part(FILE_FIELD, part);

        let resp = self.http.post(url).multipart(form).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

/// Posts files to the conversion endpoint and derives retrieval URLs.
pub struct UploadBridge<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: ConversionTransport> UploadBridge<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload `file` for conversion.
    ///
    /// Fails with [`Error::NoFileSelected`] before touching the network when
    /// no file is given. Failures are not retried.
    pub async fn submit(&self, file: Option<&SelectedFile>) -> Result<UploadResult> {
        let Some(file) = file else {
            tracing::warn!("Upload requested without a selected file");
            return Err(Error::NoFileSelected);
        };

        let url = self.config.convert_url();
        tracing::info!(file = %file.name, size = file.len(), url = %url, "Uploading file for conversion");

        match self.convert(&url, file).await {
            Ok(result) => {
                tracing::info!(
                    artifact = %result.artifact_name,
                    url = %result.retrieval_url,
                    "Conversion finished"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, file = %file.name, "Error uploading file");
                Err(e)
            }
        }
    }

    async fn convert(&self, url: &str, file: &SelectedFile) -> Result<UploadResult> {
        let resp = self.transport.send(url, file).await?;

        if !resp.is_success() {
            return Err(Error::Status {
                status: resp.status,
                body: String::from_utf8_lossy(&resp.body).into_owned(),
            });
        }

        let body: ConversionResponse = serde_json::from_slice(&resp.body)?;
        let artifact_name = body
            .artifact_name()
            .ok_or_else(|| Error::MalformedResponse("missing fileName".into()))?;

        Ok(self.result_for(artifact_name))
    }

    /// Build the result for a known artifact name.
    pub fn result_for(&self, artifact_name: impl Into<String>) -> UploadResult {
        let artifact_name = artifact_name.into();
        UploadResult {
            retrieval_url: self.config.artifact_url(&artifact_name),
            artifact_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Transport answering with a canned response.
    struct CannedTransport {
        reply: RefCell<Option<Result<TransportResponse>>>,
        calls: Cell<u32>,
        last_url: RefCell<String>,
    }

    impl CannedTransport {
        fn new(reply: Result<TransportResponse>) -> Self {
            Self {
                reply: RefCell::new(Some(reply)),
                calls: Cell::new(0),
                last_url: RefCell::new(String::new()),
            }
        }

        fn json(status: u16, body: &str) -> Self {
            Self::new(Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }))
        }
    }

    impl ConversionTransport for CannedTransport {
        async fn send(&self, url: &str, _file: &SelectedFile) -> Result<TransportResponse> {
            self.calls.set(self.calls.get() + 1);
            *self.last_url.borrow_mut() = url.to_string();
            self.reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(Error::Transport("no reply left".into())))
        }
    }

    fn house() -> SelectedFile {
        SelectedFile::new("house.ifc", b"ISO-10303-21;".to_vec())
    }

    #[tokio::test]
    async fn test_no_file_skips_network() {
        let bridge = UploadBridge::new(ClientConfig::default(), CannedTransport::json(200, "{}"));
        let err = bridge.submit(None).await.unwrap_err();
        assert_eq!(err, Error::NoFileSelected);
        assert_eq!(bridge.transport.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_success_derives_retrieval_url() {
        let bridge = UploadBridge::new(
            ClientConfig::default(),
            CannedTransport::json(200, r#"{"fileName": "model.wexbim"}"#),
        );
        let result = bridge.submit(Some(&house())).await.unwrap();
        assert_eq!(result.artifact_name, "model.wexbim");
        assert_eq!(
            result.retrieval_url,
            format!("{}/files/model.wexbim", bridge.config().api_base)
        );
        assert_eq!(
            *bridge.transport.last_url.borrow(),
            "http://127.0.0.1:5084/api/bimconversion/convert"
        );
    }

    #[tokio::test]
    async fn test_name_alias_accepted() {
        let bridge = UploadBridge::new(
            ClientConfig::default(),
            CannedTransport::json(201, r#"{"name": "house.wexbim", "size": 12}"#),
        );
        let result = bridge.submit(Some(&house())).await.unwrap();
        assert_eq!(result.artifact_name, "house.wexbim");
    }

    #[tokio::test]
    async fn test_file_name_and_name_together() {
        let bridge = UploadBridge::new(
            ClientConfig::default(),
            CannedTransport::json(
                200,
                r#"{"fileName": "house.wexbim", "name": "house.ifc", "status": "done"}"#,
            ),
        );
        let result = bridge.submit(Some(&house())).await.unwrap();
        assert_eq!(result.artifact_name, "house.wexbim");
        assert!(result.retrieval_url.ends_with("/files/house.wexbim"));
    }

    #[test]
    fn test_artifact_name_preference() {
        let parse = |body: &str| {
            serde_json::from_str::<ConversionResponse>(body)
                .unwrap()
                .artifact_name()
        };
        assert_eq!(
            parse(r#"{"fileName": "a.wexbim", "name": "b.wexbim"}"#).as_deref(),
            Some("a.wexbim")
        );
        assert_eq!(
            parse(r#"{"fileName": "", "name": "b.wexbim"}"#).as_deref(),
            Some("b.wexbim")
        );
        assert_eq!(parse(r#"{"fileName": null}"#), None);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let bridge = UploadBridge::new(
            ClientConfig::default(),
            CannedTransport::json(500, "conversion crashed"),
        );
        let err = bridge.submit(Some(&house())).await.unwrap_err();
        assert_eq!(
            err,
            Error::Status {
                status: 500,
                body: "conversion crashed".into()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_bodies() {
        for body in ["not json", "{}", r#"{"fileName": ""}"#, r#"{"fileName": 3}"#] {
            let bridge = UploadBridge::new(ClientConfig::default(), CannedTransport::json(200, body));
            let err = bridge.submit(Some(&house())).await.unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "body {body:?} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let bridge = UploadBridge::new(
            ClientConfig::default(),
            CannedTransport::new(Err(Error::Transport("connection refused".into()))),
        );
        let err = bridge.submit(Some(&house())).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(bridge.transport.calls.get(), 1);
    }
}
