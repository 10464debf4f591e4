// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the upload bridge and viewer panel.

use thiserror::Error;

/// Result type for bimconv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when an upload is attempted without a selected file.
pub const NO_FILE_MESSAGE: &str = "Please select a file to upload.";

/// Message shown for every network or server failure during upload.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload and convert file. Please try again.";

pub const UPLOAD_IN_FLIGHT_MESSAGE: &str = "An upload is already in progress.";
pub const INVALID_CONFIG_MESSAGE: &str = "Invalid configuration.";
pub const VIEWER_FAILED_MESSAGE: &str = "Failed to display the converted model.";

/// Errors that can occur while uploading or driving the viewer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    UploadInFlight,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Conversion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed conversion response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Viewer error: {0}")]
    Viewer(String),
}

impl Error {
    /// Text for the single user-visible message line.
    ///
    /// Network and server failures collapse into one generic message; the
    /// cause only reaches the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::NoFileSelected => NO_FILE_MESSAGE,
            Error::Transport(_) | Error::Status { .. } | Error::MalformedResponse(_) => {
                UPLOAD_FAILED_MESSAGE
            }
            Error::UploadInFlight => UPLOAD_IN_FLIGHT_MESSAGE,
            Error::InvalidConfig(_) => INVALID_CONFIG_MESSAGE,
            Error::Viewer(_) => VIEWER_FAILED_MESSAGE,
        }
    }

    /// Whether the error is a user-input validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::NoFileSelected)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        assert_eq!(Error::NoFileSelected.user_message(), NO_FILE_MESSAGE);
        assert!(Error::NoFileSelected.is_validation());
    }

    #[test]
    fn test_network_failures_share_generic_message() {
        let errors = [
            Error::Transport("connection refused".into()),
            Error::Status {
                status: 500,
                body: "boom".into(),
            },
            Error::MalformedResponse("missing fileName".into()),
        ];
        for err in &errors {
            assert_eq!(err.user_message(), UPLOAD_FAILED_MESSAGE);
            assert!(!err.is_validation());
        }
    }

    #[test]
    fn test_non_upload_errors_have_own_messages() {
        assert_eq!(Error::UploadInFlight.user_message(), UPLOAD_IN_FLIGHT_MESSAGE);
        assert_eq!(
            Error::InvalidConfig("expected value".into()).user_message(),
            INVALID_CONFIG_MESSAGE
        );
        assert_eq!(
            Error::Viewer("no canvas viewer2".into()).user_message(),
            VIEWER_FAILED_MESSAGE
        );
        assert!(!Error::UploadInFlight.is_validation());
    }
}
