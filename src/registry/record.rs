//! # Camera records and their validation invariants.
//!
//! A [`CameraRecord`] describes how to reach one camera: a human-readable
//! name, a protocol-specific [`Endpoint`], and optional [`Credentials`].
//! Records are validated at registration time and again by
//! [`ConnectionSupervisor::start`](crate::ConnectionSupervisor::start), so a
//! malformed record loaded from disk is still rejected before any
//! connection state is created.
//!
//! ## Invariants
//! - `name` is non-empty;
//! - RTSP endpoints carry a URL starting with `rtsp://`;
//! - HTTP endpoints carry a non-empty host (the port is bounded by `u16`);
//! - local-file endpoints carry a non-empty path;
//! - credentials are only meaningful for RTSP/HTTP.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned to a camera at registration. Unique, never reused.
pub type CameraId = u32;

/// Username/password pair for RTSP/HTTP endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Protocol-specific connection target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum Endpoint {
    /// RTSP stream reachable at `url` (must start with `rtsp://`).
    Rtsp { url: String },
    /// HTTP camera at `host:port`.
    Http { host: String, port: u16 },
    /// Pre-recorded file on the local filesystem.
    LocalFile { path: PathBuf },
}

impl Endpoint {
    /// Short protocol label for logs.
    pub fn protocol(&self) -> &'static str {
        match self {
            Endpoint::Rtsp { .. } => "rtsp",
            Endpoint::Http { .. } => "http",
            Endpoint::LocalFile { .. } => "local_file",
        }
    }
}

/// Configuration for a single camera, owned by the
/// [`CameraRegistry`](crate::CameraRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Display name, required.
    pub name: String,
    /// Where the stream lives.
    #[serde(flatten)]
    pub endpoint: Endpoint,
    /// Optional credentials (RTSP/HTTP only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl CameraRecord {
    /// Creates a record without credentials.
    pub fn new(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
            credentials: None,
        }
    }

    /// Attaches credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Checks the record against the registration invariants.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::MissingName);
        }
        match &self.endpoint {
            Endpoint::Rtsp { url } => {
                let rest = url.strip_prefix("rtsp://").unwrap_or("");
                if rest.is_empty() {
                    return Err(RecordError::InvalidRtspUrl);
                }
            }
            Endpoint::Http { host, .. } => {
                if host.trim().is_empty() {
                    return Err(RecordError::MissingHost);
                }
            }
            Endpoint::LocalFile { path } => {
                if path.as_os_str().is_empty() {
                    return Err(RecordError::EmptyPath);
                }
                if self.credentials.is_some() {
                    return Err(RecordError::CredentialsNotAllowed);
                }
            }
        }
        Ok(())
    }
}

/// Validation failures for a [`CameraRecord`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Camera name is empty or whitespace.
    #[error("camera name is required")]
    MissingName,

    /// RTSP URL does not start with `rtsp://` or has nothing after it.
    #[error("invalid RTSP URL (expected rtsp://...)")]
    InvalidRtspUrl,

    /// HTTP endpoint without a host.
    #[error("host is required for HTTP cameras")]
    MissingHost,

    /// Local-file endpoint with an empty path.
    #[error("file path is required for local-file cameras")]
    EmptyPath,

    /// Credentials supplied for a local-file endpoint.
    #[error("credentials are not applicable to local-file cameras")]
    CredentialsNotAllowed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rtsp(url: &str) -> CameraRecord {
        CameraRecord::new("gate", Endpoint::Rtsp { url: url.into() })
    }

    #[test]
    fn valid_rtsp_record_passes() {
        assert_eq!(rtsp("rtsp://10.0.0.2/stream1").validate(), Ok(()));
    }

    #[test]
    fn empty_name_rejected() {
        let mut rec = rtsp("rtsp://10.0.0.2/stream1");
        rec.name = "  ".into();
        assert_eq!(rec.validate(), Err(RecordError::MissingName));
    }

    #[test]
    fn rtsp_url_must_have_scheme_and_body() {
        assert_eq!(rtsp("http://10.0.0.2").validate(), Err(RecordError::InvalidRtspUrl));
        assert_eq!(rtsp("rtsp://").validate(), Err(RecordError::InvalidRtspUrl));
    }

    #[test]
    fn http_requires_host() {
        let rec = CameraRecord::new(
            "lobby",
            Endpoint::Http {
                host: "".into(),
                port: 8080,
            },
        );
        assert_eq!(rec.validate(), Err(RecordError::MissingHost));
    }

    #[test]
    fn local_file_requires_path_and_forbids_credentials() {
        let empty = CameraRecord::new(
            "clip",
            Endpoint::LocalFile {
                path: PathBuf::new(),
            },
        );
        assert_eq!(empty.validate(), Err(RecordError::EmptyPath));

        let with_creds = CameraRecord::new(
            "clip",
            Endpoint::LocalFile {
                path: "/srv/video/clip.mp4".into(),
            },
        )
        .with_credentials("admin", "admin");
        assert_eq!(with_creds.validate(), Err(RecordError::CredentialsNotAllowed));
    }
}
