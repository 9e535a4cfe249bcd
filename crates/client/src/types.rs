//! Data types for the upload session.

use std::path::PathBuf;

use upwatch_protocol::SelectedFile;
use url::Url;

/// Where an upload session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected yet.
    Idle,
    /// Files picked and rendered, not submitted.
    Selecting,
    /// Request sent and channel opening; no progress received yet.
    Submitted,
    /// Progress messages are arriving.
    Streaming,
    /// Every file finished, or the channel closed.
    Done,
}

/// A picked file together with where its bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub file: SelectedFile,
    pub path: PathBuf,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            file: SelectedFile::new(name, size),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn size(&self) -> u64 {
        self.file.size
    }
}

/// One field of the multipart upload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        path: PathBuf,
        size: u64,
    },
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// The multipart POST issued on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: Url,
    /// Fields in body order; the `filesize` manifest is always first.
    pub fields: Vec<FormField>,
}

/// What a submit asks the session to do: send the request and open the
/// channel, concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPlan {
    pub request: UploadRequest,
    pub channel_url: Url,
    /// The serialized manifest that was attached.
    pub manifest: String,
}

/// Snapshot of a session, reported when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub state: SessionState,
    pub files: usize,
    pub finished: usize,
    /// HTTP status of the upload request, once known.
    pub upload_status: Option<u16>,
}

impl SessionSummary {
    /// Returns `true` when every selected file was reported finished.
    pub fn completed(&self) -> bool {
        self.files == self.finished
    }
}
