//! Progress messages pushed by the server over the push channel.
//!
//! Inbound only; the client never writes to the channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Progress of one file: `[received, total]` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProgress(pub u64, pub u64);

impl FileProgress {
    pub fn received(&self) -> u64 {
        self.0
    }

    pub fn total(&self) -> u64 {
        self.1
    }
}

/// Progress of the whole request body: `[received, content_length]`.
///
/// The length is `null` when the request carried no usable
/// `Content-Length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalProgress(pub u64, pub Option<u64>);

impl TotalProgress {
    pub fn received(&self) -> u64 {
        self.0
    }

    pub fn length(&self) -> Option<u64> {
        self.1
    }
}

/// One push-channel message.
///
/// ```json
/// { "total": [4096, 8192], "files": { "x.txt": [2048, 2048] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub files: BTreeMap<String, FileProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalProgress>,
}

impl ProgressMessage {
    /// Decodes a text frame. Anything that is not the expected shape
    /// (missing `files`, non-integer or negative counts, wrong arity) fails.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
