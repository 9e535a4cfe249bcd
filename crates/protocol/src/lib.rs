//! Wire types shared by the upload client and the progress server.
//!
//! Covers the three things both sides must agree on: the `filesize`
//! manifest posted with the upload, the address of the push channel,
//! and the shape of the progress messages pushed over it.

pub mod channel_url;
pub mod constants;
pub mod manifest;
pub mod messages;
pub mod types;

pub use channel_url::{ChannelKind, parse_page_url, session_channel_url, upload_action_url};
pub use manifest::{FileManifest, build_manifest};
pub use messages::{FileProgress, ProgressMessage, TotalProgress};
pub use types::SelectedFile;

/// Errors produced by the protocol crate.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
