//! Session error types.

use crate::types::SessionState;

/// Errors produced by an upload session.
///
/// None of these end the session on their own: the controller logs and
/// absorbs them, so a bad message only stops one entry from updating.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected with status {status}")]
    Upload { status: u16 },

    #[error("protocol error: {0}")]
    Protocol(#[from] upwatch_protocol::ProtocolError),

    #[error("channel error: {0}")]
    Channel(#[from] upwatch_channel::ChannelError),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("cannot {event} while {state:?}")]
    InvalidTransition {
        state: SessionState,
        event: &'static str,
    },
}
