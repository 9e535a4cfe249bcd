//! WebSocket push channel client.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use upwatch_protocol::constants::MAX_MESSAGE_SIZE;

use crate::types::ChannelEvent;

/// Errors from the push channel client.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("invalid channel URL: {0}")]
    InvalidUrl(String),
}

/// Transport frame limit. Kept above [`MAX_MESSAGE_SIZE`] so an oversized
/// frame reaches the read pump and is dropped there instead of failing the
/// whole connection.
const TRANSPORT_FRAME_LIMIT: usize = MAX_MESSAGE_SIZE * 2;

/// An open push channel.
///
/// Events are delivered to the sender given to [`connect`](Self::connect)
/// until the channel closes. Dropping the handle closes the channel.
pub struct PushChannel {
    url: Url,
    cancel: CancellationToken,
    read_handle: tokio::task::JoinHandle<()>,
}

impl PushChannel {
    /// Connects to `url` and starts forwarding events into `events`.
    ///
    /// Returns once the WebSocket handshake completes, after
    /// [`ChannelEvent::Opened`] has been queued and before any message can
    /// be. Only `ws` and `wss` URLs are accepted.
    pub async fn connect<T>(url: &Url, events: mpsc::Sender<T>) -> Result<Self, ChannelError>
    where
        T: From<ChannelEvent> + Send + 'static,
    {
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ChannelError::InvalidUrl(url.to_string()));
        }

        let mut ws_config = tungstenite::protocol::WebSocketConfig::default();
        ws_config.max_message_size = Some(TRANSPORT_FRAME_LIMIT);
        ws_config.max_frame_size = Some(TRANSPORT_FRAME_LIMIT);
        let (ws_stream, _) =
            tokio_tungstenite::connect_async_with_config(url.as_str(), Some(ws_config), false)
                .await?;
        debug!(url = %url, "push channel connected");
        let _ = events.send(ChannelEvent::Opened.into()).await;

        let (mut write, read) = ws_stream.split();
        let cancel = CancellationToken::new();

        let read_handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                crate::pumps::read::read_pump(read, events, cancel).await;
                let _ = write.send(tungstenite::Message::Close(None)).await;
            })
        };

        Ok(Self {
            url: url.clone(),
            cancel,
            read_handle,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns `true` once the channel has stopped delivering events.
    pub fn is_closed(&self) -> bool {
        self.read_handle.is_finished()
    }

    /// Waits until the channel has stopped delivering events.
    pub async fn closed(&mut self) {
        let _ = (&mut self.read_handle).await;
    }

    /// Closes the channel. A final [`ChannelEvent::Closed`] is still
    /// delivered.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
