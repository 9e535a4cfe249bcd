//! WebSocket read pump: forwards inbound frames as channel events.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use upwatch_protocol::constants::MAX_MESSAGE_SIZE;

use crate::types::{ChannelEvent, CloseReason};

/// Reads frames until the channel ends, then sends one
/// [`ChannelEvent::Closed`].
///
/// Oversized and binary frames are dropped. The pump also stops when
/// the event receiver has gone away.
pub(crate) async fn read_pump<S, T>(mut read: S, events: mpsc::Sender<T>, cancel: CancellationToken)
where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
    T: From<ChannelEvent>,
{
    let reason = loop {
        tokio::select! {
            _ = cancel.cancelled() => break CloseReason::Cancelled,

            msg = read.next() => {
                match msg {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        if text.len() > MAX_MESSAGE_SIZE {
                            warn!("message too large ({} bytes), dropping", text.len());
                            continue;
                        }
                        let event = ChannelEvent::Message(text.as_str().to_owned());
                        if events.send(event.into()).await.is_err() {
                            debug!("event receiver gone, stopping read pump");
                            break CloseReason::Cancelled;
                        }
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        debug!(?frame, "received close frame");
                        break CloseReason::ServerClosed;
                    }
                    Some(Ok(tungstenite::Message::Binary(data))) => {
                        debug!(len = data.len(), "ignoring binary frame");
                    }
                    Some(Ok(other)) => {
                        trace!(?other, "control frame");
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {e}");
                        break CloseReason::Error(e.to_string());
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break CloseReason::StreamEnded;
                    }
                }
            }
        }
    };

    let _ = events.send(ChannelEvent::Closed(reason).into()).await;
}
