//! Push channel opening.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::warn;
use upwatch_channel::{ChannelEvent, CloseReason, PushChannel};
use url::Url;

use crate::error::SessionError;
use crate::session::SessionEvent;

/// Opens the push channel for a submitted session.
///
/// The returned future runs for the lifetime of the channel: it delivers
/// [`ChannelEvent::Opened`] once connected and before any message,
/// forwards every channel event, and always ends by delivering a `Closed`
/// event, including when the connection cannot be established.
pub trait ChannelConnector: Send + Sync {
    fn open(
        &self,
        url: Url,
        events: mpsc::Sender<SessionEvent>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// [`ChannelConnector`] over WebSocket.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl ChannelConnector for WsConnector {
    fn open(
        &self,
        url: Url,
        events: mpsc::Sender<SessionEvent>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            match PushChannel::connect(&url, events.clone()).await {
                Ok(mut channel) => channel.closed().await,
                Err(e) => {
                    let e = SessionError::from(e);
                    warn!(url = %url, error = %e, "push channel failed to open");
                    let _ = events
                        .send(ChannelEvent::Closed(CloseReason::Error(e.to_string())).into())
                        .await;
                }
            }
        })
    }
}
