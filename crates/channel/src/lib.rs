//! Push channel client.
//!
//! Opens the session-scoped WebSocket, reports [`ChannelEvent::Opened`]
//! before anything else, forwards every text frame as a
//! [`ChannelEvent::Message`] and reports exactly one
//! [`ChannelEvent::Closed`] when the channel ends for any reason. There
//! is no reconnection: a closed channel stays closed.

mod pumps;
pub mod types;
pub mod ws_client;

pub use types::{ChannelEvent, CloseReason};
pub use ws_client::{ChannelError, PushChannel};
