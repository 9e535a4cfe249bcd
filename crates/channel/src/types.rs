//! Events reported by the push channel.

/// Why the push channel ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server sent a close frame.
    ServerClosed,
    /// The underlying stream ended without a close frame.
    StreamEnded,
    /// A transport error ended the channel.
    Error(String),
    /// The client closed the channel.
    Cancelled,
}

/// Something that happened on the push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The handshake completed. Always the first event of a channel.
    Opened,
    /// A text frame, undecoded.
    Message(String),
    /// The channel is gone; no further messages will arrive.
    Closed(CloseReason),
}
