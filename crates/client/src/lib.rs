//! Upload session logic for the progress-reporting upload client.
//!
//! This crate owns everything between the user picking files and the
//! per-file progress shown next to them. It has no UI of its own: the
//! host provides a [`ProgressDisplay`] and, optionally, its own
//! [`Uploader`] and [`ChannelConnector`].
//!
//! # Flow
//!
//! 1. **Select**: snapshot the picked files, reset the progress store,
//!    render one entry per file
//! 2. **Submit**: post the files with the `filesize` manifest as the
//!    first form field, and open the push channel without waiting for
//!    the request
//! 3. **Stream**: apply each pushed `[received, total]` pair and
//!    re-render the entries that changed
//! 4. **Done**: every file finished, or the channel closed

pub mod connector;
pub mod controller;
pub mod display;
pub mod error;
pub mod selection;
pub mod session;
pub mod types;
pub mod uploader;

pub use connector::{ChannelConnector, WsConnector};
pub use controller::UploadController;
pub use display::ProgressDisplay;
pub use error::SessionError;
pub use selection::pick_paths;
pub use session::{SessionConfig, SessionEvent, UploadSession};
pub use types::{FormField, PickedFile, SessionState, SessionSummary, SubmitPlan, UploadRequest};
pub use uploader::{HttpUploader, Uploader};
