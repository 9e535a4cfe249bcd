//! Client-side upload progress: the per-file progress store and the
//! size and percentage labels shown next to each file.

mod label;
mod size;
mod store;

pub use label::{FINISHED_LABEL, overall_label, percent, progress_label};
pub use size::{format_size, try_format_size};
pub use store::{ApplyOutcome, EntryState, ProgressEntry, ProgressStore, SessionTotals};

/// Errors produced by the progress crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown file: {0}")]
    UnknownFile(String),

    #[error("invalid update for {name}: received {received} > total {total}")]
    InvalidUpdate {
        name: String,
        received: u64,
        total: u64,
    },
}
