use crate::size::format_size;
use crate::store::{EntryState, ProgressEntry, SessionTotals};

/// Label shown once a file is fully received.
pub const FINISHED_LABEL: &str = "Finished";

/// Returns `received / total` as a percentage rounded half-up, or `None`
/// for a zero total.
pub fn percent(received: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let (received, total) = (u128::from(received), u128::from(total));
    Some(((received * 200 + total) / (total * 2)) as u64)
}

/// Progress indicator text for an entry: `"Finished"`, `"<n>%"`, or
/// `None` while there is nothing to show.
pub fn progress_label(entry: &ProgressEntry) -> Option<String> {
    match entry.state {
        EntryState::Selected => None,
        EntryState::Finished => Some(FINISHED_LABEL.to_string()),
        EntryState::InProgress => percent(entry.received, entry.total).map(|p| format!("{p}%")),
    }
}

/// Whole-request label, e.g. `"50% (1 MiB / 2 MiB)"` or `"3 KiB received"`
/// when the request length is unknown.
pub fn overall_label(totals: &SessionTotals) -> String {
    match totals.length.and_then(|len| percent(totals.received.min(len), len).map(|p| (p, len))) {
        Some((p, len)) => format!(
            "{p}% ({} / {})",
            format_size(totals.received.min(len)),
            format_size(len)
        ),
        None => format!("{} received", format_size(totals.received)),
    }
}
