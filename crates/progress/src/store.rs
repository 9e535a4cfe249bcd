use std::collections::HashMap;

use tracing::trace;
use upwatch_protocol::SelectedFile;

use crate::ProgressError;

/// Lifecycle of one file's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// Picked by the user; no progress reported yet.
    Selected,
    /// The server reported some, but not all, of the file.
    InProgress,
    /// `received == total` with a nonzero total.
    Finished,
}

/// Progress record for one selected file.
///
/// Invariant: `received <= total`, and `state == Finished` iff
/// `received == total` once a nonzero total has been reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    pub name: String,
    pub total: u64,
    pub received: u64,
    pub state: EntryState,
}

impl ProgressEntry {
    fn selected(file: &SelectedFile) -> Self {
        Self {
            name: file.name.clone(),
            total: file.size,
            received: 0,
            state: EntryState::Selected,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == EntryState::Finished
    }
}

/// Result of [`ProgressStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// The entry after the update.
    pub entry: ProgressEntry,
    /// Whether anything observable (received, total or state) changed.
    pub changed: bool,
    /// The update reported fewer bytes than already recorded.
    pub stale: bool,
}

/// Whole-request byte counts reported alongside the per-file progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTotals {
    pub received: u64,
    pub length: Option<u64>,
}

/// Maps file name → progress for the current selection.
///
/// Owned by a single upload session; all mutation goes through
/// [`reset`](Self::reset) and [`apply`](Self::apply).
#[derive(Debug, Default)]
pub struct ProgressStore {
    entries: HashMap<String, ProgressEntry>,
    totals: SessionTotals,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry with a fresh `Selected` entry per file.
    ///
    /// Duplicate names collapse into one entry, the later file winning.
    pub fn reset(&mut self, files: &[SelectedFile]) {
        self.entries.clear();
        self.totals = SessionTotals::default();
        for file in files {
            self.entries
                .insert(file.name.clone(), ProgressEntry::selected(file));
        }
    }

    /// Applies one `[received, total]` report for `name`.
    ///
    /// - Unknown names fail with [`ProgressError::UnknownFile`].
    /// - `received > total` fails with [`ProgressError::InvalidUpdate`].
    /// - A zero total leaves the entry untouched: the file is not
    ///   progressing yet and there is nothing to show.
    /// - `received` never decreases. A stale report still updates the
    ///   total, unless the new total is below the bytes already recorded,
    ///   in which case the report is ignored entirely.
    pub fn apply(
        &mut self,
        name: &str,
        received: u64,
        total: u64,
    ) -> Result<ApplyOutcome, ProgressError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ProgressError::UnknownFile(name.to_string()))?;

        if received > total {
            return Err(ProgressError::InvalidUpdate {
                name: name.to_string(),
                received,
                total,
            });
        }

        let stale = received < entry.received;
        if total == 0 || total < entry.received {
            return Ok(ApplyOutcome {
                entry: entry.clone(),
                changed: false,
                stale,
            });
        }

        let before = entry.clone();
        entry.total = total;
        if !stale {
            entry.received = received;
        }
        entry.state = if entry.received == entry.total {
            EntryState::Finished
        } else {
            EntryState::InProgress
        };

        let changed = *entry != before;
        if changed {
            trace!(file = %name, received = entry.received, total = entry.total, state = ?entry.state, "progress updated");
        }

        Ok(ApplyOutcome {
            entry: entry.clone(),
            changed,
            stale,
        })
    }

    /// Records the whole-request byte counts. Returns whether they changed.
    ///
    /// The received count is monotonic like the per-file one.
    pub fn apply_totals(&mut self, received: u64, length: Option<u64>) -> bool {
        let next = SessionTotals {
            received: received.max(self.totals.received),
            length: length.or(self.totals.length),
        };
        let changed = next != self.totals;
        self.totals = next;
        changed
    }

    pub fn get(&self, name: &str) -> Option<&ProgressEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProgressEntry> {
        self.entries.values()
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finished_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_finished()).count()
    }

    /// Returns `true` when every entry is finished (vacuously for an
    /// empty store).
    pub fn all_finished(&self) -> bool {
        self.entries.values().all(ProgressEntry::is_finished)
    }
}
