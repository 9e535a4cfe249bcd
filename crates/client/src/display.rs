//! The rendering capability the session drives.

/// Render sink for the file list.
///
/// The session calls this in selection order when files are picked and
/// once per changed entry while progress streams in. Implementations
/// only draw; they never feed back into the session.
pub trait ProgressDisplay {
    /// Adds a list entry for a newly selected file.
    fn render_entry(&mut self, name: &str, size_label: &str);

    /// Replaces the progress indicator text of an entry.
    fn update_progress(&mut self, name: &str, label: &str);

    /// Removes every entry.
    fn clear_all(&mut self);

    /// Shows whole-request progress. Optional.
    fn update_overall(&mut self, _label: &str) {}
}

impl<D: ProgressDisplay + ?Sized> ProgressDisplay for Box<D> {
    fn render_entry(&mut self, name: &str, size_label: &str) {
        (**self).render_entry(name, size_label);
    }

    fn update_progress(&mut self, name: &str, label: &str) {
        (**self).update_progress(name, label);
    }

    fn clear_all(&mut self) {
        (**self).clear_all();
    }

    fn update_overall(&mut self, label: &str) {
        (**self).update_overall(label);
    }
}

/// Records every call, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DisplayCall {
    Render(String, String),
    Progress(String, String),
    Clear,
    Overall(String),
}

#[cfg(test)]
impl RecordingDisplay {
    pub fn progress_calls(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Progress(name, label) => Some((name.clone(), label.clone())),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl ProgressDisplay for RecordingDisplay {
    fn render_entry(&mut self, name: &str, size_label: &str) {
        self.calls
            .push(DisplayCall::Render(name.into(), size_label.into()));
    }

    fn update_progress(&mut self, name: &str, label: &str) {
        self.calls
            .push(DisplayCall::Progress(name.into(), label.into()));
    }

    fn clear_all(&mut self) {
        self.calls.push(DisplayCall::Clear);
    }

    fn update_overall(&mut self, label: &str) {
        self.calls.push(DisplayCall::Overall(label.into()));
    }
}
