//! Upload session state machine.
//!
//! `Idle → Selecting → Submitted → Streaming → Done`. The controller owns
//! the selection snapshot and the progress store and is the only thing
//! that calls into the [`ProgressDisplay`]. It performs no I/O itself:
//! [`submit`](UploadController::submit) returns a [`SubmitPlan`] that the
//! session carries out.

use tracing::{debug, info, warn};
use url::Url;

use upwatch_channel::CloseReason;
use upwatch_progress::{
    ProgressError, ProgressStore, format_size, overall_label, progress_label,
};
use upwatch_protocol::constants::{DEFAULT_FILE_FIELD, FILESIZE_FIELD};
use upwatch_protocol::{
    ChannelKind, FileManifest, ProgressMessage, session_channel_url, upload_action_url,
};

use crate::display::ProgressDisplay;
use crate::error::SessionError;
use crate::types::{
    FormField, PickedFile, SessionState, SessionSummary, SubmitPlan, UploadRequest,
};

/// Drives one page's upload session.
pub struct UploadController<D> {
    display: D,
    store: ProgressStore,
    snapshot: Vec<PickedFile>,
    state: SessionState,
    page: Url,
    session_id: String,
    channel_kind: ChannelKind,
    file_field: String,
    upload_status: Option<u16>,
}

impl<D: ProgressDisplay> UploadController<D> {
    /// Creates an idle controller for the page at `page`, scoped to
    /// `session_id`.
    pub fn new(page: Url, session_id: impl Into<String>, display: D) -> Self {
        Self {
            display,
            store: ProgressStore::new(),
            snapshot: Vec::new(),
            state: SessionState::Idle,
            page,
            session_id: session_id.into(),
            channel_kind: ChannelKind::default(),
            file_field: DEFAULT_FILE_FIELD.to_string(),
            upload_status: None,
        }
    }

    /// Sets the push channel transport.
    pub fn with_channel_kind(mut self, kind: ChannelKind) -> Self {
        self.channel_kind = kind;
        self
    }

    /// Sets the form field name the files are posted under.
    pub fn with_file_field(mut self, field: impl Into<String>) -> Self {
        self.file_field = field.into();
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn snapshot(&self) -> &[PickedFile] {
        &self.snapshot
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Handles a file selection. Allowed in every state.
    ///
    /// Replaces the snapshot and the store outright and renders one entry
    /// per file in selection order. A submission already in flight is not
    /// cancelled; its channel may keep reporting under the old names.
    pub fn select(&mut self, files: Vec<PickedFile>) {
        if matches!(self.state, SessionState::Submitted | SessionState::Streaming) {
            warn!(state = ?self.state, "re-selecting while a submission is in flight");
        }

        self.display.clear_all();
        let selected: Vec<_> = files.iter().map(|p| p.file.clone()).collect();
        self.store.reset(&selected);
        for file in &selected {
            self.display.render_entry(&file.name, &format_size(file.size));
        }

        debug!(files = files.len(), "files selected");
        self.snapshot = files;
        self.upload_status = None;
        self.state = SessionState::Selecting;
    }

    /// Handles the submit event.
    ///
    /// Builds the manifest from the current snapshot and returns the
    /// request to send (manifest first, then `extra_fields`, then the
    /// files) and the channel to open. Only valid while `Selecting`.
    pub fn submit(&mut self, extra_fields: Vec<FormField>) -> Result<SubmitPlan, SessionError> {
        if self.state != SessionState::Selecting {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: "submit",
            });
        }

        let manifest = FileManifest::build(self.snapshot.iter().map(|p| &p.file)).to_json()?;
        let channel_url = session_channel_url(&self.page, &self.session_id, self.channel_kind)?;

        let mut fields = Vec::with_capacity(1 + extra_fields.len() + self.snapshot.len());
        fields.push(FormField::text(FILESIZE_FIELD, manifest.clone()));
        fields.extend(
            extra_fields
                .into_iter()
                .filter(|f| f.name() != FILESIZE_FIELD),
        );
        fields.extend(self.snapshot.iter().map(|p| FormField::File {
            name: self.file_field.clone(),
            file_name: p.file.name.clone(),
            path: p.path.clone(),
            size: p.file.size,
        }));

        let request = UploadRequest {
            url: upload_action_url(&self.page, &self.session_id),
            fields,
        };

        info!(
            session = %self.session_id,
            files = self.snapshot.len(),
            channel = %channel_url,
            "upload submitted"
        );
        self.state = SessionState::Submitted;

        Ok(SubmitPlan {
            request,
            channel_url,
            manifest,
        })
    }

    /// Notes that the push channel connected.
    pub fn channel_opened(&mut self) {
        debug!(session = %self.session_id, state = ?self.state, "push channel open");
    }

    /// Handles one push-channel text frame.
    ///
    /// Returns the number of entries re-rendered. Fails with
    /// [`SessionError::MalformedMessage`] when the frame does not decode;
    /// the caller drops it and keeps the channel. Unknown names, stale
    /// and invalid pairs are skipped individually.
    pub fn handle_message(&mut self, text: &str) -> Result<usize, SessionError> {
        if self.state == SessionState::Idle {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: "handle a progress message",
            });
        }

        let message =
            ProgressMessage::parse(text).map_err(|e| SessionError::MalformedMessage(e.to_string()))?;

        if self.state == SessionState::Submitted {
            debug!("first progress message, streaming");
            self.state = SessionState::Streaming;
        }

        let mut rendered = 0;
        for (name, progress) in &message.files {
            let outcome = match self.store.apply(name, progress.received(), progress.total()) {
                Ok(outcome) => outcome,
                Err(ProgressError::UnknownFile(name)) => {
                    debug!(file = %name, "progress for unknown file, ignoring");
                    continue;
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "ignoring progress update");
                    continue;
                }
            };

            if outcome.stale {
                debug!(
                    file = %name,
                    received = progress.received(),
                    recorded = outcome.entry.received,
                    "stale progress update"
                );
            }
            if !outcome.changed {
                continue;
            }
            if let Some(label) = progress_label(&outcome.entry) {
                self.display.update_progress(name, &label);
                rendered += 1;
            }
        }

        if let Some(total) = message.total
            && self.store.apply_totals(total.received(), total.length())
        {
            self.display
                .update_overall(&overall_label(&self.store.totals()));
        }

        if self.state == SessionState::Streaming && self.store.all_finished() {
            info!(session = %self.session_id, files = self.store.len(), "all files finished");
            self.state = SessionState::Done;
        }

        Ok(rendered)
    }

    /// Handles the push channel ending. No reconnection is attempted;
    /// entries keep their last values.
    pub fn channel_closed(&mut self, reason: &CloseReason) {
        match self.state {
            SessionState::Submitted | SessionState::Streaming => {
                info!(session = %self.session_id, ?reason, "push channel closed");
                self.state = SessionState::Done;
            }
            state => {
                debug!(?state, ?reason, "push channel closed outside streaming");
            }
        }
    }

    /// Records the outcome of the upload request. The state machine does
    /// not depend on it.
    pub fn request_finished(&mut self, result: Result<u16, String>) {
        match result {
            Ok(status) => {
                debug!(status, "upload request finished");
                self.upload_status = Some(status);
            }
            Err(e) => warn!(error = %e, "upload request failed"),
        }
    }

    /// Returns `true` while a submission is waiting on channel progress.
    pub fn is_awaiting_progress(&self) -> bool {
        matches!(self.state, SessionState::Submitted | SessionState::Streaming)
    }

    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            state: self.state,
            files: self.store.len(),
            finished: self.store.finished_count(),
            upload_status: self.upload_status,
        }
    }
}
