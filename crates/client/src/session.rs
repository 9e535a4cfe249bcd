//! Async driver for an [`UploadController`].
//!
//! All session input (user actions, channel frames, request completion)
//! arrives as [`SessionEvent`]s on one queue and is applied in order by
//! [`UploadSession::run`], so the controller is only ever touched from
//! that loop. The upload request and the push channel run as separate
//! tasks and report back through the same queue; nothing assumes which
//! of the two finishes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use upwatch_channel::ChannelEvent;

use crate::connector::ChannelConnector;
use crate::controller::UploadController;
use crate::display::ProgressDisplay;
use crate::error::SessionError;
use crate::types::{FormField, PickedFile, SessionSummary, SubmitPlan};
use crate::uploader::Uploader;

/// Default time to keep listening for progress after the upload request
/// finished while files are still unfinished.
const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Input to an upload session.
#[derive(Debug)]
pub enum SessionEvent {
    /// The user picked files.
    Select(Vec<PickedFile>),
    /// The user submitted; carries the form's other fields.
    Submit(Vec<FormField>),
    /// Something happened on the push channel.
    Channel(ChannelEvent),
    /// The upload request completed with a status, or failed.
    RequestFinished(Result<u16, String>),
    /// Stop the session loop.
    Shutdown,
}

impl From<ChannelEvent> for SessionEvent {
    fn from(event: ChannelEvent) -> Self {
        SessionEvent::Channel(event)
    }
}

/// Session loop settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait for further progress once the upload request has
    /// finished but the session is not done.
    pub drain_timeout: Duration,
    /// Capacity of the event queue.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            event_buffer: 256,
        }
    }
}

/// One page's upload session: a controller plus the tasks it spawned.
pub struct UploadSession<D> {
    controller: UploadController<D>,
    uploader: Arc<dyn Uploader>,
    connector: Arc<dyn ChannelConnector>,
    config: SessionConfig,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
    requests_in_flight: usize,
}

impl<D: ProgressDisplay> UploadSession<D> {
    pub fn new(
        controller: UploadController<D>,
        uploader: Arc<dyn Uploader>,
        connector: Arc<dyn ChannelConnector>,
        config: SessionConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer.max(1));
        Self {
            controller,
            uploader,
            connector,
            config,
            events_tx,
            events_rx,
            tasks: Vec::new(),
            requests_in_flight: 0,
        }
    }

    /// Returns a sender for feeding events into the session.
    pub fn sender(&self) -> mpsc::Sender<SessionEvent> {
        self.events_tx.clone()
    }

    pub fn controller(&self) -> &UploadController<D> {
        &self.controller
    }

    /// Processes events until the session is done and no upload request
    /// is outstanding, a [`SessionEvent::Shutdown`] arrives, or progress
    /// stops arriving after the request finished.
    pub async fn run(&mut self) -> SessionSummary {
        let mut drain_deadline: Option<Instant> = None;

        loop {
            if self.controller.is_done() && self.requests_in_flight == 0 {
                break;
            }

            let event = tokio::select! {
                event = self.events_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                () = wait_until(drain_deadline) => {
                    info!(state = ?self.controller.state(), "no further progress after upload finished");
                    break;
                }
            };

            match event {
                SessionEvent::Select(files) => {
                    drain_deadline = None;
                    self.controller.select(files);
                }
                SessionEvent::Submit(fields) => {
                    drain_deadline = None;
                    match self.controller.submit(fields) {
                        Ok(plan) => self.launch(plan),
                        Err(e) => warn!(error = %e, "submit ignored"),
                    }
                }
                SessionEvent::Channel(ChannelEvent::Opened) => self.controller.channel_opened(),
                SessionEvent::Channel(ChannelEvent::Message(text)) => {
                    match self.controller.handle_message(&text) {
                        Ok(rendered) => trace!(rendered, "progress message applied"),
                        Err(SessionError::MalformedMessage(e)) => {
                            warn!(error = %e, "dropping malformed progress message");
                        }
                        Err(e) => debug!(error = %e, "progress message ignored"),
                    }
                    if drain_deadline.is_some() {
                        drain_deadline = Some(Instant::now() + self.config.drain_timeout);
                    }
                }
                SessionEvent::Channel(ChannelEvent::Closed(reason)) => {
                    self.controller.channel_closed(&reason);
                }
                SessionEvent::RequestFinished(result) => {
                    self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                    self.controller.request_finished(result);
                    if self.controller.is_awaiting_progress() && self.requests_in_flight == 0 {
                        drain_deadline = Some(Instant::now() + self.config.drain_timeout);
                    }
                }
                SessionEvent::Shutdown => break,
            }
        }

        let summary = self.controller.summary();
        info!(
            state = ?summary.state,
            files = summary.files,
            finished = summary.finished,
            "upload session ended"
        );
        summary
    }

    /// Starts the upload request and opens the push channel, without
    /// waiting for either.
    fn launch(&mut self, plan: SubmitPlan) {
        let SubmitPlan {
            request,
            channel_url,
            ..
        } = plan;

        self.requests_in_flight += 1;
        let uploader = Arc::clone(&self.uploader);
        let tx = self.events_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            let result = uploader.submit(request).await.map_err(|e| e.to_string());
            let _ = tx.send(SessionEvent::RequestFinished(result)).await;
        }));

        let connector = Arc::clone(&self.connector);
        let tx = self.events_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            connector.open(channel_url, tx).await;
        }));
    }
}

impl<D> Drop for UploadSession<D> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
