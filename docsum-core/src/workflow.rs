//! The upload → summarize → present → export state machine.
//!
//! [`WorkflowController`] owns the single [`WorkflowState`] together with the
//! document or result that state holds, and exposes named actions that any
//! front end can bind to: [`select_file`], [`clear_file`], [`set_length`],
//! [`submit`], [`export`] and [`reset`].
//!
//! # Transitions
//!
//! ```text
//! Idle ──select──▶ FileReady ──submit──▶ Requesting ──ok──▶ Ready ──export──▶ Exporting
//!  ▲                │    ▲                   │                │ ▲                │
//!  └────clear───────┘    └──────failed───────┘                │ └──ok / failed───┘
//!  └─────────────────────────────reset────────────────────────┘
//! ```
//!
//! A failed action is reported as [`ActionOutcome::Failed`] and a notice, and
//! the state goes back to where the action started (FileReady or Ready), so the
//! user can retry without re-selecting the file.
//!
//! # Generations
//!
//! Requests cannot be cancelled. Instead every reset bumps a generation
//! counter and each in-flight request carries the generation it was issued
//! under. A completion from an older generation is dropped without touching
//! state or raising a notice.
//!
//! The network step runs outside the controller borrow: `begin_*` hands out a
//! ticket, the ticket's `dispatch` does the I/O, and `complete_*` applies the
//! outcome. [`submit`] and [`export`] run all three in one call.
//!
//! [`select_file`]: WorkflowController::select_file
//! [`clear_file`]: WorkflowController::clear_file
//! [`set_length`]: WorkflowController::set_length
//! [`submit`]: WorkflowController::submit
//! [`export`]: WorkflowController::export
//! [`reset`]: WorkflowController::reset

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::contract::{BinaryArtifact, DownloadSink, Exporter, SummaryLength, SummaryResult, Summarizer};
use crate::error::WorkflowError;
use crate::export::EXPORT_FILENAME;
use crate::selector::{Document, FileSource};

#[derive(Debug, Clone, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    FileReady { document: Arc<Document> },
    Requesting { document: Arc<Document> },
    Ready { result: Arc<SummaryResult> },
    Exporting { result: Arc<SummaryResult> },
}

/// Discriminant of [`WorkflowState`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileReady,
    Requesting,
    Ready,
    Exporting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::FileReady => "file ready",
            Phase::Requesting => "requesting",
            Phase::Ready => "ready",
            Phase::Exporting => "exporting",
        };
        f.write_str(name)
    }
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        match self {
            WorkflowState::Idle => Phase::Idle,
            WorkflowState::FileReady { .. } => Phase::FileReady,
            WorkflowState::Requesting { .. } => Phase::Requesting,
            WorkflowState::Ready { .. } => Phase::Ready,
            WorkflowState::Exporting { .. } => Phase::Exporting,
        }
    }

    /// The selected document, while one is held.
    pub fn document(&self) -> Option<&Document> {
        match self {
            WorkflowState::FileReady { document } | WorkflowState::Requesting { document } => {
                Some(document)
            }
            _ => None,
        }
    }

    /// The current summary, while one is held.
    pub fn result(&self) -> Option<&SummaryResult> {
        match self {
            WorkflowState::Ready { result } | WorkflowState::Exporting { result } => Some(result),
            _ => None,
        }
    }

    /// A network operation is in flight; other actions are disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Requesting { .. } | WorkflowState::Exporting { .. }
        )
    }
}

/// What an action did.
#[derive(Debug)]
pub enum ActionOutcome {
    /// The state changed as requested.
    Applied,
    /// Not allowed in the current state; nothing happened.
    Ignored,
    /// The response belonged to a superseded generation and was dropped.
    Discarded,
    /// An export finished and the file was saved here.
    Delivered(PathBuf),
    /// The action failed and the state went back to where it started.
    Failed(WorkflowError),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied | ActionOutcome::Delivered(_))
    }
}

/// A summary request that has left the controller.
#[derive(Debug)]
pub struct SummaryTicket {
    generation: u64,
    document: Arc<Document>,
    length: SummaryLength,
}

impl SummaryTicket {
    /// Perform the request. Does not touch the controller.
    pub async fn dispatch<S>(self, summarizer: &S) -> SummaryOutcome
    where
        S: Summarizer + ?Sized,
    {
        let result = summarizer.request_summary(&self.document, self.length).await;
        SummaryOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SummaryOutcome {
    generation: u64,
    result: Result<SummaryResult, WorkflowError>,
}

/// An export request that has left the controller.
#[derive(Debug)]
pub struct ExportTicket {
    generation: u64,
    result: Arc<SummaryResult>,
}

impl ExportTicket {
    pub async fn dispatch<E>(self, exporter: &E) -> ExportOutcome
    where
        E: Exporter + ?Sized,
    {
        let artifact = exporter.export_summary(&self.result.text).await;
        ExportOutcome {
            generation: self.generation,
            artifact,
        }
    }
}

#[derive(Debug)]
pub struct ExportOutcome {
    generation: u64,
    artifact: Result<BinaryArtifact, WorkflowError>,
}

pub struct WorkflowController<S: ?Sized, E: ?Sized, D: ?Sized> {
    summarizer: Arc<S>,
    exporter: Arc<E>,
    sink: Arc<D>,
    state: WorkflowState,
    length: SummaryLength,
    generation: u64,
    notice: Option<String>,
}

impl<S, E, D> WorkflowController<S, E, D>
where
    S: Summarizer + ?Sized,
    E: Exporter + ?Sized,
    D: DownloadSink + ?Sized,
{
    pub fn new(summarizer: Arc<S>, exporter: Arc<E>, sink: Arc<D>) -> Self {
        WorkflowController {
            summarizer,
            exporter,
            sink,
            state: WorkflowState::Idle,
            length: SummaryLength::default(),
            generation: 0,
            notice: None,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn length(&self) -> SummaryLength {
        self.length
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Message for the most recent failure, until the next accepted action.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn summarizer(&self) -> Arc<S> {
        Arc::clone(&self.summarizer)
    }

    pub fn exporter(&self) -> Arc<E> {
        Arc::clone(&self.exporter)
    }

    /// Take the first file of `source` as the current document.
    ///
    /// Replaces a selected file; while Ready the old result is discarded
    /// with a full reset first.
    pub fn select_file(&mut self, source: FileSource) -> ActionOutcome {
        if self.state.is_busy() {
            debug!(phase = %self.phase(), "select_file ignored while busy");
            return ActionOutcome::Ignored;
        }
        let Some(document) = source.into_first() else {
            debug!("select_file ignored: empty selection");
            return ActionOutcome::Ignored;
        };
        if matches!(self.state, WorkflowState::Ready { .. }) {
            self.reset();
        }

        info!(
            filename = %document.filename,
            size = document.size(),
            accepted_type = document.matches_accept_hint(),
            "File selected"
        );
        self.notice = None;
        self.state = WorkflowState::FileReady {
            document: Arc::new(document),
        };
        ActionOutcome::Applied
    }

    /// Drop the selected file and go back to Idle.
    pub fn clear_file(&mut self) -> ActionOutcome {
        match self.state {
            WorkflowState::FileReady { .. } => {
                info!("File cleared");
                self.notice = None;
                self.state = WorkflowState::Idle;
                ActionOutcome::Applied
            }
            _ => ActionOutcome::Ignored,
        }
    }

    /// Change the requested length; only before a request is made.
    pub fn set_length(&mut self, length: SummaryLength) -> ActionOutcome {
        match self.state {
            WorkflowState::Idle | WorkflowState::FileReady { .. } => {
                debug!(%length, "Summary length set");
                self.length = length;
                ActionOutcome::Applied
            }
            _ => {
                debug!(phase = %self.phase(), "set_length ignored");
                ActionOutcome::Ignored
            }
        }
    }

    /// Return to Idle from any state, abandoning whatever is in flight.
    pub fn reset(&mut self) -> ActionOutcome {
        self.generation += 1;
        info!(
            from = %self.phase(),
            generation = self.generation,
            "Workflow reset"
        );
        self.state = WorkflowState::Idle;
        self.length = SummaryLength::default();
        self.notice = None;
        ActionOutcome::Applied
    }

    /// FileReady → Requesting. `None` when there is nothing to submit.
    pub fn begin_submit(&mut self) -> Option<SummaryTicket> {
        let document = match &self.state {
            WorkflowState::FileReady { document } => Arc::clone(document),
            other => {
                debug!(phase = %other.phase(), "submit ignored: no file ready");
                return None;
            }
        };

        info!(
            filename = %document.filename,
            length = %self.length,
            generation = self.generation,
            "Submitting document"
        );
        self.notice = None;
        self.state = WorkflowState::Requesting {
            document: Arc::clone(&document),
        };
        Some(SummaryTicket {
            generation: self.generation,
            document,
            length: self.length,
        })
    }

    /// Apply a summary response: Ready on success, back to FileReady on failure.
    pub fn complete_submit(&mut self, outcome: SummaryOutcome) -> ActionOutcome {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding summary response from a superseded request"
            );
            return ActionOutcome::Discarded;
        }
        let document = match std::mem::take(&mut self.state) {
            WorkflowState::Requesting { document } => document,
            other => {
                warn!(phase = %other.phase(), "Summary response arrived with no request pending");
                self.state = other;
                return ActionOutcome::Discarded;
            }
        };

        match outcome.result {
            Ok(result) => {
                info!(generation = self.generation, "Summary ready");
                self.state = WorkflowState::Ready {
                    result: Arc::new(result),
                };
                ActionOutcome::Applied
            }
            Err(e) => {
                error!(error = %e, filename = %document.filename, "Summarization failed; file kept");
                self.state = WorkflowState::FileReady { document };
                self.notice = Some(e.to_string());
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Submit the selected file and wait for the answer.
    pub async fn submit(&mut self) -> ActionOutcome {
        let Some(ticket) = self.begin_submit() else {
            return ActionOutcome::Ignored;
        };
        let summarizer = Arc::clone(&self.summarizer);
        let outcome = ticket.dispatch(summarizer.as_ref()).await;
        self.complete_submit(outcome)
    }

    /// Ready → Exporting. `None` when there is no summary to export.
    pub fn begin_export(&mut self) -> Option<ExportTicket> {
        let result = match &self.state {
            WorkflowState::Ready { result } => Arc::clone(result),
            other => {
                debug!(phase = %other.phase(), "export ignored: no summary ready");
                return None;
            }
        };

        info!(generation = self.generation, "Exporting summary");
        self.notice = None;
        self.state = WorkflowState::Exporting {
            result: Arc::clone(&result),
        };
        Some(ExportTicket {
            generation: self.generation,
            result,
        })
    }

    /// Deliver an exported artifact and return to Ready, whatever happens.
    pub async fn complete_export(&mut self, outcome: ExportOutcome) -> ActionOutcome {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding export response from a superseded request"
            );
            return ActionOutcome::Discarded;
        }
        let result = match &self.state {
            WorkflowState::Exporting { result } => Arc::clone(result),
            other => {
                warn!(phase = %other.phase(), "Export response arrived with no export pending");
                return ActionOutcome::Discarded;
            }
        };

        let delivered = match outcome.artifact {
            Ok(artifact) => self
                .sink
                .deliver(EXPORT_FILENAME, &artifact)
                .await
                .map_err(WorkflowError::ExportFailed),
            Err(e) => Err(e),
        };

        self.state = WorkflowState::Ready { result };
        match delivered {
            Ok(path) => {
                info!(path = %path.display(), "Export delivered");
                ActionOutcome::Delivered(path)
            }
            Err(e) => {
                error!(error = %e, "Export failed; summary kept");
                self.notice = Some(e.to_string());
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Export the current summary and save it through the sink.
    pub async fn export(&mut self) -> ActionOutcome {
        let Some(ticket) = self.begin_export() else {
            return ActionOutcome::Ignored;
        };
        let exporter = Arc::clone(&self.exporter);
        let outcome = ticket.dispatch(exporter.as_ref()).await;
        self.complete_export(outcome).await
    }
}
