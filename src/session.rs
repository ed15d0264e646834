//! One user's verification flow.
//!
//! ```text
//! Idle -> LookingUp -> NotFound | LookupFailed | Found
//! Found -> Rendering -> RenderReady
//! RenderReady -> Exporting -> ExportReady | ExportFailed
//! ```
//!
//! Every step is split into `begin_*`, which moves into the in-flight state and
//! hands out a [`Ticket`], and `finish_*`, which applies the result. Starting a
//! new lookup bumps the attempt counter, so a result that arrives for an older
//! attempt is dropped instead of overwriting the current one.

use crate::lookup::{LookupError, LookupOutcome, RecordStore, lookup, normalize_identifier};
use crate::renderer::CertificateRenderer;
use certforge_raster::RenderedCertificate;
use certforge_render_lopdf::{DocumentExporter, ExportFailure, ExportedDocument};
use certforge_types::CertificateRecord;
use std::sync::Arc;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Certificate not found. Please check the ID and try again.";
pub const LOOKUP_FAILED_MESSAGE: &str = "An error occurred while verifying the certificate.";
pub const EXPORT_FAILED_MESSAGE: &str =
    "Could not generate the certificate document. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Lookup(#[from] LookupError),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("A {0} is already in progress")]
    Busy(&'static str),
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    LookingUp {
        display_id: String,
    },
    NotFound {
        display_id: String,
    },
    LookupFailed {
        display_id: String,
        error: LookupError,
    },
    Found {
        record: CertificateRecord,
    },
    Rendering {
        record: CertificateRecord,
    },
    RenderReady {
        record: CertificateRecord,
        rendered: Arc<RenderedCertificate>,
    },
    Exporting {
        record: CertificateRecord,
        rendered: Arc<RenderedCertificate>,
    },
    ExportReady {
        record: CertificateRecord,
        rendered: Arc<RenderedCertificate>,
        document: Arc<ExportedDocument>,
    },
    ExportFailed {
        record: CertificateRecord,
        rendered: Arc<RenderedCertificate>,
        error: String,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::LookingUp { .. } => "looking up",
            SessionState::NotFound { .. } => "not found",
            SessionState::LookupFailed { .. } => "lookup failed",
            SessionState::Found { .. } => "found",
            SessionState::Rendering { .. } => "rendering",
            SessionState::RenderReady { .. } => "render ready",
            SessionState::Exporting { .. } => "exporting",
            SessionState::ExportReady { .. } => "export ready",
            SessionState::ExportFailed { .. } => "export failed",
        }
    }

    pub fn record(&self) -> Option<&CertificateRecord> {
        match self {
            SessionState::Found { record }
            | SessionState::Rendering { record }
            | SessionState::RenderReady { record, .. }
            | SessionState::Exporting { record, .. }
            | SessionState::ExportReady { record, .. }
            | SessionState::ExportFailed { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn rendered(&self) -> Option<&Arc<RenderedCertificate>> {
        match self {
            SessionState::RenderReady { rendered, .. }
            | SessionState::Exporting { rendered, .. }
            | SessionState::ExportReady { rendered, .. }
            | SessionState::ExportFailed { rendered, .. } => Some(rendered),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&Arc<ExportedDocument>> {
        match self {
            SessionState::ExportReady { document, .. } => Some(document),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Lookup,
    Render,
    Export,
}

/// Proof that a `begin_*` call started the work being finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    attempt: u64,
    step: Step,
}

impl Ticket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

#[derive(Debug)]
pub struct VerificationSession {
    state: SessionState,
    attempt: u64,
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            attempt: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of lookups started so far.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// True while a lookup, render or export is in flight. Controls that
    /// trigger those steps should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SessionState::LookingUp { .. }
                | SessionState::Rendering { .. }
                | SessionState::Exporting { .. }
        )
    }

    /// The message to show the user for the current state, if any.
    pub fn user_message(&self) -> Option<&'static str> {
        match self.state {
            SessionState::NotFound { .. } => Some(NOT_FOUND_MESSAGE),
            SessionState::LookupFailed { .. } => Some(LOOKUP_FAILED_MESSAGE),
            SessionState::ExportFailed { .. } => Some(EXPORT_FAILED_MESSAGE),
            _ => None,
        }
    }

    /// Starts a new attempt, discarding any previous record, render or export.
    /// Returns the normalised display ID to look up.
    pub fn begin_lookup(&mut self, input: &str) -> Result<(Ticket, String), SessionError> {
        if matches!(self.state, SessionState::LookingUp { .. }) {
            return Err(SessionError::Busy("lookup"));
        }
        let display_id = normalize_identifier(input)?;

        self.attempt += 1;
        self.state = SessionState::LookingUp {
            display_id: display_id.clone(),
        };
        Ok((self.ticket(Step::Lookup), display_id))
    }

    /// Applies a lookup result. Returns `false` if the ticket is stale.
    pub fn finish_lookup(
        &mut self,
        ticket: Ticket,
        result: Result<LookupOutcome, LookupError>,
    ) -> bool {
        if !self.accepts(ticket, Step::Lookup) {
            return false;
        }
        let display_id = match &self.state {
            SessionState::LookingUp { display_id } => display_id.clone(),
            _ => String::new(),
        };
        self.state = match result {
            Ok(LookupOutcome::Found(record)) => SessionState::Found { record },
            Ok(LookupOutcome::NotFound { display_id }) => SessionState::NotFound { display_id },
            Err(error) => {
                log::warn!("Lookup for {} failed: {}", display_id, error);
                SessionState::LookupFailed { display_id, error }
            }
        };
        true
    }

    pub fn begin_render(&mut self) -> Result<(Ticket, CertificateRecord), SessionError> {
        if matches!(self.state, SessionState::Rendering { .. }) {
            return Err(SessionError::Busy("render"));
        }
        let record = match &self.state {
            SessionState::Found { record }
            | SessionState::RenderReady { record, .. }
            | SessionState::ExportReady { record, .. }
            | SessionState::ExportFailed { record, .. } => record.clone(),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "render",
                    state: other.name(),
                });
            }
        };
        self.state = SessionState::Rendering {
            record: record.clone(),
        };
        Ok((self.ticket(Step::Render), record))
    }

    pub fn finish_render(&mut self, ticket: Ticket, rendered: RenderedCertificate) -> bool {
        if !self.accepts(ticket, Step::Render) {
            return false;
        }
        let SessionState::Rendering { record } = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return false;
        };
        self.state = SessionState::RenderReady {
            record,
            rendered: Arc::new(rendered),
        };
        true
    }

    /// Export requires a completed render; the exporter never re-derives
    /// layout from the record alone.
    pub fn begin_export(
        &mut self,
    ) -> Result<(Ticket, CertificateRecord, Arc<RenderedCertificate>), SessionError> {
        if matches!(self.state, SessionState::Exporting { .. }) {
            return Err(SessionError::Busy("export"));
        }
        let (record, rendered) = match &self.state {
            SessionState::RenderReady { record, rendered }
            | SessionState::ExportReady {
                record, rendered, ..
            }
            | SessionState::ExportFailed {
                record, rendered, ..
            } => (record.clone(), Arc::clone(rendered)),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "export",
                    state: other.name(),
                });
            }
        };
        self.state = SessionState::Exporting {
            record: record.clone(),
            rendered: Arc::clone(&rendered),
        };
        Ok((self.ticket(Step::Export), record, rendered))
    }

    pub fn finish_export(
        &mut self,
        ticket: Ticket,
        result: Result<ExportedDocument, ExportFailure>,
    ) -> bool {
        if !self.accepts(ticket, Step::Export) {
            return false;
        }
        let SessionState::Exporting { record, rendered } =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return false;
        };
        self.state = match result {
            Ok(document) => SessionState::ExportReady {
                record,
                rendered,
                document: Arc::new(document),
            },
            Err(error) => {
                log::warn!("Export of {} failed: {}", record.display_id, error);
                SessionState::ExportFailed {
                    record,
                    rendered,
                    error: error.to_string(),
                }
            }
        };
        true
    }

    /// Clears an export error, returning the export control to its ready state.
    pub fn dismiss_export_error(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        self.state = match state {
            SessionState::ExportFailed {
                record, rendered, ..
            } => SessionState::RenderReady { record, rendered },
            other => other,
        };
    }

    pub fn reset(&mut self) {
        self.attempt += 1;
        self.state = SessionState::Idle;
    }

    /// Runs a complete lookup against `store`.
    pub async fn verify<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        input: &str,
    ) -> Result<&SessionState, SessionError> {
        let (ticket, display_id) = self.begin_lookup(input)?;
        let result = lookup(store, &display_id).await;
        self.finish_lookup(ticket, result);
        Ok(&self.state)
    }

    /// Renders the found record.
    pub async fn render(
        &mut self,
        renderer: &CertificateRenderer,
    ) -> Result<Arc<RenderedCertificate>, SessionError> {
        let (ticket, record) = self.begin_render()?;
        let rendered = renderer.render(&record).await;
        self.finish_render(ticket, rendered);
        self.state
            .rendered()
            .cloned()
            .ok_or(SessionError::InvalidTransition {
                action: "render",
                state: self.state.name(),
            })
    }

    /// Exports the current render. An export failure is recorded in the
    /// session state rather than returned.
    pub async fn export(
        &mut self,
        exporter: &DocumentExporter,
    ) -> Result<&SessionState, SessionError> {
        let (ticket, _, rendered) = self.begin_export()?;
        let result = exporter.export(&rendered);
        self.finish_export(ticket, result);
        Ok(&self.state)
    }

    fn ticket(&self, step: Step) -> Ticket {
        Ticket {
            attempt: self.attempt,
            step,
        }
    }

    fn accepts(&self, ticket: Ticket, step: Step) -> bool {
        let in_flight = match step {
            Step::Lookup => matches!(self.state, SessionState::LookingUp { .. }),
            Step::Render => matches!(self.state, SessionState::Rendering { .. }),
            Step::Export => matches!(self.state, SessionState::Exporting { .. }),
        };
        let current = ticket.attempt == self.attempt && ticket.step == step && in_flight;
        if !current {
            log::debug!(
                "Discarding stale {:?} result for attempt {} (now {}, {})",
                step,
                ticket.attempt,
                self.attempt,
                self.state.name()
            );
        }
        current
    }
}
