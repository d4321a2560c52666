//! Session controller: the single owner of all mutable state for one run.
//!
//! One `Session` holds the ledger, the at-most-one pending result, the
//! loading flag, and the notices queued for display. Every state transition
//! is a discrete reaction to a user or network event on one logical thread,
//! so no locking is involved; handlers receive the session by `&mut`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{GenerationBackend, GenerationError};
use crate::export::{self, ExportError, EXPORT_FILE_NAME};
use crate::form::{FormInput, GenerationRequest};
use crate::ledger::{Ledger, ResultEntry};

/// Fixed prefix carried by every failure notice.
pub const NOTICE_PREFIX: &str = "🙄 ";

/// The most recent generated-but-not-yet-kept result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResult {
    pub prompt: String,
    pub temperature: f64,
    pub text: String,
}

/// A one-line user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn for_error(err: &GenerationError) -> Self {
        Self {
            message: format!("{NOTICE_PREFIX}{err}"),
        }
    }
}

pub struct Session {
    backend: Arc<dyn GenerationBackend>,
    ledger: Ledger,
    pending: Option<PendingResult>,
    loading: bool,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            ledger: Ledger::new(),
            pending: None,
            loading: false,
            notices: Vec::new(),
        }
    }

    /// Dispatch one generation request. Returns `true` when a pending result
    /// is now available.
    ///
    /// The loading flag is raised for exactly the lifetime of the exchange
    /// and is lowered before any other state changes on both outcomes. On
    /// failure a notice is queued and the ledger and pending result are left
    /// untouched.
    pub async fn submit(&mut self, request: GenerationRequest) -> bool {
        self.loading = true;
        let outcome = self.backend.generate(&request).await;
        self.loading = false;

        match outcome {
            Ok(text) => {
                info!(prompt_chars = request.user_request.len(), "generation succeeded");
                self.pending = Some(PendingResult {
                    prompt: request.user_request,
                    temperature: request.temperature,
                    text,
                });
                true
            }
            Err(err) => {
                warn!(error = %err, "generation failed");
                self.notices.push(Notice::for_error(&err));
                false
            }
        }
    }

    /// Commit the pending result into the ledger under a fresh id. Returns
    /// the new entry's id, or `None` when nothing was pending.
    pub fn keep(&mut self) -> Option<Uuid> {
        let pending = self.pending.take()?;
        let entry = ResultEntry::new(pending.prompt, pending.temperature, pending.text);
        let id = entry.id;
        self.ledger.append(entry);
        info!(kept = self.ledger.len(), "result kept");
        Some(id)
    }

    /// Discard the pending result and reset the form fields.
    pub fn clear_entry(&mut self, form: &mut FormInput) {
        self.pending = None;
        form.reset();
    }

    /// Remove a kept entry by id. Absent ids are a no-op.
    pub fn delete(&mut self, id: Uuid) {
        self.ledger.remove_by_id(id);
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn pending(&self) -> Option<&PendingResult> {
        self.pending.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the export affordance should be offered at all.
    pub fn can_export(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// Export the ledger as `Geeps_Keeper.pdf` in the given directory.
    pub fn export_pdf(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        export::write_pdf(&self.ledger, &dir.join(EXPORT_FILE_NAME))
    }

    /// Take the queued notices for display.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
