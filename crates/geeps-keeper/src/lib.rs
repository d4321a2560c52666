//! Geeps Keeper
//!
//! This library backs the `geeps` terminal client: ask the Geeps
//! text-generation service a question, decide whether the answer is a
//! keeper, and export the kept answers as a PDF.
//!
//! Structure, leaf-first:
//! - [`form`]: capture and validation of the three submission fields
//! - [`client`]: the one-shot generation request client and its trait seam
//! - [`ledger`]: the ordered in-memory collection of kept results
//! - [`export`]: text rendering and PDF assembly of the ledger
//! - [`session`]: the controller owning ledger, pending result, loading
//!   flag, and notices
//! - [`config`]: environment-driven settings
//!
//! Everything is session-scoped and in-memory; nothing is persisted except
//! the exported artifact.

pub mod client;
pub mod config;
pub mod export;
pub mod form;
pub mod ledger;
pub mod session;

pub use client::{GenerationBackend, GenerationError, HttpGenerationClient, GENERATE_ROUTE};
pub use config::KeeperConfig;
pub use export::{ExportError, DOCUMENT_TITLE, EXPORT_FILE_NAME};
pub use form::{FormError, FormInput, GenerationRequest, MAX_PROMPT_LEN};
pub use ledger::{Ledger, ResultEntry};
pub use session::{Notice, PendingResult, Session, NOTICE_PREFIX};
