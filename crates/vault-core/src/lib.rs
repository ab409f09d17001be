//! Vault Core Library
//!
//! This crate provides the core functionality for Vault, a client for a
//! remote notes service that groups documents into named collections.
//!
//! # Architecture
//!
//! - **SyncClient**: owns the collection selection and keeps the rendered
//!   view consistent with server state (fetch, mutate, re-fetch)
//! - **NotesApi**: the HTTP collaborator, implemented by `HttpNotesApi`
//! - **View**: the injected rendering target (TUI screen, console, memory)
//!
//! Nothing is cached locally: every add or delete is followed by a fresh
//! fetch of the selected collection.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let api = HttpNotesApi::from_config(&config)?;
//! let client = SyncClient::new(api, MemoryView::new());
//!
//! client.start().await;
//! client.submit_form("Groceries", "milk, eggs").await;
//! ```
//!
//! # Modules
//!
//! - `client`: the `SyncClient` orchestrator
//! - `api`: HTTP contract and its reqwest implementation
//! - `models`: documents, document ids and the add-form payload
//! - `render`: pure mapping from documents to rendered nodes
//! - `view`: the view seam, selector model and toasts
//! - `config`: application configuration
//! - `error`: typed errors

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod view;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::{ApiSchema, DocumentsRoute, FieldNames, HttpNotesApi, NotesApi};
pub use client::{FetchOutcome, MutationOutcome, RegionState, SyncClient};
pub use config::Config;
pub use error::{ApiError, ApiResult, ValidationError};
pub use models::{Document, DocumentId, NewDocument};
pub use render::{render_documents, Node, Placeholder};
pub use view::{MemoryView, Selector, SelectorEntry, Toast, ToastLevel, View};
