//! Sync client
//!
//! Keeps a view consistent with the notes service. The flow is always the
//! same: pick a collection, fetch its documents and render them, mutate
//! (add/delete), then fetch again. Nothing is patched locally.
//!
//! Every operation absorbs its own failures: by the time it returns, the
//! view shows either data, an explicit "no notes" placeholder, or an error
//! placeholder/toast. The returned outcome only tells the caller which one.
//!
//! ## Concurrency
//!
//! Methods take `&self` and may be in flight concurrently on one thread
//! (e.g. spawned on a `LocalSet`). Borrows of the internal state never
//! cross an `.await`. A superseded fetch is not cancelled: whichever
//! response arrives last is what the view shows.

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use crate::api::NotesApi;
use crate::error::ValidationError;
use crate::models::{Document, DocumentId, NewDocument};
use crate::render::{render_documents, Node, Placeholder};
use crate::view::{Selector, Toast, View};

/// Lifecycle of one view region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    /// Never loaded
    #[default]
    Idle,
    /// Request in flight
    Fetching,
    /// Showing data (possibly the empty placeholder)
    Rendered,
    /// Showing the error state
    Error,
}

/// Result of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Data was fetched and rendered
    Loaded(T),
    /// Request failed; the view shows the error state
    Failed(String),
    /// Nothing to fetch (no collection selected)
    Skipped,
}

impl<T> FetchOutcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            FetchOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Result of an add or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Server accepted the change
    Applied,
    /// Input rejected locally; nothing was sent
    Rejected(ValidationError),
    /// Server or network failure
    Failed(String),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Orchestrates fetch → render → mutate → re-fetch
pub struct SyncClient<A, V> {
    api: A,
    view: V,
    /// Collections supplied locally instead of fetched
    fixed_collections: Option<Vec<String>>,
    selected: RefCell<Option<String>>,
    collections_state: Cell<RegionState>,
    documents_state: Cell<RegionState>,
}

impl<A: NotesApi, V: View> SyncClient<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            fixed_collections: None,
            selected: RefCell::new(None),
            collections_state: Cell::new(RegionState::Idle),
            documents_state: Cell::new(RegionState::Idle),
        }
    }

    /// Use a fixed collection set instead of asking the server
    pub fn with_fixed_collections(mut self, names: Vec<String>) -> Self {
        self.fixed_collections = Some(names);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Currently selected collection
    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn collections_state(&self) -> RegionState {
        self.collections_state.get()
    }

    pub fn documents_state(&self) -> RegionState {
        self.documents_state.get()
    }

    /// Initial load
    ///
    /// Populates the selector (from the server, or from the fixed set) and
    /// renders the documents of the selected collection.
    pub async fn start(&self) -> FetchOutcome<Vec<String>> {
        match self.fixed_collections.clone() {
            Some(names) => {
                debug!("Using {} fixed collections", names.len());
                self.populate(names.clone()).await;
                FetchOutcome::Loaded(names)
            }
            None => self.list_collections().await,
        }
    }

    /// Fetch the collection set and refresh the selector
    pub async fn list_collections(&self) -> FetchOutcome<Vec<String>> {
        self.collections_state.set(RegionState::Fetching);

        match self.api.list_collections().await {
            Ok(names) => {
                info!("Loaded {} collections", names.len());
                self.populate(names.clone()).await;
                FetchOutcome::Loaded(names)
            }
            Err(e) => {
                warn!("Failed to load collections: {}", e);
                *self.selected.borrow_mut() = None;
                self.collections_state.set(RegionState::Error);
                self.view.show_collections(&Selector::Unavailable);
                // Nothing to fetch; the previous documents are no longer valid
                self.view
                    .show_documents(&[Node::placeholder(Placeholder::Error)]);
                self.documents_state.set(RegionState::Error);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Show `names` in the selector and load the selected collection
    ///
    /// The selection survives if the collection is still listed; otherwise
    /// it moves to the first entry. With no entries the documents region
    /// shows the empty placeholder.
    async fn populate(&self, names: Vec<String>) {
        let selected = {
            let current = self.selected.borrow();
            current
                .as_ref()
                .filter(|name| names.contains(name))
                .cloned()
                .or_else(|| names.first().cloned())
        };
        *self.selected.borrow_mut() = selected.clone();

        self.view
            .show_collections(&Selector::options(names, selected.clone()));
        self.collections_state.set(RegionState::Rendered);

        match selected {
            Some(name) => {
                self.list_documents(&name).await;
            }
            None => {
                self.view
                    .show_documents(&[Node::placeholder(Placeholder::Empty)]);
                self.documents_state.set(RegionState::Rendered);
            }
        }
    }

    /// Fetch and render the documents of `collection`
    ///
    /// An empty name is a no-op: no request, view untouched.
    pub async fn list_documents(&self, collection: &str) -> FetchOutcome<Vec<Document>> {
        if collection.trim().is_empty() {
            debug!("No collection selected, skipping document fetch");
            return FetchOutcome::Skipped;
        }

        self.documents_state.set(RegionState::Fetching);
        self.view
            .show_documents(&[Node::placeholder(Placeholder::Loading)]);

        match self.api.list_documents(collection).await {
            Ok(documents) => {
                info!(
                    "Loaded {} documents from '{}'",
                    documents.len(),
                    collection
                );
                self.view.show_documents(&render_documents(&documents));
                self.documents_state.set(RegionState::Rendered);
                FetchOutcome::Loaded(documents)
            }
            Err(e) => {
                warn!("Failed to load documents from '{}': {}", collection, e);
                self.view
                    .show_documents(&[Node::placeholder(Placeholder::Error)]);
                self.documents_state.set(RegionState::Error);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Create a document, then re-fetch the collection
    ///
    /// Blank input is rejected before any request. On failure the form is
    /// left as it was so the user can retry.
    pub async fn add_document(
        &self,
        collection: &str,
        title: &str,
        content: &str,
    ) -> MutationOutcome {
        let document = match NewDocument::validated(collection, title, content) {
            Ok(document) => document,
            Err(e) => {
                debug!("Rejected add: {}", e);
                self.view.notify(Toast::error(e.to_string()));
                return MutationOutcome::Rejected(e);
            }
        };

        match self.api.add_document(collection, &document).await {
            Ok(()) => {
                info!("Added document to '{}'", collection);
                self.view.clear_form();
                self.view.notify(Toast::info("Note added"));
                self.list_documents(collection).await;
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Failed to add document to '{}': {}", collection, e);
                let message = format!("Failed to add note: {}", e);
                self.view.notify(Toast::error(message.clone()));
                MutationOutcome::Failed(message)
            }
        }
    }

    /// Delete a document, then re-fetch the collection
    ///
    /// The re-fetch happens whether or not the delete succeeded.
    pub async fn delete_document(&self, collection: &str, id: &DocumentId) -> MutationOutcome {
        let outcome = match self.api.delete_document(collection, id).await {
            Ok(()) => {
                info!("Deleted document {} from '{}'", id, collection);
                self.view.notify(Toast::info("Note deleted"));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Failed to delete {} from '{}': {}", id, collection, e);
                let message = format!("Failed to delete note: {}", e);
                self.view.notify(Toast::error(message.clone()));
                MutationOutcome::Failed(message)
            }
        };

        self.list_documents(collection).await;
        outcome
    }

    /// Selection change
    pub async fn select_collection(&self, name: &str) -> FetchOutcome<Vec<Document>> {
        *self.selected.borrow_mut() = Some(name.to_string());
        self.list_documents(name).await
    }

    /// Re-fetch the selected collection
    pub async fn refresh(&self) -> FetchOutcome<Vec<Document>> {
        match self.selected() {
            Some(name) => self.list_documents(&name).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Re-fetch the collection set (and then the selected collection)
    pub async fn reload_collections(&self) -> FetchOutcome<Vec<String>> {
        self.start().await
    }

    /// Form submission: add to the selected collection
    pub async fn submit_form(&self, title: &str, content: &str) -> MutationOutcome {
        let collection = self.selected().unwrap_or_default();
        self.add_document(&collection, title, content).await
    }

    /// Per-item delete in the selected collection
    pub async fn delete_in_selected(&self, id: &DocumentId) -> MutationOutcome {
        match self.selected() {
            Some(collection) => self.delete_document(&collection, id).await,
            None => {
                self.view
                    .notify(Toast::error(ValidationError::NoCollection.to_string()));
                MutationOutcome::Rejected(ValidationError::NoCollection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ApiCall, FakeApi};
    use crate::view::{MemoryView, ToastLevel, SELECTOR_ERROR_LABEL};

    fn client(api: FakeApi) -> SyncClient<FakeApi, MemoryView> {
        SyncClient::new(api, MemoryView::new())
    }

    fn labels(client: &SyncClient<FakeApi, MemoryView>) -> Vec<String> {
        client
            .view()
            .selector_entries()
            .into_iter()
            .map(|e| e.label)
            .collect()
    }

    #[tokio::test]
    async fn test_start_populates_selector_and_loads_first() {
        let api = FakeApi::new()
            .with_collection("notes", vec![Document::with_id("1", "Hi", "there")])
            .with_collection("tasks", vec![]);
        let client = client(api);

        let outcome = client.start().await;

        assert_eq!(
            outcome,
            FetchOutcome::Loaded(vec!["notes".to_string(), "tasks".to_string()])
        );
        assert_eq!(labels(&client), vec!["notes", "tasks"]);
        assert_eq!(client.selected(), Some("notes".to_string()));
        assert_eq!(
            client.api().calls(),
            vec![
                ApiCall::ListCollections,
                ApiCall::ListDocuments("notes".to_string())
            ]
        );
        assert_eq!(client.collections_state(), RegionState::Rendered);
        assert_eq!(client.documents_state(), RegionState::Rendered);
    }

    #[tokio::test]
    async fn test_selecting_empty_collection_shows_placeholder() {
        let api = FakeApi::new()
            .with_collection("notes", vec![Document::new("a", "b")])
            .with_collection("tasks", vec![]);
        let client = client(api);
        client.start().await;

        let outcome = client.select_collection("tasks").await;

        assert_eq!(outcome, FetchOutcome::Loaded(vec![]));
        assert_eq!(
            client.api().calls().last(),
            Some(&ApiCall::ListDocuments("tasks".to_string()))
        );
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Empty)])
        );
    }

    #[tokio::test]
    async fn test_empty_collection_set_fetches_nothing_else() {
        let client = client(FakeApi::new());

        client.start().await;

        assert!(labels(&client).is_empty());
        assert_eq!(client.selected(), None);
        assert_eq!(client.api().calls(), vec![ApiCall::ListCollections]);
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Empty)])
        );
    }

    #[tokio::test]
    async fn test_collections_failure_shows_error_entry() {
        let api = FakeApi::new().with_collection("notes", vec![]);
        api.fail_next_collections(503);
        let client = client(api);

        let outcome = client.start().await;

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(labels(&client), vec![SELECTOR_ERROR_LABEL.to_string()]);
        assert!(client.view().selector_entries()[0].disabled);
        assert_eq!(client.api().calls(), vec![ApiCall::ListCollections]);
        assert_eq!(client.collections_state(), RegionState::Error);
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Error)])
        );
        assert_eq!(client.documents_state(), RegionState::Error);
    }

    #[tokio::test]
    async fn test_failed_reload_replaces_previous_notes() {
        let api = FakeApi::new().with_collection("notes", vec![Document::with_id("1", "old", "x")]);
        let client = client(api);
        client.start().await;
        assert!(client.view().documents().unwrap()[0].is_note());

        client.api().fail_next_collections(503);
        client.reload_collections().await;

        assert_eq!(client.selected(), None);
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Error)])
        );
    }

    #[tokio::test]
    async fn test_reload_to_empty_set_replaces_previous_notes() {
        let api = FakeApi::new().with_collection("notes", vec![Document::with_id("1", "old", "x")]);
        let client = client(api).with_fixed_collections(vec!["notes".to_string()]);
        client.start().await;
        assert!(client.view().documents().unwrap()[0].is_note());

        client.populate(Vec::new()).await;

        assert_eq!(client.selected(), None);
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Empty)])
        );
        assert_eq!(client.documents_state(), RegionState::Rendered);
    }

    #[tokio::test]
    async fn test_reload_keeps_selection_when_still_listed() {
        let api = FakeApi::new()
            .with_collection("notes", vec![])
            .with_collection("tasks", vec![]);
        let client = client(api);
        client.start().await;
        client.select_collection("tasks").await;

        client.reload_collections().await;

        assert_eq!(client.selected(), Some("tasks".to_string()));
        assert_eq!(
            client.api().calls().last(),
            Some(&ApiCall::ListDocuments("tasks".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fixed_collections_skip_server() {
        let api = FakeApi::new().with_collection("tasks", vec![Document::new("t", "c")]);
        let client = client(api).with_fixed_collections(vec!["tasks".to_string()]);

        client.start().await;

        assert_eq!(labels(&client), vec!["tasks"]);
        assert_eq!(
            client.api().calls(),
            vec![ApiCall::ListDocuments("tasks".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_documents_without_collection_is_noop() {
        let client = client(FakeApi::new());
        client.view().show_documents(&[Node::placeholder(Placeholder::Empty)]);

        assert_eq!(client.list_documents("").await, FetchOutcome::Skipped);
        assert_eq!(client.refresh().await, FetchOutcome::Skipped);

        assert!(client.api().calls().is_empty());
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Empty)])
        );
        assert_eq!(client.documents_state(), RegionState::Idle);
    }

    #[tokio::test]
    async fn test_list_documents_failure_shows_error_placeholder() {
        let api = FakeApi::new().with_collection("notes", vec![]);
        api.fail_next_documents(500);
        let client = client(api);

        let outcome = client.list_documents("notes").await;

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(
            client.view().documents(),
            Some(vec![Node::placeholder(Placeholder::Error)])
        );
        assert_eq!(client.documents_state(), RegionState::Error);
    }

    #[tokio::test]
    async fn test_add_with_empty_content_sends_nothing() {
        let api = FakeApi::new().with_collection("notes", vec![]);
        let client = client(api);
        client.select_collection("notes").await;
        let before = client.api().calls().len();

        let outcome = client.submit_form("Hi", "").await;

        assert_eq!(
            outcome,
            MutationOutcome::Rejected(ValidationError::EmptyContent)
        );
        assert_eq!(client.api().calls().len(), before);
        assert_eq!(client.view().form_clears(), 0);
        assert_eq!(
            client.view().last_toast().map(|t| t.level),
            Some(ToastLevel::Error)
        );
    }

    #[tokio::test]
    async fn test_add_without_selection_is_rejected() {
        let client = client(FakeApi::new());

        let outcome = client.submit_form("Hi", "there").await;

        assert_eq!(
            outcome,
            MutationOutcome::Rejected(ValidationError::NoCollection)
        );
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_clears_form_and_refetches_once() {
        let api = FakeApi::new().with_collection("notes", vec![]);
        let client = client(api);
        client.start().await;
        let before = client.api().calls().len();

        let outcome = client.add_document("notes", "Hi", "there").await;

        assert_eq!(outcome, MutationOutcome::Applied);
        let calls = client.api().calls()[before..].to_vec();
        assert_eq!(
            calls,
            vec![
                ApiCall::AddDocument {
                    collection: "notes".to_string(),
                    title: "Hi".to_string(),
                    content: "there".to_string(),
                },
                ApiCall::ListDocuments("notes".to_string()),
            ]
        );
        assert_eq!(client.view().form_clears(), 1);

        let nodes = client.view().documents().unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Note { title, .. } if title == "Hi"));
    }

    #[tokio::test]
    async fn test_add_failure_keeps_form_and_skips_refetch() {
        let api = FakeApi::new().with_collection("notes", vec![]);
        api.fail_next_mutation(500);
        let client = client(api);

        let outcome = client.add_document("notes", "Hi", "there").await;

        assert!(matches!(outcome, MutationOutcome::Failed(_)));
        assert_eq!(client.view().form_clears(), 0);
        assert!(client.view().last_toast().unwrap().is_error());
        assert!(!client
            .api()
            .calls()
            .iter()
            .any(|c| matches!(c, ApiCall::ListDocuments(_))));
    }

    #[tokio::test]
    async fn test_delete_refetches_once() {
        let api = FakeApi::new().with_collection(
            "notes",
            vec![
                Document::with_id("1", "keep", "x"),
                Document::with_id("2", "drop", "y"),
            ],
        );
        let client = client(api);
        client.start().await;
        let before = client.api().calls().len();

        let outcome = client.delete_in_selected(&DocumentId::new("2")).await;

        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(
            client.api().calls()[before..].to_vec(),
            vec![
                ApiCall::DeleteDocument {
                    collection: "notes".to_string(),
                    id: "2".to_string(),
                },
                ApiCall::ListDocuments("notes".to_string()),
            ]
        );
        let nodes = client.view().documents().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].document_id(), Some(&DocumentId::new("1")));
    }

    #[tokio::test]
    async fn test_delete_failure_still_refetches() {
        let api = FakeApi::new().with_collection("notes", vec![Document::with_id("1", "a", "b")]);
        api.fail_next_mutation(404);
        let client = client(api);

        let outcome = client
            .delete_document("notes", &DocumentId::new("1"))
            .await;

        assert!(matches!(outcome, MutationOutcome::Failed(_)));
        assert_eq!(
            client.api().calls().last(),
            Some(&ApiCall::ListDocuments("notes".to_string()))
        );
        assert_eq!(client.view().documents().unwrap().len(), 1);
    }
}
