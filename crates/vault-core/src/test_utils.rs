//! Test helpers
//!
//! `FakeApi` is an in-memory notes service that records every call, so
//! tests can assert exactly which requests an operation issued.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;

use crate::api::NotesApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{Document, DocumentId, NewDocument};

/// A request received by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListCollections,
    ListDocuments(String),
    AddDocument {
        collection: String,
        title: String,
        content: String,
    },
    DeleteDocument {
        collection: String,
        id: String,
    },
}

#[derive(Debug, Default)]
pub struct FakeApi {
    collections: RefCell<Vec<(String, Vec<Document>)>>,
    calls: RefCell<Vec<ApiCall>>,
    next_id: Cell<u64>,
    fail_collections: Cell<Option<u16>>,
    fail_documents: Cell<Option<u16>>,
    fail_mutation: Cell<Option<u16>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1000),
            ..Self::default()
        }
    }

    pub fn with_collection(self, name: &str, documents: Vec<Document>) -> Self {
        self.collections
            .borrow_mut()
            .push((name.to_string(), documents));
        self
    }

    /// Requests received so far, oldest first
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    /// Answer the next collections request with `status`
    pub fn fail_next_collections(&self, status: u16) {
        self.fail_collections.set(Some(status));
    }

    /// Answer the next documents request with `status`
    pub fn fail_next_documents(&self, status: u16) {
        self.fail_documents.set(Some(status));
    }

    /// Answer the next add or delete with `status`
    pub fn fail_next_mutation(&self, status: u16) {
        self.fail_mutation.set(Some(status));
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
    }

    fn injected(slot: &Cell<Option<u16>>, path: String) -> ApiResult<()> {
        match slot.take() {
            Some(status) => Err(ApiError::Status {
                url: format!("fake://{}", path),
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }

    fn not_found(path: String) -> ApiError {
        ApiError::Status {
            url: format!("fake://{}", path),
            status: 404,
            body: String::new(),
        }
    }
}

#[async_trait(?Send)]
impl NotesApi for FakeApi {
    async fn list_collections(&self) -> ApiResult<Vec<String>> {
        self.record(ApiCall::ListCollections);
        Self::injected(&self.fail_collections, "collections".to_string())?;

        Ok(self
            .collections
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn list_documents(&self, collection: &str) -> ApiResult<Vec<Document>> {
        self.record(ApiCall::ListDocuments(collection.to_string()));
        let path = format!("documents/{}", collection);
        Self::injected(&self.fail_documents, path.clone())?;

        self.collections
            .borrow()
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, docs)| docs.clone())
            .ok_or_else(|| Self::not_found(path))
    }

    async fn add_document(&self, collection: &str, document: &NewDocument) -> ApiResult<()> {
        self.record(ApiCall::AddDocument {
            collection: collection.to_string(),
            title: document.title().to_string(),
            content: document.content().to_string(),
        });
        let path = format!("add/{}", collection);
        Self::injected(&self.fail_mutation, path.clone())?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut collections = self.collections.borrow_mut();
        let (_, docs) = collections
            .iter_mut()
            .find(|(name, _)| name == collection)
            .ok_or_else(|| Self::not_found(path))?;
        docs.push(Document::with_id(
            id.to_string(),
            document.title(),
            document.content(),
        ));
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &DocumentId) -> ApiResult<()> {
        self.record(ApiCall::DeleteDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        let path = format!("delete/{}/{}", collection, id);
        Self::injected(&self.fail_mutation, path.clone())?;

        let mut collections = self.collections.borrow_mut();
        let (_, docs) = collections
            .iter_mut()
            .find(|(name, _)| name == collection)
            .ok_or_else(|| Self::not_found(path.clone()))?;

        let before = docs.len();
        docs.retain(|doc| doc.id.as_ref() != Some(id));
        if docs.len() == before {
            return Err(Self::not_found(path));
        }
        Ok(())
    }
}
