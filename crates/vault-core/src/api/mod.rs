//! Notes service contract
//!
//! The notes service exposes four endpoints:
//!
//! | Operation        | Request                                   |
//! |------------------|-------------------------------------------|
//! | List collections | `GET /collections`                        |
//! | List documents   | `GET /documents/{collection}` (or `/get`) |
//! | Add document     | `POST /add/{collection}`                  |
//! | Delete document  | `DELETE /delete/{collection}/{id}`        |
//!
//! [`NotesApi`] is the seam the sync client talks through; [`HttpNotesApi`]
//! is the reqwest implementation.

mod http;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::models::{Document, DocumentId, NewDocument};

pub use http::HttpNotesApi;

/// Operations offered by the notes service
///
/// Futures are not required to be `Send`: the client runs on a single
/// event-loop thread.
#[async_trait(?Send)]
pub trait NotesApi {
    /// Names of all collections, in server order
    async fn list_collections(&self) -> ApiResult<Vec<String>>;

    /// All documents of one collection
    async fn list_documents(&self, collection: &str) -> ApiResult<Vec<Document>>;

    /// Create a document; the response body is ignored
    async fn add_document(&self, collection: &str, document: &NewDocument) -> ApiResult<()>;

    /// Delete a document by id; the response body is ignored
    async fn delete_document(&self, collection: &str, id: &DocumentId) -> ApiResult<()>;
}

/// Path segment used to list documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentsRoute {
    /// `GET /documents/{collection}`
    #[default]
    Documents,
    /// `GET /get/{collection}` (older servers)
    Get,
}

impl DocumentsRoute {
    pub fn segment(self) -> &'static str {
        match self {
            DocumentsRoute::Documents => "documents",
            DocumentsRoute::Get => "get",
        }
    }
}

impl fmt::Display for DocumentsRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for DocumentsRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documents" => Ok(DocumentsRoute::Documents),
            "get" => Ok(DocumentsRoute::Get),
            other => Err(format!(
                "Unknown documents route '{}'. Use 'documents' or 'get'.",
                other
            )),
        }
    }
}

/// Field names written in add requests
///
/// Reading always accepts both sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNames {
    /// `{ "title": ..., "content": ... }`
    #[default]
    TitleContent,
    /// `{ "name": ..., "value": ... }` (legacy)
    NameValue,
}

impl FieldNames {
    /// (title key, content key)
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            FieldNames::TitleContent => ("title", "content"),
            FieldNames::NameValue => ("name", "value"),
        }
    }
}

impl fmt::Display for FieldNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNames::TitleContent => f.write_str("title_content"),
            FieldNames::NameValue => f.write_str("name_value"),
        }
    }
}

impl FromStr for FieldNames {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title_content" => Ok(FieldNames::TitleContent),
            "name_value" => Ok(FieldNames::NameValue),
            other => Err(format!(
                "Unknown field names '{}'. Use 'title_content' or 'name_value'.",
                other
            )),
        }
    }
}

/// Wire variant spoken by a particular server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiSchema {
    pub route: DocumentsRoute,
    pub fields: FieldNames,
}
