//! Data models for Vault
//!
//! Defines the documents served by the notes service and the payload the
//! add form sends. Collections are identified by name only and are plain
//! `String`s.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::FieldNames;
use crate::error::ValidationError;

/// Server-assigned document identifier
///
/// Opaque to the client. Servers send it as a string, a number, or a
/// MongoDB extended-JSON object (`{"$oid": "..."}`); all of them are kept
/// as their string form and echoed back verbatim in delete requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocumentId {
    Text(String),
    Number(serde_json::Number),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawDocumentId::deserialize(deserializer)? {
            RawDocumentId::Text(s) => s,
            RawDocumentId::Number(n) => n.to_string(),
            RawDocumentId::ObjectId { oid } => oid,
        };
        Ok(Self(id))
    }
}

/// A document in a collection
///
/// `title`/`content` are the canonical field names; `name`/`value` are
/// accepted as legacy aliases when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned id (absent on servers that don't expose one)
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    /// Document title
    #[serde(default, alias = "name")]
    pub title: String,
    /// Document body
    #[serde(default, alias = "value")]
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Create a document with a known id
    pub fn with_id(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Payload of the add form
///
/// Only constructed through [`NewDocument::validated`], so a value of this
/// type always has a non-blank title and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    title: String,
    content: String,
}

impl NewDocument {
    /// Validate form input for the given collection
    ///
    /// Values are checked after trimming but sent as entered.
    pub fn validated(
        collection: &str,
        title: &str,
        content: &str,
    ) -> Result<Self, ValidationError> {
        if collection.trim().is_empty() {
            return Err(ValidationError::NoCollection);
        }
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Request body using the configured field names
    pub fn to_json(&self, fields: FieldNames) -> serde_json::Value {
        let (title_key, content_key) = fields.keys();
        let mut body = serde_json::Map::new();
        body.insert(title_key.to_string(), self.title.clone().into());
        body.insert(content_key.to_string(), self.content.clone().into());
        serde_json::Value::Object(body)
    }
}
