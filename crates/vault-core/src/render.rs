//! Document rendering
//!
//! Maps fetched documents to the nodes a view displays. Views never build
//! output from raw server strings: all text goes through [`sanitize`] here,
//! which drops control characters (terminal escape sequences included).

use serde::Serialize;

use crate::models::{Document, DocumentId};

/// Informational node shown instead of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// A fetch is in flight
    Loading,
    /// The collection has no documents
    Empty,
    /// The last fetch failed
    Error,
}

impl Placeholder {
    pub fn text(self) -> &'static str {
        match self {
            Placeholder::Loading => "Loading...",
            Placeholder::Empty => "No notes found.",
            Placeholder::Error => "Error loading notes.",
        }
    }
}

/// A rendered entry of the documents region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Note {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<DocumentId>,
        title: String,
        content: String,
    },
    Placeholder {
        placeholder: Placeholder,
    },
}

impl Node {
    pub fn placeholder(placeholder: Placeholder) -> Self {
        Node::Placeholder { placeholder }
    }

    /// Id of the document behind this node, if it can be deleted
    pub fn document_id(&self) -> Option<&DocumentId> {
        match self {
            Node::Note { id, .. } => id.as_ref(),
            Node::Placeholder { .. } => None,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Node::Note { .. })
    }
}

/// Render a fetched document list
///
/// An empty list yields a single [`Placeholder::Empty`] node, never an
/// empty region.
pub fn render_documents(documents: &[Document]) -> Vec<Node> {
    if documents.is_empty() {
        return vec![Node::placeholder(Placeholder::Empty)];
    }

    documents
        .iter()
        .map(|doc| Node::Note {
            id: doc.id.clone(),
            title: sanitize(&doc.title),
            content: sanitize(&doc.content),
        })
        .collect()
}

/// Strip control characters, keeping newlines and tabs
///
/// A stripped ESC takes its CSI sequence (`ESC [ ... final-byte`) or OSC
/// sequence (`ESC ] ... BEL` or `ESC ] ... ESC \`) with it, so colour codes
/// and title/hyperlink escapes leave no debris behind.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameter and intermediate bytes, then one final byte
                    for next in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // Payload runs to BEL or ST (ESC \)
                    while let Some(next) = chars.next() {
                        if next == '\u{7}' {
                            break;
                        }
                        if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if c == '\n' || c == '\t' || !c.is_control() {
            out.push(c);
        }
    }

    out
}
