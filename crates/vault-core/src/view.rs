//! View seam
//!
//! The sync client renders through a [`View`] it is given at construction.
//! Methods take `&self`: the client calls them between awaits on a single
//! thread, and implementations keep their state behind interior mutability.

use std::cell::RefCell;

use serde::Serialize;

use crate::render::Node;

/// Label of the single entry shown when collections can't be loaded
pub const SELECTOR_ERROR_LABEL: &str = "error";

/// State of the collection selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// One option per collection, in server order
    Options {
        names: Vec<String>,
        selected: Option<String>,
    },
    /// Collections failed to load
    Unavailable,
}

/// One visible entry of the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub label: String,
    pub value: Option<String>,
    pub selected: bool,
    pub disabled: bool,
}

impl Selector {
    pub fn options(names: Vec<String>, selected: Option<String>) -> Self {
        Selector::Options { names, selected }
    }

    /// Entries exactly as a view should list them
    pub fn entries(&self) -> Vec<SelectorEntry> {
        match self {
            Selector::Options { names, selected } => names
                .iter()
                .map(|name| SelectorEntry {
                    label: name.clone(),
                    value: Some(name.clone()),
                    selected: selected.as_deref() == Some(name.as_str()),
                    disabled: false,
                })
                .collect(),
            Selector::Unavailable => vec![SelectorEntry {
                label: SELECTOR_ERROR_LABEL.to_string(),
                value: None,
                selected: true,
                disabled: true,
            }],
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            Selector::Options { selected, .. } => selected.as_deref(),
            Selector::Unavailable => None,
        }
    }
}

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Error,
}

/// Transient user notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

/// Rendering target of the sync client
pub trait View {
    /// Replace the collection selector
    fn show_collections(&self, selector: &Selector);

    /// Replace the documents region
    fn show_documents(&self, nodes: &[Node]);

    /// Reset the add form after a successful submit
    fn clear_form(&self);

    /// Show a transient notification
    fn notify(&self, toast: Toast);
}

/// Snapshot of everything a [`MemoryView`] has been told
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Current selector (None until collections are shown)
    pub selector: Option<Selector>,
    /// Current documents region (None until documents are shown)
    pub documents: Option<Vec<Node>>,
    /// How many times the form was cleared
    pub form_clears: usize,
    /// Every toast, oldest first
    pub toasts: Vec<Toast>,
}

/// In-memory view
///
/// Keeps the latest rendered state. Used for headless embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: RefCell<ViewState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Selector entries currently shown (empty before the first load)
    pub fn selector_entries(&self) -> Vec<SelectorEntry> {
        self.state
            .borrow()
            .selector
            .as_ref()
            .map(Selector::entries)
            .unwrap_or_default()
    }

    pub fn documents(&self) -> Option<Vec<Node>> {
        self.state.borrow().documents.clone()
    }

    pub fn form_clears(&self) -> usize {
        self.state.borrow().form_clears
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.state.borrow().toasts.clone()
    }

    pub fn last_toast(&self) -> Option<Toast> {
        self.state.borrow().toasts.last().cloned()
    }
}

impl View for MemoryView {
    fn show_collections(&self, selector: &Selector) {
        self.state.borrow_mut().selector = Some(selector.clone());
    }

    fn show_documents(&self, nodes: &[Node]) {
        self.state.borrow_mut().documents = Some(nodes.to_vec());
    }

    fn clear_form(&self) {
        self.state.borrow_mut().form_clears += 1;
    }

    fn notify(&self, toast: Toast) {
        self.state.borrow_mut().toasts.push(toast);
    }
}
