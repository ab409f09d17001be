//! Application state and logic

use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use vault_core::{DocumentId, Node, Placeholder, Selector, SelectorEntry, Toast};

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Collections,
    Documents,
    Form,
}

impl ActivePane {
    /// Move to the next pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Collections => ActivePane::Documents,
            ActivePane::Documents => ActivePane::Form,
            ActivePane::Form => ActivePane::Collections,
        }
    }

    /// Move to the previous pane (wrapping)
    pub fn prev(self) -> Self {
        match self {
            ActivePane::Collections => ActivePane::Form,
            ActivePane::Documents => ActivePane::Collections,
            ActivePane::Form => ActivePane::Documents,
        }
    }
}

/// Field of the add form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
}

/// Single-line text input with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Cursor position in characters (not bytes)
    pub cursor: usize,
}

impl TextInput {
    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.value.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Display columns between the start of the input and the cursor
    pub fn cursor_width(&self) -> usize {
        self.value[..self.byte_index()].width()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// The add form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub title: TextInput,
    pub content: TextInput,
    pub field: FormField,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            title: TextInput::default(),
            content: TextInput::default(),
            field: FormField::Title,
        }
    }
}

impl Form {
    /// Input of the focused field
    pub fn active_input(&mut self) -> &mut TextInput {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Content => &mut self.content,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Title,
        };
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
        self.field = FormField::Title;
    }
}

/// Work the event loop hands to the sync client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectCollection(String),
    Refresh,
    ReloadCollections,
    Submit { title: String, content: String },
    Delete(DocumentId),
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Collection selector entries
    pub collections: Vec<SelectorEntry>,
    /// Highlighted collection index
    pub collection_index: usize,
    /// Rendered documents region
    pub nodes: Vec<Node>,
    /// Highlighted document index
    pub node_index: usize,
    /// Add form
    pub form: Form,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// Whether the status message reports an error
    pub status_is_error: bool,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            active_pane: ActivePane::Collections,
            collections: Vec::new(),
            collection_index: 0,
            nodes: vec![Node::placeholder(Placeholder::Loading)],
            node_index: 0,
            form: Form::default(),
            status_message: None,
            status_is_error: false,
            status_message_time: None,
            show_help: false,
        }
    }

    /// Replace the selector, highlighting the selected entry
    pub fn set_collections(&mut self, selector: &Selector) {
        self.collections = selector.entries();
        self.collection_index = self
            .collections
            .iter()
            .position(|e| e.selected)
            .unwrap_or(0);
    }

    /// Replace the documents region, keeping the highlight in range
    pub fn set_nodes(&mut self, nodes: &[Node]) {
        self.nodes = nodes.to_vec();
        if self.node_index >= self.nodes.len() {
            self.node_index = self.nodes.len().saturating_sub(1);
        }
    }

    /// Set a temporary status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
        self.status_message_time = Some(Instant::now());
    }

    pub fn show_toast(&mut self, toast: Toast) {
        let is_error = toast.is_error();
        self.set_status(toast.message);
        self.status_is_error = is_error;
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
                self.status_is_error = false;
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Collections => {
                self.collection_index = self.collection_index.saturating_sub(1);
            }
            ActivePane::Documents => {
                self.node_index = self.node_index.saturating_sub(1);
            }
            ActivePane::Form => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Collections => {
                if self.collection_index + 1 < self.collections.len() {
                    self.collection_index += 1;
                }
            }
            ActivePane::Documents => {
                if self.node_index + 1 < self.nodes.len() {
                    self.node_index += 1;
                }
            }
            ActivePane::Form => {}
        }
    }

    /// Commit the highlighted collection as the selection
    ///
    /// Returns None for the disabled error entry.
    pub fn select_highlighted_collection(&mut self) -> Option<Action> {
        let name = self
            .collections
            .get(self.collection_index)
            .filter(|e| !e.disabled)
            .and_then(|e| e.value.clone())?;

        for (i, entry) in self.collections.iter_mut().enumerate() {
            entry.selected = i == self.collection_index;
        }
        Some(Action::SelectCollection(name))
    }

    /// Id of the highlighted document, if it is a deletable note
    pub fn current_document_id(&self) -> Option<&DocumentId> {
        self.nodes.get(self.node_index).and_then(Node::document_id)
    }

    /// Snapshot the form for submission
    ///
    /// The form is cleared only once the add succeeds.
    pub fn submit_action(&self) -> Action {
        Action::Submit {
            title: self.form.title.value.clone(),
            content: self.form.content.value.clone(),
        }
    }

    /// Name of the selected collection, for the pane title
    pub fn selected_collection(&self) -> Option<&str> {
        self.collections
            .iter()
            .find(|e| e.selected && !e.disabled)
            .map(|e| e.label.as_str())
    }
}
