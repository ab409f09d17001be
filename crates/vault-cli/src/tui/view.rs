//! View adapter between the sync client and the TUI state

use std::cell::RefCell;
use std::rc::Rc;

use vault_core::{Node, Selector, Toast, View};

use super::app::App;

/// Renders client output into the shared [`App`]
///
/// The next frame picks the changes up; nothing draws from here.
pub struct TuiView {
    app: Rc<RefCell<App>>,
}

impl TuiView {
    pub fn new(app: Rc<RefCell<App>>) -> Self {
        Self { app }
    }
}

impl View for TuiView {
    fn show_collections(&self, selector: &Selector) {
        self.app.borrow_mut().set_collections(selector);
    }

    fn show_documents(&self, nodes: &[Node]) {
        self.app.borrow_mut().set_nodes(nodes);
    }

    fn clear_form(&self) {
        self.app.borrow_mut().form.clear();
    }

    fn notify(&self, toast: Toast) {
        self.app.borrow_mut().show_toast(toast);
    }
}
