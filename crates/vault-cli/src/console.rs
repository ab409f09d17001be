//! Terminal view for one-shot commands
//!
//! Prints what the sync client renders. Error toasts are not printed here:
//! the command turns the failed outcome into its exit error instead, so a
//! failure is reported once.

use vault_core::{Node, Selector, Toast, ToastLevel, View};

use crate::output::{is_loading, Output};

pub struct ConsoleView<'a> {
    output: &'a Output,
}

impl<'a> ConsoleView<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl View for ConsoleView<'_> {
    fn show_collections(&self, selector: &Selector) {
        self.output.print_selector(&selector.entries());
    }

    fn show_documents(&self, nodes: &[Node]) {
        if is_loading(nodes) {
            return;
        }
        self.output.print_nodes(nodes);
    }

    fn clear_form(&self) {}

    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Info => self.output.success(&toast.message),
            ToastLevel::Error => tracing::debug!("Suppressed error toast: {}", toast.message),
        }
    }
}
