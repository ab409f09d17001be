//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag), one JSON value per line
//! - Quiet mode for scripting (--quiet flag)

use vault_core::{Node, Placeholder, SelectorEntry};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print collection names
    pub fn print_collections(&self, names: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if names.is_empty() {
                    println!("No collections found.");
                    return;
                }
                for name in names {
                    println!("{}", name);
                }
                println!("\n{} collection(s)", names.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(names));
            }
            OutputFormat::Quiet => {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the collection selector
    pub fn print_selector(&self, entries: &[SelectorEntry]) {
        match self.format {
            OutputFormat::Human => {
                for entry in entries {
                    let marker = if entry.selected { "*" } else { " " };
                    let suffix = if entry.disabled { " (unavailable)" } else { "" };
                    println!("{} {}{}", marker, entry.label, suffix);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(entries));
            }
            OutputFormat::Quiet => {
                for entry in entries.iter().filter(|e| !e.disabled) {
                    println!("{}", entry.label);
                }
            }
        }
    }

    /// Print a rendered documents region
    pub fn print_nodes(&self, nodes: &[Node]) {
        match self.format {
            OutputFormat::Human => {
                let mut notes = 0;
                for node in nodes {
                    match node {
                        Node::Note { id, title, content } => {
                            notes += 1;
                            let id = id.as_ref().map(|id| id.as_str()).unwrap_or("-");
                            println!(
                                "{:<10} | {} | {}",
                                truncate(id, 10),
                                truncate(title, 30),
                                truncate_line(content, 45)
                            );
                        }
                        Node::Placeholder { placeholder } => {
                            println!("{}", placeholder.text());
                        }
                    }
                }
                if notes > 0 {
                    println!("\n{} note(s)", notes);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(nodes));
            }
            OutputFormat::Quiet => {
                for id in nodes.iter().filter_map(Node::document_id) {
                    println!("{}", id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Whether a region is only the transient loading placeholder
pub fn is_loading(nodes: &[Node]) -> bool {
    matches!(
        nodes,
        [Node::Placeholder {
            placeholder: Placeholder::Loading
        }]
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
