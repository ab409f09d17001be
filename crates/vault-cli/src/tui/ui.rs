//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use vault_core::Node;

use super::app::{ActivePane, App, FormField, TextInput};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(outer_chunks[0]);

    draw_collections_pane(frame, app, pane_chunks[0]);
    draw_documents_pane(frame, app, pane_chunks[1]);
    draw_form(frame, app, outer_chunks[1]);
    draw_status_bar(frame, app, outer_chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn highlight_style(active: bool) -> Style {
    if active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

/// Draw the collections pane (left)
fn draw_collections_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Collections;

    let items: Vec<ListItem> = app
        .collections
        .iter()
        .map(|entry| {
            if entry.disabled {
                return ListItem::new(Span::styled(
                    entry.label.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
                ));
            }
            let marker = if entry.selected { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, entry.label))
        })
        .collect();

    let block = Block::default()
        .title(" Collections ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    if !app.collections.is_empty() {
        state.select(Some(app.collection_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the documents pane (right)
fn draw_documents_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Documents;

    let items: Vec<ListItem> = app
        .nodes
        .iter()
        .map(|node| match node {
            Node::Note { title, content, .. } => {
                let mut lines = vec![Line::from(Span::styled(
                    title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                lines.extend(content.lines().map(|line| {
                    Line::from(Span::styled(
                        format!("  {}", line),
                        Style::default().add_modifier(Modifier::DIM),
                    ))
                }));
                ListItem::new(lines)
            }
            Node::Placeholder { placeholder } => ListItem::new(Span::styled(
                placeholder.text(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        })
        .collect();

    let title = match app.selected_collection() {
        Some(name) => format!(" {} ", name),
        None => " Notes ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(is_active));

    let mut state = ListState::default();
    if app.nodes.iter().any(Node::is_note) {
        state.select(Some(app.node_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the add form
fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Form;

    let block = Block::default()
        .title(" Add note ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let field_line = |label: &'static str, input: &TextInput, focused: bool| {
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(input.value.clone()),
        ])
    };

    let form = &app.form;
    let lines = vec![
        field_line(
            "Title:   ",
            &form.title,
            is_active && form.field == FormField::Title,
        ),
        field_line(
            "Content: ",
            &form.content,
            is_active && form.field == FormField::Content,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    if is_active {
        let (row, input) = match form.field {
            FormField::Title => (0, &form.title),
            FormField::Content => (1, &form.content),
        };
        let label_width = "Title:   ".len() as u16;
        let offset = u16::try_from(input.cursor_width()).unwrap_or(u16::MAX);
        let cursor_x = inner
            .x
            .saturating_add(label_width)
            .saturating_add(offset)
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y + row));
    }
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = match &app.status_message {
        Some(msg) if app.status_is_error => {
            Paragraph::new(msg.clone()).style(Style::default().fg(Color::Red))
        }
        Some(msg) => Paragraph::new(msg.clone()),
        None => {
            let hints = match app.active_pane {
                ActivePane::Form => "Tab:next field  Enter:submit  Esc:back",
                _ => "Enter:select  a:add  d:del  r:refresh  R:reload  ?:help  q:quit",
            };
            Paragraph::new(hints).style(Style::default().add_modifier(Modifier::DIM))
        }
    };

    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  h/l, ←/→    Switch panes"),
        Line::from("  Tab         Cycle panes"),
        Line::from("  Enter       Open collection"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add note"),
        Line::from("  d           Delete note"),
        Line::from("  r           Refresh notes"),
        Line::from("  R           Reload collections"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from("Add form:"),
        Line::from("  Tab         Switch field"),
        Line::from("  Enter       Next field / Submit"),
        Line::from("  Esc         Leave form"),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, popup_area);
}
