//! Vault TUI
//!
//! Terminal user interface for browsing and editing notes on the server.
//!
//! ## Layout
//!
//! - Left: Collections (selector)
//! - Right: Notes in the selected collection
//! - Bottom: Add form and status line
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Switch focus between panes
//! - Tab: Cycle through panes
//! - Enter: Open the highlighted collection
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add note (focus the form)
//! - d: Delete highlighted note
//! - r: Refresh notes
//! - R: Reload collections
//!
//! Client operations run as local tasks, so the UI keeps drawing while a
//! request is in flight.

mod app;
mod ui;
mod view;

use std::cell::RefCell;
use std::fs::File;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vault_core::{Config, HttpNotesApi, SyncClient};

use app::{Action, ActivePane, App, FormField};
use view::TuiView;

type TuiClient = SyncClient<HttpNotesApi, TuiView>;

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    init_tui_logging(&config);

    // Fail before touching the terminal if the address is unusable
    let api = HttpNotesApi::from_config(&config).map_err(crate::commands::with_hint)?;

    let app = Rc::new(RefCell::new(App::new()));
    let mut client = SyncClient::new(api, TuiView::new(Rc::clone(&app)));
    if let Some(names) = config.collections.clone() {
        client = client.with_fixed_collections(names);
    }
    let client = Rc::new(client);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let local = LocalSet::new();
    let result = local
        .run_until(run_app(&mut terminal, app, client))
        .await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: Rc<RefCell<App>>,
    client: Rc<TuiClient>,
) -> Result<()> {
    spawn_start(&client);

    loop {
        app.borrow_mut().check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, &app.borrow()))?;

        // Yields to in-flight client tasks
        tokio::time::sleep(Duration::from_millis(50)).await;

        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let action = handle_key(&mut app.borrow_mut(), key.code, key.modifiers);
            if let Some(action) = action {
                dispatch(&client, action);
            }
        }

        if app.borrow().should_quit {
            break;
        }
    }

    Ok(())
}

fn spawn_start(client: &Rc<TuiClient>) {
    let client = Rc::clone(client);
    tokio::task::spawn_local(async move {
        client.start().await;
    });
}

/// Run an action on the client without blocking the event loop
fn dispatch(client: &Rc<TuiClient>, action: Action) {
    let client = Rc::clone(client);
    tokio::task::spawn_local(async move {
        match action {
            Action::SelectCollection(name) => {
                client.select_collection(&name).await;
            }
            Action::Refresh => {
                client.refresh().await;
            }
            Action::ReloadCollections => {
                client.reload_collections().await;
            }
            Action::Submit { title, content } => {
                client.submit_form(&title, &content).await;
            }
            Action::Delete(id) => {
                client.delete_in_selected(&id).await;
            }
        }
    });
}

/// Map a key press to a state change and, possibly, a client action
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return None;
    }

    match app.active_pane {
        ActivePane::Form => handle_form_key(app, code),
        _ => handle_normal_key(app, code),
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_pane(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('a') | KeyCode::Char('n') => {
            app.active_pane = ActivePane::Form;
        }
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Char('R') => return Some(Action::ReloadCollections),
        KeyCode::Enter if app.active_pane == ActivePane::Collections => {
            let action = app.select_highlighted_collection();
            if action.is_none() {
                app.show_toast(vault_core::Toast::error(
                    "Collections unavailable. Press R to retry.",
                ));
            }
            return action;
        }
        KeyCode::Char('d') if app.active_pane == ActivePane::Documents => {
            return app.current_document_id().cloned().map(Action::Delete);
        }
        _ => {}
    }
    None
}

fn handle_form_key(app: &mut App, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => app.active_pane = ActivePane::Documents,
        KeyCode::Tab | KeyCode::BackTab => app.form.toggle_field(),
        KeyCode::Enter => match app.form.field {
            FormField::Title => app.form.field = FormField::Content,
            FormField::Content => return Some(app.submit_action()),
        },
        KeyCode::Char(c) => app.form.active_input().insert_char(c),
        KeyCode::Backspace => app.form.active_input().delete_char(),
        KeyCode::Left => app.form.active_input().cursor_left(),
        KeyCode::Right => app.form.active_input().cursor_right(),
        _ => {}
    }
    None
}

/// Initialize file-based logging for the TUI
///
/// Only enabled when VAULT_LOG is set, since stderr belongs to the terminal UI.
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("VAULT_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("vault_core={},vault_cli={}", log_level, log_level));

    // Ignore error if already initialized
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init()
        .is_err()
    {
        warn!("Logging was already initialized");
        return;
    }

    info!("TUI logging initialized to {:?}", log_path);
}
