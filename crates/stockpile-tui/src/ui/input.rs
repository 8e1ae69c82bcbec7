//! Keyboard input handling for the console.
//!
//! This module translates keyboard events into application state changes.
//! While the scanner is armed on the Receive tab, every printable key
//! belongs to the scan buffer and global shortcuts are suspended, so
//! scanner bursts never trigger navigation.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use stockpile_core::scan::ScanKey;

use crate::app::{App, AppState, LoginFocus, Tab};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle offline-data reset confirmation
    if matches!(app.state, AppState::ConfirmingReset) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.reset_offline_data();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search input
    if matches!(app.state, AppState::Searching) {
        match key.code {
            KeyCode::Esc => {
                app.search_query.clear();
                app.state = AppState::Normal;
            }
            KeyCode::Enter => {
                app.state = AppState::Normal;
            }
            KeyCode::Backspace => {
                app.search_query.pop();
            }
            KeyCode::Char(c) => {
                if app.search_query.len() < 50 {
                    app.search_query.push(c);
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    // Armed scanner owns the keyboard: route everything except Esc into
    // the scan buffer so codes cannot trigger shortcuts.
    if app.current_tab == Tab::Receive && app.scanner.is_armed() {
        match key.code {
            KeyCode::Esc => app.toggle_scanning(),
            KeyCode::Enter => app.handle_scanner_key(ScanKey::Enter),
            KeyCode::Char(c) => app.handle_scanner_key(ScanKey::Char(c)),
            _ => app.handle_scanner_key(ScanKey::Other),
        }
        return Ok(false);
    }

    // Global shortcuts
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Tab => {
            app.current_tab = app.current_tab.next();
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.current_tab = app.current_tab.prev();
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Dashboard;
            return Ok(false);
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Stock;
            return Ok(false);
        }
        KeyCode::Char('3') => {
            app.current_tab = Tab::Receive;
            return Ok(false);
        }
        KeyCode::Char('4') => {
            app.current_tab = Tab::History;
            return Ok(false);
        }
        KeyCode::Char('5') => {
            app.current_tab = Tab::Acts;
            return Ok(false);
        }
        KeyCode::Char('6') => {
            app.current_tab = Tab::Users;
            return Ok(false);
        }
        KeyCode::Char('r') | KeyCode::Char('u') => {
            app.refresh_background();
            return Ok(false);
        }
        KeyCode::Char('o') => {
            app.toggle_offline();
            return Ok(false);
        }
        KeyCode::Char('X') => {
            app.state = AppState::ConfirmingReset;
            return Ok(false);
        }
        KeyCode::Char('l') => {
            app.start_login();
            return Ok(false);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            return Ok(false);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            return Ok(false);
        }
        _ => {}
    }

    // Tab-specific keys
    match app.current_tab {
        Tab::Stock => {
            if key.code == KeyCode::Char('/') {
                app.search_query.clear();
                app.state = AppState::Searching;
            }
        }
        Tab::Receive => handle_receive_keys(app, key),
        Tab::Acts => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('e')) {
                app.export_selected_act();
            }
        }
        _ => {}
    }

    Ok(false)
}

fn handle_receive_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.toggle_scanning(),
        KeyCode::Char('p') => app.submit_receiving(),
        KeyCode::Char('+') | KeyCode::Char('=') => adjust_selected_line(app, 1.0),
        KeyCode::Char('-') => adjust_selected_line(app, -1.0),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(line) = app.receiving.lines().get(app.receive_selection) {
                let inventory_number = line.inventory_number.clone();
                app.receiving.remove(&inventory_number);
                app.move_selection(0);
            }
        }
        KeyCode::Char('c') => {
            app.receiving.clear();
            app.receive_selection = 0;
        }
        _ => {}
    }
}

fn adjust_selected_line(app: &mut App, delta: f64) {
    if let Some(line) = app.receiving.lines().get(app.receive_selection) {
        let inventory_number = line.inventory_number.clone();
        app.receiving.adjust_quantity(&inventory_number, delta);
        app.move_selection(0);
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Cached data stays browsable without a session
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                if app.attempt_login().await.is_ok() {
                    app.refresh_background();
                }
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if app.can_add_username_char() {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if app.can_add_password_char() {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}
