//! Frame layout and overlays for the console.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{acts, dashboard, history, receive, stock, users};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_confirm_overlay(frame, " Quit ", "Quit stockpile? [y/n]");
    }

    if matches!(app.state, AppState::ConfirmingReset) {
        render_confirm_overlay(frame, " Reset offline data ", "Delete the offline snapshot? [y/n]");
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Stockpile";
    let operator = app
        .session
        .display_name()
        .map(|name| format!("{} | ", name))
        .unwrap_or_default();
    let help_hint = format!("{}[?] Help", operator);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        (Tab::Dashboard, "[1] Dashboard"),
        (Tab::Stock, "[2] Stock"),
        (Tab::Receive, "[3] Receive"),
        (Tab::History, "[4] History"),
        (Tab::Acts, "[5] Acts"),
        (Tab::Users, "[6] Users"),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (tab, label)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *tab == app.current_tab {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Stock => stock::render(frame, app, area),
        Tab::Receive => receive::render(frame, app, area),
        Tab::History => history::render(frame, app, area),
        Tab::Acts => acts::render(frame, app, area),
        Tab::Users => users::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if matches!(app.state, AppState::Searching) {
        format!(" Search: {}_ ", app.search_query)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(notice) = app.data_source.notice() {
        format!(" {} (synced {}) ", notice, app.last_sync)
    } else {
        format!(" Synced {} ", app.last_sync)
    };

    let connection = if app.offline_mode { "OFFLINE" } else { "ONLINE" };
    let right_text = format!("{} | [r]efresh [o]ffline [q]uit ", connection);

    let padding = (area.width as usize).saturating_sub(left_text.len() + right_text.len());

    let line = Line::from(vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(padding)),
        if app.offline_mode {
            Span::styled(right_text, styles::highlight_style())
        } else {
            Span::raw(right_text)
        },
    ]);

    let paragraph = Paragraph::new(line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let entries: &[(&str, &str)] = &[
        ("1-6 / Tab", "Switch tabs"),
        ("j/k, arrows", "Move selection"),
        ("r, u", "Refresh data"),
        ("/", "Search products (Stock tab)"),
        ("s", "Start/stop scanning (Receive tab)"),
        ("Esc", "Stop scanning / close overlay"),
        ("+ / -", "Adjust scanned quantity"),
        ("d", "Remove scanned line"),
        ("p", "Post receiving session"),
        ("Enter / e", "Export act (Acts tab)"),
        ("o", "Toggle offline mode"),
        ("X", "Reset offline data"),
        ("l", "Log in again"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", key), styles::help_key_style()),
            Span::styled(*desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let field = |label: &str, value: &str, focused: bool| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", label), styles::help_desc_style()),
            Span::styled(
                format!("{}{}", value, if focused { "_" } else { "" }),
                if focused {
                    styles::highlight_style()
                } else {
                    styles::list_item_style()
                },
            ),
        ])
    };

    let masked: String = "*".repeat(app.login_password.len());
    let mut lines = vec![
        Line::from(""),
        field(
            "Username:",
            &app.login_username,
            app.login_focus == LoginFocus::Username,
        ),
        Line::from(""),
        field(
            "Password:",
            &masked,
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
        Line::from(Span::styled(
            if app.login_focus == LoginFocus::Button {
                "  > [ Log in ] <"
            } else {
                "    [ Log in ]"
            },
            if app.login_focus == LoginFocus::Button {
                styles::tab_style(true)
            } else {
                styles::muted_style()
            },
        )),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter submits, Tab moves, Esc browses cached data",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Operator login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, title: &str, prompt: &str) {
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", prompt), styles::help_desc_style())),
    ];

    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Centered sub-rectangle taking the given percentage of the frame.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
