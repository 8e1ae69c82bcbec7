use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_date, format_money, format_qty, format_signed_qty};

/// How many recent movements the dashboard shows.
const RECENT_MOVEMENTS: usize = 12;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_stat_cards(frame, app, chunks[0]);
    render_recent_movements(frame, app, chunks[1]);
}

fn render_stat_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let low_stock = app.low_stock_count();
    let low_style = if low_stock > 0 {
        styles::error_style()
    } else {
        styles::success_style()
    };

    render_card(
        frame,
        cards[0],
        "Units on hand",
        format_qty(app.total_units()),
        styles::title_style(),
    );
    render_card(
        frame,
        cards[1],
        "Stock value",
        format_money(app.total_stock_value()),
        styles::success_style(),
    );
    render_card(
        frame,
        cards[2],
        "Low stock items",
        low_stock.to_string(),
        low_style,
    );
    render_card(
        frame,
        cards[3],
        "Movements listed",
        app.movements.len().to_string(),
        styles::highlight_style(),
    );
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: String,
    value_style: ratatui::style::Style,
) {
    let lines = vec![
        Line::from(Span::styled(format!(" {}", label), styles::muted_style())),
        Line::from(Span::styled(format!(" {}", value), value_style)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent_movements(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for movement in app.movements.iter().take(RECENT_MOVEMENTS) {
        let qty_style = if movement.quantity > 0.0 {
            styles::success_style()
        } else {
            styles::error_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", format_date(&movement.created_at)), styles::muted_style()),
            Span::styled(format!("{:>8} ", format_signed_qty(movement.quantity)), qty_style),
            Span::raw(format!("{:<34} ", movement.product_name)),
            Span::styled(format!("{:<10} ", movement.kind.label()), styles::muted_style()),
            Span::styled(movement.user_name.clone(), styles::muted_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No movements yet - press [r] to refresh",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Recent operations ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
