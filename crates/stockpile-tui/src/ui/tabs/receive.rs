use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_qty, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    render_scanner_panel(frame, app, chunks[0]);
    render_session_lines(frame, app, chunks[1]);
}

fn render_scanner_panel(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if app.scanner.is_armed() {
        lines.push(Line::from(vec![
            Span::styled(" SCANNING ", styles::tab_style(true)),
            Span::styled(
                " - listening for scanner input, Esc stops",
                styles::muted_style(),
            ),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled(" Idle ", styles::muted_style()),
            Span::styled("- press [s] to start scanning", styles::muted_style()),
        ]));
    }
    lines.push(Line::from(""));

    match &app.lookup_result {
        Some(info) => {
            lines.push(Line::from(vec![
                Span::styled(" Database hit: ", styles::highlight_style()),
                Span::raw(info.summary()),
            ]));
            if let Some(ref category) = info.category {
                lines.push(Line::from(Span::styled(
                    format!("   Category: {}", truncate_string(category, 60)),
                    styles::muted_style(),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("   Barcode {} - add it to the catalog to receive it", info.barcode),
                styles::muted_style(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                " Unknown codes are looked up in the external product database",
                styles::muted_style(),
            )));
        }
    }

    let block = Block::default()
        .title(" Barcode receiving ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.scanner.is_armed()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_session_lines(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .receiving
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = Line::from(vec![
                Span::raw(format!(
                    " {:<34} {:<14}",
                    truncate_string(&line.name, 34),
                    line.inventory_number
                )),
                Span::styled(
                    format!("x{}", format_qty(line.quantity)),
                    styles::success_style(),
                ),
                Span::styled(
                    format!("  {}", line.scanned_at.format("%H:%M:%S")),
                    styles::muted_style(),
                ),
            ]);
            let style = if i == app.receive_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let title = if app.receiving.is_empty() {
        " Scanned items ".to_string()
    } else {
        format!(
            " Scanned items ({} units, {} lines) - [p] posts incoming movements ",
            format_qty(app.receiving.total_quantity()),
            app.receiving.lines().len()
        )
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!app.scanner.is_armed()));

    if items.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            " Scan a code to add items; +/- adjust, [d] removes, [c] clears",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.receive_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
