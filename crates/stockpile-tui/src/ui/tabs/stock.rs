use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_money, format_qty, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let products = app.filtered_products();

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Inv. number"),
        Cell::from("Qty"),
        Cell::from("Batch"),
        Cell::from("Price"),
        Cell::from("Status"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let status = product.status();
            let row = Row::new(vec![
                Cell::from(truncate_string(&product.name, 34)),
                Cell::from(product.inventory_number.clone()),
                Cell::from(format!(
                    "{} {}",
                    format_qty(product.quantity),
                    product.unit_label()
                )),
                Cell::from(product.batch.clone().unwrap_or_default()),
                Cell::from(format_money(product.price)),
                Cell::from(Span::styled(status.label(), styles::stock_status_style(status))),
            ]);
            if i == app.stock_selection {
                row.style(styles::selected_style())
            } else {
                row.style(styles::list_item_style())
            }
        })
        .collect();

    let title = if app.search_query.is_empty() {
        format!(" Stock ({}) ", products.len())
    } else {
        format!(" Stock ({}) - search: {} ", products.len(), app.search_query)
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default();
    state.select(Some(app.stock_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
