use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_signed_qty, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .movements
        .iter()
        .enumerate()
        .map(|(i, movement)| {
            let qty_style = if movement.quantity > 0.0 {
                styles::success_style()
            } else {
                styles::error_style()
            };
            let line = Line::from(vec![
                Span::styled(format!(" {} ", movement.date()), styles::muted_style()),
                Span::styled(
                    format!("{:>8} ", format_signed_qty(movement.quantity)),
                    qty_style,
                ),
                Span::raw(format!(
                    "{:<36} ",
                    truncate_string(&movement.product_name, 36)
                )),
                Span::styled(format!("{:<10} ", movement.kind.label()), styles::muted_style()),
                Span::styled(movement.user_name.clone(), styles::muted_style()),
            ]);
            let style = if i == app.history_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Movement history ({}) ", app.movements.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.history_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
