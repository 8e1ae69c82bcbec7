use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use stockpile_core::models::Role;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let role_style = match user.role {
                Role::Admin => styles::highlight_style(),
                Role::User => styles::muted_style(),
            };
            let line = Line::from(vec![
                Span::raw(format!(" {:<24} {:<18}", user.name, user.username)),
                Span::styled(user.role.label(), role_style),
            ]);
            let style = if i == app.users_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Operators ({}) ", app.users.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            " No operators loaded - press [r] to refresh",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.users_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
