use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_money, format_qty, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_act_list(frame, app, chunks[0]);
    render_act_detail(frame, app, chunks[1]);
}

fn render_act_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .acts
        .iter()
        .enumerate()
        .map(|(i, act)| {
            let draft = if act.is_draft { " [draft]" } else { "" };
            let line = Line::from(vec![
                Span::raw(format!(" {:<14} {} ", act.act_number, act.act_date)),
                Span::styled(
                    format!(
                        "{} items, {}{}",
                        act.items.len(),
                        format_money(act.total_sum()),
                        draft
                    ),
                    styles::muted_style(),
                ),
            ]);
            let style = if i == app.acts_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Write-off acts ({}) ", app.acts.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            " No saved acts - press [r] to refresh",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.acts_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_act_detail(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.acts.get(app.acts_selection);

    let (title, lines) = match selected {
        Some(act) => {
            let mut lines = Vec::new();
            if let Some(ref responsible) = act.responsible_person {
                lines.push(Line::from(vec![
                    Span::styled("Responsible: ", styles::highlight_style()),
                    Span::raw(responsible.clone()),
                ]));
            }
            if !act.commission_members.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Commission: ", styles::highlight_style()),
                    Span::raw(act.commission_members.join(", ")),
                ]));
            }
            lines.push(Line::from(""));

            for (idx, item) in act.items.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::raw(format!(
                        " {:>2}. {:<30} {:<10} x{:<6}",
                        idx + 1,
                        truncate_string(&item.name, 30),
                        item.inventory_number,
                        format_qty(item.quantity),
                    )),
                    Span::styled(format_money(item.amount()), styles::muted_style()),
                ]));
                if !item.reason.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("      {}", item.reason),
                        styles::muted_style(),
                    )));
                }
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Total: {}", format_money(act.total_sum())),
                styles::success_style(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[Enter] exports a printable document",
                styles::muted_style(),
            )));

            (format!(" Act {} ", act.act_number), lines)
        }
        None => (
            " No act selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select an act from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
