use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items = state
        .customers
        .iter()
        .map(|customer| {
            let balance = engine::Money::from_cents(customer.financial_balance);
            let text = format!(
                "{:<28} {:<14} {:<10} owes {}  cyl {:+}",
                customer.name,
                customer.phone,
                category_label(customer.category),
                balance,
                customer.cylinder_balance,
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Customers ({})", state.customers.len())),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn category_label(category: api_types::customer::CustomerCategory) -> &'static str {
    match category {
        api_types::customer::CustomerCategory::Regular => "regular",
        api_types::customer::CustomerCategory::Vip => "vip",
        api_types::customer::CustomerCategory::New => "new",
    }
}
