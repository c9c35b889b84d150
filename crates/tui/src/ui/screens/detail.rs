use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(detail) = &state.detail else {
        frame.render_widget(
            Paragraph::new("No customer selected.")
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    // ── Stored aggregates (authoritative, from the gateway) ─────────────
    let customer = &detail.customer;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(customer.name.clone(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(customer.phone.clone(), Style::default().fg(theme.dim)),
            Span::raw("   "),
            Span::styled(customer.address.clone(), Style::default().fg(theme.dim)),
        ]),
        Line::from(vec![
            Span::styled("Billed ", Style::default().fg(theme.dim)),
            money::styled_amount(customer.total_billed, theme),
            Span::styled("   Paid ", Style::default().fg(theme.dim)),
            money::styled_amount(customer.total_paid, theme),
            Span::styled("   Outstanding ", Style::default().fg(theme.dim)),
            money::styled_balance(customer.financial_balance, theme),
        ]),
        Line::from(vec![
            Span::styled("Cylinders owed ", Style::default().fg(theme.dim)),
            money::styled_cylinders(customer.cylinder_balance, theme),
            Span::styled(
                format!(
                    "   (6kg {:+}, 13kg {:+}, 50kg {:+})",
                    customer.cylinder_balance_6kg,
                    customer.cylinder_balance_13kg,
                    customer.cylinder_balance_50kg
                ),
                Style::default().fg(theme.dim),
            ),
        ]),
    ];
    if let Some(consistency) = &detail.consistency {
        let style = if consistency.starts_with("WARNING") {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.positive)
        };
        lines.push(Line::from(Span::styled(consistency.clone(), style)));
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Customer")),
        layout[0],
    );

    // ── Transaction history, newest first ───────────────────────────────
    let items = detail
        .transactions
        .iter()
        .map(|tx| {
            let number = tx.transaction_number.as_deref().unwrap_or("----");
            let date = tx
                .date
                .with_timezone(&state.timezone)
                .format("%d %b %Y")
                .to_string();
            let bill = engine::Money::from_cents(tx.total_bill).to_string();
            let owed = engine::Money::from_cents(tx.financial_balance).to_string();
            let text = format!(
                "{number}  {date}  bill {bill:<16} owed {owed:<16} cyl {:+}",
                tx.cylinder_balance
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(detail.selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Transactions ({})", detail.transactions.len())),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, layout[1], &mut list_state);
}
