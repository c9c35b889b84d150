use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

/// Centered modal asking the operator to type the customer's exact name.
/// Deleting a customer cascades to all their transactions, so the
/// confirmation is deliberately two-step.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(detail) = &state.detail else {
        return;
    };

    let modal = centered(area, 60, 7);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title("Delete customer");
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(format!(
                "This deletes {} and ALL their transactions.",
                detail.customer.name
            )),
            Line::from(Span::styled(
                "Type the customer's exact name to confirm:",
                Style::default().fg(theme.dim),
            )),
        ]),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::raw(state.confirm.typed.clone()),
            Span::raw("◂"),
        ])),
        rows[1],
    );

    if let Some(error) = &state.confirm.error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error),
            ))),
            rows[2],
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
