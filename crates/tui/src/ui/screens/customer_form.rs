use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{AppState, CUSTOMER_FIELD_COUNT},
    ui::theme::Theme,
};

const LABELS: [&str; CUSTOMER_FIELD_COUNT] = ["Name", "Phone", "Email", "Location", "County"];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.customer_form;

    let title = if form.editing.is_some() {
        "Edit customer"
    } else {
        "New customer"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); CUSTOMER_FIELD_COUNT];
    constraints.push(Constraint::Length(2));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, label) in LABELS.iter().enumerate() {
        let focused = form.focus == i;
        let marker = if focused { "» " } else { "  " };
        let style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        let line = Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
            Span::styled(form.field(i).clone(), style),
        ]);
        frame.render_widget(Paragraph::new(line), rows[i]);
    }

    let status = if form.submitting {
        Line::from(Span::styled("Saving…", Style::default().fg(theme.dim)))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        ))
    } else {
        Line::from(Span::styled(
            "Address is derived as \"location, county\" unless set later.",
            Style::default().fg(theme.dim),
        ))
    };
    frame.render_widget(Paragraph::new(status), rows[CUSTOMER_FIELD_COUNT]);
}
