use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::AppState,
    form::{AMOUNT_FIELD, NOTES_FIELD},
    ui::{components::money, theme::Theme},
};

/// Per-size input rows, in field-index order (three fields each).
const ROWS: [(&str, usize); 8] = [
    ("Load out", 0),
    ("Refill returns", 3),
    ("  price/kg", 6),
    ("Swipe returns", 9),
    ("  price/kg", 12),
    ("Full returns", 15),
    ("Outright sold", 18),
    ("  price/cyl", 21),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.form;

    let title = if form.editing.is_some() {
        "Edit transaction"
    } else {
        "Add transaction"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // header row (sizes)
            Constraint::Length(ROWS.len() as u16), // input grid
            Constraint::Length(1),               // suggested load
            Constraint::Length(1),               // payment row
            Constraint::Length(1),               // notes row
            Constraint::Length(2),               // summary
            Constraint::Min(0),                  // status / error
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{:<16}{:>10}{:>10}{:>10}", "", "6kg", "13kg", "50kg"),
            Style::default().fg(theme.dim),
        ))),
        layout[0],
    );

    let grid_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); ROWS.len()])
        .split(layout[1]);

    for (row_index, (label, base)) in ROWS.iter().enumerate() {
        let mut parts = vec![Span::styled(
            format!("{label:<16}"),
            Style::default().fg(theme.dim),
        )];
        for offset in 0..3 {
            let index = base + offset;
            let focused = form.focus == index;
            let value = form.field(index);
            let cell = format!("{value:>9}");
            let style = if focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            parts.push(Span::styled(cell, style));
            parts.push(Span::raw(if focused { "◂" } else { " " }));
        }
        frame.render_widget(
            Paragraph::new(Line::from(parts)),
            grid_rows[row_index],
        );
    }

    // ── Suggested load + divergence indicator ───────────────────────────
    let suggested = form.suggested_load();
    let mut parts = vec![Span::styled(
        format!(
            "{:<16}{:>9} {:>9} {:>9} ",
            "Suggested", suggested.kg6, suggested.kg13, suggested.kg50
        ),
        Style::default().fg(theme.dim),
    )];
    if form.load_diverges() {
        parts.push(Span::styled(
            "load differs from returns + outright (g to auto-fill)",
            Style::default().fg(theme.warning),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), layout[2]);

    // ── Payment ─────────────────────────────────────────────────────────
    let amount_focused = form.focus == AMOUNT_FIELD;
    let amount_style = if amount_focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<16}", "Amount paid"), Style::default().fg(theme.dim)),
            Span::styled(format!("{:>9}", form.amount_paid), amount_style),
            Span::raw(if amount_focused { "◂  " } else { "   " }),
            Span::styled("method ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("{:?}", form.payment_method).to_lowercase(),
                Style::default().fg(theme.text),
            ),
        ])),
        layout[3],
    );

    // ── Notes ───────────────────────────────────────────────────────────
    let notes_focused = form.focus == NOTES_FIELD;
    let notes_style = if notes_focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<16}", "Notes"), Style::default().fg(theme.dim)),
            Span::styled(form.notes.clone(), notes_style),
            Span::raw(if notes_focused { "◂" } else { "" }),
        ])),
        layout[4],
    );

    // ── Live summary (preview only; the gateway's figures are
    //    authoritative once saved) ────────────────────────────────────────
    let totals = form.totals();
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Total ", Style::default().fg(theme.dim)),
                money::styled_amount_bold(totals.total_bill.cents(), theme),
                Span::styled("   Outstanding ", Style::default().fg(theme.dim)),
                money::styled_balance(totals.financial_balance.cents(), theme),
            ]),
            Line::from(vec![
                Span::styled("Cylinder delta ", Style::default().fg(theme.dim)),
                money::styled_cylinders(totals.cylinders.total(), theme),
                Span::styled(
                    format!(
                        "  (6kg {:+}, 13kg {:+}, 50kg {:+})",
                        totals.cylinders.kg6, totals.cylinders.kg13, totals.cylinders.kg50
                    ),
                    Style::default().fg(theme.dim),
                ),
            ]),
        ]),
        layout[5],
    );

    // ── Status ──────────────────────────────────────────────────────────
    let status = if form.is_submitting() {
        Line::from(Span::styled(
            "Saving… (submit disabled)",
            Style::default().fg(theme.dim),
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status), layout[6]);
}
