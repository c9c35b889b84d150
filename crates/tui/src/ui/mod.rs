pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(0),    // content
            Constraint::Length(1), // hint bar
        ])
        .split(area);

    render_title_bar(frame, layout[0], state, &theme);

    match state.screen {
        Screen::Customers => screens::customers::render(frame, layout[1], state, &theme),
        Screen::CustomerForm => screens::customer_form::render(frame, layout[1], state, &theme),
        Screen::Detail => screens::detail::render(frame, layout[1], state, &theme),
        Screen::TransactionForm => screens::form::render(frame, layout[1], state, &theme),
        Screen::Receipt => screens::receipt::render(frame, layout[1], state, &theme),
        Screen::ConfirmDelete => {
            screens::detail::render(frame, layout[1], state, &theme);
            screens::confirm::render(frame, area, state, &theme);
        }
    }

    render_hint_bar(frame, layout[2], state, &theme);
}

fn render_title_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = vec![
        Span::styled("Silinda", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled(screen_label(state.screen), Style::default().fg(theme.dim)),
    ];
    if let Some(toast) = &state.toast {
        parts.push(Span::raw("  "));
        parts.push(Span::styled(
            toast.as_str().to_string(),
            Style::default().fg(theme.warning),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Customers => "Customers",
        Screen::CustomerForm => "Customer form",
        Screen::Detail => "Customer detail",
        Screen::TransactionForm => "Transaction",
        Screen::Receipt => "Receipt",
        Screen::ConfirmDelete => "Delete customer",
    }
}

fn render_hint_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints: &[(&str, &str)] = match state.screen {
        Screen::Customers => &[
            ("↑↓", "select"),
            ("Enter", "open"),
            ("n", "new"),
            ("r", "refresh"),
            ("q", "quit"),
        ],
        Screen::CustomerForm => &[("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")],
        Screen::Detail => &[
            ("a", "add tx"),
            ("e", "edit tx"),
            ("v", "receipt"),
            ("x", "delete tx"),
            ("u", "edit customer"),
            ("d", "delete customer"),
            ("r", "verify"),
            ("Esc", "back"),
        ],
        Screen::TransactionForm => &[
            ("Tab", "next"),
            ("g", "auto-fill load"),
            ("f/h/n", "paid full/half/none"),
            ("p", "method"),
            ("Enter", "save"),
            ("Esc", "cancel"),
        ],
        Screen::Receipt => &[("Esc", "back")],
        Screen::ConfirmDelete => &[("Enter", "confirm"), ("Esc", "cancel")],
    };

    let mut parts: Vec<Span<'static>> = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        parts.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.accent),
        ));
        parts.push(Span::raw(format!(" {label}")));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
