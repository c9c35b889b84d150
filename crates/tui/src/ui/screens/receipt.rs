use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, _theme: &Theme) {
    let text = state
        .receipt_text
        .as_deref()
        .unwrap_or("No receipt selected.");
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Receipt")),
        area,
    );
}
