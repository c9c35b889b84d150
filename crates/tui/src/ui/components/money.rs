use engine::Money;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Styled span for a money amount with semantic coloring: red when the
/// customer owes money, green when settled or in credit.
#[must_use]
pub fn styled_balance(cents: i64, theme: &Theme) -> Span<'static> {
    let money = Money::from_cents(cents);
    let color = if money.is_positive() {
        theme.negative
    } else {
        theme.positive
    };
    Span::styled(money.to_string(), Style::default().fg(color))
}

/// Styled span for a plain amount (bills, payments), no semantics.
#[must_use]
pub fn styled_amount(cents: i64, theme: &Theme) -> Span<'static> {
    Span::styled(
        Money::from_cents(cents).to_string(),
        Style::default().fg(theme.text),
    )
}

/// Bold variant for totals.
#[must_use]
pub fn styled_amount_bold(cents: i64, theme: &Theme) -> Span<'static> {
    Span::styled(
        Money::from_cents(cents).to_string(),
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    )
}

/// Cylinder balance span: positive counts (customer holds our cylinders)
/// render amber, negative green, zero dim.
#[must_use]
pub fn styled_cylinders(count: i64, theme: &Theme) -> Span<'static> {
    let color = if count > 0 {
        theme.warning
    } else if count < 0 {
        theme.positive
    } else {
        theme.dim
    };
    Span::styled(format!("{count:+}"), Style::default().fg(color))
}
