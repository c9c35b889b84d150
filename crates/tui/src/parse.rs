//! Lenient numeric parsing for form input.
//!
//! Malformed input anywhere in the transaction form coerces to zero instead
//! of raising, so the form stays renderable mid-keystroke. This module is
//! the single home of that policy; nothing else in the client silently
//! absorbs bad numbers.

use engine::Money;

/// Clamped non-negative integer parse; anything unparseable is 0.
#[must_use]
pub fn quantity(input: &str) -> u32 {
    input.trim().parse::<u32>().unwrap_or(0)
}

/// Non-negative KES amount parse; unparseable or negative input is 0.
#[must_use]
pub fn amount(input: &str) -> Money {
    match input.trim().parse::<Money>() {
        Ok(money) if !money.is_negative() => money,
        _ => Money::ZERO,
    }
}

/// Formats cents back into the plain decimal notation the form edits
/// (`810`, `135.5`); the inverse of [`amount`] for round-tripping values
/// into input fields.
#[must_use]
pub fn amount_input(money: Money) -> String {
    let cents = money.cents();
    if cents % 100 == 0 {
        format!("{}", cents / 100)
    } else {
        format!("{}.{:02}", cents / 100, (cents % 100).abs())
    }
}
