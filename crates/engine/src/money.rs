use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer cents** of Kenyan Shillings.
///
/// Use this type for **all** monetary values in the engine (bills, payments,
/// balances, unit prices) to avoid floating-point drift. Decimal conversion
/// happens only at the wire boundary.
///
/// The value is signed:
/// - positive = owed to the business
/// - negative = owed to the customer
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::from_shillings(1_620);
/// assert_eq!(amount.cents(), 162_000);
/// assert_eq!(amount.to_string(), "Ksh 1,620.00");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new amount from whole shillings.
    #[must_use]
    pub const fn from_shillings(shillings: i64) -> Self {
        Self(shillings * 100)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Half of the amount, rounded down to the cent. Used by the "Half"
    /// payment quick-fill.
    #[must_use]
    pub const fn half(self) -> Money {
        Money(self.0 / 2)
    }
}

impl fmt::Display for Money {
    /// Renders the amount the way receipts show it: `Ksh 1,620.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let shillings = abs / 100;
        let cents = abs % 100;

        // Group thousands with commas (en-KE convention).
        let digits = shillings.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}Ksh {grouped}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts comma grouping (`1,620.50`) and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::Validation("empty amount".to_string());
        let invalid = || EngineError::Validation("invalid amount".to_string());
        let overflow = || EngineError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim().replace(',', "");
        if rest.is_empty() {
            return Err(empty());
        }

        let mut parts = rest.split('.');
        let whole_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if whole_str.is_empty() || !whole_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let shillings: i64 = whole_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::Validation("too many decimals".to_string())),
                }
            }
        };

        let total = shillings
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_kes() {
        assert_eq!(Money::from_cents(0).to_string(), "Ksh 0.00");
        assert_eq!(Money::from_cents(1).to_string(), "Ksh 0.01");
        assert_eq!(Money::from_shillings(810).to_string(), "Ksh 810.00");
        assert_eq!(Money::from_shillings(1_620).to_string(), "Ksh 1,620.00");
        assert_eq!(
            Money::from_cents(1_234_567_89).to_string(),
            "Ksh 1,234,567.89"
        );
        assert_eq!(Money::from_cents(-1050).to_string(), "-Ksh 10.50");
    }

    #[test]
    fn parse_accepts_grouping_and_decimals() {
        assert_eq!("135".parse::<Money>().unwrap().cents(), 13_500);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1_050);
        assert_eq!("1,620.00".parse::<Money>().unwrap().cents(), 162_000);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("  8000 ".parse::<Money>().unwrap().cents(), 800_000);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn half_rounds_down_to_cent() {
        assert_eq!(Money::from_shillings(1_620).half(), Money::from_shillings(810));
        assert_eq!(Money::from_cents(101).half(), Money::from_cents(50));
    }
}
