//! Cylinder primitives.
//!
//! Everything the business trades comes in three sizes (6, 13 and 50 kg);
//! counts, per-size prices and signed per-size balances are all small value
//! types indexed by [`CylinderSize`].

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CylinderSize {
    Kg6,
    Kg13,
    Kg50,
}

impl CylinderSize {
    pub const ALL: [CylinderSize; 3] = [Self::Kg6, Self::Kg13, Self::Kg50];

    /// Weight of the size in kilograms; the per-kg billing factor.
    #[must_use]
    pub const fn kg(self) -> i64 {
        match self {
            Self::Kg6 => 6,
            Self::Kg13 => 13,
            Self::Kg50 => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kg6 => "6kg",
            Self::Kg13 => "13kg",
            Self::Kg50 => "50kg",
        }
    }
}

impl TryFrom<&str> for CylinderSize {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "6kg" => Ok(Self::Kg6),
            "13kg" => Ok(Self::Kg13),
            "50kg" => Ok(Self::Kg50),
            other => Err(EngineError::Validation(format!(
                "invalid cylinder size: {other}"
            ))),
        }
    }
}

/// Per-size cylinder counts (always non-negative).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCounts {
    pub kg6: u32,
    pub kg13: u32,
    pub kg50: u32,
}

impl SizeCounts {
    pub const ZERO: SizeCounts = SizeCounts {
        kg6: 0,
        kg13: 0,
        kg50: 0,
    };

    #[must_use]
    pub const fn new(kg6: u32, kg13: u32, kg50: u32) -> Self {
        Self { kg6, kg13, kg50 }
    }

    #[must_use]
    pub const fn get(self, size: CylinderSize) -> u32 {
        match size {
            CylinderSize::Kg6 => self.kg6,
            CylinderSize::Kg13 => self.kg13,
            CylinderSize::Kg50 => self.kg50,
        }
    }

    pub fn set(&mut self, size: CylinderSize, count: u32) {
        match size {
            CylinderSize::Kg6 => self.kg6 = count,
            CylinderSize::Kg13 => self.kg13 = count,
            CylinderSize::Kg50 => self.kg50 = count,
        }
    }

    /// Total cylinders across all sizes.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.kg6 + self.kg13 + self.kg50
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.total() == 0
    }

    /// Per-size sum of two count sets.
    #[must_use]
    pub fn plus(self, other: SizeCounts) -> SizeCounts {
        SizeCounts {
            kg6: self.kg6.saturating_add(other.kg6),
            kg13: self.kg13.saturating_add(other.kg13),
            kg50: self.kg50.saturating_add(other.kg50),
        }
    }
}

/// Signed per-size cylinder balances.
///
/// Positive means the customer holds cylinders the business has not yet
/// recovered; negative means the business owes the customer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDeltas {
    pub kg6: i64,
    pub kg13: i64,
    pub kg50: i64,
}

impl SizeDeltas {
    pub const ZERO: SizeDeltas = SizeDeltas {
        kg6: 0,
        kg13: 0,
        kg50: 0,
    };

    #[must_use]
    pub const fn get(self, size: CylinderSize) -> i64 {
        match size {
            CylinderSize::Kg6 => self.kg6,
            CylinderSize::Kg13 => self.kg13,
            CylinderSize::Kg50 => self.kg50,
        }
    }

    /// Grand total across all sizes.
    #[must_use]
    pub const fn total(self) -> i64 {
        self.kg6 + self.kg13 + self.kg50
    }

    #[must_use]
    pub fn plus(self, other: SizeDeltas) -> SizeDeltas {
        SizeDeltas {
            kg6: self.kg6 + other.kg6,
            kg13: self.kg13 + other.kg13,
            kg50: self.kg50 + other.kg50,
        }
    }
}

/// Per-size unit prices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePrices {
    pub kg6: Money,
    pub kg13: Money,
    pub kg50: Money,
}

impl SizePrices {
    #[must_use]
    pub const fn uniform(price: Money) -> Self {
        Self {
            kg6: price,
            kg13: price,
            kg50: price,
        }
    }

    #[must_use]
    pub const fn new(kg6: Money, kg13: Money, kg50: Money) -> Self {
        Self { kg6, kg13, kg50 }
    }

    #[must_use]
    pub const fn get(self, size: CylinderSize) -> Money {
        match size {
            CylinderSize::Kg6 => self.kg6,
            CylinderSize::Kg13 => self.kg13,
            CylinderSize::Kg50 => self.kg50,
        }
    }

    pub fn set(&mut self, size: CylinderSize, price: Money) {
        match size {
            CylinderSize::Kg6 => self.kg6 = price,
            CylinderSize::Kg13 => self.kg13 = price,
            CylinderSize::Kg50 => self.kg50 = price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_index_by_size() {
        let counts = SizeCounts::new(2, 3, 1);
        assert_eq!(counts.get(CylinderSize::Kg6), 2);
        assert_eq!(counts.get(CylinderSize::Kg13), 3);
        assert_eq!(counts.get(CylinderSize::Kg50), 1);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn deltas_sum_per_size() {
        let a = SizeDeltas {
            kg6: 2,
            kg13: -1,
            kg50: 0,
        };
        let b = SizeDeltas {
            kg6: -2,
            kg13: 4,
            kg50: 1,
        };
        let sum = a.plus(b);
        assert_eq!(sum.kg6, 0);
        assert_eq!(sum.kg13, 3);
        assert_eq!(sum.kg50, 1);
        assert_eq!(sum.total(), 4);
    }

    #[test]
    fn size_string_round_trip() {
        for size in CylinderSize::ALL {
            assert_eq!(CylinderSize::try_from(size.as_str()).unwrap(), size);
        }
        assert!(CylinderSize::try_from("12kg").is_err());
    }
}
