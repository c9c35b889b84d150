//! Per-visit cylinder movement breakdowns.
//!
//! A visit moves cylinders in three ways and each is billed differently:
//!
//! - returns for refill (`max_empty`, company brand) and swipes
//!   (`swap_empty`, competitor brand) are billed **per kg**;
//! - full cylinders handed back (`return_full`) carry no fee;
//! - outright sales of brand-new cylinders are billed **per cylinder**.

use serde::{Deserialize, Serialize};

use crate::{CylinderSize, Money, SizeCounts, SizePrices};

/// Default per-kg refill price for company-brand empties.
pub const DEFAULT_MAX_EMPTY_PRICES: SizePrices = SizePrices::uniform(Money::from_shillings(135));

/// Default per-kg price for competitor-brand swipes.
pub const DEFAULT_SWAP_EMPTY_PRICES: SizePrices = SizePrices::uniform(Money::from_shillings(160));

/// Default flat per-cylinder prices for outright sales.
pub const DEFAULT_OUTRIGHT_PRICES: SizePrices = SizePrices::new(
    Money::from_shillings(2_200),
    Money::from_shillings(4_400),
    Money::from_shillings(8_000),
);

/// Counts of a billed category together with its per-size unit prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedCounts {
    pub counts: SizeCounts,
    pub prices: SizePrices,
}

impl PricedCounts {
    #[must_use]
    pub const fn zero(prices: SizePrices) -> Self {
        Self {
            counts: SizeCounts::ZERO,
            prices,
        }
    }

    #[must_use]
    pub const fn count(self, size: CylinderSize) -> u32 {
        self.counts.get(size)
    }

    #[must_use]
    pub const fn price(self, size: CylinderSize) -> Money {
        self.prices.get(size)
    }
}

/// Cylinders the customer brought in, split into the three return
/// categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnsBreakdown {
    /// Company-brand empty returned for refill, billed per kg.
    pub max_empty: PricedCounts,
    /// Competitor-brand empty swapped ("swipe"), billed per kg.
    pub swap_empty: PricedCounts,
    /// Full cylinder handed back as-is; no fee.
    pub return_full: SizeCounts,
}

impl Default for ReturnsBreakdown {
    fn default() -> Self {
        Self {
            max_empty: PricedCounts::zero(DEFAULT_MAX_EMPTY_PRICES),
            swap_empty: PricedCounts::zero(DEFAULT_SWAP_EMPTY_PRICES),
            return_full: SizeCounts::ZERO,
        }
    }
}

impl ReturnsBreakdown {
    /// Cylinders brought in for one size, across all three categories.
    #[must_use]
    pub const fn counts_for(&self, size: CylinderSize) -> u32 {
        self.max_empty.count(size) + self.swap_empty.count(size) + self.return_full.get(size)
    }

    /// Per-size totals across the three categories.
    #[must_use]
    pub fn total_counts(&self) -> SizeCounts {
        self.max_empty
            .counts
            .plus(self.swap_empty.counts)
            .plus(self.return_full)
    }

    /// Total cylinders brought in.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_counts().total()
    }
}

/// Brand-new cylinders sold outright, billed per cylinder (no kg factor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutrightBreakdown {
    pub counts: SizeCounts,
    pub prices: SizePrices,
}

impl Default for OutrightBreakdown {
    fn default() -> Self {
        Self {
            counts: SizeCounts::ZERO,
            prices: DEFAULT_OUTRIGHT_PRICES,
        }
    }
}

impl OutrightBreakdown {
    #[must_use]
    pub const fn count(&self, size: CylinderSize) -> u32 {
        self.counts.get(size)
    }

    #[must_use]
    pub const fn price(&self, size: CylinderSize) -> Money {
        self.prices.get(size)
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.counts.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_standard_prices_and_zero_counts() {
        let returns = ReturnsBreakdown::default();
        assert_eq!(returns.total(), 0);
        assert_eq!(
            returns.max_empty.price(CylinderSize::Kg13),
            Money::from_shillings(135)
        );
        assert_eq!(
            returns.swap_empty.price(CylinderSize::Kg50),
            Money::from_shillings(160)
        );

        let outright = OutrightBreakdown::default();
        assert_eq!(outright.total(), 0);
        assert_eq!(outright.price(CylinderSize::Kg6), Money::from_shillings(2_200));
        assert_eq!(outright.price(CylinderSize::Kg13), Money::from_shillings(4_400));
        assert_eq!(outright.price(CylinderSize::Kg50), Money::from_shillings(8_000));
    }

    #[test]
    fn counts_for_sums_all_three_categories() {
        let mut returns = ReturnsBreakdown::default();
        returns.max_empty.counts.kg6 = 2;
        returns.swap_empty.counts.kg6 = 1;
        returns.return_full.kg6 = 3;
        assert_eq!(returns.counts_for(CylinderSize::Kg6), 6);
        assert_eq!(returns.counts_for(CylinderSize::Kg13), 0);
        assert_eq!(returns.total(), 6);
    }
}
