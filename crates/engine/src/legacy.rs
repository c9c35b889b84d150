//! Adapter for the legacy flat transaction shape.
//!
//! Early deployments recorded each visit as a flat bag of per-field counts
//! and prices (`return6kg`, `refillPrice6kg`, `swipeReturn13kg`, ...). The
//! adapter converts that shape into the canonical breakdown model at the
//! data-access boundary, so calculation code never branches on shape.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Money, OutrightBreakdown, PricedCounts, ReturnsBreakdown, SizeCounts, SizePrices,
};

/// Flat per-cylinder prices the legacy form defaulted to for outright sales.
/// They differ from the canonical defaults and are preserved only here so
/// imported history keeps its meaning.
pub const LEGACY_OUTRIGHT_PRICES: SizePrices = SizePrices::new(
    Money::from_shillings(3_200),
    Money::from_shillings(3_500),
    Money::from_shillings(8_500),
);

/// One visit recorded under the legacy flat model.
///
/// Refill and swipe prices were already per-kg unit prices; outright prices
/// were flat per cylinder. The flat model had no `return_full` category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub customer_id: Uuid,
    pub date: DateTime<Utc>,
    /// `totalCylinders*`: cylinders handed out.
    pub load: SizeCounts,
    /// `return*`: company-brand empties returned for refill.
    pub returns: SizeCounts,
    /// `refillPrice*` (per kg).
    pub refill_prices: SizePrices,
    /// `swipeReturn*`: competitor-brand swipes.
    pub swipe_returns: SizeCounts,
    /// `swipeRefillPrice*` (per kg).
    pub swipe_prices: SizePrices,
    /// `outright*`: brand-new cylinders sold.
    pub outright: SizeCounts,
    /// `outrightPrice*` (flat per cylinder).
    pub outright_prices: SizePrices,
    pub paid: Money,
    pub notes: Option<String>,
}

impl LegacyTransaction {
    /// Converts the flat fields into canonical breakdowns.
    #[must_use]
    pub fn into_breakdowns(self) -> (SizeCounts, ReturnsBreakdown, OutrightBreakdown) {
        let returns = ReturnsBreakdown {
            max_empty: PricedCounts {
                counts: self.returns,
                prices: self.refill_prices,
            },
            swap_empty: PricedCounts {
                counts: self.swipe_returns,
                prices: self.swipe_prices,
            },
            return_full: SizeCounts::ZERO,
        };
        let outright = OutrightBreakdown {
            counts: self.outright,
            prices: self.outright_prices,
        };
        (self.load, returns, outright)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CylinderSize, totals};

    #[test]
    fn flat_fields_map_onto_breakdowns() {
        let legacy = LegacyTransaction {
            customer_id: Uuid::new_v4(),
            date: Utc::now(),
            load: SizeCounts::new(3, 0, 0),
            returns: SizeCounts::new(2, 0, 0),
            refill_prices: SizePrices::uniform(Money::from_shillings(135)),
            swipe_returns: SizeCounts::new(1, 0, 0),
            swipe_prices: SizePrices::uniform(Money::from_shillings(160)),
            outright: SizeCounts::new(0, 1, 0),
            outright_prices: LEGACY_OUTRIGHT_PRICES,
            paid: Money::from_shillings(1_000),
            notes: Some("old ledger".to_string()),
        };

        let (load, returns, outright) = legacy.into_breakdowns();
        assert_eq!(load, SizeCounts::new(3, 0, 0));
        assert_eq!(returns.max_empty.count(CylinderSize::Kg6), 2);
        assert_eq!(returns.swap_empty.count(CylinderSize::Kg6), 1);
        assert_eq!(returns.return_full, SizeCounts::ZERO);
        assert_eq!(outright.count(CylinderSize::Kg13), 1);
        assert_eq!(
            outright.price(CylinderSize::Kg13),
            Money::from_shillings(3_500)
        );

        // The canonical calculator prices the converted visit: per-kg for
        // refills and swipes, flat for the outright sale.
        let bill = totals::refill_amount(&returns) + totals::outright_amount(&outright);
        let expected = 2 * 135 * 6 + 160 * 6 + 3_500;
        assert_eq!(bill, Money::from_shillings(expected));
    }
}
