//! Transaction total calculator.
//!
//! Pure functions from a visit's breakdown data to its bill, outstanding
//! amount and per-size cylinder deltas. These run both server-side (where
//! the results become the authoritative stored fields) and client-side (for
//! the live preview while a transaction is being entered), so they must stay
//! free of I/O and state.

use crate::{
    CylinderSize, EngineError, Money, OutrightBreakdown, ResultEngine, ReturnsBreakdown,
    SizeCounts, SizeDeltas,
};

/// Line total for a billed return: `count * unit_price * kg`.
///
/// The unit price is per kilogram, so a 13 kg cylinder at price `p`
/// contributes `count * p * 13`, not `count * p`.
#[must_use]
pub fn refill_line_total(count: u32, unit_price: Money, size: CylinderSize) -> Money {
    Money::from_cents(i64::from(count) * unit_price.cents() * size.kg())
}

/// Billed amount for the returns leg: refills plus swipes, per kg.
/// `return_full` contributes nothing.
#[must_use]
pub fn refill_amount(returns: &ReturnsBreakdown) -> Money {
    let mut total = Money::ZERO;
    for size in CylinderSize::ALL {
        total += refill_line_total(returns.max_empty.count(size), returns.max_empty.price(size), size);
        total += refill_line_total(
            returns.swap_empty.count(size),
            returns.swap_empty.price(size),
            size,
        );
    }
    total
}

/// Billed amount for outright sales: `count * price` per size, flat.
#[must_use]
pub fn outright_amount(outright: &OutrightBreakdown) -> Money {
    let mut total = Money::ZERO;
    for size in CylinderSize::ALL {
        total += Money::from_cents(i64::from(outright.count(size)) * outright.price(size).cents());
    }
    total
}

/// Load the form suggests from what was brought in and bought:
/// `returns + outright` per size. Informational; the operator may enter a
/// different load.
#[must_use]
pub fn suggested_load(returns: &ReturnsBreakdown, outright: &OutrightBreakdown) -> SizeCounts {
    returns.total_counts().plus(outright.counts)
}

/// Same-visit reconciliation rule: for every size, the load handed out must
/// equal the cylinders brought in across the three return categories.
///
/// The message is deliberately coarse (it names the rule, not the size).
pub fn reconcile(load: SizeCounts, returns: &ReturnsBreakdown) -> ResultEngine<()> {
    for size in CylinderSize::ALL {
        if load.get(size) != returns.counts_for(size) {
            return Err(EngineError::Reconciliation(
                "cylinder counts do not reconcile: total load must match total returns"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

/// Everything derived from one transaction's raw breakdown data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionTotals {
    pub total_bill: Money,
    pub financial_balance: Money,
    pub cylinders: SizeDeltas,
}

impl TransactionTotals {
    /// Computes bill, outstanding amount and per-size cylinder deltas.
    ///
    /// `cylinders[size] = load - returns - outright`: positive means the
    /// customer still holds cylinders of ours, negative means we owe them.
    /// Outright cylinders leave ownership permanently, so they subtract from
    /// the loan balance rather than adding to it.
    #[must_use]
    pub fn compute(
        load: SizeCounts,
        returns: &ReturnsBreakdown,
        outright: &OutrightBreakdown,
        amount_paid: Money,
    ) -> Self {
        let total_bill = refill_amount(returns) + outright_amount(outright);

        let mut cylinders = SizeDeltas::ZERO;
        for size in CylinderSize::ALL {
            let delta = i64::from(load.get(size))
                - i64::from(returns.counts_for(size))
                - i64::from(outright.count(size));
            match size {
                CylinderSize::Kg6 => cylinders.kg6 = delta,
                CylinderSize::Kg13 => cylinders.kg13 = delta,
                CylinderSize::Kg50 => cylinders.kg50 = delta,
            }
        }

        Self {
            total_bill,
            financial_balance: total_bill - amount_paid,
            cylinders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    fn shs(v: i64) -> Money {
        Money::from_shillings(v)
    }

    #[test]
    fn refill_lines_multiply_by_kg() {
        assert_eq!(
            refill_line_total(2, shs(135), CylinderSize::Kg6),
            shs(2 * 135 * 6)
        );
        assert_eq!(
            refill_line_total(3, shs(160), CylinderSize::Kg13),
            shs(3 * 160 * 13)
        );
        assert_eq!(refill_line_total(0, shs(135), CylinderSize::Kg50), Money::ZERO);
    }

    #[test]
    fn outright_lines_are_flat() {
        let mut outright = OutrightBreakdown::default();
        outright.counts.kg50 = 1;
        assert_eq!(outright_amount(&outright), shs(8_000));

        outright.counts.kg6 = 2;
        assert_eq!(outright_amount(&outright), shs(8_000 + 2 * 2_200));
    }

    #[test]
    fn return_full_is_free() {
        let mut returns = ReturnsBreakdown::default();
        returns.return_full.kg13 = 4;
        assert_eq!(refill_amount(&returns), Money::ZERO);
    }

    #[test]
    fn settled_refill_visit() {
        // Customer brings 2x6kg company empties at 135/kg and takes the two
        // refilled cylinders back out.
        let mut returns = ReturnsBreakdown::default();
        returns.max_empty.counts.kg6 = 2;
        let load = SizeCounts::new(2, 0, 0);

        let totals = TransactionTotals::compute(
            load,
            &returns,
            &OutrightBreakdown::default(),
            Money::ZERO,
        );
        assert_eq!(totals.total_bill, shs(1_620));
        assert_eq!(totals.cylinders, SizeDeltas::ZERO);
        assert!(reconcile(load, &returns).is_ok());
    }

    #[test]
    fn unreturned_load_owes_cylinders_and_fails_reconciliation() {
        let returns = ReturnsBreakdown::default();
        let load = SizeCounts::new(0, 3, 0);

        let totals = TransactionTotals::compute(
            load,
            &returns,
            &OutrightBreakdown::default(),
            Money::ZERO,
        );
        assert_eq!(totals.cylinders.kg13, 3);
        assert_eq!(totals.total_bill, Money::ZERO);

        let err = reconcile(load, &returns).unwrap_err();
        assert!(matches!(err, EngineError::Reconciliation(_)));
    }

    #[test]
    fn outright_sale_leaves_ownership() {
        let mut outright = OutrightBreakdown::default();
        outright.counts.kg50 = 1;
        let totals = TransactionTotals::compute(
            SizeCounts::ZERO,
            &ReturnsBreakdown::default(),
            &outright,
            Money::ZERO,
        );
        assert_eq!(totals.total_bill, shs(8_000));
        assert_eq!(totals.cylinders.kg50, -1);
        // Reconciliation only constrains load against returns; a pure
        // outright sale with zero load passes.
        assert!(reconcile(SizeCounts::ZERO, &ReturnsBreakdown::default()).is_ok());
    }

    #[test]
    fn financial_balance_subtracts_payment() {
        let mut returns = ReturnsBreakdown::default();
        returns.max_empty.counts.kg6 = 2;
        let totals = TransactionTotals::compute(
            SizeCounts::new(2, 0, 0),
            &returns,
            &OutrightBreakdown::default(),
            shs(810),
        );
        assert_eq!(totals.financial_balance, shs(810));
    }

    #[test]
    fn suggested_load_sums_returns_and_outright() {
        let mut returns = ReturnsBreakdown::default();
        returns.max_empty.counts.kg6 = 2;
        returns.return_full.kg13 = 1;
        let mut outright = OutrightBreakdown::default();
        outright.counts.kg13 = 1;

        let suggested = suggested_load(&returns, &outright);
        assert_eq!(suggested, SizeCounts::new(2, 2, 0));
    }

    #[test]
    fn mixed_visit_matches_hand_calculation() {
        // 1x13kg refill at 135/kg + 2x6kg swipe at 160/kg + 1x6kg outright.
        let mut returns = ReturnsBreakdown::default();
        returns.max_empty.counts.kg13 = 1;
        returns.swap_empty.counts.kg6 = 2;
        let mut outright = OutrightBreakdown::default();
        outright.counts.kg6 = 1;

        let load = suggested_load(&returns, &outright);
        let totals = TransactionTotals::compute(load, &returns, &outright, Money::ZERO);

        let expected = 135 * 13 + 2 * 160 * 6 + 2_200;
        assert_eq!(totals.total_bill, shs(expected));
        // load = returns + outright per size, so the outright term leaves
        // each delta at zero.
        assert_eq!(totals.cylinders, SizeDeltas::ZERO);
    }
}
