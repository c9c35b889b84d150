//! Customer balance aggregation.
//!
//! Folds a customer's transaction history into running financial and
//! physical-cylinder balances. The fold is commutative, so transaction order
//! never matters, and an empty history yields zeros by construction.

use crate::{Money, SizeDeltas, Transaction};

/// Running totals for one customer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CustomerBalances {
    pub total_billed: Money,
    pub total_paid: Money,
    pub financial_balance: Money,
    pub cylinders: SizeDeltas,
}

impl CustomerBalances {
    pub const ZERO: CustomerBalances = CustomerBalances {
        total_billed: Money::ZERO,
        total_paid: Money::ZERO,
        financial_balance: Money::ZERO,
        cylinders: SizeDeltas::ZERO,
    };

    /// Folds the authoritative per-transaction figures into customer totals.
    #[must_use]
    pub fn aggregate<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut balances = Self::ZERO;
        for tx in transactions {
            balances.total_billed += tx.total_bill;
            balances.total_paid += tx.amount_paid;
            balances.cylinders = balances.cylinders.plus(tx.cylinders);
        }
        balances.financial_balance = balances.total_billed - balances.total_paid;
        balances
    }

    /// Net cylinders owed across all sizes.
    #[must_use]
    pub const fn cylinder_total(&self) -> i64 {
        self.cylinders.total()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        OutrightBreakdown, PaymentMethod, ReturnsBreakdown, SizeCounts, Transaction,
        TransactionTotals,
    };

    fn tx(totals: TransactionTotals, paid: Money) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            date: Utc::now(),
            load: Some(SizeCounts::ZERO),
            returns: Some(ReturnsBreakdown::default()),
            outright: Some(OutrightBreakdown::default()),
            total_load: 0,
            total_returns: 0,
            amount_paid: paid,
            payment_method: PaymentMethod::Cash,
            notes: None,
            total_bill: totals.total_bill,
            financial_balance: totals.total_bill - paid,
            cylinders: totals.cylinders,
            transaction_number: None,
        }
    }

    fn sample(bill: i64, paid: i64, kg6: i64, kg13: i64, kg50: i64) -> Transaction {
        tx(
            TransactionTotals {
                total_bill: Money::from_shillings(bill),
                financial_balance: Money::from_shillings(bill - paid),
                cylinders: SizeDeltas { kg6, kg13, kg50 },
            },
            Money::from_shillings(paid),
        )
    }

    #[test]
    fn empty_history_aggregates_to_zero() {
        let balances = CustomerBalances::aggregate([]);
        assert_eq!(balances, CustomerBalances::ZERO);
        assert_eq!(balances.cylinder_total(), 0);
    }

    #[test]
    fn sums_bills_payments_and_cylinders() {
        let txs = vec![
            sample(1_620, 810, 0, 0, 0),
            sample(8_000, 8_000, 0, 0, -1),
            sample(0, 0, 0, 3, 0),
        ];
        let balances = CustomerBalances::aggregate(&txs);
        assert_eq!(balances.total_billed, Money::from_shillings(9_620));
        assert_eq!(balances.total_paid, Money::from_shillings(8_810));
        assert_eq!(balances.financial_balance, Money::from_shillings(810));
        assert_eq!(balances.cylinders, SizeDeltas { kg6: 0, kg13: 3, kg50: -1 });
        assert_eq!(balances.cylinder_total(), 2);
    }

    #[test]
    fn order_does_not_matter() {
        let mut txs = vec![
            sample(100, 50, 1, 0, 0),
            sample(200, 200, -1, 2, 0),
            sample(50, 0, 0, 0, 1),
            sample(0, 0, 2, -2, 0),
        ];
        let forward = CustomerBalances::aggregate(&txs);
        txs.reverse();
        let backward = CustomerBalances::aggregate(&txs);
        txs.swap(0, 2);
        let shuffled = CustomerBalances::aggregate(&txs);
        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }
}
