pub use balances::CustomerBalances;
pub use breakdown::{
    DEFAULT_MAX_EMPTY_PRICES, DEFAULT_OUTRIGHT_PRICES, DEFAULT_SWAP_EMPTY_PRICES,
    OutrightBreakdown, PricedCounts, ReturnsBreakdown,
};
pub use customers::{Customer, CustomerCategory};
pub use cylinders::{CylinderSize, SizeCounts, SizeDeltas, SizePrices};
pub use error::EngineError;
pub use legacy::{LEGACY_OUTRIGHT_PRICES, LegacyTransaction};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, NewCustomer, NewTransaction, UpdateCustomer};
pub use totals::{
    TransactionTotals, outright_amount, reconcile, refill_amount, refill_line_total,
    suggested_load,
};
pub use transactions::{PaymentMethod, Transaction};

mod balances;
mod breakdown;
mod customers;
mod cylinders;
mod error;
mod legacy;
mod money;
mod ops;
pub mod totals;
mod transactions;

pub(crate) mod util;

type ResultEngine<T> = Result<T, EngineError>;
