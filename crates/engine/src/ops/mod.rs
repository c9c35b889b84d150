use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    CustomerCategory, EngineError, Money, OutrightBreakdown, PaymentMethod, ResultEngine,
    ReturnsBreakdown, SizeCounts,
};

mod customers;
mod transactions;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Persistence operations over the customer/transaction ledger.
///
/// Every write runs inside one DB transaction, including the refresh of the
/// owning customer's stored aggregates, so concurrent writes for the same
/// customer cannot leave an inconsistent balance behind.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Input for creating a customer.
#[derive(Clone, Debug, Default)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    pub county: String,
    /// Explicit address; when absent it is derived as `"{location}, {county}"`.
    pub address: Option<String>,
    pub category: Option<CustomerCategory>,
}

/// Input for updating a customer. Same shape as creation; name and phone
/// stay required.
pub type UpdateCustomer = NewCustomer;

/// Input for creating or replacing a transaction: the raw breakdowns, never
/// client-computed totals.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub customer_id: Uuid,
    /// Defaults to now when absent.
    pub date: Option<DateTime<Utc>>,
    pub load: SizeCounts,
    pub returns: ReturnsBreakdown,
    pub outright: OutrightBreakdown,
    pub amount_paid: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
