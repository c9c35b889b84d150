//! Customer domain type and its storage entity.
//!
//! The customer row carries the server-maintained running aggregates
//! (`total_billed`, `total_paid`, `financial_balance`, per-size cylinder
//! balances). They are refreshed inside the same DB transaction as every
//! transaction write, so they always equal a fresh aggregation of the
//! customer's history.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, SizeDeltas, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerCategory {
    #[default]
    Regular,
    Vip,
    New,
}

impl CustomerCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Vip => "vip",
            Self::New => "new",
        }
    }
}

impl TryFrom<&str> for CustomerCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "regular" => Ok(Self::Regular),
            "vip" => Ok(Self::Vip),
            "new" => Ok(Self::New),
            other => Err(EngineError::Validation(format!(
                "invalid customer category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    pub county: String,
    /// Derived as `"{location}, {county}"` at creation when not supplied.
    pub address: String,
    pub category: CustomerCategory,
    pub created_at: DateTime<Utc>,
    pub last_transaction_date: Option<DateTime<Utc>>,
    // Stored aggregates, refreshed transactionally on every write to this
    // customer's transactions.
    pub total_billed: Money,
    pub total_paid: Money,
    pub financial_balance: Money,
    pub cylinders: SizeDeltas,
}

impl Customer {
    /// Net cylinders owed across all sizes.
    #[must_use]
    pub const fn cylinder_balance(&self) -> i64 {
        self.cylinders.total()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    pub county: String,
    pub address: String,
    pub category: String,
    pub created_at: DateTimeUtc,
    pub last_transaction_date: Option<DateTimeUtc>,
    pub total_billed_cents: i64,
    pub total_paid_cents: i64,
    pub financial_balance_cents: i64,
    pub cylinder_balance_6kg: i64,
    pub cylinder_balance_13kg: i64,
    pub cylinder_balance_50kg: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(customer: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(customer.id.to_string()),
            name: ActiveValue::Set(customer.name.clone()),
            phone: ActiveValue::Set(customer.phone.clone()),
            email: ActiveValue::Set(customer.email.clone()),
            location: ActiveValue::Set(customer.location.clone()),
            county: ActiveValue::Set(customer.county.clone()),
            address: ActiveValue::Set(customer.address.clone()),
            category: ActiveValue::Set(customer.category.as_str().to_string()),
            created_at: ActiveValue::Set(customer.created_at),
            last_transaction_date: ActiveValue::Set(customer.last_transaction_date),
            total_billed_cents: ActiveValue::Set(customer.total_billed.cents()),
            total_paid_cents: ActiveValue::Set(customer.total_paid.cents()),
            financial_balance_cents: ActiveValue::Set(customer.financial_balance.cents()),
            cylinder_balance_6kg: ActiveValue::Set(customer.cylinders.kg6),
            cylinder_balance_13kg: ActiveValue::Set(customer.cylinders.kg13),
            cylinder_balance_50kg: ActiveValue::Set(customer.cylinders.kg50),
        }
    }
}

impl TryFrom<Model> for Customer {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "customer")?,
            name: model.name,
            phone: model.phone,
            email: model.email,
            location: model.location,
            county: model.county,
            address: model.address,
            category: CustomerCategory::try_from(model.category.as_str())?,
            created_at: model.created_at,
            last_transaction_date: model.last_transaction_date,
            total_billed: Money::from_cents(model.total_billed_cents),
            total_paid: Money::from_cents(model.total_paid_cents),
            financial_balance: Money::from_cents(model.financial_balance_cents),
            cylinders: SizeDeltas {
                kg6: model.cylinder_balance_6kg,
                kg13: model.cylinder_balance_13kg,
                kg50: model.cylinder_balance_50kg,
            },
        })
    }
}
