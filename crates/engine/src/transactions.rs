//! Transaction domain type and its storage entity.
//!
//! A `Transaction` records one customer visit: the raw breakdown data the
//! client sent plus the authoritative derived fields (`total_bill`,
//! `financial_balance`, per-size cylinder deltas, display number) the engine
//! computed when the row was written.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, OutrightBreakdown, ResultEngine, ReturnsBreakdown, SizeCounts, SizeDeltas,
    util::{breakdown_from_json, breakdown_to_json, parse_uuid},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Mpesa,
    Card,
    Transfer,
    #[default]
    Credit,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Mpesa => "mpesa",
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "mpesa" => Ok(Self::Mpesa),
            "card" => Ok(Self::Card),
            "transfer" => Ok(Self::Transfer),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub date: DateTime<Utc>,
    /// Raw breakdowns as submitted. `None` on rows imported from the legacy
    /// flat model before breakdowns existed.
    pub load: Option<SizeCounts>,
    pub returns: Option<ReturnsBreakdown>,
    pub outright: Option<OutrightBreakdown>,
    pub total_load: i64,
    pub total_returns: i64,
    pub amount_paid: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    // Authoritative derived fields, computed when the row is written.
    pub total_bill: Money,
    pub financial_balance: Money,
    pub cylinders: SizeDeltas,
    /// Sequential display id (`A0001`, ...). Assigned at creation; `None`
    /// only for rows predating the numbering backfill.
    pub transaction_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub date: DateTimeUtc,
    pub load_breakdown: Option<Json>,
    pub returns_breakdown: Option<Json>,
    pub outright_breakdown: Option<Json>,
    pub total_load: i64,
    pub total_returns: i64,
    pub total_bill_cents: i64,
    pub amount_paid_cents: i64,
    pub financial_balance_cents: i64,
    pub cylinder_balance_6kg: i64,
    pub cylinder_balance_13kg: i64,
    pub cylinder_balance_50kg: i64,
    pub cylinder_balance: i64,
    pub payment_method: String,
    pub notes: Option<String>,
    pub transaction_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Transaction> for ActiveModel {
    type Error = EngineError;

    fn try_from(tx: &Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::Set(tx.id.to_string()),
            customer_id: ActiveValue::Set(tx.customer_id.to_string()),
            date: ActiveValue::Set(tx.date),
            load_breakdown: ActiveValue::Set(
                tx.load.as_ref().map(breakdown_to_json).transpose()?,
            ),
            returns_breakdown: ActiveValue::Set(
                tx.returns.as_ref().map(breakdown_to_json).transpose()?,
            ),
            outright_breakdown: ActiveValue::Set(
                tx.outright.as_ref().map(breakdown_to_json).transpose()?,
            ),
            total_load: ActiveValue::Set(tx.total_load),
            total_returns: ActiveValue::Set(tx.total_returns),
            total_bill_cents: ActiveValue::Set(tx.total_bill.cents()),
            amount_paid_cents: ActiveValue::Set(tx.amount_paid.cents()),
            financial_balance_cents: ActiveValue::Set(tx.financial_balance.cents()),
            cylinder_balance_6kg: ActiveValue::Set(tx.cylinders.kg6),
            cylinder_balance_13kg: ActiveValue::Set(tx.cylinders.kg13),
            cylinder_balance_50kg: ActiveValue::Set(tx.cylinders.kg50),
            cylinder_balance: ActiveValue::Set(tx.cylinders.total()),
            payment_method: ActiveValue::Set(tx.payment_method.as_str().to_string()),
            notes: ActiveValue::Set(tx.notes.clone()),
            transaction_number: ActiveValue::Set(tx.transaction_number.clone()),
        })
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            customer_id: parse_uuid(&model.customer_id, "customer")?,
            date: model.date,
            load: model.load_breakdown.map(breakdown_from_json).transpose()?,
            returns: model
                .returns_breakdown
                .map(breakdown_from_json)
                .transpose()?,
            outright: model
                .outright_breakdown
                .map(breakdown_from_json)
                .transpose()?,
            total_load: model.total_load,
            total_returns: model.total_returns,
            amount_paid: Money::from_cents(model.amount_paid_cents),
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            notes: model.notes,
            total_bill: Money::from_cents(model.total_bill_cents),
            financial_balance: Money::from_cents(model.financial_balance_cents),
            cylinders: SizeDeltas {
                kg6: model.cylinder_balance_6kg,
                kg13: model.cylinder_balance_13kg,
                kg50: model.cylinder_balance_50kg,
            },
            transaction_number: model.transaction_number,
        })
    }
}
