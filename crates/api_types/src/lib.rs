use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary values cross the wire as decimal KES numbers (0-2 fraction
/// digits); internally everything is integer cents. Annotate cent fields
/// with `#[serde(with = "kes")]`.
pub mod kes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok((value * 100.0).round() as i64)
    }
}

/// Same as [`kes`] for optional fields.
pub mod kes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        cents: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match cents {
            Some(cents) => serializer.serialize_some(&(*cents as f64 / 100.0)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(value.map(|v| (v * 100.0).round() as i64))
    }
}

pub mod customer {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CustomerCategory {
        #[default]
        Regular,
        Vip,
        New,
    }

    /// Request body for creating (or updating) a customer.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub phone: String,
        #[serde(default)]
        pub email: Option<String>,
        pub location: String,
        pub county: String,
        /// Explicit address; omitted means `"{location}, {county}"`.
        #[serde(default)]
        pub address: Option<String>,
        #[serde(default)]
        pub category: Option<CustomerCategory>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub phone: String,
        pub email: Option<String>,
        pub location: String,
        pub county: String,
        pub address: String,
        pub category: CustomerCategory,
        /// RFC3339 timestamps, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        pub last_transaction_date: Option<DateTime<FixedOffset>>,
        #[serde(with = "kes")]
        pub total_billed: i64,
        #[serde(with = "kes")]
        pub total_paid: i64,
        #[serde(with = "kes")]
        pub financial_balance: i64,
        pub cylinder_balance_6kg: i64,
        pub cylinder_balance_13kg: i64,
        pub cylinder_balance_50kg: i64,
        pub cylinder_balance: i64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CustomerListResponse {
        pub customers: Vec<CustomerView>,
    }

    /// Live re-aggregation of a customer's transactions; must always match
    /// the stored fields on [`CustomerView`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CustomerBalancesView {
        #[serde(with = "kes")]
        pub total_billed: i64,
        #[serde(with = "kes")]
        pub total_paid: i64,
        #[serde(with = "kes")]
        pub financial_balance: i64,
        pub cylinder_balance_6kg: i64,
        pub cylinder_balance_13kg: i64,
        pub cylinder_balance_50kg: i64,
        pub cylinder_balance: i64,
    }

    /// Query string for customer deletion (`?force=true` cascades).
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct CustomerDelete {
        #[serde(default)]
        pub force: bool,
    }
}

pub mod transaction {
    use super::*;

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

    /// Plain per-size counts: `{kg6, kg13, kg50}`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Counts {
        #[serde(default)]
        pub kg6: u32,
        #[serde(default)]
        pub kg13: u32,
        #[serde(default)]
        pub kg50: u32,
    }

    /// Counts with per-size unit prices:
    /// `{kg6, kg13, kg50, price6, price13, price50}`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct PricedCounts {
        #[serde(default)]
        pub kg6: u32,
        #[serde(default)]
        pub kg13: u32,
        #[serde(default)]
        pub kg50: u32,
        #[serde(with = "kes")]
        pub price6: i64,
        #[serde(with = "kes")]
        pub price13: i64,
        #[serde(with = "kes")]
        pub price50: i64,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ReturnsBreakdown {
        pub max_empty: PricedCounts,
        pub swap_empty: PricedCounts,
        pub return_full: Counts,
    }

    /// Outright sales; prices are flat per cylinder.
    pub type OutrightBreakdown = PricedCounts;

    /// Request body for creating or replacing a transaction. The client
    /// sends raw breakdowns only; all derived fields are computed and
    /// stored server-side.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub customer_id: Uuid,
        /// RFC3339 timestamp; defaults to now.
        #[serde(default)]
        pub date: Option<DateTime<FixedOffset>>,
        pub load_breakdown: Counts,
        pub returns_breakdown: ReturnsBreakdown,
        pub outright_breakdown: OutrightBreakdown,
        /// Client-side load total; informational, recomputed server-side.
        #[serde(default)]
        pub total_load: Option<u32>,
        #[serde(with = "kes")]
        pub amount_paid: i64,
        #[serde(default)]
        pub payment_method: PaymentMethod,
        #[serde(default)]
        pub notes: Option<String>,
    }

    /// A stored transaction, authoritative derived fields included.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "customerId")]
        pub customer_id: Uuid,
        /// RFC3339 timestamp, including timezone offset.
        pub date: DateTime<FixedOffset>,
        /// `None` on rows imported from the legacy flat model.
        pub load_breakdown: Option<Counts>,
        pub returns_breakdown: Option<ReturnsBreakdown>,
        pub outright_breakdown: Option<OutrightBreakdown>,
        pub total_load: i64,
        pub total_returns: i64,
        #[serde(with = "kes")]
        pub total_bill: i64,
        #[serde(with = "kes")]
        pub amount_paid: i64,
        #[serde(with = "kes")]
        pub financial_balance: i64,
        pub cylinder_balance_6kg: i64,
        pub cylinder_balance_13kg: i64,
        pub cylinder_balance_50kg: i64,
        pub cylinder_balance: i64,
        pub payment_method: PaymentMethod,
        pub notes: Option<String>,
        pub transaction_number: Option<String>,
    }

    /// Query string for listing transactions.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionList {
        #[serde(default)]
        pub customer_id: Option<Uuid>,
        #[serde(default)]
        pub limit: Option<u64>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// One visit recorded under the legacy flat model, for import.
    ///
    /// Counts default to zero; missing prices fall back to the legacy
    /// default price sets server-side.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LegacyTransactionRecord {
        pub customer_id: Uuid,
        #[serde(default)]
        pub date: Option<DateTime<FixedOffset>>,
        #[serde(default, rename = "totalCylinders6kg")]
        pub total_cylinders_6kg: u32,
        #[serde(default, rename = "totalCylinders13kg")]
        pub total_cylinders_13kg: u32,
        #[serde(default, rename = "totalCylinders50kg")]
        pub total_cylinders_50kg: u32,
        #[serde(default, rename = "return6kg")]
        pub return_6kg: u32,
        #[serde(default, rename = "return13kg")]
        pub return_13kg: u32,
        #[serde(default, rename = "return50kg")]
        pub return_50kg: u32,
        #[serde(default, rename = "refillPrice6kg", with = "kes_opt")]
        pub refill_price_6kg: Option<i64>,
        #[serde(default, rename = "refillPrice13kg", with = "kes_opt")]
        pub refill_price_13kg: Option<i64>,
        #[serde(default, rename = "refillPrice50kg", with = "kes_opt")]
        pub refill_price_50kg: Option<i64>,
        #[serde(default, rename = "swipeReturn6kg")]
        pub swipe_return_6kg: u32,
        #[serde(default, rename = "swipeReturn13kg")]
        pub swipe_return_13kg: u32,
        #[serde(default, rename = "swipeReturn50kg")]
        pub swipe_return_50kg: u32,
        #[serde(default, rename = "swipeRefillPrice6kg", with = "kes_opt")]
        pub swipe_refill_price_6kg: Option<i64>,
        #[serde(default, rename = "swipeRefillPrice13kg", with = "kes_opt")]
        pub swipe_refill_price_13kg: Option<i64>,
        #[serde(default, rename = "swipeRefillPrice50kg", with = "kes_opt")]
        pub swipe_refill_price_50kg: Option<i64>,
        #[serde(default, rename = "outright6kg")]
        pub outright_6kg: u32,
        #[serde(default, rename = "outright13kg")]
        pub outright_13kg: u32,
        #[serde(default, rename = "outright50kg")]
        pub outright_50kg: u32,
        #[serde(default, rename = "outrightPrice6kg", with = "kes_opt")]
        pub outright_price_6kg: Option<i64>,
        #[serde(default, rename = "outrightPrice13kg", with = "kes_opt")]
        pub outright_price_13kg: Option<i64>,
        #[serde(default, rename = "outrightPrice50kg", with = "kes_opt")]
        pub outright_price_50kg: Option<i64>,
        #[serde(default, with = "kes")]
        pub paid: i64,
        #[serde(default)]
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LegacyImportRequest {
        pub transactions: Vec<LegacyTransactionRecord>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LegacyImportResponse {
        pub imported: Vec<TransactionView>,
    }
}

/// Error body for every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::transaction::*;

    #[test]
    fn money_fields_cross_the_wire_as_decimals() {
        let json = serde_json::json!({
            "kg6": 2, "kg13": 0, "kg50": 0,
            "price6": 135.0, "price13": 135.5, "price50": 135,
        });
        let priced: PricedCounts = serde_json::from_value(json).unwrap();
        assert_eq!(priced.price6, 13_500);
        assert_eq!(priced.price13, 13_550);
        assert_eq!(priced.price50, 13_500);

        let back = serde_json::to_value(priced).unwrap();
        assert_eq!(back["price13"], serde_json::json!(135.5));
    }

    #[test]
    fn counts_default_to_zero_when_missing() {
        let counts: Counts = serde_json::from_str("{}").unwrap();
        assert_eq!(counts, Counts::default());
    }

    #[test]
    fn transaction_new_uses_camel_case() {
        let json = serde_json::json!({
            "customerId": "7f3c8e6a-4a3e-4d62-9f8f-27cf43cf74d5",
            "loadBreakdown": {"kg6": 2, "kg13": 0, "kg50": 0},
            "returnsBreakdown": {
                "max_empty": {"kg6": 2, "kg13": 0, "kg50": 0,
                               "price6": 135, "price13": 135, "price50": 135},
                "swap_empty": {"kg6": 0, "kg13": 0, "kg50": 0,
                                "price6": 160, "price13": 160, "price50": 160},
                "return_full": {"kg6": 0, "kg13": 0, "kg50": 0}
            },
            "outrightBreakdown": {"kg6": 0, "kg13": 0, "kg50": 0,
                                   "price6": 2200, "price13": 4400, "price50": 8000},
            "totalLoad": 2,
            "amountPaid": 810.0,
            "paymentMethod": "mpesa"
        });
        let body: TransactionNew = serde_json::from_value(json).unwrap();
        assert_eq!(body.amount_paid, 81_000);
        assert_eq!(body.payment_method, PaymentMethod::Mpesa);
        assert_eq!(body.load_breakdown.kg6, 2);
        assert_eq!(body.total_load, Some(2));
    }

    #[test]
    fn legacy_record_parses_flat_field_names() {
        let json = serde_json::json!({
            "customerId": "7f3c8e6a-4a3e-4d62-9f8f-27cf43cf74d5",
            "return6kg": 2,
            "refillPrice6kg": 135,
            "swipeReturn13kg": 1,
            "outright50kg": 1,
            "outrightPrice50kg": 8500,
            "totalCylinders6kg": 2,
            "paid": 1000.0
        });
        let record: LegacyTransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.return_6kg, 2);
        assert_eq!(record.refill_price_6kg, Some(13_500));
        assert_eq!(record.swipe_return_13kg, 1);
        assert_eq!(record.outright_price_50kg, Some(850_000));
        assert_eq!(record.swipe_refill_price_6kg, None);
        assert_eq!(record.paid, 100_000);
    }
}
