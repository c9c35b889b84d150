use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Customer, CustomerBalances, EngineError, Money, ResultEngine, SizeDeltas, customers,
    transactions,
    util::{normalize_name, normalize_phone},
};

use super::{Engine, NewCustomer, UpdateCustomer, normalize_optional_text, normalize_required, with_tx};

impl Engine {
    /// Creates a customer after the pairwise duplicate check.
    ///
    /// Duplicate name and phone, duplicate name only, and duplicate phone
    /// only are rejected with distinct messages so the operator knows what
    /// to fix.
    pub async fn create_customer(&self, input: NewCustomer) -> ResultEngine<Customer> {
        let name = normalize_required(&input.name, "customer name")?;
        let phone = normalize_required(&input.phone, "customer phone")?;

        let customer = Customer {
            id: Uuid::new_v4(),
            address: derive_address(&input),
            name,
            phone,
            email: normalize_optional_text(input.email.as_deref()),
            location: input.location.trim().to_string(),
            county: input.county.trim().to_string(),
            category: input.category.unwrap_or_default(),
            created_at: Utc::now(),
            last_transaction_date: None,
            total_billed: Money::ZERO,
            total_paid: Money::ZERO,
            financial_balance: Money::ZERO,
            cylinders: SizeDeltas::ZERO,
        };

        with_tx!(self, |db_tx| {
            self.check_duplicates(&db_tx, &customer.name, &customer.phone, None)
                .await?;
            customers::ActiveModel::from(&customer).insert(&db_tx).await?;
            Ok(customer)
        })
    }

    /// Updates a customer's contact details. Name and phone stay required;
    /// stored aggregates are untouched.
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: UpdateCustomer,
    ) -> ResultEngine<Customer> {
        let name = normalize_required(&input.name, "customer name")?;
        let phone = normalize_required(&input.phone, "customer phone")?;

        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;
            self.check_duplicates(&db_tx, &name, &phone, Some(customer_id))
                .await?;

            let mut customer = Customer::try_from(model)?;
            customer.address = derive_address(&input);
            customer.name = name;
            customer.phone = phone;
            customer.email = normalize_optional_text(input.email.as_deref());
            customer.location = input.location.trim().to_string();
            customer.county = input.county.trim().to_string();
            if let Some(category) = input.category {
                customer.category = category;
            }

            customers::ActiveModel::from(&customer).update(&db_tx).await?;
            Ok(customer)
        })
    }

    /// Deletes a customer.
    ///
    /// When the customer still has transactions, `force` must be set; the
    /// transactions are then removed in the same DB transaction (cascade).
    pub async fn delete_customer(&self, customer_id: Uuid, force: bool) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;

            let tx_count = transactions::Entity::find()
                .filter(transactions::Column::CustomerId.eq(model.id.clone()))
                .count(&db_tx)
                .await?;
            if tx_count > 0 && !force {
                return Err(EngineError::ExistingKey(format!(
                    "customer has {tx_count} transactions; pass force to delete them too"
                )));
            }

            transactions::Entity::delete_many()
                .filter(transactions::Column::CustomerId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            customers::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Returns a single customer with its stored aggregates.
    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        let model = customers::Entity::find_by_id(customer_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer".to_string()))?;
        Customer::try_from(model)
    }

    /// Lists all customers ordered by name.
    pub async fn list_customers(&self) -> ResultEngine<Vec<Customer>> {
        let models = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Customer::try_from(model)?);
        }
        Ok(out)
    }

    /// Re-runs the balance aggregation over the customer's stored
    /// transactions. This must always equal the aggregates stored on the
    /// customer row; exposing both lets clients verify consistency.
    pub async fn customer_balances(&self, customer_id: Uuid) -> ResultEngine<CustomerBalances> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::CustomerId.eq(customer_id.to_string()))
                .all(&db_tx)
                .await?;

            let mut txs = Vec::with_capacity(rows.len());
            for row in rows {
                txs.push(crate::Transaction::try_from(row)?);
            }
            Ok(CustomerBalances::aggregate(&txs))
        })
    }

    pub(super) async fn require_customer(
        &self,
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<customers::Model> {
        customers::Entity::find_by_id(customer_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer".to_string()))
    }

    /// Pairwise duplicate check against every existing customer.
    ///
    /// Names compare NFKC-normalized and case-insensitive; phones compare
    /// with whitespace/punctuation stripped.
    async fn check_duplicates(
        &self,
        db_tx: &DatabaseTransaction,
        name: &str,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let wanted_name = normalize_name(name);
        let wanted_phone = normalize_phone(phone);
        let exclude = exclude.map(|id| id.to_string());

        let existing = customers::Entity::find().all(db_tx).await?;

        let mut name_taken = false;
        let mut phone_taken = false;
        for model in existing {
            if exclude.as_deref() == Some(model.id.as_str()) {
                continue;
            }
            name_taken |= normalize_name(&model.name) == wanted_name;
            phone_taken |= normalize_phone(&model.phone) == wanted_phone;
        }

        match (name_taken, phone_taken) {
            (true, true) => Err(EngineError::ExistingKey(
                "a customer with this name and phone number already exists".to_string(),
            )),
            (true, false) => Err(EngineError::ExistingKey(
                "a customer with this name already exists".to_string(),
            )),
            (false, true) => Err(EngineError::ExistingKey(
                "a customer with this phone number already exists".to_string(),
            )),
            (false, false) => Ok(()),
        }
    }
}

fn derive_address(input: &NewCustomer) -> String {
    match normalize_optional_text(input.address.as_deref()) {
        Some(address) => address,
        None => format!("{}, {}", input.location.trim(), input.county.trim()),
    }
}
