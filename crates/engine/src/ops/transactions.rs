use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    CustomerBalances, EngineError, LegacyTransaction, Money, PaymentMethod, ResultEngine,
    Transaction, TransactionTotals, customers, totals, transactions,
};

use super::{Engine, NewTransaction, normalize_optional_text, with_tx};

impl Engine {
    /// Creates a transaction from its raw breakdowns.
    ///
    /// The engine — never the client — computes the authoritative
    /// `total_bill`, `financial_balance` and per-size cylinder deltas,
    /// assigns the next display number and refreshes the customer's stored
    /// aggregates, all inside one DB transaction.
    pub async fn create_transaction(&self, input: NewTransaction) -> ResultEngine<Transaction> {
        validate(&input)?;
        totals::reconcile(input.load, &input.returns)?;

        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, input.customer_id).await?;
            let number = self.next_transaction_number(&db_tx).await?;
            let tx = build_transaction(Uuid::new_v4(), &input, Some(number));
            transactions::ActiveModel::try_from(&tx)?.insert(&db_tx).await?;
            self.refresh_customer_aggregates(&db_tx, input.customer_id)
                .await?;
            Ok(tx)
        })
    }

    /// Replaces an existing transaction with the same body shape as
    /// creation. The display number is kept; totals and customer aggregates
    /// are recomputed.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        input: NewTransaction,
    ) -> ResultEngine<Transaction> {
        validate(&input)?;
        totals::reconcile(input.load, &input.returns)?;

        with_tx!(self, |db_tx| {
            let existing = self.require_transaction(&db_tx, transaction_id).await?;
            if existing.customer_id != input.customer_id.to_string() {
                return Err(EngineError::Validation(
                    "a transaction cannot be moved to another customer".to_string(),
                ));
            }

            let mut tx = build_transaction(transaction_id, &input, existing.transaction_number);
            if input.date.is_none() {
                // Edits keep the original visit date unless one is supplied.
                tx.date = existing.date;
            }
            transactions::ActiveModel::try_from(&tx)?.update(&db_tx).await?;
            self.refresh_customer_aggregates(&db_tx, input.customer_id)
                .await?;
            Ok(tx)
        })
    }

    /// Deletes a transaction and refreshes the customer's aggregates.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self.require_transaction(&db_tx, transaction_id).await?;
            let customer_id = crate::util::parse_uuid(&existing.customer_id, "customer")?;

            transactions::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            self.refresh_customer_aggregates(&db_tx, customer_id).await?;
            Ok(())
        })
    }

    /// Returns a single transaction.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction".to_string()))?;
        Transaction::try_from(model)
    }

    /// Lists transactions, newest first, optionally for one customer.
    pub async fn list_transactions(
        &self,
        customer_id: Option<Uuid>,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::Date)
            .limit(limit);
        if let Some(customer_id) = customer_id {
            query = query.filter(transactions::Column::CustomerId.eq(customer_id.to_string()));
        }

        let models = query.all(&self.database).await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Transaction::try_from(model)?);
        }
        Ok(out)
    }

    /// Imports visits recorded under the legacy flat model.
    ///
    /// Each record is converted through the legacy adapter and persisted by
    /// the canonical path: totals come from the canonical calculator and
    /// numbers continue the sequence. The same-visit reconciliation rule is
    /// not applied — historical rows predate it.
    pub async fn import_legacy_transactions(
        &self,
        records: Vec<LegacyTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let mut imported = Vec::with_capacity(records.len());
            let mut touched: Vec<Uuid> = Vec::new();

            for record in records {
                self.require_customer(&db_tx, record.customer_id).await?;
                if record.paid.is_negative() {
                    return Err(EngineError::Validation(
                        "amount paid must not be negative".to_string(),
                    ));
                }

                let customer_id = record.customer_id;
                let date = record.date;
                let paid = record.paid;
                let notes = record.notes.clone();
                let (load, returns, outright) = record.into_breakdowns();

                let input = NewTransaction {
                    customer_id,
                    date: Some(date),
                    load,
                    returns,
                    outright,
                    amount_paid: paid,
                    payment_method: PaymentMethod::default(),
                    notes,
                };
                let number = self.next_transaction_number(&db_tx).await?;
                let tx = build_transaction(Uuid::new_v4(), &input, Some(number));
                transactions::ActiveModel::try_from(&tx)?.insert(&db_tx).await?;

                if !touched.contains(&customer_id) {
                    touched.push(customer_id);
                }
                imported.push(tx);
            }

            for customer_id in touched {
                self.refresh_customer_aggregates(&db_tx, customer_id).await?;
            }
            Ok(imported)
        })
    }

    async fn require_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction".to_string()))
    }

    /// Next sequential display number (`A0001`, `A0002`, ...), continuing
    /// after the highest number already assigned.
    async fn next_transaction_number(&self, db_tx: &DatabaseTransaction) -> ResultEngine<String> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT COALESCE(MAX(CAST(SUBSTR(transaction_number, 2) AS INTEGER)), 0) AS max_num \
             FROM transactions WHERE transaction_number IS NOT NULL"
                .to_string(),
        );
        let row = db_tx.query_one(stmt).await?;
        let max_num: i64 = row.and_then(|r| r.try_get("", "max_num").ok()).unwrap_or(0);
        Ok(format!("A{:04}", max_num + 1))
    }

    /// Recomputes the customer's stored aggregates from the full transaction
    /// history, inside the caller's DB transaction.
    async fn refresh_customer_aggregates(
        &self,
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<()> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::CustomerId.eq(customer_id.to_string()))
            .all(db_tx)
            .await?;

        let mut txs = Vec::with_capacity(rows.len());
        for row in rows {
            txs.push(Transaction::try_from(row)?);
        }
        let balances = CustomerBalances::aggregate(&txs);
        let last_transaction_date = txs.iter().map(|tx| tx.date).max();

        let customer_model = customers::ActiveModel {
            id: ActiveValue::Set(customer_id.to_string()),
            last_transaction_date: ActiveValue::Set(last_transaction_date),
            total_billed_cents: ActiveValue::Set(balances.total_billed.cents()),
            total_paid_cents: ActiveValue::Set(balances.total_paid.cents()),
            financial_balance_cents: ActiveValue::Set(balances.financial_balance.cents()),
            cylinder_balance_6kg: ActiveValue::Set(balances.cylinders.kg6),
            cylinder_balance_13kg: ActiveValue::Set(balances.cylinders.kg13),
            cylinder_balance_50kg: ActiveValue::Set(balances.cylinders.kg50),
            ..Default::default()
        };
        customer_model.update(db_tx).await?;
        Ok(())
    }
}

fn validate(input: &NewTransaction) -> ResultEngine<()> {
    if input.amount_paid.is_negative() {
        return Err(EngineError::Validation(
            "amount paid must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn build_transaction(
    id: Uuid,
    input: &NewTransaction,
    number: Option<String>,
) -> Transaction {
    let totals = TransactionTotals::compute(
        input.load,
        &input.returns,
        &input.outright,
        input.amount_paid,
    );

    // A visit with nothing paid is on credit regardless of what the client
    // selected.
    let payment_method = if input.amount_paid == Money::ZERO {
        PaymentMethod::Credit
    } else {
        input.payment_method
    };

    Transaction {
        id,
        customer_id: input.customer_id,
        date: input.date.unwrap_or_else(Utc::now),
        load: Some(input.load),
        returns: Some(input.returns),
        outright: Some(input.outright),
        total_load: i64::from(input.load.total()),
        total_returns: i64::from(input.returns.total()),
        amount_paid: input.amount_paid,
        payment_method,
        notes: normalize_optional_text(input.notes.as_deref()),
        total_bill: totals.total_bill,
        financial_balance: totals.financial_balance,
        cylinders: totals.cylinders,
        transaction_number: number,
    }
}
