use chrono::{TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CustomerBalances, Engine, EngineError, LegacyTransaction, Money, NewCustomer, NewTransaction,
    OutrightBreakdown, PaymentMethod, ReturnsBreakdown, SizeCounts, SizePrices,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn customer_input(name: &str, phone: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        phone: phone.to_string(),
        location: "Kasarani".to_string(),
        county: "Nairobi".to_string(),
        ..Default::default()
    }
}

/// A reconciling visit: 2x6kg company empties refilled at 135/kg.
fn refill_visit(customer_id: uuid::Uuid, paid_shillings: i64) -> NewTransaction {
    let mut returns = ReturnsBreakdown::default();
    returns.max_empty.counts.kg6 = 2;
    NewTransaction {
        customer_id,
        date: None,
        load: SizeCounts::new(2, 0, 0),
        returns,
        outright: OutrightBreakdown::default(),
        amount_paid: Money::from_shillings(paid_shillings),
        payment_method: PaymentMethod::Cash,
        notes: None,
    }
}

#[tokio::test]
async fn customer_create_derives_address_and_zero_balances() {
    let (engine, _db) = engine_with_db().await;

    let customer = engine
        .create_customer(customer_input("Jane Wanjiku", "0712000001"))
        .await
        .unwrap();

    assert_eq!(customer.address, "Kasarani, Nairobi");
    assert_eq!(customer.financial_balance, Money::ZERO);
    assert_eq!(customer.cylinder_balance(), 0);
    assert!(customer.last_transaction_date.is_none());

    let balances = engine.customer_balances(customer.id).await.unwrap();
    assert_eq!(balances, CustomerBalances::ZERO);
}

#[tokio::test]
async fn duplicate_checks_are_pairwise_and_normalized() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_customer(customer_input("Jane Wanjiku", "+254712000001"))
        .await
        .unwrap();

    let err = engine
        .create_customer(customer_input("  JANE wanjiku ", "0799999999"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("a customer with this name already exists".to_string())
    );

    let err = engine
        .create_customer(customer_input("Somebody Else", "+254 712 000 001"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("a customer with this phone number already exists".to_string())
    );

    let err = engine
        .create_customer(customer_input("Jane Wanjiku", "+254712000001"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey(
            "a customer with this name and phone number already exists".to_string()
        )
    );
}

#[tokio::test]
async fn customer_update_requires_name_and_phone() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Otieno Stores", "0712000002"))
        .await
        .unwrap();

    let err = engine
        .update_customer(customer.id, customer_input("  ", "0712000002"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_customer(customer.id, customer_input("Otieno Stores", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn create_transaction_stores_authoritative_totals() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Akinyi Gas", "0712000003"))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(refill_visit(customer.id, 810))
        .await
        .unwrap();

    assert_eq!(tx.total_bill, Money::from_shillings(1_620));
    assert_eq!(tx.financial_balance, Money::from_shillings(810));
    assert_eq!(tx.cylinders.total(), 0);
    assert_eq!(tx.transaction_number.as_deref(), Some("A0001"));
    assert_eq!(tx.total_load, 2);
    assert_eq!(tx.total_returns, 2);
    assert_eq!(tx.payment_method, PaymentMethod::Cash);

    // Stored aggregates match a fresh aggregation.
    let stored = engine.customer(customer.id).await.unwrap();
    let live = engine.customer_balances(customer.id).await.unwrap();
    assert_eq!(stored.total_billed, live.total_billed);
    assert_eq!(stored.financial_balance, live.financial_balance);
    assert_eq!(stored.cylinders, live.cylinders);
    assert_eq!(stored.financial_balance, Money::from_shillings(810));
    assert!(stored.last_transaction_date.is_some());
}

#[tokio::test]
async fn zero_payment_forces_credit() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Mwangi Hotel", "0712000004"))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(refill_visit(customer.id, 0))
        .await
        .unwrap();
    assert_eq!(tx.payment_method, PaymentMethod::Credit);
}

#[tokio::test]
async fn reconciliation_mismatch_blocks_creation() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Njeri Butchery", "0712000005"))
        .await
        .unwrap();

    let mut input = refill_visit(customer.id, 0);
    input.load = SizeCounts::new(0, 3, 0);
    input.returns = ReturnsBreakdown::default();

    let err = engine.create_transaction(input).await.unwrap_err();
    assert!(matches!(err, EngineError::Reconciliation(_)));

    // Nothing was written.
    let txs = engine
        .list_transactions(Some(customer.id), 10)
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn negative_payment_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Chebet Eatery", "0712000006"))
        .await
        .unwrap();

    let mut input = refill_visit(customer.id, 0);
    input.amount_paid = Money::from_shillings(-10);
    let err = engine.create_transaction(input).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn update_cannot_move_a_transaction() {
    let (engine, _db) = engine_with_db().await;
    let first = engine
        .create_customer(customer_input("Baraka Shop", "0712000007"))
        .await
        .unwrap();
    let second = engine
        .create_customer(customer_input("Wafula Garage", "0712000008"))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(refill_visit(first.id, 810))
        .await
        .unwrap();

    let err = engine
        .update_transaction(tx.id, refill_visit(second.id, 810))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn delete_customer_cascades_only_with_force() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Kamau Traders", "0712000009"))
        .await
        .unwrap();
    engine
        .create_transaction(refill_visit(customer.id, 810))
        .await
        .unwrap();

    let err = engine.delete_customer(customer.id, false).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    engine.delete_customer(customer.id, true).await.unwrap();
    assert!(matches!(
        engine.customer(customer.id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    let txs = engine
        .list_transactions(Some(customer.id), 10)
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn numbering_continues_across_customers_and_imports() {
    let (engine, _db) = engine_with_db().await;
    let first = engine
        .create_customer(customer_input("First Customer", "0712000010"))
        .await
        .unwrap();
    let second = engine
        .create_customer(customer_input("Second Customer", "0712000011"))
        .await
        .unwrap();

    let a = engine
        .create_transaction(refill_visit(first.id, 0))
        .await
        .unwrap();
    let b = engine
        .create_transaction(refill_visit(second.id, 0))
        .await
        .unwrap();
    assert_eq!(a.transaction_number.as_deref(), Some("A0001"));
    assert_eq!(b.transaction_number.as_deref(), Some("A0002"));

    let legacy = LegacyTransaction {
        customer_id: first.id,
        date: Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap(),
        load: SizeCounts::new(1, 0, 0),
        returns: SizeCounts::new(1, 0, 0),
        refill_prices: SizePrices::uniform(Money::from_shillings(135)),
        swipe_returns: SizeCounts::ZERO,
        swipe_prices: SizePrices::uniform(Money::from_shillings(160)),
        outright: SizeCounts::ZERO,
        outright_prices: engine::LEGACY_OUTRIGHT_PRICES,
        paid: Money::from_shillings(810),
        notes: None,
    };
    let imported = engine
        .import_legacy_transactions(vec![legacy])
        .await
        .unwrap();
    assert_eq!(imported[0].transaction_number.as_deref(), Some("A0003"));
    assert_eq!(imported[0].total_bill, Money::from_shillings(810));

    // Aggregates for the importing customer include the legacy row.
    let stored = engine.customer(first.id).await.unwrap();
    assert_eq!(stored.total_billed, Money::from_shillings(1_620 + 810));
}

#[tokio::test]
async fn list_orders_newest_first_and_respects_limit() {
    let (engine, _db) = engine_with_db().await;
    let customer = engine
        .create_customer(customer_input("Halima Stores", "0712000012"))
        .await
        .unwrap();

    for day in 1..=3 {
        let mut input = refill_visit(customer.id, 0);
        input.date = Some(Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap());
        engine.create_transaction(input).await.unwrap();
    }

    let txs = engine
        .list_transactions(Some(customer.id), 2)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert!(txs[0].date > txs[1].date);
}
