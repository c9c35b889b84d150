//! Transaction API endpoints

use api_types::transaction::{
    Counts, LegacyImportRequest, LegacyImportResponse, LegacyTransactionRecord, OutrightBreakdown,
    PaymentMethod as ApiPaymentMethod, PricedCounts, ReturnsBreakdown, TransactionList,
    TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{LEGACY_OUTRIGHT_PRICES, Money, SizeCounts, SizePrices};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_payment_in(method: ApiPaymentMethod) -> engine::PaymentMethod {
    match method {
        ApiPaymentMethod::Cash => engine::PaymentMethod::Cash,
        ApiPaymentMethod::Mpesa => engine::PaymentMethod::Mpesa,
        ApiPaymentMethod::Card => engine::PaymentMethod::Card,
        ApiPaymentMethod::Transfer => engine::PaymentMethod::Transfer,
        ApiPaymentMethod::Credit => engine::PaymentMethod::Credit,
    }
}

fn map_payment_out(method: engine::PaymentMethod) -> ApiPaymentMethod {
    match method {
        engine::PaymentMethod::Cash => ApiPaymentMethod::Cash,
        engine::PaymentMethod::Mpesa => ApiPaymentMethod::Mpesa,
        engine::PaymentMethod::Card => ApiPaymentMethod::Card,
        engine::PaymentMethod::Transfer => ApiPaymentMethod::Transfer,
        engine::PaymentMethod::Credit => ApiPaymentMethod::Credit,
    }
}

fn counts_in(counts: Counts) -> SizeCounts {
    SizeCounts::new(counts.kg6, counts.kg13, counts.kg50)
}

fn counts_out(counts: SizeCounts) -> Counts {
    Counts {
        kg6: counts.kg6,
        kg13: counts.kg13,
        kg50: counts.kg50,
    }
}

fn priced_in(priced: PricedCounts) -> engine::PricedCounts {
    engine::PricedCounts {
        counts: SizeCounts::new(priced.kg6, priced.kg13, priced.kg50),
        prices: SizePrices::new(
            Money::from_cents(priced.price6),
            Money::from_cents(priced.price13),
            Money::from_cents(priced.price50),
        ),
    }
}

fn priced_out(counts: SizeCounts, prices: SizePrices) -> PricedCounts {
    PricedCounts {
        kg6: counts.kg6,
        kg13: counts.kg13,
        kg50: counts.kg50,
        price6: prices.kg6.cents(),
        price13: prices.kg13.cents(),
        price50: prices.kg50.cents(),
    }
}

fn returns_in(returns: ReturnsBreakdown) -> engine::ReturnsBreakdown {
    engine::ReturnsBreakdown {
        max_empty: priced_in(returns.max_empty),
        swap_empty: priced_in(returns.swap_empty),
        return_full: counts_in(returns.return_full),
    }
}

fn returns_out(returns: engine::ReturnsBreakdown) -> ReturnsBreakdown {
    ReturnsBreakdown {
        max_empty: priced_out(returns.max_empty.counts, returns.max_empty.prices),
        swap_empty: priced_out(returns.swap_empty.counts, returns.swap_empty.prices),
        return_full: counts_out(returns.return_full),
    }
}

fn outright_in(outright: OutrightBreakdown) -> engine::OutrightBreakdown {
    let priced = priced_in(outright);
    engine::OutrightBreakdown {
        counts: priced.counts,
        prices: priced.prices,
    }
}

fn outright_out(outright: engine::OutrightBreakdown) -> OutrightBreakdown {
    priced_out(outright.counts, outright.prices)
}

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        customer_id: tx.customer_id,
        date: tx.date.fixed_offset(),
        load_breakdown: tx.load.map(counts_out),
        returns_breakdown: tx.returns.map(returns_out),
        outright_breakdown: tx.outright.map(outright_out),
        total_load: tx.total_load,
        total_returns: tx.total_returns,
        total_bill: tx.total_bill.cents(),
        amount_paid: tx.amount_paid.cents(),
        financial_balance: tx.financial_balance.cents(),
        cylinder_balance_6kg: tx.cylinders.kg6,
        cylinder_balance_13kg: tx.cylinders.kg13,
        cylinder_balance_50kg: tx.cylinders.kg50,
        cylinder_balance: tx.cylinders.total(),
        payment_method: map_payment_out(tx.payment_method),
        notes: tx.notes,
        transaction_number: tx.transaction_number,
    }
}

fn map_input(payload: TransactionNew) -> engine::NewTransaction {
    engine::NewTransaction {
        customer_id: payload.customer_id,
        date: payload.date.map(|dt| dt.with_timezone(&Utc)),
        load: counts_in(payload.load_breakdown),
        returns: returns_in(payload.returns_breakdown),
        outright: outright_in(payload.outright_breakdown),
        amount_paid: Money::from_cents(payload.amount_paid),
        payment_method: map_payment_in(payload.payment_method),
        notes: payload.notes,
    }
}

fn size_prices(
    kg6: Option<i64>,
    kg13: Option<i64>,
    kg50: Option<i64>,
    fallback: SizePrices,
) -> SizePrices {
    SizePrices::new(
        kg6.map_or(fallback.kg6, Money::from_cents),
        kg13.map_or(fallback.kg13, Money::from_cents),
        kg50.map_or(fallback.kg50, Money::from_cents),
    )
}

fn map_legacy(record: LegacyTransactionRecord) -> engine::LegacyTransaction {
    engine::LegacyTransaction {
        customer_id: record.customer_id,
        date: record
            .date
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
        load: SizeCounts::new(
            record.total_cylinders_6kg,
            record.total_cylinders_13kg,
            record.total_cylinders_50kg,
        ),
        returns: SizeCounts::new(record.return_6kg, record.return_13kg, record.return_50kg),
        refill_prices: size_prices(
            record.refill_price_6kg,
            record.refill_price_13kg,
            record.refill_price_50kg,
            engine::DEFAULT_MAX_EMPTY_PRICES,
        ),
        swipe_returns: SizeCounts::new(
            record.swipe_return_6kg,
            record.swipe_return_13kg,
            record.swipe_return_50kg,
        ),
        swipe_prices: size_prices(
            record.swipe_refill_price_6kg,
            record.swipe_refill_price_13kg,
            record.swipe_refill_price_50kg,
            engine::DEFAULT_SWAP_EMPTY_PRICES,
        ),
        outright: SizeCounts::new(
            record.outright_6kg,
            record.outright_13kg,
            record.outright_50kg,
        ),
        outright_prices: size_prices(
            record.outright_price_6kg,
            record.outright_price_13kg,
            record.outright_price_50kg,
            LEGACY_OUTRIGHT_PRICES,
        ),
        paid: Money::from_cents(record.paid),
        notes: record.notes,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state.engine.create_transaction(map_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(100);
    let transactions = state
        .engine
        .list_transactions(query.customer_id, limit)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(id, map_input(payload))
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn import_legacy(
    State(state): State<ServerState>,
    Json(payload): Json<LegacyImportRequest>,
) -> Result<(StatusCode, Json<LegacyImportResponse>), ServerError> {
    let records = payload.transactions.into_iter().map(map_legacy).collect();
    let imported = state
        .engine
        .import_legacy_transactions(records)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok((StatusCode::CREATED, Json(LegacyImportResponse { imported })))
}
