//! Customer API endpoints

use api_types::customer::{
    CustomerBalancesView, CustomerDelete, CustomerListResponse, CustomerNew, CustomerView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::CustomerCategory) -> api_types::customer::CustomerCategory {
    match category {
        engine::CustomerCategory::Regular => api_types::customer::CustomerCategory::Regular,
        engine::CustomerCategory::Vip => api_types::customer::CustomerCategory::Vip,
        engine::CustomerCategory::New => api_types::customer::CustomerCategory::New,
    }
}

fn map_category_in(category: api_types::customer::CustomerCategory) -> engine::CustomerCategory {
    match category {
        api_types::customer::CustomerCategory::Regular => engine::CustomerCategory::Regular,
        api_types::customer::CustomerCategory::Vip => engine::CustomerCategory::Vip,
        api_types::customer::CustomerCategory::New => engine::CustomerCategory::New,
    }
}

pub(crate) fn map_customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        category: map_category(customer.category),
        created_at: customer.created_at.fixed_offset(),
        last_transaction_date: customer.last_transaction_date.map(|dt| dt.fixed_offset()),
        total_billed: customer.total_billed.cents(),
        total_paid: customer.total_paid.cents(),
        financial_balance: customer.financial_balance.cents(),
        cylinder_balance_6kg: customer.cylinders.kg6,
        cylinder_balance_13kg: customer.cylinders.kg13,
        cylinder_balance_50kg: customer.cylinders.kg50,
        cylinder_balance: customer.cylinders.total(),
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
        location: customer.location,
        county: customer.county,
        address: customer.address,
    }
}

fn map_input(payload: CustomerNew) -> engine::NewCustomer {
    engine::NewCustomer {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        location: payload.location,
        county: payload.county,
        address: payload.address,
        category: payload.category.map(map_category_in),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let customer = state.engine.create_customer(map_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_customer(customer))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CustomerListResponse>, ServerError> {
    let customers = state
        .engine
        .list_customers()
        .await?
        .into_iter()
        .map(map_customer)
        .collect();
    Ok(Json(CustomerListResponse { customers }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.customer(id).await?;
    Ok(Json(map_customer(customer)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerNew>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.update_customer(id, map_input(payload)).await?;
    Ok(Json(map_customer(customer)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CustomerDelete>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(id, query.force).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live re-aggregation over the customer's transactions. Always equals the
/// stored fields on the customer row; clients use it as a consistency
/// check, never as a silent fallback.
pub async fn balances(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerBalancesView>, ServerError> {
    let balances = state.engine.customer_balances(id).await?;
    Ok(Json(CustomerBalancesView {
        total_billed: balances.total_billed.cents(),
        total_paid: balances.total_paid.cents(),
        financial_balance: balances.financial_balance.cents(),
        cylinder_balance_6kg: balances.cylinders.kg6,
        cylinder_balance_13kg: balances.cylinders.kg13,
        cylinder_balance_50kg: balances.cylinders.kg50,
        cylinder_balance: balances.cylinder_total(),
    }))
}
