use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{customers, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Expected bearer token. `None` disables the check (development mode);
    /// authentication proper is owned by an upstream identity service.
    pub token: Option<Arc<str>>,
}

async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(expected) = state.token.as_deref() {
        let Some(TypedHeader(header)) = bearer else {
            return Err(StatusCode::UNAUTHORIZED);
        };
        if header.token() != expected {
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/customers",
            post(customers::create).get(customers::list),
        )
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/customers/{id}/balances", get(customers::balances))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/transactions/import-legacy",
            post(transactions::import_legacy),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, token: Option<String>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, token, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    token: Option<String>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        token: token.map(Arc::from),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    token: Option<String>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, token, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

/// Builds the router directly; used by integration tests to drive the API
/// in-process without a listener.
pub fn app(engine: Engine, token: Option<String>) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        token: token.map(Arc::from),
    })
}
