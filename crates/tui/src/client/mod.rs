use std::time::Duration;

use api_types::{
    ErrorResponse,
    customer::{CustomerBalancesView, CustomerListResponse, CustomerNew, CustomerView},
    transaction::{
        TransactionListResponse, TransactionNew, TransactionView,
    },
};
use reqwest::{StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Every gateway call is aborted after this long; slow free-tier hosts take
/// a while to wake up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Timeout,
    Transport(reqwest::Error),
}

impl ClientError {
    /// Operator-facing message for toasts and form errors.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized => "Not authorized: check the API token.".to_string(),
            Self::NotFound => "Not found on the server.".to_string(),
            Self::Conflict(message) => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Server(message) => format!("Server error: {message}"),
            Self::Timeout => {
                "No response after 30s; the server may still be waking up. Try again.".to_string()
            }
            Self::Transport(err) => format!("Server unreachable: {err}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url,
            token,
            http,
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn request(
        &self,
        method: reqwest::Method,
        endpoint: Url,
    ) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, endpoint);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => {
                tracing::warn!("no API token configured; sending unauthenticated request");
                builder
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = builder.send().await.map_err(map_transport)?;

        if res.status().is_success() {
            return res.json::<T>().await.map_err(map_transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::CONFLICT => ClientError::Conflict(body),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                ClientError::Validation(body)
            }
            _ => ClientError::Server(body),
        })
    }

    async fn send_no_body(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> std::result::Result<(), ClientError> {
        let res = builder.send().await.map_err(map_transport)?;
        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::CONFLICT => ClientError::Conflict(body),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                ClientError::Validation(body)
            }
            _ => ClientError::Server(body),
        })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, ClientError> {
        let endpoint = self.endpoint(path)?;
        self.send(self.request(reqwest::Method::POST, endpoint).json(body))
            .await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, ClientError> {
        let endpoint = self.endpoint(path)?;
        self.send(self.request(reqwest::Method::PUT, endpoint).json(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, ClientError> {
        let endpoint = self.endpoint(path)?;
        self.send(self.request(reqwest::Method::GET, endpoint)).await
    }

    pub async fn list_customers(
        &self,
    ) -> std::result::Result<Vec<CustomerView>, ClientError> {
        let response: CustomerListResponse = self.get("customers").await?;
        Ok(response.customers)
    }

    pub async fn customer(
        &self,
        id: Uuid,
    ) -> std::result::Result<CustomerView, ClientError> {
        self.get(&format!("customers/{id}")).await
    }

    pub async fn customer_balances(
        &self,
        id: Uuid,
    ) -> std::result::Result<CustomerBalancesView, ClientError> {
        self.get(&format!("customers/{id}/balances")).await
    }

    pub async fn create_customer(
        &self,
        payload: &CustomerNew,
    ) -> std::result::Result<CustomerView, ClientError> {
        self.post("customers", payload).await
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        payload: &CustomerNew,
    ) -> std::result::Result<CustomerView, ClientError> {
        self.put(&format!("customers/{id}"), payload).await
    }

    /// Deletes a customer; `force` cascades to their transactions.
    pub async fn delete_customer(
        &self,
        id: Uuid,
        force: bool,
    ) -> std::result::Result<(), ClientError> {
        let path = if force {
            format!("customers/{id}?force=true")
        } else {
            format!("customers/{id}")
        };
        let endpoint = self.endpoint(&path)?;
        self.send_no_body(self.request(reqwest::Method::DELETE, endpoint))
            .await
    }

    pub async fn list_transactions(
        &self,
        customer_id: Uuid,
        limit: u64,
    ) -> std::result::Result<Vec<TransactionView>, ClientError> {
        let response: TransactionListResponse = self
            .get(&format!(
                "transactions?customerId={customer_id}&limit={limit}"
            ))
            .await?;
        Ok(response.transactions)
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionNew,
    ) -> std::result::Result<TransactionView, ClientError> {
        self.post("transactions", payload).await
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        payload: &TransactionNew,
    ) -> std::result::Result<TransactionView, ClientError> {
        self.put(&format!("transactions/{id}"), payload).await
    }

    pub async fn delete_transaction(&self, id: Uuid) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&format!("transactions/{id}"))?;
        self.send_no_body(self.request(reqwest::Method::DELETE, endpoint))
            .await
    }
}

fn map_transport(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(err)
    }
}
