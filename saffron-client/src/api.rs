//! Backend API surface
//!
//! The REST calls the lifecycle core depends on, behind an object-safe
//! trait so the store, coordinator and pollers can run against an
//! in-memory backend in tests.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::models::{OrderStatusUpdate, StockReduceRequest};
use shared::{OrderItem, OrderStatus, RawOrder, StockItem};

/// REST surface consumed by the lifecycle core
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Fetch the full order collection (`GET /api/orders`)
    async fn fetch_orders(&self) -> ClientResult<Vec<RawOrder>>;

    /// Acknowledge a status transition (`PATCH /api/orders/{id}/status`)
    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        staff_id: Option<i64>,
    ) -> ClientResult<()>;

    /// Best-effort stock deduction (`POST /api/stock/reduce`)
    async fn reduce_stock(&self, items: Vec<OrderItem>) -> ClientResult<()>;

    /// Fetch the stock ledger (`GET /api/stock`)
    async fn fetch_stock(&self) -> ClientResult<Vec<StockItem>>;
}

/// `GET /api/orders` response envelope
#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<RawOrder>,
}

/// HTTP client for making network requests to the backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration.
    ///
    /// Fails when the underlying client cannot be built (TLS backend
    /// initialization is the realistic case).
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_json(response).await
    }

    /// Make a PATCH request with JSON body, ignoring the response body
    async fn patch_empty<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let mut request = self.client.patch(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    /// Make a POST request with JSON body, ignoring the response body
    async fn post_empty<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    /// Map a non-2xx response to the error taxonomy
    async fn classify_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Internal(text),
        }
    }

    async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::classify_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn handle_empty(response: reqwest::Response) -> ClientResult<()> {
        if !response.status().is_success() {
            return Err(Self::classify_error(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl OrdersApi for HttpClient {
    async fn fetch_orders(&self) -> ClientResult<Vec<RawOrder>> {
        let response: OrdersResponse = self.get("/api/orders").await?;
        Ok(response.orders)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        staff_id: Option<i64>,
    ) -> ClientResult<()> {
        let payload = OrderStatusUpdate { status, staff_id };
        self.patch_empty(&format!("/api/orders/{}/status", order_id), &payload)
            .await
    }

    async fn reduce_stock(&self, items: Vec<OrderItem>) -> ClientResult<()> {
        let payload = StockReduceRequest { items };
        self.post_empty("/api/stock/reduce", &payload).await
    }

    async fn fetch_stock(&self) -> ClientResult<Vec<StockItem>> {
        self.get("/api/stock").await
    }
}
