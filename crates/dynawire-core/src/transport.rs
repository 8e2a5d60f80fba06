//! The boundary between request shaping and the network.
//!
//! A [`Transport`] owns signing, HTTP, and endpoint resolution. The connection
//! hands it an operation and a JSON body and only looks at the status code and
//! JSON body that come back; headers are never inspected.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use serde_json::Value;

use dynawire_model::DynamoDBOperation;

use crate::error::TransportError;

/// Status and decoded JSON body of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body; `Value::Null` when empty.
    pub body: Value,
}

impl TransportResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// A `200 OK` response.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }
}

/// Executes one DynamoDB request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` as the `operation` request and return what the store said.
    async fn execute(
        &self,
        operation: DynamoDBOperation,
        body: Value,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(
        &self,
        operation: DynamoDBOperation,
        body: Value,
    ) -> Result<TransportResponse, TransportError> {
        (**self).execute(operation, body).await
    }
}

/// Bounds every request of an inner transport by a deadline.
#[derive(Debug, Clone)]
pub struct TimeoutTransport<T> {
    inner: T,
    timeout: Duration,
}

impl<T> TimeoutTransport<T> {
    /// Wrap `inner`, failing any request that takes longer than `timeout`.
    #[must_use]
    pub fn new(inner: T, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for TimeoutTransport<T> {
    async fn execute(
        &self,
        operation: DynamoDBOperation,
        body: Value,
    ) -> Result<TransportResponse, TransportError> {
        tokio::time::timeout(self.timeout, self.inner.execute(operation, body))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}
