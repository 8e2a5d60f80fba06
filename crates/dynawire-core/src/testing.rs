//! Test doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Once;

use http::StatusCode;
use parking_lot::Mutex;
use serde_json::{Value, json};

use dynawire_model::DynamoDBOperation;

use crate::error::TransportError;
use crate::transport::{Transport, TransportResponse};

static TRACING: Once = Once::new();

/// Install a test-writer tracing subscriber once per test binary.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Transport that records every request and answers from per-operation
/// queues. An operation with nothing queued gets `200 {}`.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<(DynamoDBOperation, Value)>>,
    responses: Mutex<HashMap<DynamoDBOperation, VecDeque<Result<TransportResponse, TransportError>>>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `operation` request.
    pub(crate) fn respond(&self, operation: DynamoDBOperation, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.push(operation, Ok(TransportResponse::new(status, body)));
    }

    /// Queue a transport failure for the next `operation` request.
    pub(crate) fn fail(&self, operation: DynamoDBOperation, error: TransportError) {
        self.push(operation, Err(error));
    }

    fn push(
        &self,
        operation: DynamoDBOperation,
        response: Result<TransportResponse, TransportError>,
    ) {
        self.responses
            .lock()
            .entry(operation)
            .or_default()
            .push_back(response);
    }

    /// Queue a DescribeTable answer for `table`.
    pub(crate) fn describe(&self, table: Value) {
        self.respond(DynamoDBOperation::DescribeTable, 200, json!({ "Table": table }));
    }

    pub(crate) fn calls(&self) -> Vec<(DynamoDBOperation, Value)> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Bodies sent for `operation`, in order.
    pub(crate) fn bodies(&self, operation: DynamoDBOperation) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// The single body sent for `operation`.
    pub(crate) fn body(&self, operation: DynamoDBOperation) -> Value {
        let mut bodies = self.bodies(operation);
        assert_eq!(bodies.len(), 1, "expected exactly one {operation} call");
        bodies.remove(0)
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn execute(
        &self,
        operation: DynamoDBOperation,
        body: Value,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().push((operation, body));
        let queued = self
            .responses
            .lock()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        queued.unwrap_or_else(|| Ok(TransportResponse::ok(json!({}))))
    }
}

/// `forum` (S, HASH) + `subject` (S, RANGE), with `views` (N) and `digest`
/// (B) also declared.
pub(crate) fn thread_table() -> Value {
    json!({
        "TableName": "threads",
        "TableStatus": "ACTIVE",
        "KeySchema": [
            {"AttributeName": "forum", "KeyType": "HASH"},
            {"AttributeName": "subject", "KeyType": "RANGE"}
        ],
        "AttributeDefinitions": [
            {"AttributeName": "forum", "AttributeType": "S"},
            {"AttributeName": "subject", "AttributeType": "S"},
            {"AttributeName": "views", "AttributeType": "N"},
            {"AttributeName": "digest", "AttributeType": "B"}
        ]
    })
}

/// `id` (N, HASH) only.
pub(crate) fn user_table() -> Value {
    json!({
        "TableName": "users",
        "TableStatus": "ACTIVE",
        "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
        "AttributeDefinitions": [
            {"AttributeName": "id", "AttributeType": "N"},
            {"AttributeName": "email", "AttributeType": "S"}
        ]
    })
}
