//! Error taxonomy for the connection layer.

use std::fmt;
use std::time::Duration;

use http::StatusCode;
use serde_json::Value;

use dynawire_model::{DynamoDBErrorCode, DynamoDBOperation, InvalidEnumValue, ServiceErrorBody};

/// Request family an [`ClientError::Operation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Create, delete, update, describe or list tables.
    Table,
    /// GetItem.
    Get,
    /// PutItem.
    Put,
    /// UpdateItem.
    Update,
    /// DeleteItem.
    Delete,
    /// Query.
    Query,
    /// Scan.
    Scan,
    /// BatchGetItem and BatchWriteItem.
    Batch,
}

impl OperationKind {
    /// Family of a wire operation.
    #[must_use]
    pub fn of(operation: DynamoDBOperation) -> Self {
        match operation {
            DynamoDBOperation::CreateTable
            | DynamoDBOperation::DeleteTable
            | DynamoDBOperation::UpdateTable
            | DynamoDBOperation::DescribeTable
            | DynamoDBOperation::ListTables => Self::Table,
            DynamoDBOperation::GetItem => Self::Get,
            DynamoDBOperation::PutItem => Self::Put,
            DynamoDBOperation::UpdateItem => Self::Update,
            DynamoDBOperation::DeleteItem => Self::Delete,
            DynamoDBOperation::Query => Self::Query,
            DynamoDBOperation::Scan => Self::Scan,
            DynamoDBOperation::BatchGetItem | DynamoDBOperation::BatchWriteItem => Self::Batch,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Get => "get",
            Self::Put => "put",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Query => "query",
            Self::Scan => "scan",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response within the allotted time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request was dropped before completing.
    #[error("request canceled")]
    Canceled,

    /// Anything else: connection, TLS, signing.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by [`DynamoDBConnection`](crate::connection::DynamoDBConnection).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Table metadata cannot support the request.
    #[error("table {table}: {message}")]
    Schema {
        /// Table name.
        table: String,
        /// What is wrong with its metadata.
        message: String,
    },

    /// An attribute name has no declared type.
    #[error("No attribute {name} in [{}]", .declared.join(", "))]
    UnknownAttribute {
        /// Table name.
        table: String,
        /// The undeclared name.
        name: String,
        /// Every declared attribute name.
        declared: Vec<String>,
    },

    /// Caller input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// DescribeTable reported that the table does not exist.
    #[error("table {0} not found")]
    TableNotFound(String),

    /// The store answered with a non-success status.
    #[error("{kind} operation {operation} failed with status {status}: {body}")]
    Operation {
        /// Request family.
        kind: OperationKind,
        /// Wire operation.
        operation: DynamoDBOperation,
        /// HTTP status.
        status: StatusCode,
        /// Error code from `__type`, if recognised.
        code: Option<DynamoDBErrorCode>,
        /// Error message, if present.
        message: Option<String>,
        /// Raw response body.
        body: Value,
    },

    /// A success response did not match the expected shape.
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        #[allow(missing_docs)]
        operation: DynamoDBOperation,
        #[allow(missing_docs)]
        source: serde_json::Error,
    },

    /// A request body could not be serialized.
    #[error("failed to encode {operation} request: {source}")]
    Encode {
        #[allow(missing_docs)]
        operation: DynamoDBOperation,
        #[allow(missing_docs)]
        source: serde_json::Error,
    },

    /// The transport failed; nothing is retried.
    #[error("{operation} transport failure: {source}")]
    Transport {
        #[allow(missing_docs)]
        operation: DynamoDBOperation,
        #[allow(missing_docs)]
        source: TransportError,
    },
}

impl ClientError {
    /// Build an [`Operation`](Self::Operation) error from a failed response.
    #[must_use]
    pub fn operation(operation: DynamoDBOperation, status: StatusCode, body: Value) -> Self {
        let parsed = ServiceErrorBody::from_value(&body);
        Self::Operation {
            kind: OperationKind::of(operation),
            operation,
            status,
            code: parsed.code(),
            message: parsed.message,
            body,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn schema(table: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            table: table.to_owned(),
            message: message.into(),
        }
    }

    /// Service error code, for [`Operation`](Self::Operation) errors.
    #[must_use]
    pub fn code(&self) -> Option<DynamoDBErrorCode> {
        match self {
            Self::Operation { code, .. } => *code,
            _ => None,
        }
    }

    /// Whether an `Expected` precondition rejected the write.
    #[must_use]
    pub fn is_conditional_check_failed(&self) -> bool {
        self.code() == Some(DynamoDBErrorCode::ConditionalCheckFailedException)
    }
}

impl From<InvalidEnumValue> for ClientError {
    fn from(e: InvalidEnumValue) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Convenience result type for connection operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_classify_operations() {
        assert_eq!(
            OperationKind::of(DynamoDBOperation::UpdateTable),
            OperationKind::Table
        );
        assert_eq!(
            OperationKind::of(DynamoDBOperation::BatchWriteItem),
            OperationKind::Batch
        );
        assert_eq!(OperationKind::of(DynamoDBOperation::Scan).to_string(), "scan");
    }

    #[test]
    fn test_should_keep_raw_body_on_operation_error() {
        let body = json!({
            "__type": "com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException",
            "message": "The conditional request failed"
        });
        let err = ClientError::operation(
            DynamoDBOperation::PutItem,
            StatusCode::BAD_REQUEST,
            body.clone(),
        );
        assert!(err.is_conditional_check_failed());
        match err {
            ClientError::Operation {
                kind,
                body: raw,
                message,
                ..
            } => {
                assert_eq!(kind, OperationKind::Put);
                assert_eq!(raw, body);
                assert_eq!(message.as_deref(), Some("The conditional request failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_list_declared_names_for_unknown_attribute() {
        let err = ClientError::UnknownAttribute {
            table: "users".to_owned(),
            name: "age".to_owned(),
            declared: vec!["pk".to_owned(), "sk".to_owned()],
        };
        assert_eq!(err.to_string(), "No attribute age in [pk, sk]");
    }
}
