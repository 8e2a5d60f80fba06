//! Schema-aware connection layer for the legacy DynamoDB API.
//!
//! [`DynamoDBConnection`] turns plain attribute values into typed request
//! bodies using each table's declared key schema, sends them through a
//! pluggable [`Transport`], and maps failures onto [`ClientError`].

pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod options;
pub mod schema;
pub mod transport;

#[cfg(test)]
mod testing;

pub use cache::SchemaCache;
pub use config::ConnectionConfig;
pub use connection::DynamoDBConnection;
pub use error::{ClientError, ClientResult, OperationKind, TransportError};
pub use options::{AttributeInput, Attributes, ExclusiveStartKey, ItemKey, attributes};
pub use schema::TableSchema;
pub use transport::{TimeoutTransport, Transport, TransportResponse};
