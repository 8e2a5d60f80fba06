//! DynamoDB wire vocabulary for dynawire.
//!
//! This crate holds everything that has a fixed shape on the wire: the tagged
//! `AttributeValue` union, the enumerated option values a request may carry,
//! and one serde struct per request and response body of the legacy
//! (`KeyConditions` / `ScanFilter` / `AttributeUpdates` / `Expected`) API.
//! The types are hand-written; DynamoDB's JSON protocol maps onto serde derives
//! with `PascalCase` renames and nothing more.

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::{AttributeValue, AttributeValueMap};
pub use error::{DynamoDBErrorCode, ServiceErrorBody};
pub use operations::DynamoDBOperation;
pub use types::{InvalidEnumValue, WireEnum};
