//! Caller-facing inputs for connection operations.
//!
//! Enumerated options (`return_values`, `select`, comparison operators, update
//! actions) are plain strings here: they are validated, case-insensitively,
//! before anything is sent.

use dynawire_model::AttributeValue;
use dynawire_model::AttributeValueMap;
use dynawire_model::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, LocalSecondaryIndex,
    UpdateGlobalSecondaryIndexAction,
};

/// A value for a declared attribute.
///
/// `Raw` values are tagged with the attribute's declared type. `Typed` values
/// are sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInput {
    /// Untagged scalar text. Binary attributes take base64.
    Raw(String),
    /// Already tagged.
    Typed(AttributeValue),
}

impl From<&str> for AttributeInput {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

impl From<String> for AttributeInput {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<i64> for AttributeInput {
    fn from(value: i64) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<u64> for AttributeInput {
    fn from(value: u64) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<AttributeValue> for AttributeInput {
    fn from(value: AttributeValue) -> Self {
        Self::Typed(value)
    }
}

/// Attribute name and value pairs, in the order they should be applied.
pub type Attributes = Vec<(String, AttributeInput)>;

/// Collect `(name, value)` pairs into [`Attributes`].
pub fn attributes<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Attributes
where
    K: Into<String>,
    V: Into<AttributeInput>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Primary key of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    /// Partition key value.
    pub hash: AttributeInput,
    /// Sort key value, for tables that have one.
    pub range: Option<AttributeInput>,
}

impl ItemKey {
    /// Key of a table without a sort key.
    pub fn hash(hash: impl Into<AttributeInput>) -> Self {
        Self {
            hash: hash.into(),
            range: None,
        }
    }

    /// Partition plus sort key.
    pub fn composite(hash: impl Into<AttributeInput>, range: impl Into<AttributeInput>) -> Self {
        Self {
            hash: hash.into(),
            range: Some(range.into()),
        }
    }
}

/// Precondition on one attribute of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedCondition {
    /// The attribute must (or must not) exist.
    Exists(bool),
    /// The attribute must currently equal this value.
    Value(AttributeInput),
}

impl ExpectedCondition {
    /// Require the current value to equal `value`.
    pub fn equals(value: impl Into<AttributeInput>) -> Self {
        Self::Value(value.into())
    }
}

/// One entry of an UpdateItem request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeUpdate {
    /// `PUT`, `ADD` or `DELETE`.
    pub action: String,
    /// Operand; omit to delete the whole attribute.
    pub value: Option<AttributeInput>,
}

impl AttributeUpdate {
    /// Build an update from an action name.
    pub fn new(action: impl Into<String>, value: Option<AttributeInput>) -> Self {
        Self {
            action: action.into(),
            value,
        }
    }

    /// Replace the attribute.
    pub fn put(value: impl Into<AttributeInput>) -> Self {
        Self::new("PUT", Some(value.into()))
    }

    /// Add to a number or set.
    pub fn add(value: impl Into<AttributeInput>) -> Self {
        Self::new("ADD", Some(value.into()))
    }

    /// Remove the attribute.
    #[must_use]
    pub fn delete() -> Self {
        Self::new("DELETE", None)
    }
}

/// One entry of a query key condition or a scan filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionInput {
    /// Comparison operator name, e.g. `BEGINS_WITH`.
    pub operator: String,
    /// Operands; `BETWEEN` takes two, `IN` any number, `NULL` none.
    pub values: Vec<AttributeInput>,
}

impl ConditionInput {
    /// Build a condition from an operator name.
    pub fn new<V: Into<AttributeInput>>(
        operator: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            operator: operator.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[allow(missing_docs)]
    pub fn equals(value: impl Into<AttributeInput>) -> Self {
        Self::new("EQ", [value.into()])
    }

    #[allow(missing_docs)]
    pub fn begins_with(prefix: impl Into<AttributeInput>) -> Self {
        Self::new("BEGINS_WITH", [prefix.into()])
    }

    #[allow(missing_docs)]
    pub fn between(low: impl Into<AttributeInput>, high: impl Into<AttributeInput>) -> Self {
        Self::new("BETWEEN", [low.into(), high.into()])
    }
}

/// Where a query or scan resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusiveStartKey {
    /// Partition key value only, tagged with the hash key type.
    Hash(AttributeInput),
    /// A `LastEvaluatedKey` from a previous page, sent verbatim.
    Evaluated(AttributeValueMap),
}

macro_rules! from_hash_value {
    ($($src:ty),+) => {
        $(
            impl From<$src> for ItemKey {
                fn from(hash: $src) -> Self {
                    Self::hash(hash)
                }
            }

            impl From<$src> for ExclusiveStartKey {
                fn from(hash: $src) -> Self {
                    Self::Hash(hash.into())
                }
            }
        )+
    };
}

from_hash_value!(&str, String, i64, u64, AttributeValue);

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Arguments of [`create_table`](crate::connection::DynamoDBConnection::create_table).
#[derive(Debug, Clone, Default)]
pub struct CreateTableOptions {
    /// Required, non-empty.
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Required, non-empty. Sent sorted with `HASH` first.
    pub key_schema: Vec<KeySchemaElement>,
    /// Supplied together with `write_capacity_units`, or not at all.
    pub read_capacity_units: Option<i64>,
    #[allow(missing_docs)]
    pub write_capacity_units: Option<i64>,
    #[allow(missing_docs)]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    #[allow(missing_docs)]
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
}

/// Arguments of [`update_table`](crate::connection::DynamoDBConnection::update_table).
#[derive(Debug, Clone, Default)]
pub struct UpdateTableOptions {
    /// Supplied together with `write_capacity_units`, or not at all.
    pub read_capacity_units: Option<i64>,
    #[allow(missing_docs)]
    pub write_capacity_units: Option<i64>,
    /// Each entry is sent wrapped as `{"Update": ...}`.
    pub global_secondary_index_updates: Vec<UpdateGlobalSecondaryIndexAction>,
}

/// Arguments of [`list_tables`](crate::connection::DynamoDBConnection::list_tables).
#[derive(Debug, Clone, Default)]
pub struct ListTablesOptions {
    #[allow(missing_docs)]
    pub exclusive_start_table_name: Option<String>,
    #[allow(missing_docs)]
    pub limit: Option<i32>,
}

// ---------------------------------------------------------------------------
// Item operations
// ---------------------------------------------------------------------------

/// Arguments of [`get_item`](crate::connection::DynamoDBConnection::get_item).
#[derive(Debug, Clone, Default)]
pub struct GetItemOptions {
    #[allow(missing_docs)]
    pub consistent_read: bool,
    /// Sent whenever set, even if empty.
    pub attributes_to_get: Option<Vec<String>>,
}

/// Arguments of [`put_item`](crate::connection::DynamoDBConnection::put_item).
#[derive(Debug, Clone, Default)]
pub struct PutItemOptions {
    /// Non-key attributes, merged into the item after the key.
    pub attributes: Attributes,
    #[allow(missing_docs)]
    pub expected: Vec<(String, ExpectedCondition)>,
    #[allow(missing_docs)]
    pub return_values: Option<String>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<String>,
}

/// Arguments of [`update_item`](crate::connection::DynamoDBConnection::update_item).
#[derive(Debug, Clone, Default)]
pub struct UpdateItemOptions {
    /// Required, non-empty.
    pub attribute_updates: Vec<(String, AttributeUpdate)>,
    #[allow(missing_docs)]
    pub expected: Vec<(String, ExpectedCondition)>,
    #[allow(missing_docs)]
    pub return_values: Option<String>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<String>,
}

/// Arguments of [`delete_item`](crate::connection::DynamoDBConnection::delete_item).
#[derive(Debug, Clone, Default)]
pub struct DeleteItemOptions {
    #[allow(missing_docs)]
    pub expected: Vec<(String, ExpectedCondition)>,
    #[allow(missing_docs)]
    pub return_values: Option<String>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<String>,
}

// ---------------------------------------------------------------------------
// Batch, Query & Scan
// ---------------------------------------------------------------------------

/// Arguments of [`batch_write_item`](crate::connection::DynamoDBConnection::batch_write_item).
#[derive(Debug, Clone, Default)]
pub struct BatchWriteOptions {
    /// Whole items to put.
    pub put_items: Vec<Attributes>,
    /// Keys to delete. Sent before the puts.
    pub delete_items: Vec<Attributes>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<String>,
}

/// Arguments of [`batch_get_item`](crate::connection::DynamoDBConnection::batch_get_item).
#[derive(Debug, Clone, Default)]
pub struct BatchGetOptions {
    #[allow(missing_docs)]
    pub consistent_read: Option<bool>,
    #[allow(missing_docs)]
    pub attributes_to_get: Option<Vec<String>>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
}

/// Arguments of [`query`](crate::connection::DynamoDBConnection::query).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    #[allow(missing_docs)]
    pub index_name: Option<String>,
    /// Extra key conditions; an entry for the hash key replaces the implicit
    /// `EQ`.
    pub key_conditions: Vec<(String, ConditionInput)>,
    #[allow(missing_docs)]
    pub attributes_to_get: Option<Vec<String>>,
    /// Only sent when `true`.
    pub consistent_read: bool,
    #[allow(missing_docs)]
    pub exclusive_start_key: Option<ExclusiveStartKey>,
    #[allow(missing_docs)]
    pub limit: Option<i32>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub scan_index_forward: Option<bool>,
    #[allow(missing_docs)]
    pub select: Option<String>,
}

/// Arguments of [`scan`](crate::connection::DynamoDBConnection::scan).
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    #[allow(missing_docs)]
    pub attributes_to_get: Option<Vec<String>>,
    #[allow(missing_docs)]
    pub limit: Option<i32>,
    #[allow(missing_docs)]
    pub scan_filter: Vec<(String, ConditionInput)>,
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<String>,
    #[allow(missing_docs)]
    pub exclusive_start_key: Option<ExclusiveStartKey>,
    /// This worker's segment of a parallel scan.
    pub segment: Option<i32>,
    #[allow(missing_docs)]
    pub total_segments: Option<i32>,
}
