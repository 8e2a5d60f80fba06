//! Request bodies for the legacy DynamoDB API.
//!
//! Each struct serializes to the exact JSON body of one operation. Optional
//! fields are omitted when `None`; empty maps and lists are omitted unless the
//! operation treats an empty value as meaningful.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValueMap;
use crate::types::{
    AttributeDefinition, AttributeValueUpdate, Condition, ExpectedAttributeValue,
    GlobalSecondaryIndex, GlobalSecondaryIndexUpdate, KeySchemaElement, KeysAndAttributes,
    LocalSecondaryIndex, ProvisionedThroughput, ReturnConsumedCapacity,
    ReturnItemCollectionMetrics, ReturnValue, Select, WriteRequest,
};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Input for the `CreateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableInput {
    /// Name of the table to create.
    pub table_name: String,

    /// Declared types of every key attribute of the table and its indexes.
    pub attribute_definitions: Vec<AttributeDefinition>,

    /// Partition key first, then the optional sort key.
    pub key_schema: Vec<KeySchemaElement>,

    /// Table throughput.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[allow(missing_docs)]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[allow(missing_docs)]
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
}

/// Input for the `DeleteTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableInput {
    /// Name of the table to delete.
    pub table_name: String,
}

/// Input for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableInput {
    /// Name of the table to describe.
    pub table_name: String,
}

/// Input for the `UpdateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableInput {
    /// Name of the table to update.
    pub table_name: String,

    /// New table throughput.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,

    /// Per-index throughput changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_index_updates: Vec<GlobalSecondaryIndexUpdate>,
}

/// Input for the `ListTables` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesInput {
    /// Start listing after this table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_table_name: Option<String>,

    /// Maximum number of names to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Input for the `PutItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// Target table.
    pub table_name: String,

    /// Full item: key attributes followed by any extra attributes.
    pub item: AttributeValueMap,

    /// Per-attribute preconditions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expected: HashMap<String, ExpectedAttributeValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_values: Option<ReturnValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// Input for the `GetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    /// Target table.
    pub table_name: String,

    /// Primary key of the item.
    pub key: AttributeValueMap,

    /// Attributes to return. An empty list is sent as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,

    /// Always sent, `false` unless requested.
    #[serde(default)]
    pub consistent_read: bool,
}

/// Input for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemInput {
    /// Target table.
    pub table_name: String,

    /// Primary key of the item.
    pub key: AttributeValueMap,

    /// Attribute name to action and operand. Never empty.
    pub attribute_updates: HashMap<String, AttributeValueUpdate>,

    /// Per-attribute preconditions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expected: HashMap<String, ExpectedAttributeValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_values: Option<ReturnValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// Input for the `DeleteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemInput {
    /// Target table.
    pub table_name: String,

    /// Primary key of the item.
    pub key: AttributeValueMap,

    /// Per-attribute preconditions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expected: HashMap<String, ExpectedAttributeValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_values: Option<ReturnValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// Input for the `Query` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput {
    /// Target table.
    pub table_name: String,

    /// Index to query instead of the base table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,

    /// Key attribute name to condition. Always holds an `EQ` on the hash key.
    pub key_conditions: HashMap<String, Condition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub attributes_to_get: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub consistent_read: Option<bool>,

    /// Resume after this key.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: AttributeValueMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub limit: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Ascending (`true`) or descending sort key order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub select: Option<Select>,
}

/// Input for the `Scan` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    /// Target table.
    pub table_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub attributes_to_get: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub limit: Option<i32>,

    /// Attribute name to filter condition.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scan_filter: HashMap<String, Condition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Resume after this key.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: AttributeValueMap,

    /// Segment scanned by this worker in a parallel scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<i32>,

    /// Number of workers in a parallel scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<i32>,
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Input for the `BatchGetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemInput {
    /// Table name to the keys to fetch from it.
    pub request_items: HashMap<String, KeysAndAttributes>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// Input for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    /// Table name to its ordered put and delete requests.
    pub request_items: HashMap<String, Vec<WriteRequest>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::AttributeValue;

    #[test]
    fn test_should_always_emit_consistent_read_for_get_item() {
        let input = GetItemInput {
            table_name: "users".to_owned(),
            key: HashMap::from([("pk".to_owned(), AttributeValue::S("a".to_owned()))]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).expect("serialize GetItemInput"),
            json!({"TableName": "users", "Key": {"pk": {"S": "a"}}, "ConsistentRead": false})
        );
    }

    #[test]
    fn test_should_emit_empty_attributes_to_get_when_requested() {
        let input = GetItemInput {
            table_name: "users".to_owned(),
            attributes_to_get: Some(Vec::new()),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).expect("serialize GetItemInput");
        assert_eq!(value["AttributesToGet"], json!([]));
    }

    #[test]
    fn test_should_omit_unset_scan_options() {
        let input = ScanInput {
            table_name: "users".to_owned(),
            segment: Some(0),
            total_segments: Some(4),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).expect("serialize ScanInput"),
            json!({"TableName": "users", "Segment": 0, "TotalSegments": 4})
        );
    }

    #[test]
    fn test_should_serialize_list_tables_without_options() {
        let input = ListTablesInput::default();
        assert_eq!(
            serde_json::to_string(&input).expect("serialize ListTablesInput"),
            "{}"
        );
    }
}
