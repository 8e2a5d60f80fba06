//! Response bodies for the legacy DynamoDB API.
//!
//! Decoding is lenient: every field the service may leave out defaults, and
//! fields not modelled here are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValueMap;
use crate::types::{
    ConsumedCapacity, ItemCollectionMetrics, KeysAndAttributes, TableDescription, WriteRequest,
};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Output for the `CreateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableOutput {
    /// The new table, usually still `CREATING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// Output for the `DeleteTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableOutput {
    /// The table, usually `DELETING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// Output for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    /// Table metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDescription>,
}

/// Output for the `UpdateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableOutput {
    /// The table, usually `UPDATING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// Output for the `ListTables` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesOutput {
    /// One page of table names.
    #[serde(default)]
    pub table_names: Vec<String>,

    /// Pass as `ExclusiveStartTableName` to fetch the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_table_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Output for the `GetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// The item, absent when no item has the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<AttributeValueMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output shared by `PutItem`, `UpdateItem` and `DeleteItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteItemOutput {
    /// Item image selected by `ReturnValues`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: AttributeValueMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub consumed_capacity: Option<ConsumedCapacity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output for the `PutItem` operation.
pub type PutItemOutput = WriteItemOutput;
/// Output for the `UpdateItem` operation.
pub type UpdateItemOutput = WriteItemOutput;
/// Output for the `DeleteItem` operation.
pub type DeleteItemOutput = WriteItemOutput;

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// Output shared by `Query` and `Scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemPageOutput {
    /// Matching items; empty for `Select: COUNT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AttributeValueMap>,

    /// Items after filtering.
    #[serde(default)]
    pub count: i32,

    /// Items examined before filtering.
    #[serde(default)]
    pub scanned_count: i32,

    /// Pass as `ExclusiveStartKey` to fetch the next page; empty on the last.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: AttributeValueMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output for the `Query` operation.
pub type QueryOutput = ItemPageOutput;
/// Output for the `Scan` operation.
pub type ScanOutput = ItemPageOutput;

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Output for the `BatchGetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Table name to the items found.
    #[serde(default)]
    pub responses: HashMap<String, Vec<AttributeValueMap>>,

    /// Keys the service did not get to; resubmit them.
    #[serde(default)]
    pub unprocessed_keys: HashMap<String, KeysAndAttributes>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[allow(missing_docs)]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

/// Output for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Requests the service did not get to; resubmit them.
    #[serde(default)]
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    #[allow(missing_docs)]
    pub item_collection_metrics: HashMap<String, Vec<ItemCollectionMetrics>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[allow(missing_docs)]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_decode_query_page_with_missing_counts() {
        let body = r#"{"Items": [{"pk": {"S": "a"}}], "LastEvaluatedKey": {"pk": {"S": "a"}}}"#;
        let page: QueryOutput = serde_json::from_str(body).expect("deserialize QueryOutput");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.count, 0);
        assert_eq!(page.last_evaluated_key["pk"].as_s(), Some("a"));
    }

    #[test]
    fn test_should_decode_empty_get_item_response() {
        let out: GetItemOutput = serde_json::from_str("{}").expect("deserialize GetItemOutput");
        assert!(out.item.is_none());
    }

    #[test]
    fn test_should_decode_describe_table_response() {
        let body = r#"{
            "Table": {
                "TableName": "users",
                "TableStatus": "ACTIVE",
                "KeySchema": [{"AttributeName": "pk", "KeyType": "HASH"}],
                "AttributeDefinitions": [{"AttributeName": "pk", "AttributeType": "S"}],
                "StreamSpecification": {"StreamEnabled": false}
            }
        }"#;
        let out: DescribeTableOutput =
            serde_json::from_str(body).expect("deserialize DescribeTableOutput");
        let table = out.table.expect("table present");
        assert_eq!(table.table_name.as_deref(), Some("users"));
        assert_eq!(table.key_schema.len(), 1);
    }
}
