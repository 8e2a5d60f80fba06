//! DynamoDB operation enum.

use std::fmt;

/// Every operation the connection layer can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamoDBOperation {
    // Table management
    /// Create a new table.
    CreateTable,
    /// Delete a table.
    DeleteTable,
    /// Change provisioned throughput of a table or its global indexes.
    UpdateTable,
    /// Fetch table metadata.
    DescribeTable,
    /// List table names.
    ListTables,

    // Item CRUD
    /// Put (insert or replace) an item.
    PutItem,
    /// Get an item by primary key.
    GetItem,
    /// Apply attribute updates to an item.
    UpdateItem,
    /// Delete an item by primary key.
    DeleteItem,

    // Query & Scan
    /// Query items by key condition.
    Query,
    /// Scan all items in a table.
    Scan,

    // Batch operations
    /// Get many items by key.
    BatchGetItem,
    /// Put and delete many items.
    BatchWriteItem,
}

impl DynamoDBOperation {
    /// Returns the operation name used as the `X-Amz-Target` suffix.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::DeleteTable => "DeleteTable",
            Self::UpdateTable => "UpdateTable",
            Self::DescribeTable => "DescribeTable",
            Self::ListTables => "ListTables",
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::BatchGetItem => "BatchGetItem",
            Self::BatchWriteItem => "BatchWriteItem",
        }
    }

    /// Full `X-Amz-Target` header value for the 2012-08-10 API version.
    #[must_use]
    pub fn target(&self) -> String {
        format!("DynamoDB_20120810.{}", self.as_str())
    }
}

impl fmt::Display for DynamoDBOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_target_header() {
        assert_eq!(
            DynamoDBOperation::BatchWriteItem.target(),
            "DynamoDB_20120810.BatchWriteItem"
        );
        assert_eq!(DynamoDBOperation::UpdateTable.to_string(), "UpdateTable");
    }
}
