//! Schema-aware request builder.
//!
//! Every operation follows the same path: validate enumerated options and
//! required arguments locally, resolve the table schema (cached per table
//! name), assemble the typed request body, hand it to the transport, and map a
//! non-2xx status to [`ClientError::Operation`]. Nothing is retried.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use dynawire_model::input::{
    BatchGetItemInput, BatchWriteItemInput, CreateTableInput, DeleteItemInput, DeleteTableInput,
    DescribeTableInput, GetItemInput, ListTablesInput, PutItemInput, QueryInput, ScanInput,
    UpdateItemInput, UpdateTableInput,
};
use dynawire_model::output::{
    BatchGetItemOutput, BatchWriteItemOutput, CreateTableOutput, DeleteItemOutput,
    DeleteTableOutput, GetItemOutput, ListTablesOutput, PutItemOutput,
    QueryOutput, ScanOutput, UpdateItemOutput, UpdateTableOutput,
};
use dynawire_model::types::{
    AttributeAction, AttributeValueUpdate, ComparisonOperator, Condition, ExpectedAttributeValue,
    GlobalSecondaryIndexUpdate, KeyType, KeysAndAttributes, ProvisionedThroughput,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue, ScalarAttributeType, Select,
    WriteRequest,
};
use dynawire_model::{AttributeValueMap, DynamoDBOperation, InvalidEnumValue, WireEnum};

use crate::cache::SchemaCache;
use crate::config::ConnectionConfig;
use crate::error::{ClientError, ClientResult};
use crate::options::{
    AttributeInput, Attributes, BatchGetOptions, BatchWriteOptions, ConditionInput,
    CreateTableOptions, DeleteItemOptions, ExclusiveStartKey, ExpectedCondition, GetItemOptions,
    ItemKey, ListTablesOptions, PutItemOptions, QueryOptions, ScanOptions, UpdateItemOptions,
    UpdateTableOptions,
};
use crate::schema::TableSchema;
use crate::transport::{Transport, TransportResponse};

/// Connection to one DynamoDB endpoint.
#[derive(Debug)]
pub struct DynamoDBConnection<T> {
    config: ConnectionConfig,
    endpoint: String,
    transport: T,
    schemas: SchemaCache,
}

impl<T: Transport> DynamoDBConnection<T> {
    /// Connect through `transport` with the default configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(ConnectionConfig::default(), transport)
    }

    /// Connect through `transport` with `config`.
    #[must_use]
    pub fn with_config(config: ConnectionConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint_url(),
            config,
            transport,
            schemas: SchemaCache::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Cached table schemas.
    #[must_use]
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schemas
    }

    // -----------------------------------------------------------------------
    // Schema
    // -----------------------------------------------------------------------

    /// Schema of `table`, fetched with DescribeTable on first use.
    ///
    /// `None` when the store answers `400` (the table does not exist).
    pub async fn schema(&self, table: &str) -> ClientResult<Option<Arc<TableSchema>>> {
        if let Some(schema) = self.schemas.get(table) {
            return Ok(Some(schema));
        }
        self.refresh_schema(table).await
    }

    /// Fetch the schema of `table` again and replace the cached snapshot.
    pub async fn refresh_schema(&self, table: &str) -> ClientResult<Option<Arc<TableSchema>>> {
        debug!(table = %table, "fetching table schema");
        let operation = DynamoDBOperation::DescribeTable;
        let body = encode(
            operation,
            &DescribeTableInput {
                table_name: table.to_owned(),
            },
        )?;
        let response = self.execute(operation, body).await?;
        if response.status == StatusCode::BAD_REQUEST {
            debug!(table = %table, "table not found, dropping cached schema");
            self.schemas.remove(table);
            return Ok(None);
        }
        let mut body = check(operation, response)?;
        let raw = body
            .get_mut("Table")
            .map(Value::take)
            .filter(|t| !t.is_null())
            .ok_or_else(|| ClientError::schema(table, "DescribeTable response has no Table"))?;
        let schema = TableSchema::from_table_value(table, raw)
            .map_err(|source| ClientError::Decode { operation, source })?;
        Ok(Some(self.schemas.insert(table, schema)))
    }

    async fn require_schema(&self, table: &str) -> ClientResult<Arc<TableSchema>> {
        self.schema(table)
            .await?
            .ok_or_else(|| ClientError::TableNotFound(table.to_owned()))
    }

    // -----------------------------------------------------------------------
    // Table management
    // -----------------------------------------------------------------------

    /// Create `table`.
    ///
    /// Requires non-empty attribute definitions and key schema with exactly
    /// one `HASH` entry and at most one `RANGE` entry. The key schema is sent
    /// `HASH` first.
    pub async fn create_table(
        &self,
        table: &str,
        options: CreateTableOptions,
    ) -> ClientResult<CreateTableOutput> {
        if options.attribute_definitions.is_empty() {
            return Err(ClientError::validation(
                "attribute_definitions argument is required",
            ));
        }
        if options.key_schema.is_empty() {
            return Err(ClientError::validation("key_schema is required"));
        }
        let roles = |role: KeyType| {
            options
                .key_schema
                .iter()
                .filter(|k| k.key_type == role)
                .count()
        };
        if roles(KeyType::Hash) != 1 || roles(KeyType::Range) > 1 {
            return Err(ClientError::validation(
                "key_schema must have exactly one HASH key and at most one RANGE key",
            ));
        }
        let provisioned_throughput =
            capacity_pair(options.read_capacity_units, options.write_capacity_units)?;

        let mut key_schema = options.key_schema;
        key_schema.sort_by_key(|k| k.key_type.as_str());

        let input = CreateTableInput {
            table_name: table.to_owned(),
            attribute_definitions: options.attribute_definitions,
            key_schema,
            provisioned_throughput,
            global_secondary_indexes: options.global_secondary_indexes,
            local_secondary_indexes: options.local_secondary_indexes,
        };
        self.send(DynamoDBOperation::CreateTable, &input).await
    }

    /// Delete `table` and forget its cached schema.
    pub async fn delete_table(&self, table: &str) -> ClientResult<DeleteTableOutput> {
        let input = DeleteTableInput {
            table_name: table.to_owned(),
        };
        let output = self.send(DynamoDBOperation::DeleteTable, &input).await?;
        self.schemas.remove(table);
        Ok(output)
    }

    /// Change the throughput of `table` and its global secondary indexes.
    pub async fn update_table(
        &self,
        table: &str,
        options: UpdateTableOptions,
    ) -> ClientResult<UpdateTableOutput> {
        let provisioned_throughput =
            capacity_pair(options.read_capacity_units, options.write_capacity_units)?;
        let input = UpdateTableInput {
            table_name: table.to_owned(),
            provisioned_throughput,
            global_secondary_index_updates: options
                .global_secondary_index_updates
                .into_iter()
                .map(|update| GlobalSecondaryIndexUpdate { update })
                .collect(),
        };
        self.send(DynamoDBOperation::UpdateTable, &input).await
    }

    /// List one page of table names.
    pub async fn list_tables(&self, options: ListTablesOptions) -> ClientResult<ListTablesOutput> {
        let input = ListTablesInput {
            exclusive_start_table_name: options.exclusive_start_table_name,
            limit: options.limit,
        };
        self.send(DynamoDBOperation::ListTables, &input).await
    }

    /// The `Table` body DescribeTable returned for `table`, as sent, or `None`
    /// if it does not exist. Always refreshes the cached schema; the typed
    /// view is on [`TableSchema::description`].
    pub async fn describe_table(&self, table: &str) -> ClientResult<Option<Value>> {
        let Some(schema) = self.refresh_schema(table).await? else {
            return Ok(None);
        };
        match schema.raw_description() {
            Some(raw) => Ok(Some(raw.clone())),
            None => encode(DynamoDBOperation::DescribeTable, schema.description()).map(Some),
        }
    }

    // -----------------------------------------------------------------------
    // Schema-backed helpers
    // -----------------------------------------------------------------------

    /// Tag `attributes` with the declared types of `table`.
    pub async fn item_attribute_map(
        &self,
        table: &str,
        attributes: Attributes,
    ) -> ClientResult<AttributeValueMap> {
        self.require_schema(table)
            .await?
            .build_item_attribute_map(attributes)
    }

    /// Declared type of `name` in `table`.
    pub async fn attribute_type(
        &self,
        table: &str,
        name: &str,
    ) -> ClientResult<ScalarAttributeType> {
        self.require_schema(table)
            .await?
            .attribute_type(name)
            .cloned()
    }

    /// Tagged primary key of an item in `table`.
    pub async fn identifier_map(
        &self,
        table: &str,
        key: impl Into<ItemKey>,
    ) -> ClientResult<AttributeValueMap> {
        self.require_schema(table)
            .await?
            .build_identifier_map(key.into())
    }

    /// `Expected` map for a conditional write to `table`.
    pub async fn expected_map(
        &self,
        table: &str,
        expected: Vec<(String, ExpectedCondition)>,
    ) -> ClientResult<HashMap<String, ExpectedAttributeValue>> {
        self.require_schema(table)
            .await?
            .build_expected_map(expected)
    }

    /// `ExclusiveStartKey` for a query or scan of `table`.
    pub async fn exclusive_start_key_map(
        &self,
        table: &str,
        start: impl Into<ExclusiveStartKey>,
    ) -> ClientResult<AttributeValueMap> {
        self.require_schema(table)
            .await?
            .build_exclusive_start_key_map(start.into())
    }

    // -----------------------------------------------------------------------
    // Item CRUD
    // -----------------------------------------------------------------------

    /// Fetch one item. `ConsistentRead` is always sent.
    pub async fn get_item(
        &self,
        table: &str,
        key: impl Into<ItemKey>,
        options: GetItemOptions,
    ) -> ClientResult<GetItemOutput> {
        let schema = self.require_schema(table).await?;
        let input = GetItemInput {
            table_name: table.to_owned(),
            key: schema.build_identifier_map(key.into())?,
            attributes_to_get: options.attributes_to_get,
            consistent_read: options.consistent_read,
        };
        self.send(DynamoDBOperation::GetItem, &input).await
    }

    /// Write a whole item: the key, then `options.attributes` merged in.
    pub async fn put_item(
        &self,
        table: &str,
        key: impl Into<ItemKey>,
        options: PutItemOptions,
    ) -> ClientResult<PutItemOutput> {
        let returns = ReturnOptions::parse(
            options.return_values.as_deref(),
            options.return_consumed_capacity.as_deref(),
            options.return_item_collection_metrics.as_deref(),
        )?;
        let schema = self.require_schema(table).await?;
        let mut item = schema.build_identifier_map(key.into())?;
        item.extend(schema.build_item_attribute_map(options.attributes)?);

        let input = PutItemInput {
            table_name: table.to_owned(),
            item,
            expected: schema.build_expected_map(options.expected)?,
            return_values: returns.values,
            return_consumed_capacity: returns.consumed_capacity,
            return_item_collection_metrics: returns.item_collection_metrics,
        };
        self.send(DynamoDBOperation::PutItem, &input).await
    }

    /// Apply attribute updates to one item.
    ///
    /// The update list must be non-empty and every action one of `PUT`, `ADD`,
    /// `DELETE`; both are checked before any request is sent.
    pub async fn update_item(
        &self,
        table: &str,
        key: impl Into<ItemKey>,
        options: UpdateItemOptions,
    ) -> ClientResult<UpdateItemOutput> {
        if options.attribute_updates.is_empty() {
            return Err(ClientError::validation("AttributeUpdates cannot be empty"));
        }
        let updates = options
            .attribute_updates
            .into_iter()
            .map(|(name, update)| {
                let action = AttributeAction::parse_wire(&update.action)?;
                Ok((name, action, update.value))
            })
            .collect::<ClientResult<Vec<_>>>()?;
        let returns = ReturnOptions::parse(
            options.return_values.as_deref(),
            options.return_consumed_capacity.as_deref(),
            options.return_item_collection_metrics.as_deref(),
        )?;

        let schema = self.require_schema(table).await?;
        let attribute_updates = updates
            .into_iter()
            .map(|(name, action, value)| {
                let value = value.map(|v| schema.encode(&name, v)).transpose()?;
                Ok((name, AttributeValueUpdate { action, value }))
            })
            .collect::<ClientResult<HashMap<_, _>>>()?;

        let input = UpdateItemInput {
            table_name: table.to_owned(),
            key: schema.build_identifier_map(key.into())?,
            attribute_updates,
            expected: schema.build_expected_map(options.expected)?,
            return_values: returns.values,
            return_consumed_capacity: returns.consumed_capacity,
            return_item_collection_metrics: returns.item_collection_metrics,
        };
        self.send(DynamoDBOperation::UpdateItem, &input).await
    }

    /// Delete one item.
    pub async fn delete_item(
        &self,
        table: &str,
        key: impl Into<ItemKey>,
        options: DeleteItemOptions,
    ) -> ClientResult<DeleteItemOutput> {
        let returns = ReturnOptions::parse(
            options.return_values.as_deref(),
            options.return_consumed_capacity.as_deref(),
            options.return_item_collection_metrics.as_deref(),
        )?;
        let schema = self.require_schema(table).await?;
        let input = DeleteItemInput {
            table_name: table.to_owned(),
            key: schema.build_identifier_map(key.into())?,
            expected: schema.build_expected_map(options.expected)?,
            return_values: returns.values,
            return_consumed_capacity: returns.consumed_capacity,
            return_item_collection_metrics: returns.item_collection_metrics,
        };
        self.send(DynamoDBOperation::DeleteItem, &input).await
    }

    // -----------------------------------------------------------------------
    // Batch operations
    // -----------------------------------------------------------------------

    /// Fetch many items of `table` by key, in the order given.
    pub async fn batch_get_item(
        &self,
        table: &str,
        keys: Vec<Attributes>,
        options: BatchGetOptions,
    ) -> ClientResult<BatchGetItemOutput> {
        let return_consumed_capacity =
            parse_option::<ReturnConsumedCapacity>(options.return_consumed_capacity.as_deref())?;
        let schema = self.require_schema(table).await?;
        let keys = keys
            .into_iter()
            .map(|key| schema.build_item_attribute_map(key))
            .collect::<ClientResult<Vec<_>>>()?;

        let input = BatchGetItemInput {
            request_items: HashMap::from([(
                table.to_owned(),
                KeysAndAttributes {
                    keys,
                    attributes_to_get: options.attributes_to_get,
                    consistent_read: options.consistent_read,
                },
            )]),
            return_consumed_capacity,
        };
        self.send(DynamoDBOperation::BatchGetItem, &input).await
    }

    /// Put and delete many items of `table`. Deletes are sent before puts.
    pub async fn batch_write_item(
        &self,
        table: &str,
        options: BatchWriteOptions,
    ) -> ClientResult<BatchWriteItemOutput> {
        if options.put_items.is_empty() && options.delete_items.is_empty() {
            return Err(ClientError::validation(
                "Either put_items or delete_items must be specified",
            ));
        }
        let return_consumed_capacity =
            parse_option::<ReturnConsumedCapacity>(options.return_consumed_capacity.as_deref())?;
        let return_item_collection_metrics = parse_option::<ReturnItemCollectionMetrics>(
            options.return_item_collection_metrics.as_deref(),
        )?;

        let schema = self.require_schema(table).await?;
        let mut requests =
            Vec::with_capacity(options.delete_items.len() + options.put_items.len());
        for key in options.delete_items {
            requests.push(WriteRequest::delete(schema.build_item_attribute_map(key)?));
        }
        for item in options.put_items {
            requests.push(WriteRequest::put(schema.build_item_attribute_map(item)?));
        }

        let input = BatchWriteItemInput {
            request_items: HashMap::from([(table.to_owned(), requests)]),
            return_consumed_capacity,
            return_item_collection_metrics,
        };
        self.send(DynamoDBOperation::BatchWriteItem, &input).await
    }

    // -----------------------------------------------------------------------
    // Query & Scan
    // -----------------------------------------------------------------------

    /// Query the items sharing partition key `hash_key`.
    ///
    /// An `EQ` condition on the hash key is always sent; `options.key_conditions`
    /// are merged over it.
    pub async fn query(
        &self,
        table: &str,
        hash_key: impl Into<AttributeInput>,
        options: QueryOptions,
    ) -> ClientResult<QueryOutput> {
        let select = parse_option::<Select>(options.select.as_deref())?;
        let return_consumed_capacity =
            parse_option::<ReturnConsumedCapacity>(options.return_consumed_capacity.as_deref())?;
        let conditions = parse_conditions(
            options.key_conditions,
            ComparisonOperator::parse_key_condition,
        )?;

        let schema = self.require_schema(table).await?;
        let hash_name = schema.hash_key_name()?;
        let mut key_conditions = HashMap::from([(
            hash_name.to_owned(),
            Condition {
                comparison_operator: ComparisonOperator::Eq,
                attribute_value_list: vec![schema.encode(hash_name, hash_key.into())?],
            },
        )]);
        key_conditions.extend(build_conditions(&schema, conditions)?);

        let input = QueryInput {
            table_name: table.to_owned(),
            index_name: options.index_name,
            key_conditions,
            attributes_to_get: options.attributes_to_get,
            consistent_read: options.consistent_read.then_some(true),
            exclusive_start_key: start_key(&schema, options.exclusive_start_key)?,
            limit: options.limit,
            return_consumed_capacity,
            scan_index_forward: options.scan_index_forward,
            select,
        };
        self.send(DynamoDBOperation::Query, &input).await
    }

    /// Scan `table`, optionally one segment of a parallel scan.
    pub async fn scan(&self, table: &str, options: ScanOptions) -> ClientResult<ScanOutput> {
        let return_consumed_capacity =
            parse_option::<ReturnConsumedCapacity>(options.return_consumed_capacity.as_deref())?;
        let conditions =
            parse_conditions(options.scan_filter, ComparisonOperator::parse_scan_filter)?;

        let schema = self.require_schema(table).await?;
        let input = ScanInput {
            table_name: table.to_owned(),
            attributes_to_get: options.attributes_to_get,
            limit: options.limit,
            scan_filter: build_conditions(&schema, conditions)?,
            return_consumed_capacity,
            exclusive_start_key: start_key(&schema, options.exclusive_start_key)?,
            segment: options.segment,
            total_segments: options.total_segments,
        };
        self.send(DynamoDBOperation::Scan, &input).await
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    async fn send<I, O>(&self, operation: DynamoDBOperation, input: &I) -> ClientResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let body = encode(operation, input)?;
        let response = self.execute(operation, body).await?;
        decode(operation, check(operation, response)?)
    }

    async fn execute(
        &self,
        operation: DynamoDBOperation,
        body: Value,
    ) -> ClientResult<TransportResponse> {
        debug!(
            operation = %operation,
            target = %operation.target(),
            endpoint = %self.endpoint,
            "dispatching DynamoDB request"
        );
        self.transport
            .execute(operation, body)
            .await
            .map_err(|source| {
                warn!(operation = %operation, error = %source, "DynamoDB transport failure");
                ClientError::Transport { operation, source }
            })
    }
}

impl<T> fmt::Display for DynamoDBConnection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connection<{}>", self.endpoint)
    }
}

struct ReturnOptions {
    values: Option<ReturnValue>,
    consumed_capacity: Option<ReturnConsumedCapacity>,
    item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl ReturnOptions {
    fn parse(
        values: Option<&str>,
        consumed_capacity: Option<&str>,
        item_collection_metrics: Option<&str>,
    ) -> ClientResult<Self> {
        Ok(Self {
            values: parse_option(values)?,
            consumed_capacity: parse_option(consumed_capacity)?,
            item_collection_metrics: parse_option(item_collection_metrics)?,
        })
    }
}

fn parse_option<E: WireEnum>(value: Option<&str>) -> ClientResult<Option<E>> {
    Ok(value.map(E::parse_wire).transpose()?)
}

fn capacity_pair(
    read: Option<i64>,
    write: Option<i64>,
) -> ClientResult<Option<ProvisionedThroughput>> {
    match (read, write) {
        (Some(read_capacity_units), Some(write_capacity_units)) => {
            Ok(Some(ProvisionedThroughput {
                read_capacity_units,
                write_capacity_units,
            }))
        }
        (None, None) => Ok(None),
        _ => Err(ClientError::validation(
            "read_capacity_units and write_capacity_units are required together",
        )),
    }
}

type ParsedCondition = (String, ComparisonOperator, Vec<AttributeInput>);

fn parse_conditions(
    conditions: Vec<(String, ConditionInput)>,
    parse: fn(&str) -> Result<ComparisonOperator, InvalidEnumValue>,
) -> ClientResult<Vec<ParsedCondition>> {
    conditions
        .into_iter()
        .map(|(name, condition)| Ok((name, parse(&condition.operator)?, condition.values)))
        .collect()
}

fn build_conditions(
    schema: &TableSchema,
    conditions: Vec<ParsedCondition>,
) -> ClientResult<HashMap<String, Condition>> {
    conditions
        .into_iter()
        .map(|(name, comparison_operator, values)| {
            let attribute_value_list = values
                .into_iter()
                .map(|v| schema.encode(&name, v))
                .collect::<ClientResult<Vec<_>>>()?;
            Ok((
                name,
                Condition {
                    comparison_operator,
                    attribute_value_list,
                },
            ))
        })
        .collect()
}

fn start_key(
    schema: &TableSchema,
    start: Option<ExclusiveStartKey>,
) -> ClientResult<AttributeValueMap> {
    start
        .map(|s| schema.build_exclusive_start_key_map(s))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn encode<I: Serialize + ?Sized>(operation: DynamoDBOperation, input: &I) -> ClientResult<Value> {
    serde_json::to_value(input).map_err(|source| ClientError::Encode { operation, source })
}

fn check(operation: DynamoDBOperation, response: TransportResponse) -> ClientResult<Value> {
    if response.is_ok() {
        return Ok(response.body);
    }
    warn!(
        operation = %operation,
        status = %response.status,
        "DynamoDB request failed"
    );
    Err(ClientError::operation(
        operation,
        response.status,
        response.body,
    ))
}

fn decode<O: DeserializeOwned>(operation: DynamoDBOperation, body: Value) -> ClientResult<O> {
    let body = if body.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        body
    };
    serde_json::from_value(body).map_err(|source| ClientError::Decode { operation, source })
}
