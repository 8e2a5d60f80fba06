//! Enumerations and shared shapes of the legacy DynamoDB request protocol.
//!
//! Every enumerated option a caller can pass (`ReturnValues`, `Select`,
//! `ComparisonOperator`, ...) is a [`WireEnum`]: it has a fixed wire spelling,
//! parses case-insensitively, and reports the full allowed set when a value is
//! rejected.
//!
//! Structs use `#[serde(rename_all = "PascalCase")]` to match the DynamoDB API.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::attribute_value::{AttributeValue, AttributeValueMap};

// ---------------------------------------------------------------------------
// Wire enum machinery
// ---------------------------------------------------------------------------

/// A value that was not in the allowed set for an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of [{}], got {value:?}", .allowed.join(", "))]
pub struct InvalidEnumValue {
    /// Wire name of the field being validated.
    pub field: &'static str,
    /// The rejected input, as supplied.
    pub value: String,
    /// Every spelling that would have been accepted.
    pub allowed: Vec<&'static str>,
}

/// An enumeration with a fixed set of upper-case wire spellings.
pub trait WireEnum: Sized + Copy + 'static {
    /// Wire name of the field this enumeration fills.
    const FIELD: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// The wire spelling.
    fn as_str(&self) -> &'static str;

    /// Parse a caller-supplied value against the full variant set.
    fn parse_wire(value: &str) -> Result<Self, InvalidEnumValue> {
        Self::parse_within(value, Self::FIELD, Self::ALL)
    }

    /// Parse a caller-supplied value against a subset of the variants.
    ///
    /// Matching ignores ASCII case; the returned variant always carries the
    /// canonical upper-case spelling.
    fn parse_within(
        value: &str,
        field: &'static str,
        allowed: &[Self],
    ) -> Result<Self, InvalidEnumValue> {
        allowed
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| InvalidEnumValue {
                field,
                value: value.to_owned(),
                allowed: allowed.iter().map(WireEnum::as_str).collect(),
            })
    }
}

/// Deserialize an enumeration the store reports rather than one a caller
/// supplies. A spelling outside the known set becomes `None` so newer service
/// states do not fail the whole response.
fn lenient_enum<'de, D, E>(deserializer: D) -> Result<Option<E>, D::Error>
where
    D: serde::Deserializer<'de>,
    E: WireEnum,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| E::parse_wire(&s).ok()))
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl WireEnum for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(WireEnum::as_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_wire(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(WireEnum::as_str(self))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::parse_wire(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

wire_enum! {
    /// Role of an attribute within a key schema.
    KeyType as "KeyType" {
        /// Partition key.
        Hash => "HASH",
        /// Sort key.
        Range => "RANGE",
    }
}

wire_enum! {
    /// Lifecycle state reported by DescribeTable.
    TableStatus as "TableStatus" {
        /// Being created.
        Creating => "CREATING",
        /// Ready for use.
        Active => "ACTIVE",
        /// Being deleted.
        Deleting => "DELETING",
        /// Throughput or index change in progress.
        Updating => "UPDATING",
        /// Being archived.
        Archiving => "ARCHIVING",
        /// Archived.
        Archived => "ARCHIVED",
        /// KMS key unreachable.
        InaccessibleEncryptionCredentials => "INACCESSIBLE_ENCRYPTION_CREDENTIALS",
    }
}

wire_enum! {
    /// Lifecycle state of a global secondary index.
    IndexStatus as "IndexStatus" {
        /// Being created.
        Creating => "CREATING",
        /// Throughput change in progress.
        Updating => "UPDATING",
        /// Being deleted.
        Deleting => "DELETING",
        /// Ready for use.
        Active => "ACTIVE",
    }
}

wire_enum! {
    /// How read and write throughput is charged.
    BillingMode as "BillingMode" {
        /// Fixed read and write capacity units.
        Provisioned => "PROVISIONED",
        /// On-demand.
        PayPerRequest => "PAY_PER_REQUEST",
    }
}

wire_enum! {
    /// Attributes copied into a secondary index.
    ProjectionType as "ProjectionType" {
        /// Every attribute.
        All => "ALL",
        /// Only the table and index keys.
        KeysOnly => "KEYS_ONLY",
        /// Keys plus the listed non-key attributes.
        Include => "INCLUDE",
    }
}

wire_enum! {
    /// Item image a write returns.
    ReturnValue as "ReturnValues" {
        /// Nothing.
        None => "NONE",
        /// Whole item before the write.
        AllOld => "ALL_OLD",
        /// Updated attributes before the write.
        UpdatedOld => "UPDATED_OLD",
        /// Whole item after the write.
        AllNew => "ALL_NEW",
        /// Updated attributes after the write.
        UpdatedNew => "UPDATED_NEW",
    }
}

wire_enum! {
    /// Level of consumed-capacity detail in a response.
    ReturnConsumedCapacity as "ReturnConsumedCapacity" {
        /// Table plus each index touched.
        Indexes => "INDEXES",
        /// Aggregate only.
        Total => "TOTAL",
        /// Omit.
        None => "NONE",
    }
}

wire_enum! {
    /// Whether item collection size estimates are returned.
    ReturnItemCollectionMetrics as "ReturnItemCollectionMetrics" {
        /// Return the estimates.
        Size => "SIZE",
        /// Omit.
        None => "NONE",
    }
}

wire_enum! {
    /// Attributes a query returns.
    Select as "Select" {
        /// Every attribute of each matching item.
        AllAttributes => "ALL_ATTRIBUTES",
        /// Every attribute projected into the queried index.
        AllProjectedAttributes => "ALL_PROJECTED_ATTRIBUTES",
        /// Only those named in `AttributesToGet`.
        SpecificAttributes => "SPECIFIC_ATTRIBUTES",
        /// Only the match count.
        Count => "COUNT",
    }
}

wire_enum! {
    /// Operation applied by an entry of `AttributeUpdates`.
    AttributeAction as "Action" {
        /// Replace the attribute value.
        Put => "PUT",
        /// Add to a number or set.
        Add => "ADD",
        /// Remove the attribute, or elements from a set.
        Delete => "DELETE",
    }
}

wire_enum! {
    /// Comparison used by `KeyConditions` and `ScanFilter` entries.
    ///
    /// Key conditions accept only [`ComparisonOperator::KEY_CONDITION`]; a scan
    /// filter accepts every variant.
    ComparisonOperator as "ComparisonOperator" {
        /// Equal.
        Eq => "EQ",
        /// Not equal.
        Ne => "NE",
        /// Less than or equal.
        Le => "LE",
        /// Less than.
        Lt => "LT",
        /// Greater than or equal.
        Ge => "GE",
        /// Greater than.
        Gt => "GT",
        /// Attribute exists.
        NotNull => "NOT_NULL",
        /// Attribute does not exist.
        Null => "NULL",
        /// Substring or set membership.
        Contains => "CONTAINS",
        /// Negated `CONTAINS`.
        NotContains => "NOT_CONTAINS",
        /// String or binary prefix.
        BeginsWith => "BEGINS_WITH",
        /// Equal to one of the listed values.
        In => "IN",
        /// Inclusive range between two values.
        Between => "BETWEEN",
    }
}

impl ComparisonOperator {
    /// Operators DynamoDB accepts in `KeyConditions`.
    pub const KEY_CONDITION: &'static [Self] = &[
        Self::Eq,
        Self::Le,
        Self::Lt,
        Self::Ge,
        Self::Gt,
        Self::BeginsWith,
        Self::Between,
    ];

    /// Operators DynamoDB accepts in `ScanFilter`.
    pub const SCAN_FILTER: &'static [Self] = <Self as WireEnum>::ALL;

    /// Parse an operator for a query key condition.
    pub fn parse_key_condition(value: &str) -> Result<Self, InvalidEnumValue> {
        Self::parse_within(value, "KeyConditions.ComparisonOperator", Self::KEY_CONDITION)
    }

    /// Parse an operator for a scan filter.
    pub fn parse_scan_filter(value: &str) -> Result<Self, InvalidEnumValue> {
        Self::parse_within(value, "ScanFilter.ComparisonOperator", Self::SCAN_FILTER)
    }
}

// ---------------------------------------------------------------------------
// Scalar attribute types
// ---------------------------------------------------------------------------

/// Declared type of a key or indexed attribute.
///
/// Only `S`, `N`, and `B` are valid, but a description may carry anything; an
/// unrecognised tag is kept rather than failing the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarAttributeType {
    /// String.
    S,
    /// Number.
    N,
    /// Binary.
    B,
    /// Anything else the store reported.
    Unknown(String),
}

/// Failure to convert between a raw scalar and a tagged [`AttributeValue`].
#[derive(Debug, thiserror::Error)]
pub enum ScalarValueError {
    /// A raw binary value was not valid base64.
    #[error("binary attribute value is not valid base64: {0}")]
    InvalidBinary(#[from] base64::DecodeError),
    /// The declared type cannot hold a scalar.
    #[error("attribute type {0:?} is not a scalar type")]
    Unsupported(String),
}

impl ScalarAttributeType {
    /// The wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Tag a raw value with this type. Binary input is base64 text.
    pub fn wrap(&self, raw: impl Into<String>) -> Result<AttributeValue, ScalarValueError> {
        let raw = raw.into();
        match self {
            Self::S => Ok(AttributeValue::S(raw)),
            Self::N => Ok(AttributeValue::N(raw)),
            Self::B => Ok(AttributeValue::B(STANDARD.decode(raw)?.into())),
            Self::Unknown(tag) => Err(ScalarValueError::Unsupported(tag.clone())),
        }
    }

    /// The raw value of `value` if it carries this type's tag.
    ///
    /// Inverse of [`wrap`](Self::wrap); binary comes back as base64 text.
    #[must_use]
    pub fn raw_value(&self, value: &AttributeValue) -> Option<String> {
        match (self, value) {
            (Self::S, AttributeValue::S(s)) | (Self::N, AttributeValue::N(s)) => Some(s.clone()),
            (Self::B, AttributeValue::B(b)) => Some(STANDARD.encode(b)),
            _ => None,
        }
    }
}

impl Serialize for ScalarAttributeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScalarAttributeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "S" => Self::S,
            "N" => Self::N,
            "B" => Self::B,
            _ => Self::Unknown(s),
        })
    }
}

impl fmt::Display for ScalarAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Structs - Key Schema
// ---------------------------------------------------------------------------

/// One entry of a table or index key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// Key attribute name.
    pub attribute_name: String,
    /// Partition or sort role.
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// Shorthand for a partition key entry.
    #[must_use]
    pub fn hash(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Hash,
        }
    }

    /// Shorthand for a sort key entry.
    #[must_use]
    pub fn range(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Range,
        }
    }
}

/// Declared type of an attribute used in a key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// Attribute name.
    pub attribute_name: String,
    /// Declared scalar type.
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Build a definition.
    #[must_use]
    pub fn new(name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: name.into(),
            attribute_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Structs - Throughput & Indexes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct ProvisionedThroughputDescription {
    #[serde(default)]
    pub read_capacity_units: i64,
    #[serde(default)]
    pub write_capacity_units: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_decreases_today: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_increase_date_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_decrease_date_time: Option<f64>,
}

/// Attributes projected into a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    /// Projection kind.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_enum"
    )]
    pub projection_type: Option<ProjectionType>,
    /// Extra attributes for `INCLUDE`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
}

/// Global secondary index definition for CreateTable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    /// Index name.
    pub index_name: String,
    /// Index key schema.
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    pub projection: Projection,
    /// Index throughput; required for provisioned tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

/// Local secondary index definition for CreateTable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    /// Index name.
    pub index_name: String,
    /// Index key schema; shares the table's partition key.
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    pub projection: Projection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct GlobalSecondaryIndexDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_enum"
    )]
    pub index_status: Option<IndexStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct LocalSecondaryIndexDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

/// One entry of UpdateTable's `GlobalSecondaryIndexUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexUpdate {
    /// Throughput change for an existing index.
    pub update: UpdateGlobalSecondaryIndexAction,
}

/// New throughput for one global secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGlobalSecondaryIndexAction {
    /// Index to change.
    pub index_name: String,
    /// New throughput.
    pub provisioned_throughput: ProvisionedThroughput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct BillingModeSummary {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_enum"
    )]
    pub billing_mode: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_to_pay_per_request_date_time: Option<f64>,
}

// ---------------------------------------------------------------------------
// Structs - Table Description
// ---------------------------------------------------------------------------

/// Table metadata as returned by CreateTable, DescribeTable, UpdateTable and
/// DeleteTable. Fields this crate does not model are ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct TableDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_enum"
    )]
    pub table_status: Option<TableStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode_summary: Option<BillingModeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndexDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalSecondaryIndexDescription>,
}

// ---------------------------------------------------------------------------
// Structs - Consumed Capacity & Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct Capacity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// Capacity a request consumed, present when `ReturnConsumedCapacity` asked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct ConsumedCapacity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub local_secondary_indexes: HashMap<String, Capacity>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub global_secondary_indexes: HashMap<String, Capacity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct ItemCollectionMetrics {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub item_collection_key: AttributeValueMap,
    #[serde(
        rename = "SizeEstimateRangeGB",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub size_estimate_range_gb: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Structs - Conditions & Updates
// ---------------------------------------------------------------------------

/// One entry of `KeyConditions` or `ScanFilter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// Comparison to apply.
    pub comparison_operator: ComparisonOperator,
    /// Operands; one tagged value per supplied raw value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}

/// One entry of `AttributeUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeValueUpdate {
    /// Update action.
    pub action: AttributeAction,
    /// Operand; absent when deleting the whole attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
}

/// One entry of `Expected`: an existence check or an equality check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpectedAttributeValue {
    /// Required current value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// Whether the attribute must exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

// ---------------------------------------------------------------------------
// Structs - Batch Operations
// ---------------------------------------------------------------------------

/// Per-table entry of BatchGetItem's `RequestItems`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    /// Primary keys to fetch, in request order.
    pub keys: Vec<AttributeValueMap>,
    /// Attributes to return; all when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,
    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

/// One put or delete in BatchWriteItem's `RequestItems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// Item to put.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// Key to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put of `item`.
    #[must_use]
    pub fn put(item: AttributeValueMap) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete of `key`.
    #[must_use]
    pub fn delete(key: AttributeValueMap) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct PutRequest {
    pub item: AttributeValueMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct DeleteRequest {
    pub key: AttributeValueMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_enum_case_insensitively() {
        assert_eq!("all_new".parse::<ReturnValue>(), Ok(ReturnValue::AllNew));
        assert_eq!(
            "Total".parse::<ReturnConsumedCapacity>(),
            Ok(ReturnConsumedCapacity::Total)
        );
        assert_eq!(ReturnValue::AllNew.to_string(), "ALL_NEW");
    }

    #[test]
    fn test_should_name_allowed_set_on_invalid_value() {
        let err = "BOGUS".parse::<ReturnValue>().unwrap_err();
        assert_eq!(err.field, "ReturnValues");
        assert_eq!(
            err.allowed,
            vec!["NONE", "ALL_OLD", "UPDATED_OLD", "ALL_NEW", "UPDATED_NEW"]
        );
        assert_eq!(
            err.to_string(),
            "ReturnValues must be one of [NONE, ALL_OLD, UPDATED_OLD, ALL_NEW, UPDATED_NEW], got \"BOGUS\""
        );
    }

    #[test]
    fn test_should_restrict_key_condition_operators() {
        assert_eq!(
            ComparisonOperator::parse_key_condition("begins_with"),
            Ok(ComparisonOperator::BeginsWith)
        );
        let err = ComparisonOperator::parse_key_condition("NE").unwrap_err();
        assert_eq!(err.allowed.len(), 7);
        assert!(!err.allowed.contains(&"CONTAINS"));
    }

    #[test]
    fn test_should_accept_full_scan_filter_operator_set() {
        for op in ["NE", "NOT_NULL", "NULL", "CONTAINS", "NOT_CONTAINS", "IN", "BETWEEN"] {
            assert!(ComparisonOperator::parse_scan_filter(op).is_ok(), "{op}");
        }
        assert_eq!(ComparisonOperator::SCAN_FILTER.len(), 13);
        assert!(ComparisonOperator::parse_scan_filter("LIKE").is_err());
    }

    #[test]
    fn test_should_wrap_and_unwrap_scalar_values() {
        let n = ScalarAttributeType::N.wrap("42").unwrap();
        assert_eq!(n, AttributeValue::N("42".to_owned()));
        assert_eq!(ScalarAttributeType::N.raw_value(&n), Some("42".to_owned()));
        assert_eq!(ScalarAttributeType::S.raw_value(&n), None);

        let b = ScalarAttributeType::B.wrap("aGk=").unwrap();
        assert_eq!(b, AttributeValue::B(bytes::Bytes::from_static(b"hi")));
        assert_eq!(ScalarAttributeType::B.raw_value(&b), Some("aGk=".to_owned()));
    }

    #[test]
    fn test_should_reject_bad_binary_and_unknown_types() {
        assert!(matches!(
            ScalarAttributeType::B.wrap("not base64!"),
            Err(ScalarValueError::InvalidBinary(_))
        ));
        assert!(matches!(
            ScalarAttributeType::Unknown("BOOL".to_owned()).wrap("true"),
            Err(ScalarValueError::Unsupported(_))
        ));
    }

    #[test]
    fn test_should_serialize_legacy_shapes() {
        let update = AttributeValueUpdate {
            action: AttributeAction::Delete,
            value: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"Action": "DELETE"})
        );

        let expected = ExpectedAttributeValue {
            exists: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&expected).unwrap(),
            serde_json::json!({"Exists": false})
        );

        let index_update = GlobalSecondaryIndexUpdate {
            update: UpdateGlobalSecondaryIndexAction {
                index_name: "by-email".to_owned(),
                provisioned_throughput: ProvisionedThroughput {
                    read_capacity_units: 5,
                    write_capacity_units: 2,
                },
            },
        };
        assert_eq!(
            serde_json::to_value(&index_update).unwrap(),
            serde_json::json!({
                "Update": {
                    "IndexName": "by-email",
                    "ProvisionedThroughput": {"ReadCapacityUnits": 5, "WriteCapacityUnits": 2}
                }
            })
        );
    }

    #[test]
    fn test_should_keep_unknown_attribute_type_on_decode() {
        let def: AttributeDefinition =
            serde_json::from_str(r#"{"AttributeName": "x", "AttributeType": "BOOL"}"#).unwrap();
        assert_eq!(
            def.attribute_type,
            ScalarAttributeType::Unknown("BOOL".to_owned())
        );
    }

    #[test]
    fn test_should_tolerate_unknown_reported_states() {
        let desc: TableDescription = serde_json::from_str(
            r#"{
                "TableName": "users",
                "TableStatus": "REPLICATION_NOT_AUTHORIZED",
                "BillingModeSummary": {"BillingMode": "SOMETHING_NEW"},
                "GlobalSecondaryIndexes": [{
                    "IndexName": "by-email",
                    "IndexStatus": "paused",
                    "Projection": {"ProjectionType": "KEYS_ONLY"}
                }],
                "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
                "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "N"}]
            }"#,
        )
        .unwrap();
        assert_eq!(desc.table_status, None);
        assert_eq!(desc.billing_mode_summary.unwrap().billing_mode, None);
        let index = &desc.global_secondary_indexes[0];
        assert_eq!(index.index_status, None);
        assert_eq!(
            index.projection.as_ref().unwrap().projection_type,
            Some(ProjectionType::KeysOnly)
        );
        assert_eq!(desc.key_schema[0].key_type, KeyType::Hash);

        let active: TableDescription =
            serde_json::from_str(r#"{"TableStatus": "ACTIVE"}"#).unwrap();
        assert_eq!(active.table_status, Some(TableStatus::Active));
    }

    #[test]
    fn test_should_keep_caller_enums_strict() {
        assert!(serde_json::from_str::<KeyType>(r#""PRIMARY""#).is_err());
        assert!(serde_json::from_str::<TableStatus>(r#""PAUSED""#).is_err());
    }
}
