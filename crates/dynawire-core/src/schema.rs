//! Table metadata and the attribute maps derived from it.
//!
//! A [`TableSchema`] is an immutable snapshot of one DescribeTable result. It
//! resolves attribute names to declared scalar types and builds the tagged
//! maps every item request is assembled from. Resolution never guesses: an
//! undeclared attribute is an error.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;

use dynawire_model::types::{
    AttributeDefinition, ExpectedAttributeValue, KeySchemaElement, KeyType, ScalarAttributeType,
    ScalarValueError, TableDescription,
};
use dynawire_model::{AttributeValue, AttributeValueMap};

use crate::error::{ClientError, ClientResult};
use crate::options::{AttributeInput, ExclusiveStartKey, ExpectedCondition, ItemKey};

/// Key schema and attribute types of one table.
#[derive(Debug)]
pub struct TableSchema {
    name: String,
    description: TableDescription,
    raw: Option<Value>,
    hash_key: OnceLock<Option<String>>,
    range_key: OnceLock<Option<String>>,
}

impl TableSchema {
    /// Build a schema from bare key and attribute lists.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        key_schema: Vec<KeySchemaElement>,
        attribute_definitions: Vec<AttributeDefinition>,
    ) -> Self {
        let name = name.into();
        Self::from_description(
            name.clone(),
            TableDescription {
                table_name: Some(name),
                key_schema,
                attribute_definitions,
                ..TableDescription::default()
            },
        )
    }

    /// Wrap a DescribeTable result. `name` is used when the description does
    /// not carry one.
    #[must_use]
    pub fn from_description(name: impl Into<String>, description: TableDescription) -> Self {
        Self {
            name: description.table_name.clone().unwrap_or_else(|| name.into()),
            description,
            raw: None,
            hash_key: OnceLock::new(),
            range_key: OnceLock::new(),
        }
    }

    /// Parse the `Table` object of a DescribeTable response, keeping the body
    /// as sent so fields without a typed counterpart survive.
    pub fn from_table_value(name: impl Into<String>, raw: Value) -> serde_json::Result<Self> {
        let description = TableDescription::deserialize(&raw)?;
        Ok(Self {
            raw: Some(raw),
            ..Self::from_description(name, description)
        })
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full description this schema was built from.
    #[must_use]
    pub fn description(&self) -> &TableDescription {
        &self.description
    }

    /// The DescribeTable `Table` body verbatim, when this schema was fetched
    /// from the store.
    #[must_use]
    pub fn raw_description(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// Partition key attribute name.
    pub fn hash_key_name(&self) -> ClientResult<&str> {
        self.hash_key
            .get_or_init(|| self.find_key(KeyType::Hash))
            .as_deref()
            .ok_or_else(|| ClientError::schema(&self.name, "key schema has no HASH key"))
    }

    /// Sort key attribute name, if the table has one.
    #[must_use]
    pub fn range_key_name(&self) -> Option<&str> {
        self.range_key
            .get_or_init(|| self.find_key(KeyType::Range))
            .as_deref()
    }

    fn find_key(&self, role: KeyType) -> Option<String> {
        self.description
            .key_schema
            .iter()
            .find(|k| k.key_type == role)
            .map(|k| k.attribute_name.clone())
    }

    /// Declared type of `name`.
    pub fn attribute_type(&self, name: &str) -> ClientResult<&ScalarAttributeType> {
        self.description
            .attribute_definitions
            .iter()
            .find(|d| d.attribute_name == name)
            .map(|d| &d.attribute_type)
            .ok_or_else(|| ClientError::UnknownAttribute {
                table: self.name.clone(),
                name: name.to_owned(),
                declared: self
                    .description
                    .attribute_definitions
                    .iter()
                    .map(|d| d.attribute_name.clone())
                    .collect(),
            })
    }

    /// Tag one value for attribute `name`. Typed input passes through.
    pub fn encode(&self, name: &str, value: AttributeInput) -> ClientResult<AttributeValue> {
        match value {
            AttributeInput::Typed(v) => Ok(v),
            AttributeInput::Raw(raw) => {
                let attribute_type = self.attribute_type(name)?;
                attribute_type.wrap(raw).map_err(|e| match e {
                    ScalarValueError::InvalidBinary(_) => {
                        ClientError::validation(format!("attribute {name}: {e}"))
                    }
                    ScalarValueError::Unsupported(_) => {
                        ClientError::schema(&self.name, format!("attribute {name}: {e}"))
                    }
                })
            }
        }
    }

    /// Tag every value of `attributes`. Later duplicates overwrite earlier ones.
    pub fn build_item_attribute_map(
        &self,
        attributes: impl IntoIterator<Item = (String, AttributeInput)>,
    ) -> ClientResult<AttributeValueMap> {
        attributes
            .into_iter()
            .map(|(name, value)| {
                let tagged = self.encode(&name, value)?;
                Ok((name, tagged))
            })
            .collect()
    }

    /// Tag a primary key with the key attributes' declared types.
    pub fn build_identifier_map(&self, key: ItemKey) -> ClientResult<AttributeValueMap> {
        let hash_name = self.hash_key_name()?;
        let mut map = AttributeValueMap::with_capacity(2);
        map.insert(hash_name.to_owned(), self.encode(hash_name, key.hash)?);
        if let Some(range) = key.range {
            let range_name = self
                .range_key_name()
                .ok_or_else(|| ClientError::schema(&self.name, "key schema has no RANGE key"))?;
            map.insert(range_name.to_owned(), self.encode(range_name, range)?);
        }
        Ok(map)
    }

    /// Build the `Expected` map of a conditional write.
    pub fn build_expected_map(
        &self,
        conditions: impl IntoIterator<Item = (String, ExpectedCondition)>,
    ) -> ClientResult<HashMap<String, ExpectedAttributeValue>> {
        conditions
            .into_iter()
            .map(|(name, condition)| {
                let expected = match condition {
                    ExpectedCondition::Exists(exists) => ExpectedAttributeValue {
                        exists: Some(exists),
                        value: None,
                    },
                    ExpectedCondition::Value(value) => ExpectedAttributeValue {
                        value: Some(self.encode(&name, value)?),
                        exists: None,
                    },
                };
                Ok((name, expected))
            })
            .collect()
    }

    /// Build `ExclusiveStartKey` from a partition key value or a previous
    /// page's `LastEvaluatedKey`.
    pub fn build_exclusive_start_key_map(
        &self,
        start: ExclusiveStartKey,
    ) -> ClientResult<AttributeValueMap> {
        match start {
            ExclusiveStartKey::Evaluated(map) => Ok(map),
            ExclusiveStartKey::Hash(value) => {
                let hash_name = self.hash_key_name()?;
                Ok(AttributeValueMap::from([(
                    hash_name.to_owned(),
                    self.encode(hash_name, value)?,
                )]))
            }
        }
    }

    /// Read declared attributes back out of a tagged item as raw text.
    ///
    /// Names absent from `item` are skipped. A value whose tag differs from
    /// the declared type is an error.
    pub fn extract_raw_values<'a>(
        &self,
        item: &AttributeValueMap,
        names: impl IntoIterator<Item = &'a str>,
    ) -> ClientResult<HashMap<String, String>> {
        let mut raw = HashMap::new();
        for name in names {
            let Some(value) = item.get(name) else {
                continue;
            };
            let attribute_type = self.attribute_type(name)?;
            let text = attribute_type.raw_value(value).ok_or_else(|| {
                ClientError::validation(format!(
                    "attribute {name} is tagged {} but declared {attribute_type}",
                    value.type_descriptor()
                ))
            })?;
            raw.insert(name.to_owned(), text);
        }
        Ok(raw)
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableSchema<{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::options::attributes;

    fn thread_table() -> TableSchema {
        TableSchema::new(
            "threads",
            vec![
                KeySchemaElement::range("subject"),
                KeySchemaElement::hash("forum"),
            ],
            vec![
                AttributeDefinition::new("forum", ScalarAttributeType::S),
                AttributeDefinition::new("subject", ScalarAttributeType::S),
                AttributeDefinition::new("views", ScalarAttributeType::N),
                AttributeDefinition::new("digest", ScalarAttributeType::B),
            ],
        )
    }

    #[test]
    fn test_should_resolve_key_names() {
        let schema = thread_table();
        assert_eq!(schema.hash_key_name().unwrap(), "forum");
        assert_eq!(schema.range_key_name(), Some("subject"));
        // second call hits the memoized value
        assert_eq!(schema.hash_key_name().unwrap(), "forum");
        assert_eq!(schema.to_string(), "TableSchema<threads>");
    }

    #[test]
    fn test_should_fail_without_hash_key() {
        let schema = TableSchema::new(
            "broken",
            vec![KeySchemaElement::range("sk")],
            vec![AttributeDefinition::new("sk", ScalarAttributeType::S)],
        );
        assert!(matches!(
            schema.hash_key_name(),
            Err(ClientError::Schema { .. })
        ));
        assert_eq!(schema.range_key_name(), Some("sk"));
    }

    #[test]
    fn test_should_allow_missing_range_key() {
        let schema = TableSchema::new(
            "users",
            vec![KeySchemaElement::hash("id")],
            vec![AttributeDefinition::new("id", ScalarAttributeType::N)],
        );
        assert_eq!(schema.range_key_name(), None);
        let err = schema
            .build_identifier_map(ItemKey::composite(1_i64, "x"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Schema { .. }));
    }

    #[test]
    fn test_should_list_declared_names_for_unknown_attribute() {
        let err = thread_table().attribute_type("author").unwrap_err();
        match err {
            ClientError::UnknownAttribute { name, declared, .. } => {
                assert_eq!(name, "author");
                assert_eq!(declared, ["forum", "subject", "views", "digest"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_tag_raw_values_and_pass_typed_values() {
        let schema = thread_table();
        let map = schema
            .build_item_attribute_map(vec![
                ("views".to_owned(), AttributeInput::from(3_i64)),
                (
                    "tags".to_owned(),
                    AttributeInput::Typed(AttributeValue::Ss(vec!["rust".to_owned()])),
                ),
            ])
            .unwrap();
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"views": {"N": "3"}, "tags": {"SS": ["rust"]}})
        );
    }

    #[test]
    fn test_should_round_trip_raw_values() {
        let schema = thread_table();
        let input = attributes([
            ("forum", "rust"),
            ("subject", "ownership"),
            ("views", "42"),
            ("digest", "aGk="),
        ]);
        let item = schema.build_item_attribute_map(input.clone()).unwrap();
        let raw = schema
            .extract_raw_values(&item, ["forum", "subject", "views", "digest"])
            .unwrap();
        for (name, value) in input {
            let AttributeInput::Raw(text) = value else {
                unreachable!()
            };
            assert_eq!(raw[&name], text);
        }
    }

    #[test]
    fn test_should_reject_mismatched_tag_on_extract() {
        let schema = thread_table();
        let item = AttributeValueMap::from([(
            "views".to_owned(),
            AttributeValue::S("many".to_owned()),
        )]);
        assert!(matches!(
            schema.extract_raw_values(&item, ["views"]),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_should_reject_invalid_binary() {
        let err = thread_table()
            .encode("digest", AttributeInput::from("***"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_should_build_identifier_map() {
        let map = thread_table()
            .build_identifier_map(ItemKey::composite("rust", "lifetimes"))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"forum": {"S": "rust"}, "subject": {"S": "lifetimes"}})
        );
    }

    #[test]
    fn test_should_build_expected_map() {
        let map = thread_table()
            .build_expected_map(vec![
                ("subject".to_owned(), ExpectedCondition::Exists(false)),
                ("views".to_owned(), ExpectedCondition::equals(10_i64)),
            ])
            .unwrap();
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({
                "subject": {"Exists": false},
                "views": {"Value": {"N": "10"}}
            })
        );
    }

    #[test]
    fn test_should_build_exclusive_start_key_from_hash_value() {
        let schema = thread_table();
        let map = schema
            .build_exclusive_start_key_map(ExclusiveStartKey::from("rust"))
            .unwrap();
        assert_eq!(serde_json::to_value(&map).unwrap(), json!({"forum": {"S": "rust"}}));

        let evaluated = AttributeValueMap::from([
            ("forum".to_owned(), AttributeValue::S("rust".to_owned())),
            ("subject".to_owned(), AttributeValue::S("traits".to_owned())),
        ]);
        let passed = schema
            .build_exclusive_start_key_map(ExclusiveStartKey::Evaluated(evaluated.clone()))
            .unwrap();
        assert_eq!(passed, evaluated);
    }

    #[test]
    fn test_should_take_name_from_description() {
        let description: TableDescription = serde_json::from_value(json!({
            "TableName": "orders",
            "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
            "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}]
        }))
        .unwrap();
        let schema = TableSchema::from_description("ignored", description);
        assert_eq!(schema.name(), "orders");
        assert_eq!(schema.hash_key_name().unwrap(), "id");
        assert!(schema.raw_description().is_none());
    }

    #[test]
    fn test_should_keep_unmodeled_fields_of_table_body() {
        let raw = json!({
            "TableName": "orders",
            "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
            "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
            "LatestStreamArn": "arn:aws:dynamodb:us-east-1:1:table/orders/stream/x"
        });
        let schema = TableSchema::from_table_value("orders", raw.clone()).unwrap();
        assert_eq!(schema.raw_description(), Some(&raw));
        assert_eq!(schema.hash_key_name().unwrap(), "id");
    }

    #[test]
    fn test_should_reject_malformed_table_body() {
        let raw = json!({"KeySchema": "not-a-list"});
        assert!(TableSchema::from_table_value("orders", raw).is_err());
    }
}
