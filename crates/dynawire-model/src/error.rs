//! Service error vocabulary.
//!
//! A failed DynamoDB call answers with a JSON body such as
//! `{"__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
//! "message": "Requested resource not found"}`. Older endpoints spell the
//! message key `Message`.

use std::fmt;

use serde_json::Value;

/// Error codes the service is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DynamoDBErrorCode {
    /// Table already exists or is being modified.
    ResourceInUseException,
    /// Table or index not found.
    ResourceNotFoundException,
    /// An `Expected` precondition failed.
    ConditionalCheckFailedException,
    /// Item collection grew past 10 GB.
    ItemCollectionSizeLimitExceededException,
    /// Throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Account-level request rate exceeded.
    RequestLimitExceeded,
    /// Too many concurrent table operations.
    LimitExceededException,
    /// Request rejected by parameter validation.
    ValidationException,
    /// Body could not be deserialized.
    SerializationException,
    /// Server-side failure.
    InternalServerError,
    /// Credentials rejected.
    AccessDeniedException,
    /// Signing key unknown.
    UnrecognizedClientException,
    /// Request rate throttled.
    ThrottlingException,
}

impl DynamoDBErrorCode {
    const ALL: [Self; 13] = [
        Self::ResourceInUseException,
        Self::ResourceNotFoundException,
        Self::ConditionalCheckFailedException,
        Self::ItemCollectionSizeLimitExceededException,
        Self::ProvisionedThroughputExceededException,
        Self::RequestLimitExceeded,
        Self::LimitExceededException,
        Self::ValidationException,
        Self::SerializationException,
        Self::InternalServerError,
        Self::AccessDeniedException,
        Self::UnrecognizedClientException,
        Self::ThrottlingException,
    ];

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceInUseException => "ResourceInUseException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ItemCollectionSizeLimitExceededException => {
                "ItemCollectionSizeLimitExceededException"
            }
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::LimitExceededException => "LimitExceededException",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::ThrottlingException => "ThrottlingException",
        }
    }

    /// Resolve a `__type` value, qualified (`namespace#Code`) or bare.
    #[must_use]
    pub fn from_type(error_type: &str) -> Option<Self> {
        let short = error_type
            .rsplit_once('#')
            .map_or(error_type, |(_, code)| code);
        Self::ALL.into_iter().find(|c| c.as_str() == short)
    }
}

impl fmt::Display for DynamoDBErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of an error response body worth surfacing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceErrorBody {
    /// Raw `__type`, if present.
    pub error_type: Option<String>,
    /// `message` or `Message`, if present.
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// Pick the error fields out of a response body. Anything that is not an
    /// object yields an empty result.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            error_type: field("__type"),
            message: field("message").or_else(|| field("Message")),
        }
    }

    /// The recognised error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<DynamoDBErrorCode> {
        self.error_type.as_deref().and_then(DynamoDBErrorCode::from_type)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_parse_qualified_error_type() {
        let body = ServiceErrorBody::from_value(&json!({
            "__type": "com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException",
            "message": "The conditional request failed"
        }));
        assert_eq!(
            body.code(),
            Some(DynamoDBErrorCode::ConditionalCheckFailedException)
        );
        assert_eq!(body.message.as_deref(), Some("The conditional request failed"));
    }

    #[test]
    fn test_should_accept_capitalized_message_key() {
        let body = ServiceErrorBody::from_value(&json!({
            "__type": "com.amazon.coral.validate#ValidationException",
            "Message": "1 validation error detected"
        }));
        assert_eq!(body.code(), Some(DynamoDBErrorCode::ValidationException));
        assert_eq!(body.message.as_deref(), Some("1 validation error detected"));
    }

    #[test]
    fn test_should_tolerate_unrecognized_bodies() {
        assert_eq!(ServiceErrorBody::from_value(&json!("oops")), ServiceErrorBody::default());
        assert_eq!(DynamoDBErrorCode::from_type("com.example#Whatever"), None);
    }
}
