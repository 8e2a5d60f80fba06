//! Connection configuration.

use std::env;

const DEFAULT_REGION: &str = "us-east-1";

/// Where a connection sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// AWS region of the table endpoint.
    pub region: String,
    /// Endpoint override, e.g. a local emulator at `http://localhost:4566`.
    pub host: Option<String>,
}

impl ConnectionConfig {
    /// Create configuration from environment variables.
    ///
    /// Region: `DYNAMODB_REGION`, `AWS_REGION`, then `DEFAULT_REGION`.
    /// Host: `DYNAMODB_HOST`, then `AWS_ENDPOINT_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };
        Self {
            region: first(&["DYNAMODB_REGION", "AWS_REGION", "DEFAULT_REGION"])
                .unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            host: first(&["DYNAMODB_HOST", "AWS_ENDPOINT_URL"]),
        }
    }

    /// Use `region` instead of the current one.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Send requests to `host` instead of the regional endpoint.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The host override, or the regional DynamoDB endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| format!("https://dynamodb.{}.amazonaws.com", self.region))
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            host: None,
        }
    }
}
