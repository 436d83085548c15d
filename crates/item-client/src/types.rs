//! Item types and client configuration.

use serde::Serialize;

/// Content type reported when the response carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Default cap on how much of an error body is read into a failure message.
pub const DEFAULT_MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Metadata describing an item, taken from response headers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMetadata {
    /// `Content-Length`, or 0 when absent or unparsable.
    pub length: u64,
    /// First value of the `code` header.
    pub code: Option<String>,
    /// `Content-Type`, or [`DEFAULT_CONTENT_TYPE`].
    pub content_type: String,
}

impl Default for ItemMetadata {
    fn default() -> Self {
        Self { length: 0, code: None, content_type: DEFAULT_CONTENT_TYPE.to_string() }
    }
}

/// An item fetched with GET: its metadata and the full body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub metadata: ItemMetadata,
    pub content: String,
}

/// Configuration for the item client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that request paths are appended to.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of error body bytes turned into a failure message.
    /// With 0 no error body is read and every failure carries the canned message.
    pub max_error_body_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            max_error_body_bytes: DEFAULT_MAX_ERROR_BODY_BYTES,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ITEM_CLIENT_URL` and `ITEM_CLIENT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("ITEM_CLIENT_URL") {
            config.base_url = url;
        }
        if let Some(raw) = lookup("ITEM_CLIENT_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    "Ignoring invalid ITEM_CLIENT_TIMEOUT_SECS {:?}, using {}s",
                    raw,
                    config.timeout_secs
                ),
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_default_uses_fallbacks() {
        let metadata = ItemMetadata::default();
        assert_eq!(metadata.length, 0);
        assert_eq!(metadata.code, None);
        assert_eq!(metadata.content_type, "application/octet-stream");
    }

    #[test]
    fn test_item_serializes_as_json() {
        let item = Item {
            metadata: ItemMetadata {
                length: 2,
                code: Some("value".to_string()),
                content_type: "application/json".to_string(),
            },
            content: "{}".to_string(),
        };

        let json = serde_json::to_value(&item).expect("item serializes");
        assert_eq!(json["metadata"]["code"], "value");
        assert_eq!(json["metadata"]["length"], 2);
        assert_eq!(json["content"], "{}");
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_from_lookup_overrides_url() {
        let config = ClientConfig::from_lookup(env(&[("ITEM_CLIENT_URL", "http://items:9000")]));
        assert_eq!(config.base_url, "http://items:9000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_from_lookup_overrides_timeout() {
        let config = ClientConfig::from_lookup(env(&[("ITEM_CLIENT_TIMEOUT_SECS", "5")]));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, ClientConfig::default().base_url);
    }

    #[test]
    fn test_from_lookup_keeps_default_on_invalid_timeout() {
        let config = ClientConfig::from_lookup(env(&[("ITEM_CLIENT_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::default().with_base_url("http://localhost:9000");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_error_body_bytes, DEFAULT_MAX_ERROR_BODY_BYTES);
    }
}
