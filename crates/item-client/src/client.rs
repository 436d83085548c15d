use crate::classifier::ResponseClassifier;
use crate::error::ClientError;
use crate::types::{ClientConfig, Item, ItemMetadata};
use reqwest::{Client, Method, Response};
use std::time::Duration;

#[derive(Clone)]
pub struct ItemClient {
    client: Client,
    config: ClientConfig,
    classifier: ResponseClassifier,
}

impl ItemClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let classifier = ResponseClassifier::new(config.max_error_body_bytes);
        Ok(Self { client, config, classifier })
    }

    /// Fetches item metadata with a HEAD request.
    pub async fn head(&self, path: &str) -> Result<ItemMetadata, ClientError> {
        let response = self.send(Method::HEAD, path).await?;
        self.classifier
            .classify_head(response)
            .await
            .map_err(ClientError::from)
            .inspect_err(|e| tracing::debug!("HEAD {} failed: {}", path, e))
    }

    /// Fetches item metadata and content with a GET request.
    pub async fn get(&self, path: &str) -> Result<Item, ClientError> {
        let response = self.send(Method::GET, path).await?;
        self.classifier
            .classify_get(response)
            .await
            .map_err(ClientError::from)
            .inspect_err(|e| tracing::debug!("GET {} failed: {}", path, e))
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response, ClientError> {
        let url = build_url(&self.config.base_url, path);
        tracing::debug!("{} {}", method, url);
        let response = self.client.request(method, url).send().await?;
        tracing::debug!("Received {} for {}", response.status(), path);
        Ok(response)
    }
}

fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::build_url;

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("http://127.0.0.1:8080", "/somewhere-200"),
            "http://127.0.0.1:8080/somewhere-200"
        );
        assert_eq!(
            build_url("http://127.0.0.1:8080/", "/somewhere-200"),
            "http://127.0.0.1:8080/somewhere-200"
        );
        assert_eq!(
            build_url("http://127.0.0.1:8080/items", "somewhere-200"),
            "http://127.0.0.1:8080/items/somewhere-200"
        );
    }
}
