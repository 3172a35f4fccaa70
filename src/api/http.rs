//! HTTP implementation of the storefront API using `reqwest`.

use super::{ApiRequest, ApiResponse, HttpMethod, StorefrontApi};
use crate::config::ApiConfig;
use crate::error::SyncError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

pub struct HttpStorefrontClient {
    client: Client,
    base_url: String,
}

impl HttpStorefrontClient {
    pub fn new(config: &ApiConfig) -> Result<Self, SyncError> {
        config
            .validate()
            .map_err(|errors| SyncError::Config(errors.join("; ")))?;
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SyncError> {
        let url = self.url_for(&request);
        let mut builder = match request.method() {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        if let Some((key, value)) = request.query() {
            builder = builder.query(&[(key, value)]);
        }
        if let Some(body) = request.json_body() {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(url = %url, status, error = %e, "Response body is not JSON");
                    None
                }
            }
        };

        debug!(url = %url, status, "Storefront request completed");
        Ok(ApiResponse::new(status, body))
    }
}
