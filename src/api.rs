//! Storefront API Boundary
//!
//! The server is opaque: every call is an [`ApiRequest`] answered by an
//! [`ApiResponse`]. Any HTTP status, success or not, comes back as a response;
//! only transport problems surface as [`SyncError::Transport`].

use crate::error::SyncError;
use crate::types::EntityId;
use async_trait::async_trait;
use serde_json::{json, Value};

pub mod http;
pub mod mock;

pub use http::HttpStorefrontClient;
pub use mock::MockStorefront;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// Every request the synchronization layer issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiRequest {
    DeleteCartItem { id: EntityId },
    DeleteCategory { id: EntityId },
    DeleteProduct { id: EntityId },
    CreateCategory { name: String },
    SearchProducts { query: String },
}

impl ApiRequest {
    pub fn method(&self) -> HttpMethod {
        match self {
            ApiRequest::DeleteCartItem { .. }
            | ApiRequest::DeleteCategory { .. }
            | ApiRequest::DeleteProduct { .. } => HttpMethod::Delete,
            ApiRequest::CreateCategory { .. } => HttpMethod::Post,
            ApiRequest::SearchProducts { .. } => HttpMethod::Get,
        }
    }

    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            ApiRequest::DeleteCartItem { id } => format!("/api/delete/cart-item/{}", id),
            ApiRequest::DeleteCategory { .. } | ApiRequest::CreateCategory { .. } => {
                "/api/admin/category".to_string()
            }
            ApiRequest::DeleteProduct { .. } => "/api/admin/product-manager".to_string(),
            ApiRequest::SearchProducts { .. } => "/api/products/search".to_string(),
        }
    }

    pub fn json_body(&self) -> Option<Value> {
        match self {
            ApiRequest::DeleteCategory { id } | ApiRequest::DeleteProduct { id } => {
                Some(json!({ "id": id }))
            }
            ApiRequest::CreateCategory { name } => Some(json!({ "categoryName": name })),
            ApiRequest::DeleteCartItem { .. } | ApiRequest::SearchProducts { .. } => None,
        }
    }

    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            ApiRequest::SearchProducts { query } => Some(("query", query.as_str())),
            _ => None,
        }
    }
}

/// Status plus the parsed JSON body, if the body was JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, Some(body))
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, None)
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, Some(body))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref()?.get(name)
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// `statusCode` from the body, falling back to the HTTP status.
    pub fn status_code(&self) -> u16 {
        self.field("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(self.status)
    }

    /// Short server-supplied reason: `error`, else `message`.
    pub fn error_detail(&self) -> Option<&str> {
        self.text_field("error").or_else(|| self.text_field("message"))
    }

    pub fn message(&self) -> Option<&str> {
        self.text_field("message")
    }

    /// Convert a non-success response into [`SyncError::Server`].
    pub fn into_server_error(self) -> SyncError {
        let status = self.status_code();
        let detail = self.error_detail().unwrap_or("Request failed").to_string();
        SyncError::Server { status, detail }
    }
}

/// Network boundary consumed by the coordinators.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Send one request. Only transport failures are errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SyncError>;
}
