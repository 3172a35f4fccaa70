//! Scripted storefront API for tests.

use super::{ApiRequest, ApiResponse, StorefrontApi};
use crate::error::SyncError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

#[derive(Debug, Clone)]
struct MockReply {
    latency: Duration,
    outcome: Result<ApiResponse, String>,
}

/// Answers each request with the next reply scripted for it.
///
/// Replies for the same request are consumed in order. An unscripted request
/// fails as a transport error.
#[derive(Debug, Default)]
pub struct MockStorefront {
    script: Mutex<HashMap<ApiRequest, VecDeque<MockReply>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl MockStorefront {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, request: ApiRequest, response: ApiResponse) -> &Self {
        self.respond_after(request, Duration::ZERO, response)
    }

    /// Script a reply that is delivered `latency` after the request is sent.
    pub fn respond_after(
        &self,
        request: ApiRequest,
        latency: Duration,
        response: ApiResponse,
    ) -> &Self {
        self.push(request, latency, Ok(response));
        self
    }

    /// Script a transport failure.
    pub fn fail(&self, request: ApiRequest, message: &str) -> &Self {
        self.push(request, Duration::ZERO, Err(message.to_string()));
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().values().map(VecDeque::len).sum()
    }

    fn push(&self, request: ApiRequest, latency: Duration, outcome: Result<ApiResponse, String>) {
        self.script
            .lock()
            .entry(request)
            .or_default()
            .push_back(MockReply { latency, outcome });
    }
}

#[async_trait]
impl StorefrontApi for MockStorefront {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SyncError> {
        self.log.lock().push(request.clone());
        let reply = self
            .script
            .lock()
            .get_mut(&request)
            .and_then(VecDeque::pop_front);

        let reply = reply.ok_or_else(|| {
            SyncError::Transport(format!("No scripted response for {:?}", request))
        })?;

        if !reply.latency.is_zero() {
            tokio::time::sleep(reply.latency).await;
        }
        reply.outcome.map_err(SyncError::Transport)
    }
}
