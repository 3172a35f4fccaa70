//! Confirm-then-apply Mutations
//!
//! Destructive actions never touch the view before the server confirms them. A
//! confirmed delete removes exactly one row (and, for the cart, recomputes the
//! derived summary under the same lock); a rejected or failed delete leaves the
//! view untouched and raises a failure banner.
//!
//! Deletes for different entities are independent and may interleave freely.
//! The only ordering guard is the presence check at confirmation time: a
//! confirmed row that is already gone is a [`SyncError::LocalInconsistency`].

use crate::api::{ApiRequest, ApiResponse, StorefrontApi};
use crate::cart;
use crate::error::SyncError;
use crate::notify::Notifier;
use crate::registry::{ViewHandle, ViewRegistry};
use crate::types::{EntityId, EntityKind};
use crate::views::ListEntry;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const NETWORK_FAILURE_TITLE: &str = "Network Error";
const NETWORK_FAILURE_MESSAGE: &str = "Unable to reach the server, retry or try again later";
const CATEGORY_LINKED_MESSAGE: &str = "Unable to delete the category - already linked";
const PRODUCT_LINKED_MESSAGE: &str =
    "Unable to delete since it is linked to a different item in the Data Base";
const CART_ITEM_FAILED_MESSAGE: &str = "Unable to remove the item from the cart";
const CATEGORY_ADD_FAILED_MESSAGE: &str = "Unable to add category retry adding or try again later";

/// Result of one destructive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server confirmed the delete and the row is gone from the view.
    Confirmed {
        kind: EntityKind,
        requested: EntityId,
        /// Identifier the server reports as removed.
        removed: EntityId,
    },
    /// The delete failed; the view was not touched.
    Rejected {
        kind: EntityKind,
        target: EntityId,
        /// Server status, absent when the request never completed.
        status: Option<u16>,
        detail: String,
    },
}

impl MutationOutcome {
    pub fn confirmed(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed { .. })
    }

    pub fn target(&self) -> &EntityId {
        match self {
            MutationOutcome::Confirmed { requested, .. } => requested,
            MutationOutcome::Rejected { target, .. } => target,
        }
    }
}

fn delete_request(kind: EntityKind, id: EntityId) -> ApiRequest {
    match kind {
        EntityKind::CartItem => ApiRequest::DeleteCartItem { id },
        EntityKind::Category => ApiRequest::DeleteCategory { id },
        EntityKind::Product => ApiRequest::DeleteProduct { id },
    }
}

fn success_copy(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::CartItem => ("Removed Successfully!", "The item was removed from your cart"),
        EntityKind::Category => ("Removed Successfully!", ""),
        EntityKind::Product => ("Removed Successfully", ""),
    }
}

/// Banner title and message for a rejected delete.
fn failure_copy(kind: EntityKind, response: &ApiResponse) -> (String, String) {
    let status = response.status_code();
    match kind {
        EntityKind::Category => (
            format!(
                "{} - {}",
                status,
                response.error_detail().unwrap_or("Request failed")
            ),
            CATEGORY_LINKED_MESSAGE.to_string(),
        ),
        EntityKind::Product => (
            format!("{} - Delete Failed:", status),
            response
                .error_detail()
                .unwrap_or(PRODUCT_LINKED_MESSAGE)
                .to_string(),
        ),
        EntityKind::CartItem => (
            format!("{} - Delete Failed:", status),
            response
                .error_detail()
                .unwrap_or(CART_ITEM_FAILED_MESSAGE)
                .to_string(),
        ),
    }
}

/// The server is authoritative for which row was removed.
fn confirmed_id(response: &ApiResponse, requested: &EntityId) -> EntityId {
    match response.field("id").and_then(EntityId::from_json) {
        Some(id) => {
            if &id != requested {
                debug!(requested = %requested, confirmed = %id, "Server confirmed a different id");
            }
            id
        }
        None => requested.clone(),
    }
}

pub struct MutationCoordinator {
    api: Arc<dyn StorefrontApi>,
    notifier: Arc<dyn Notifier>,
    views: ViewRegistry,
}

impl MutationCoordinator {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: Arc<dyn Notifier>,
        views: ViewRegistry,
    ) -> Self {
        Self {
            api,
            notifier,
            views,
        }
    }

    /// Delete `id` of `kind`, applying the view change only after confirmation.
    ///
    /// Transport and server failures are reported through the notifier and come
    /// back as [`MutationOutcome::Rejected`]. An `Err` means the view could not be
    /// reconciled with a confirmed delete, or no view is bound for `kind`.
    pub async fn destroy(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<MutationOutcome, SyncError> {
        let view = self
            .views
            .get(kind)
            .cloned()
            .ok_or(SyncError::ViewNotBound(kind))?;

        let response = match self.api.send(delete_request(kind, id.clone())).await {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = %kind, id = %id, error = %e, "Delete request failed");
                self.notifier
                    .notify_failure(NETWORK_FAILURE_TITLE, NETWORK_FAILURE_MESSAGE);
                return Ok(MutationOutcome::Rejected {
                    kind,
                    target: id.clone(),
                    status: None,
                    detail: e.to_string(),
                });
            }
        };

        if !response.is_success() {
            let (title, message) = failure_copy(kind, &response);
            let status = response.status_code();
            let detail = response
                .error_detail()
                .unwrap_or("Request failed")
                .to_string();
            warn!(
                kind = %kind,
                id = %id,
                status,
                error = %detail,
                server_message = response.message().unwrap_or_default(),
                "Delete rejected by server"
            );
            self.notifier.notify_failure(&title, &message);
            return Ok(MutationOutcome::Rejected {
                kind,
                target: id.clone(),
                status: Some(status),
                detail,
            });
        }

        let removed = confirmed_id(&response, id);
        if let Err(e) = apply_removal(kind, &view, &removed) {
            error!(kind = %kind, id = %removed, "Confirmed delete has no matching row in the view");
            return Err(e);
        }

        info!(kind = %kind, id = %removed, "Delete confirmed");
        let (title, message) = success_copy(kind);
        self.notifier.notify_success(title, message);
        Ok(MutationOutcome::Confirmed {
            kind,
            requested: id.clone(),
            removed,
        })
    }

    /// Issue independent deletes concurrently; results follow the order of `ids`.
    pub async fn destroy_all(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
    ) -> Vec<Result<MutationOutcome, SyncError>> {
        join_all(ids.iter().map(|id| self.destroy(kind, id))).await
    }

    /// Create a category, appending it to the category list once the server
    /// returns it. Returns the appended row, or `None` when creation failed.
    pub async fn create_category(&self, name: &str) -> Result<Option<ListEntry>, SyncError> {
        let list = match self.views.get(EntityKind::Category) {
            Some(ViewHandle::List(list)) => Arc::clone(list),
            _ => return Err(SyncError::ViewNotBound(EntityKind::Category)),
        };

        let request = ApiRequest::CreateCategory {
            name: name.trim().to_string(),
        };
        let response = match self.api.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Create category request failed");
                self.notifier
                    .notify_failure(NETWORK_FAILURE_TITLE, NETWORK_FAILURE_MESSAGE);
                return Ok(None);
            }
        };

        if !response.is_success() {
            warn!(
                status = response.status_code(),
                error = response.error_detail().unwrap_or_default(),
                "Create category rejected by server"
            );
            self.notifier.notify_failure(
                &format!("Error: {}", response.status_code()),
                CATEGORY_ADD_FAILED_MESSAGE,
            );
            return Ok(None);
        }

        let Some(entry) = parse_created_category(&response) else {
            warn!(body = ?response.body, "Create category response has no category");
            self.notifier.notify_failure(
                &format!("Error: {}", response.status_code()),
                CATEGORY_ADD_FAILED_MESSAGE,
            );
            return Ok(None);
        };

        list.lock().push(entry.clone());
        info!(id = %entry.id, name = %entry.label, "Category created");
        self.notifier
            .notify_success("Category Added Successfully!", "");
        Ok(Some(entry))
    }
}

/// Remove the confirmed row under the view's lock.
fn apply_removal(kind: EntityKind, view: &ViewHandle, id: &EntityId) -> Result<(), SyncError> {
    match view {
        ViewHandle::Cart(cart) => {
            let mut cart = cart.lock();
            cart::remove_line_item(&mut cart, id).map(|_| ())
        }
        ViewHandle::List(list) => list
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SyncError::LocalInconsistency {
                kind,
                id: id.clone(),
            }),
    }
}

fn parse_created_category(response: &ApiResponse) -> Option<ListEntry> {
    let category = response.field("category")?;
    let id = category.get("id").and_then(EntityId::from_json)?;
    let name = category.get("categoryName").and_then(Value::as_str)?;
    Some(ListEntry::new(id, name))
}
