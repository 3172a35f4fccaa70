//! Derived cart state.
//!
//! The cart header, the quantity badge and the payment section are derived from
//! the visible line items. They are recomputed in the same critical section that
//! removes a line, so no render can observe a count that disagrees with the list.

use crate::error::SyncError;
use crate::types::{EntityId, EntityKind};
use crate::views::{CartSummary, CartView, ListEntry};
use tracing::debug;

/// Recompute the summary after one line carrying `removed_quantity` left the cart.
///
/// Called exactly once per confirmed removal.
pub fn on_line_item_removed(cart: &mut CartView, removed_quantity: u32) {
    let count = cart.items.len();
    if count == 0 {
        cart.summary.payment_visible = false;
    }
    cart.summary.size_text = CartSummary::size_text_for(count);
    cart.summary.quantity_total = cart
        .summary
        .quantity_total
        .saturating_sub(u64::from(removed_quantity));

    debug_assert!(cart.is_consistent(), "cart summary diverged: {:?}", cart);
    debug!(
        remaining = count,
        quantity_total = cart.summary.quantity_total,
        "Cart summary recomputed"
    );
}

/// Remove the confirmed line `id` and recompute the summary.
///
/// A missing line means the client view no longer mirrors the server and is
/// reported as [`SyncError::LocalInconsistency`].
pub fn remove_line_item(cart: &mut CartView, id: &EntityId) -> Result<ListEntry, SyncError> {
    let removed = cart
        .items
        .remove(id)
        .ok_or_else(|| SyncError::LocalInconsistency {
            kind: EntityKind::CartItem,
            id: id.clone(),
        })?;
    on_line_item_removed(cart, removed.quantity);
    Ok(removed)
}
