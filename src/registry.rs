//! View Registry
//!
//! Maps each entity kind to the view that displays it. Each kind is bound once,
//! at page initialization, and coordinators resolve views through the registry
//! instead of searching the page by element id.

use crate::error::SyncError;
use crate::types::EntityKind;
use crate::views::{SharedCart, SharedList};
use std::collections::HashMap;

/// View owning the entities of one kind.
#[derive(Clone)]
pub enum ViewHandle {
    /// Cart lines, whose removal also drives the derived cart summary.
    Cart(SharedCart),
    /// A plain list (categories, products).
    List(SharedList),
}

#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<EntityKind, ViewHandle>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the cart page. Cart items always live in the cart view.
    pub fn bind_cart(&mut self, cart: SharedCart) -> Result<&mut Self, SyncError> {
        self.bind(EntityKind::CartItem, ViewHandle::Cart(cart))
    }

    /// Bind the list showing `kind`.
    pub fn bind_list(
        &mut self,
        kind: EntityKind,
        list: SharedList,
    ) -> Result<&mut Self, SyncError> {
        if kind == EntityKind::CartItem {
            return Err(SyncError::Config(
                "cart items must be bound with bind_cart".to_string(),
            ));
        }
        self.bind(kind, ViewHandle::List(list))
    }

    pub fn get(&self, kind: EntityKind) -> Option<&ViewHandle> {
        self.views.get(&kind)
    }

    pub fn is_bound(&self, kind: EntityKind) -> bool {
        self.views.contains_key(&kind)
    }

    fn bind(&mut self, kind: EntityKind, handle: ViewHandle) -> Result<&mut Self, SyncError> {
        if self.views.contains_key(&kind) {
            return Err(SyncError::ViewAlreadyBound(kind));
        }
        self.views.insert(kind, handle);
        Ok(self)
    }
}
