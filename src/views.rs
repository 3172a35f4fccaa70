//! In-memory UI tree
//!
//! The views mirror what the page currently displays. They are the single source
//! of truth for "what is visible"; the server remains the source of truth for what
//! persists. Coordinators mutate them only from response handlers.

use crate::types::EntityId;
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedList = Arc<Mutex<ListView>>;
pub type SharedCart = Arc<Mutex<CartView>>;
pub type SharedResults = Arc<Mutex<ResultsPanel>>;

/// Text shown in the cart header once the last item is gone.
pub const EMPTY_CART_TEXT: &str = "No items in cart";

/// One visible row: a cart line, a category list item or a product table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: EntityId,
    pub label: String,
    /// Displayed quantity; only cart lines carry one.
    pub quantity: u32,
}

impl ListEntry {
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            quantity: 0,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Ordered container of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    entries: Vec<ListEntry>,
}

impl ListView {
    pub fn new(entries: Vec<ListEntry>) -> Self {
        Self { entries }
    }

    pub fn shared(entries: Vec<ListEntry>) -> SharedList {
        Arc::new(Mutex::new(Self::new(entries)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&ListEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn push(&mut self, entry: ListEntry) {
        self.entries.push(entry);
    }

    /// Remove exactly one row with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &EntityId) -> Option<ListEntry> {
        let position = self.entries.iter().position(|entry| &entry.id == id)?;
        Some(self.entries.remove(position))
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn quantity_sum(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.quantity)).sum()
    }
}

/// Cart header, quantity badge and payment section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub size_text: String,
    pub quantity_total: u64,
    pub payment_visible: bool,
}

impl CartSummary {
    pub fn size_text_for(count: usize) -> String {
        if count == 0 {
            EMPTY_CART_TEXT.to_string()
        } else {
            format!("Cart items - {}", count)
        }
    }
}

/// The cart page: visible line items plus the values derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: ListView,
    pub summary: CartSummary,
}

impl CartView {
    /// Build the page as rendered on load, with the summary derived from `items`.
    pub fn new(items: Vec<ListEntry>) -> Self {
        let items = ListView::new(items);
        let summary = CartSummary {
            size_text: CartSummary::size_text_for(items.len()),
            quantity_total: items.quantity_sum(),
            payment_visible: !items.is_empty(),
        };
        Self { items, summary }
    }

    pub fn shared(items: Vec<ListEntry>) -> SharedCart {
        Arc::new(Mutex::new(Self::new(items)))
    }

    /// Whether the summary agrees with the visible items.
    pub fn is_consistent(&self) -> bool {
        self.summary.size_text == CartSummary::size_text_for(self.items.len())
            && self.summary.quantity_total == self.items.quantity_sum()
            && self.summary.payment_visible == !self.items.is_empty()
    }
}

/// A rendered search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub element_id: String,
    pub href: String,
    pub text: String,
}

/// Contents of a search result container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsPanel {
    #[default]
    Empty,
    Placeholder,
    Links(Vec<ResultLink>),
}

impl ResultsPanel {
    pub fn shared() -> SharedResults {
        Arc::new(Mutex::new(ResultsPanel::Empty))
    }

    pub fn clear(&mut self) {
        *self = ResultsPanel::Empty;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultsPanel::Empty)
    }

    /// Visible link texts, in order.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            ResultsPanel::Links(links) => links.iter().map(|link| link.text.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
