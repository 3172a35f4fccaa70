//! Storefront Sync: asynchronous UI-state synchronization for a storefront.
//!
//! Keeps what the storefront pages display consistent with what the server
//! persists: debounced live search that never renders a superseded response,
//! and confirm-then-apply deletes that keep derived cart totals in step with the
//! visible items.

pub mod api;
pub mod cart;
pub mod config;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod mutation;
pub mod notify;
pub mod registry;
pub mod render;
pub mod search;
pub mod types;
pub mod views;
