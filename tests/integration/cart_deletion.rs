//! Cart deletion tests
//!
//! Tests cover:
//! - Derived count and quantity total after every confirmed removal
//! - Empty-cart transition
//! - Repeated delete of an already-removed line
//! - Interleaved deletes of different lines

use super::test_utils::{cart_page, delete_cart_item};
use serde_json::json;
use std::time::Duration;
use storefront_sync::api::ApiResponse;
use storefront_sync::notify::NotificationKind;
use storefront_sync::types::{EntityId, EntityKind};
use storefront_sync::views::EMPTY_CART_TEXT;

#[tokio::test]
async fn test_summary_tracks_every_confirmed_removal() {
    let page = cart_page(&[("1", 2), ("2", 3), ("3", 1), ("4", 6)]);
    for id in ["3", "1", "4"] {
        page.api.respond(delete_cart_item(id), ApiResponse::empty(200));
    }

    for id in ["3", "1", "4"] {
        let outcome = page
            .coordinator
            .destroy(EntityKind::CartItem, &EntityId::from(id))
            .await
            .unwrap();
        assert!(outcome.confirmed());

        let cart = page.cart.lock();
        assert!(cart.is_consistent());
        assert_eq!(
            cart.summary.size_text,
            format!("Cart items - {}", cart.items.len())
        );
        assert_eq!(cart.summary.quantity_total, cart.items.quantity_sum());
    }

    let cart = page.cart.lock();
    assert_eq!(cart.items.ids(), vec![EntityId::from("2")]);
    assert_eq!(cart.summary.quantity_total, 3);
}

#[tokio::test]
async fn test_removing_only_item_hides_payment() {
    let page = cart_page(&[("17", 1)]);
    page.api.respond(delete_cart_item("17"), ApiResponse::empty(200));

    page.coordinator
        .destroy(EntityKind::CartItem, &EntityId::from("17"))
        .await
        .unwrap();

    let cart = page.cart.lock();
    assert!(cart.items.is_empty());
    assert_eq!(cart.summary.size_text, EMPTY_CART_TEXT);
    assert_eq!(cart.summary.size_text, "No items in cart");
    assert!(!cart.summary.payment_visible);
    assert_eq!(cart.summary.quantity_total, 0);
}

#[tokio::test]
async fn test_failed_delete_leaves_cart_untouched() {
    let page = cart_page(&[("1", 2), ("2", 3)]);
    page.api.respond(
        delete_cart_item("2"),
        ApiResponse::json(500, json!({"statusCode": 500, "error": "Request failed"})),
    );
    let before = page.cart.lock().clone();

    let outcome = page
        .coordinator
        .destroy(EntityKind::CartItem, &EntityId::from("2"))
        .await
        .unwrap();

    assert!(!outcome.confirmed());
    assert_eq!(*page.cart.lock(), before);
    let banner = page.alerts.failure_banner();
    assert_eq!(banner.title, "500 - Delete Failed:");
    assert_eq!(banner.message, "Request failed");
}

#[tokio::test]
async fn test_repeated_delete_yields_one_success_and_one_failure() {
    let page = cart_page(&[("5", 2), ("6", 1)]);
    page.api
        .respond(delete_cart_item("5"), ApiResponse::empty(200))
        .respond(
            delete_cart_item("5"),
            ApiResponse::json(404, json!({"statusCode": 404, "error": "Not Found"})),
        );

    let id = EntityId::from("5");
    let (first, second) = tokio::join!(
        page.coordinator.destroy(EntityKind::CartItem, &id),
        page.coordinator.destroy(EntityKind::CartItem, &id),
    );

    let outcomes = [first.unwrap(), second.unwrap()];
    assert_eq!(outcomes.iter().filter(|o| o.confirmed()).count(), 1);
    assert_eq!(page.alerts.count(NotificationKind::Success), 1);
    assert_eq!(page.alerts.count(NotificationKind::Failure), 1);
    assert!(page.alerts.failure_banner().title.contains("404"));

    let cart = page.cart.lock();
    assert_eq!(cart.items.ids(), vec![EntityId::from("6")]);
    assert!(cart.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_interleaved_deletes_keep_summary_consistent() {
    let page = cart_page(&[("1", 4), ("2", 2), ("3", 5)]);
    page.api.respond_after(
        delete_cart_item("1"),
        Duration::from_millis(300),
        ApiResponse::empty(200),
    );
    page.api.respond_after(
        delete_cart_item("2"),
        Duration::from_millis(100),
        ApiResponse::json(409, json!({"statusCode": 409, "error": "locked"})),
    );
    page.api.respond_after(
        delete_cart_item("3"),
        Duration::from_millis(200),
        ApiResponse::empty(200),
    );

    let ids = [EntityId::from("1"), EntityId::from("2"), EntityId::from("3")];
    let results = page.coordinator.destroy_all(EntityKind::CartItem, &ids).await;

    let confirmed: Vec<bool> = results
        .into_iter()
        .map(|r| r.unwrap().confirmed())
        .collect();
    assert_eq!(confirmed, vec![true, false, true]);

    let cart = page.cart.lock();
    assert_eq!(cart.items.ids(), vec![EntityId::from("2")]);
    assert_eq!(cart.summary.size_text, "Cart items - 1");
    assert_eq!(cart.summary.quantity_total, 2);
    assert!(cart.summary.payment_visible);
    // Last banner is the success that arrived at 300ms.
    assert!(page.alerts.success_banner().visible);
}
