//! Category and product administration tests

use super::test_utils::admin_page;
use serde_json::json;
use storefront_sync::api::{ApiRequest, ApiResponse};
use storefront_sync::mutation::MutationOutcome;
use storefront_sync::notify::NotificationKind;
use storefront_sync::types::{EntityId, EntityKind};

#[tokio::test]
async fn test_linked_category_stays_visible() {
    let page = admin_page(&[("cat-7", "Garden"), ("cat-9", "Tools")], &[]);
    page.api.respond(
        ApiRequest::DeleteCategory {
            id: EntityId::from("cat-7"),
        },
        ApiResponse::json(409, json!({"statusCode": 409, "error": "linked"})),
    );

    let outcome = page
        .coordinator
        .destroy(EntityKind::Category, &EntityId::from("cat-7"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        MutationOutcome::Rejected {
            kind: EntityKind::Category,
            target: EntityId::from("cat-7"),
            status: Some(409),
            detail: "linked".to_string(),
        }
    );
    assert!(page.categories.lock().contains(&EntityId::from("cat-7")));
    let banner = page.alerts.failure_banner();
    assert!(banner.visible);
    assert!(banner.title.contains("409"));
}

#[tokio::test]
async fn test_product_delete_then_repeat_is_clean_failure() {
    let page = admin_page(&[], &[("41", "Kettle"), ("42", "Toaster")]);
    let request = ApiRequest::DeleteProduct {
        id: EntityId::from("41"),
    };
    page.api
        .respond(request.clone(), ApiResponse::ok(json!({"id": 41})))
        .respond(
            request,
            ApiResponse::json(500, json!({"statusCode": 500, "error": "No value present"})),
        );

    let id = EntityId::from("41");
    assert!(page
        .coordinator
        .destroy(EntityKind::Product, &id)
        .await
        .unwrap()
        .confirmed());
    let second = page
        .coordinator
        .destroy(EntityKind::Product, &id)
        .await
        .unwrap();

    assert!(!second.confirmed());
    assert_eq!(page.products.lock().ids(), vec![EntityId::from("42")]);
    assert_eq!(page.alerts.count(NotificationKind::Success), 1);
    assert_eq!(page.alerts.count(NotificationKind::Failure), 1);
    assert_eq!(page.alerts.failure_banner().message, "No value present");
}

#[tokio::test]
async fn test_category_and_product_deletes_are_independent() {
    let page = admin_page(&[("c1", "Garden")], &[("p1", "Hose")]);
    page.api.respond(
        ApiRequest::DeleteCategory {
            id: EntityId::from("c1"),
        },
        ApiResponse::ok(json!({"id": "c1"})),
    );
    page.api.respond(
        ApiRequest::DeleteProduct {
            id: EntityId::from("p1"),
        },
        ApiResponse::ok(json!({"id": "p1"})),
    );

    let category = EntityId::from("c1");
    let product = EntityId::from("p1");
    let (a, b) = tokio::join!(
        page.coordinator.destroy(EntityKind::Category, &category),
        page.coordinator.destroy(EntityKind::Product, &product),
    );

    assert!(a.unwrap().confirmed());
    assert!(b.unwrap().confirmed());
    assert!(page.categories.lock().is_empty());
    assert!(page.products.lock().is_empty());
}

#[tokio::test]
async fn test_new_category_can_be_deleted() {
    let page = admin_page(&[], &[]);
    page.api.respond(
        ApiRequest::CreateCategory {
            name: "Outdoor".to_string(),
        },
        ApiResponse::ok(json!({"category": {"id": 12, "categoryName": "Outdoor"}})),
    );
    page.api.respond(
        ApiRequest::DeleteCategory {
            id: EntityId::from("12"),
        },
        ApiResponse::ok(json!({"id": "12"})),
    );

    let created = page
        .coordinator
        .create_category("Outdoor")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.categories.lock().len(), 1);

    page.coordinator
        .destroy(EntityKind::Category, &created.id)
        .await
        .unwrap();
    assert!(page.categories.lock().is_empty());
}
