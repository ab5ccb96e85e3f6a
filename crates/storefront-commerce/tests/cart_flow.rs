//! End-to-end cart flows against a scripted storefront backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use storefront_cache::{Cache, MemoryBackend};
use storefront_commerce::api::{SHIPPING_PATH, STOCK_PATH};
use storefront_commerce::prelude::*;
use storefront_data::mock::MockTransport;

fn setup() -> (CartController, Arc<MockTransport>, Cache) {
    let transport = Arc::new(MockTransport::new());
    let client = FetchClient::with_transport(transport.clone()).with_base_url("http://shop.test");
    let cache = Cache::new(MemoryBackend::new());
    let store = CartStore::new(cache.clone(), CartConfig::default());
    (
        CartController::with_api(store, HttpStorefrontApi::new(client)),
        transport,
        cache,
    )
}

fn store_raw(cache: &Cache, items: serde_json::Value) {
    cache.set_raw("cart_v1", &items.to_string()).unwrap();
}

#[tokio::test]
async fn test_all_zero_postal_code_is_rejected_without_request() {
    let (mut controller, transport, _) = setup();

    let outcome = controller.calculate_shipping("00000000").await;

    assert!(matches!(outcome, ShippingOutcome::Invalid { .. }));
    assert!(transport.requests().is_empty());
    assert_eq!(controller.shipping(), &ShippingOption::Pickup);
}

#[tokio::test]
async fn test_delivery_quote_total() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Conjunto", "price": 100.0, "qty": 1, "size": "M"}]));
    transport.reply_json(SHIPPING_PATH, json!({"success": true, "shipping_cost": 15.5, "distance_km": 7.5}));

    let outcome = controller.calculate_shipping("12345678").await;

    match outcome {
        ShippingOutcome::Quoted { total, .. } => assert_eq!(total.display(), "R$ 115,50"),
        other => panic!("expected a quote, got {:?}", other),
    }
    assert_eq!(controller.totals().total.display(), "R$ 115,50");
    assert_eq!(cache.get_raw("user_cep").unwrap().as_deref(), Some("12345678"));
    assert_eq!(transport.requests_to(SHIPPING_PATH).len(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_falls_back_to_pickup() {
    let (mut controller, transport, _) = setup();
    transport.fail(SHIPPING_PATH, "connection refused");

    let outcome = controller.calculate_shipping("12345-678").await;

    assert_eq!(outcome.error(), Some("Error connecting to the server. Try again."));
    assert_eq!(controller.shipping(), &ShippingOption::Pickup);
    // The code is remembered even though the request failed.
    assert!(controller.store().last_postal_code().is_some());
}

#[tokio::test]
async fn test_stock_at_cap_leaves_cart_unchanged() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Top", "price": 50.0, "qty": 5, "size": "P", "max": 3}]));
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 3}}));

    let pass = controller.refresh().await;

    assert!(pass.reconciled);
    assert!(pass.events.is_empty());
    assert_eq!(pass.view.lines[0].qty, 3);
    assert_eq!(pass.view.lines[0].max, 3);
}

#[tokio::test]
async fn test_low_stock_clamps_and_persists() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Top", "price": 50.0, "qty": 3, "size": "P"}]));
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 2}}));

    let pass = controller.refresh().await;

    assert!(!pass
        .events
        .iter()
        .any(|e| matches!(e, CartEvent::OutOfStock { .. })));
    let stored = controller.store().load();
    let line = stored.get(VariantId::new(1)).unwrap();
    assert_eq!((line.qty, line.max), (2, Some(2)));
    assert_eq!(pass.view.totals.subtotal.display(), "R$ 100,00");
}

#[tokio::test]
async fn test_stock_below_quantity_clamps_line_and_notifies() {
    let (mut controller, transport, cache) = setup();
    let saves = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&saves);
    controller.store_mut().subscribe(move |cart| {
        assert_eq!(cart.item_count(), 2);
        seen.fetch_add(1, Ordering::SeqCst);
    });
    store_raw(&cache, json!([{"variant_id": 1, "name": "Top", "price": 50.0, "qty": 5, "size": "P", "max": 10}]));
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 2}}));

    let pass = controller.refresh().await;

    assert_eq!((pass.view.lines[0].qty, pass.view.lines[0].max), (2, 2));
    assert_eq!(saves.load(Ordering::SeqCst), 1);
    let raw: serde_json::Value =
        serde_json::from_str(&cache.get_raw("cart_v1").unwrap().unwrap()).unwrap();
    assert_eq!(raw[0]["qty"], 2);
    assert_eq!(raw[0]["max"], 2);
}

#[tokio::test]
async fn test_open_replays_saved_postal_code() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Conjunto", "price": 100.0, "qty": 1, "size": "M"}]));
    cache.set_raw("user_cep", "12345678").unwrap();
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 5}}));
    transport.reply_json(SHIPPING_PATH, json!({"success": true, "shipping_cost": 15.5, "distance_km": 7.5}));

    let pass = controller.open().await;

    assert!(controller.shipping().is_delivery());
    assert_eq!(pass.view.totals.total.display(), "R$ 115,50");
    assert!(matches!(pass.shipping, Some(ShippingOutcome::Quoted { .. })));
    assert_eq!(transport.requests_to(STOCK_PATH).len(), 1);
    assert_eq!(transport.requests_to(SHIPPING_PATH).len(), 1);
}

#[tokio::test]
async fn test_out_of_stock_line_is_dropped() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Top", "price": 50.0, "qty": 1, "size": "P"}]));
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 0}}));

    let pass = controller.refresh().await;

    assert!(pass.view.is_empty);
    assert_eq!(pass.events.len(), 1);
    assert_eq!(pass.events[0].message(), "Top (P) was removed - out of stock");
    assert!(controller.store().load().is_empty());
}

#[tokio::test]
async fn test_reconciliation_is_idempotent() {
    let (mut controller, transport, cache) = setup();
    store_raw(
        &cache,
        json!([
            {"variant_id": 1, "name": "Top", "price": 50.0, "qty": 4, "size": "P"},
            {"variant_id": 2, "name": "Short", "price": 30.0, "qty": 1, "size": "G"}
        ]),
    );
    transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 2, "2": 9}}));

    let first = controller.refresh().await;
    let persisted = cache.get_raw("cart_v1").unwrap();
    let second = controller.refresh().await;

    assert!(!first.events.is_empty());
    assert!(second.events.is_empty());
    assert_eq!(first.view, second.view);
    assert_eq!(cache.get_raw("cart_v1").unwrap(), persisted);
    assert_eq!(transport.requests_to(STOCK_PATH).len(), 2);
}

#[tokio::test]
async fn test_stock_failure_keeps_stored_cart() {
    let (mut controller, transport, cache) = setup();
    store_raw(&cache, json!([{"variant_id": 1, "name": "Top", "price": 50.0, "qty": 2, "size": "P"}]));
    transport.reply_json(STOCK_PATH, json!({"success": false}));

    let pass = controller.refresh().await;

    assert!(!pass.reconciled);
    assert_eq!(pass.view.lines[0].qty, 2);
}

#[tokio::test]
async fn test_selected_variant_goes_into_cart() {
    let (controller, _, _) = setup();
    let product: Product = serde_json::from_value(json!({
        "id": 9,
        "name": "Legging",
        "price": 89.9,
        "variants": [
            {"id": 90, "size": "M", "color": "Preto", "quantity": 2},
            {"id": 91, "size": "G", "color": "Preto", "quantity": 0}
        ]
    }))
    .unwrap();

    let mut selector = VariantSelector::new(product);
    selector.select_color("Preto");
    assert_eq!(selector.select_size("G"), SelectionState::Cleared(Dimension::Color));
    selector.select_color("Preto");
    selector.select_size("M");
    selector.quantity_mut().increment();

    controller.add_item(selector.to_cart_item().unwrap());
    controller.add_item(selector.to_cart_item().unwrap());

    let cart = controller.store().load();
    assert_eq!(cart.get(VariantId::new(90)).unwrap().qty, 2);
    assert_eq!(
        controller.change_quantity(VariantId::new(90), 1).map(|e| e.level()),
        Some(EventLevel::Warning)
    );
}
