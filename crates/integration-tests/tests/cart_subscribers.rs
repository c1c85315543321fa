//! Multiple UI surfaces observing one cart.
//!
//! Simulates the storefront's composition: the navbar badge and the cart
//! page subscribe to the same store a product card mutates.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use parking_lot::Mutex;

use mithai_mahal_cart::{CartStore, MemoryStorage};
use mithai_mahal_integration_tests::sweet;

#[test]
fn navbar_badge_and_cart_page_stay_in_sync() {
    let store = CartStore::new(MemoryStorage::new());

    // Navbar badge renders the item count.
    let badge = Arc::new(Mutex::new(0_u32));
    let badge_view = Arc::clone(&badge);
    store.subscribe(move |snapshot| *badge_view.lock() = snapshot.item_count());

    // Cart page renders the line list.
    let page_lines = Arc::new(Mutex::new(Vec::new()));
    let page_view = Arc::clone(&page_lines);
    store.subscribe(move |snapshot| {
        *page_view.lock() = snapshot
            .lines()
            .iter()
            .map(|l| (l.product_id.as_str().to_owned(), l.quantity))
            .collect();
    });

    // A product card's "Add" button and quantity stepper.
    let barfi = sweet("pista-barfi", "Pista Barfi", 450);
    store.add_to_cart(&barfi, 1);
    let current = store.snapshot().line(&barfi.id).unwrap().quantity;
    store.update_quantity(&barfi.id, current + 1);

    assert_eq!(*badge.lock(), 2);
    assert_eq!(*page_lines.lock(), vec![("pista-barfi".to_owned(), 2)]);

    // Stepping down to zero removes the line everywhere.
    store.update_quantity(&barfi.id, 1);
    store.update_quantity(&barfi.id, 0);
    assert_eq!(*badge.lock(), 0);
    assert!(page_lines.lock().is_empty());
}

#[test]
fn unsubscribed_surface_stops_receiving_updates() {
    let store = CartStore::new(MemoryStorage::new());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_view = Arc::clone(&seen);
    let subscription = store.subscribe(move |snapshot| seen_view.lock().push(snapshot.version()));

    let a = sweet("a", "Sweet A", 100);
    store.add_to_cart(&a, 1);

    // The page unmounts.
    store.unsubscribe(subscription);
    store.add_to_cart(&a, 1);
    store.clear();

    assert_eq!(*seen.lock(), vec![1]);
    // The store kept mutating after the unsubscribe.
    assert_eq!(store.snapshot().version(), 3);
}

#[test]
fn cloned_store_handles_share_one_cart() {
    let store = CartStore::new(MemoryStorage::new());
    let card_handle = store.clone();
    let checkout_handle = store.clone();

    card_handle.add_to_cart(&sweet("a", "Sweet A", 100), 2);
    assert_eq!(store.snapshot().item_count(), 2);
    assert_eq!(checkout_handle.snapshot().item_count(), 2);

    checkout_handle.clear();
    assert!(card_handle.snapshot().is_empty());
}
