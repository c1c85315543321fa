//! Integration tests for Mithai Mahal.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mithai-mahal-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - Cart operations end-to-end through the store
//! - `cart_persistence` - Hydrate/persist/restore across sessions
//! - `cart_subscribers` - Multiple UI surfaces observing one cart
//!
//! The library part holds shared fixtures: catalog products as the catalog
//! collaborator would supply them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use mithai_mahal_core::{CurrencyCode, Price, Product, ProductId};

/// Install a tracing subscriber so engine warnings surface in test output.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mithai_mahal_cart=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// A rupee amount as the catalog prices it.
#[must_use]
pub fn rupees(amount: i64) -> Price {
    Price::new(Decimal::from(amount), CurrencyCode::INR)
}

/// A catalog product fixture.
#[must_use]
pub fn sweet(id: &str, name: &str, price_rupees: i64) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        unit_price: rupees(price_rupees),
        image_ref: Some(format!("/images/{id}.jpg")),
        category: "Sweets".to_owned(),
        description: None,
    }
}
