//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// A product as supplied by the catalog collaborator.
///
/// Read-only from the cart's point of view: the cart copies what it needs
/// (the ID and a price snapshot) and never mutates or re-fetches the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable unique identifier assigned by the catalog.
    pub id: ProductId,
    /// Display name (e.g., "Kaju Katli").
    pub name: String,
    /// Current catalog price per unit.
    pub unit_price: Price,
    /// Reference to the product image (URL or asset path).
    pub image_ref: Option<String>,
    /// Catalog category (e.g., "Barfi", "Ladoo").
    pub category: String,
    /// Short marketing description shown on product cards.
    pub description: Option<String>,
}
