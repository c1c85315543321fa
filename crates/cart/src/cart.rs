//! Canonical cart state.
//!
//! [`Cart`] is an immutable value type: mutations build a new `Cart` from the
//! previous one rather than editing lines in place, so any snapshot already
//! handed to a reader is never affected by later operations. The derived
//! totals (`item_count`, `subtotal`) are pure functions of the line list and
//! are recomputed on every read - they are never stored and can never drift.

use rust_decimal::Decimal;

use mithai_mahal_core::{CurrencyCode, Price, Product, ProductId};

/// One row in the cart: a distinct product and its quantity.
///
/// Invariants: `quantity >= 1` (a line reduced to 0 is removed, never kept),
/// and no two lines in a cart share a `product_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// The catalog product this line references.
    pub product_id: ProductId,
    /// Units of the product in the cart.
    pub quantity: u32,
    /// Price captured when the line was first added. Later catalog price
    /// changes do not retroactively alter an already-added line.
    pub unit_price_snapshot: Price,
}

impl CartLine {
    /// Total for this line: `quantity * unit_price_snapshot`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(
            self.unit_price_snapshot.amount * Decimal::from(self.quantity),
            self.unit_price_snapshot.currency_code,
        )
    }
}

/// The canonical cart: an ordered sequence of lines.
///
/// Insertion order is display order. Construct an empty cart with
/// [`Cart::default`]; all other carts come from the store's operations or
/// from hydration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Build a cart from already-validated lines (hydration path).
    ///
    /// Callers must have enforced the line invariants; the storage decoder
    /// filters invalid and duplicate lines before calling this.
    pub(crate) const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The cart lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product, if the cart holds one.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities (not the number of lines).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of `quantity * unit_price_snapshot` over all lines.
    ///
    /// All lines share the storefront currency; an empty cart totals zero in
    /// the default currency.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency_code = self
            .lines
            .first()
            .map_or_else(CurrencyCode::default, |l| {
                l.unit_price_snapshot.currency_code
            });
        let amount = self.lines.iter().map(|l| l.line_total().amount).sum();
        Price::new(amount, currency_code)
    }

    // -------------------------------------------------------------------------
    // Whole-state transitions. Each returns the next cart value, or `None`
    // when the operation changes nothing and must not be committed.
    // -------------------------------------------------------------------------

    /// Add `quantity` units of `product`.
    ///
    /// An existing line is incremented and keeps its original price snapshot;
    /// otherwise a new line is appended with the product's current price.
    /// `quantity == 0` is a no-op.
    pub(crate) fn with_added(&self, product: &Product, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return None;
        }

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => {
                lines.push(CartLine {
                    product_id: product.id.clone(),
                    quantity,
                    unit_price_snapshot: product.unit_price,
                });
            }
        }
        Some(Self { lines })
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// `quantity == 0` removes the line. A missing line is a no-op (stale-UI
    /// defense), as is setting a line to the quantity it already has.
    pub(crate) fn with_quantity(&self, product_id: &ProductId, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return self.without(product_id);
        }

        let current = self.line(product_id)?;
        if current.quantity == quantity {
            return None;
        }

        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
        }
        Some(Self { lines })
    }

    /// Remove the line for a product. Missing line is a no-op.
    pub(crate) fn without(&self, product_id: &ProductId) -> Option<Self> {
        if self.line(product_id).is_none() {
            return None;
        }

        let lines = self
            .lines
            .iter()
            .filter(|l| &l.product_id != product_id)
            .cloned()
            .collect();
        Some(Self { lines })
    }

    /// Empty the cart. Already-empty carts are a no-op.
    pub(crate) fn cleared(&self) -> Option<Self> {
        if self.lines.is_empty() {
            None
        } else {
            Some(Self::default())
        }
    }
}
