//! The cart store: sole writable owner of cart state.
//!
//! Every UI surface reads the same store through [`CartSnapshot`]s and
//! mutates it through the operations here. A committed mutation swaps in a
//! new cart value, bumps the version, notifies subscribers synchronously,
//! and asks the storage adapter to save - in that order, completing fully
//! before the caller regains control.
//!
//! The store handle is cheaply cloneable (shared `Arc` inner), so the navbar
//! badge, product cards, and cart page all observe one cart per session.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use mithai_mahal_core::{Product, ProductId};

use crate::cart::Cart;
use crate::storage::CartStorage;

/// An immutable view of cart state at one instant.
///
/// Snapshots share the underlying cart value; cloning is cheap and a
/// snapshot handed out before a mutation is never affected by it. Compare
/// [`CartSnapshot::version`] for cheap change detection.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    cart: Arc<Cart>,
    version: u64,
}

impl CartSnapshot {
    /// Monotonically increasing change counter; bumped on every commit.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

impl Deref for CartSnapshot {
    type Target = Cart;

    fn deref(&self) -> &Cart {
        &self.cart
    }
}

/// Handle returned by [`CartStore::subscribe`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = dyn Fn(&CartSnapshot) + Send + Sync;

/// The cart store.
///
/// Constructed once per browsing session with an injected storage adapter;
/// hydrates from the adapter's slot before first use. Clone the handle to
/// share it.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<State>,
    listeners: Mutex<Listeners>,
    storage: Box<dyn CartStorage>,
}

struct State {
    cart: Arc<Cart>,
    version: u64,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    // Registration order; notification iterates in this order.
    entries: Vec<(u64, Arc<Listener>)>,
}

impl CartStore {
    /// Create a store, hydrating from the storage adapter's saved slot.
    ///
    /// An empty, unreadable, or corrupt slot hydrates to an empty cart;
    /// startup never fails on bad persisted state.
    pub fn new(storage: impl CartStorage + 'static) -> Self {
        let cart = storage.load().unwrap_or_default();
        debug!(
            lines = cart.lines().len(),
            item_count = cart.item_count(),
            "cart store hydrated"
        );

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(State {
                    cart: Arc::new(cart),
                    version: 0,
                }),
                listeners: Mutex::new(Listeners::default()),
                storage: Box::new(storage),
            }),
        }
    }

    /// The current immutable view of the cart. No side effects.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.inner.state.lock();
        CartSnapshot {
            cart: Arc::clone(&state.cart),
            version: state.version,
        }
    }

    /// Add `quantity` units of `product` to the cart.
    ///
    /// The only additive path: an existing line is incremented by `quantity`
    /// and keeps its original price snapshot; a new line captures the
    /// product's current price. `quantity == 0` is normalized to a no-op.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) {
        self.mutate(|cart| cart.with_added(product, quantity));
    }

    /// Set a line's quantity to exactly `new_quantity` (absolute, never
    /// relative - quantity steppers call this with `current ± 1`).
    ///
    /// `0` removes the line. A missing line is a silent no-op, defending
    /// against stale UI state.
    pub fn update_quantity(&self, product_id: &ProductId, new_quantity: u32) {
        self.mutate(|cart| cart.with_quantity(product_id, new_quantity));
    }

    /// Remove the line for `product_id`; no-op if absent.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        self.mutate(|cart| cart.without(product_id));
    }

    /// Empty the cart (e.g., after a successful checkout).
    pub fn clear(&self) {
        self.mutate(Cart::cleared);
    }

    /// Register a listener invoked synchronously after every committed
    /// mutation with the new snapshot.
    ///
    /// Any number of independent subscribers is supported. The returned
    /// handle deregisters via [`CartStore::unsubscribe`].
    pub fn subscribe(
        &self,
        listener: impl Fn(&CartSnapshot) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let listener: Arc<Listener> = Arc::new(listener);
        let mut listeners = self.inner.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        SubscriptionId(id)
    }

    /// Deregister a listener. Unknown handles are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .lock()
            .entries
            .retain(|(entry_id, _)| *entry_id != id.0);
    }

    /// Apply a whole-state transition.
    ///
    /// `f` returns the next cart value, or `None` when nothing changed -
    /// no-op paths commit nothing: no version bump, no notification, no save.
    /// The state lock is held only for the swap; listeners run after release
    /// so they may read (or mutate) the store without deadlocking.
    fn mutate(&self, f: impl FnOnce(&Cart) -> Option<Cart>) {
        let snapshot = {
            let mut state = self.inner.state.lock();
            let Some(next) = f(&state.cart) else {
                return;
            };
            state.cart = Arc::new(next);
            state.version += 1;
            CartSnapshot {
                cart: Arc::clone(&state.cart),
                version: state.version,
            }
        };

        debug!(
            version = snapshot.version,
            item_count = snapshot.item_count(),
            "cart mutation committed"
        );

        self.notify(&snapshot);
        self.inner.storage.save(&snapshot.cart);
    }

    fn notify(&self, snapshot: &CartSnapshot) {
        // Clone the callbacks out of the lock so a listener may subscribe or
        // unsubscribe re-entrantly.
        let entries: Vec<Arc<Listener>> = {
            let listeners = self.inner.listeners.lock();
            listeners
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in entries {
            (*listener)(snapshot);
        }
    }
}
