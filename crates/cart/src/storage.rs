//! Durable persistence for cart state.
//!
//! The cart survives a page reload by serializing to a client-side slot:
//! a JSON file scoped to the device, never synced server-side. Writes are
//! best-effort - a failed save is logged and swallowed, and the in-memory
//! cart stays authoritative. Reads validate line by line, so partial
//! corruption degrades to whatever survives rather than crashing startup.
//!
//! # Payload schema (version 1)
//!
//! ```json
//! {
//!   "version": 1,
//!   "savedAt": "2026-08-07T09:30:00Z",
//!   "currencyCode": "INR",
//!   "lines": [
//!     { "productId": "sweet-1", "quantity": 2, "unitPriceSnapshot": "550" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use mithai_mahal_core::{CurrencyCode, Price, ProductId};

use crate::cart::{Cart, CartLine};
use crate::config::CartConfig;
use crate::error::StorageError;

/// Current version of the persisted payload schema.
const SCHEMA_VERSION: u32 = 1;

/// Port for the durable cart slot.
///
/// Implementations must be thread-safe; the store calls `save` after every
/// committed mutation and `load` once at hydration.
pub trait CartStorage: Send + Sync {
    /// The last saved cart, or `None` when the slot is empty, unreadable, or
    /// the payload fails to parse or validate. Never an error to the caller.
    fn load(&self) -> Option<Cart>;

    /// Best-effort write. Failures are logged and swallowed.
    fn save(&self, cart: &Cart);
}

// =============================================================================
// Payload codec
// =============================================================================

/// Typed payload written on save.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredCart {
    version: u32,
    saved_at: DateTime<Utc>,
    currency_code: CurrencyCode,
    lines: Vec<StoredLine>,
}

/// One persisted cart line.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    product_id: String,
    quantity: u32,
    unit_price_snapshot: Decimal,
}

/// Tolerant payload shape read on load: lines stay raw JSON so one bad line
/// cannot poison the rest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStoredCart {
    version: u32,
    #[serde(default)]
    currency_code: CurrencyCode,
    #[serde(default)]
    lines: Vec<serde_json::Value>,
}

/// Serialize a cart into the version-1 payload.
fn encode_payload(cart: &Cart) -> Result<String, StorageError> {
    let stored = StoredCart {
        version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        currency_code: cart.subtotal().currency_code,
        lines: cart
            .lines()
            .iter()
            .map(|l| StoredLine {
                product_id: l.product_id.as_str().to_owned(),
                quantity: l.quantity,
                unit_price_snapshot: l.unit_price_snapshot.amount,
            })
            .collect(),
    };
    Ok(serde_json::to_string(&stored)?)
}

/// Decode and validate a payload, keeping every line that survives.
///
/// Returns `None` when the payload as a whole is unusable (undecodable JSON
/// or an unknown schema version); otherwise returns a cart holding the valid
/// lines, which may be empty.
fn decode_payload(payload: &str) -> Option<Cart> {
    let raw: RawStoredCart = match serde_json::from_str(payload) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "discarding undecodable cart payload");
            return None;
        }
    };

    if raw.version != SCHEMA_VERSION {
        warn!(
            version = raw.version,
            expected = SCHEMA_VERSION,
            "discarding cart payload with unknown schema version"
        );
        return None;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut lines = Vec::with_capacity(raw.lines.len());
    for value in raw.lines {
        let line = match serde_json::from_value::<StoredLine>(value) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "dropping malformed stored cart line");
                continue;
            }
        };
        if line.product_id.is_empty() {
            warn!("dropping stored cart line with empty product ID");
            continue;
        }
        if line.quantity == 0 {
            warn!(product_id = %line.product_id, "dropping stored cart line with zero quantity");
            continue;
        }
        if line.unit_price_snapshot < Decimal::ZERO {
            warn!(product_id = %line.product_id, "dropping stored cart line with negative price");
            continue;
        }
        if !seen.insert(line.product_id.clone()) {
            warn!(product_id = %line.product_id, "dropping duplicate stored cart line");
            continue;
        }
        lines.push(CartLine {
            product_id: ProductId::new(line.product_id),
            quantity: line.quantity,
            unit_price_snapshot: Price::new(line.unit_price_snapshot, raw.currency_code),
        });
    }

    Some(Cart::from_lines(lines))
}

// =============================================================================
// JSON file storage
// =============================================================================

/// File-backed cart slot: one JSON file per browsing device.
///
/// The filesystem analogue of a browser's local storage slot - durable across
/// restarts, scoped to the device, last-write-wins.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage adapter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a storage adapter from configuration.
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        Self::new(config.storage_path.clone())
    }

    /// The slot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_payload(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Some(payload),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved cart slot");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read cart slot");
                None
            }
        }
    }

    fn try_save(&self, cart: &Cart) -> Result<(), StorageError> {
        let payload = encode_payload(cart)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Option<Cart> {
        decode_payload(&self.read_payload()?)
    }

    fn save(&self, cart: &Cart) {
        if let Err(e) = self.try_save(cart) {
            error!(
                path = %self.path.display(),
                error = %e,
                "failed to persist cart; continuing in memory"
            );
        }
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// In-process cart slot for tests and storage-less sessions.
///
/// Runs the full payload codec so round-trip behavior matches the file
/// adapter exactly.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with a raw payload (hydration tests).
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }

    /// The raw payload currently in the slot, if any.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Option<Cart> {
        let payload = self.slot.lock().clone()?;
        decode_payload(&payload)
    }

    fn save(&self, cart: &Cart) {
        match encode_payload(cart) {
            Ok(payload) => *self.slot.lock() = Some(payload),
            Err(e) => error!(error = %e, "failed to serialize cart; keeping previous payload"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mithai_mahal_core::Product;

    use super::*;

    fn product(id: &str, rupees: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Sweet {id}"),
            unit_price: Price::new(Decimal::from(rupees), CurrencyCode::INR),
            image_ref: None,
            category: "Halwa".to_owned(),
            description: None,
        }
    }

    fn sample_cart() -> Cart {
        Cart::default()
            .with_added(&product("sweet-1", 550), 2)
            .unwrap()
            .with_added(&product("sweet-2", 320), 1)
            .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_cart() {
        let cart = sample_cart();
        let storage = MemoryStorage::new();
        storage.save(&cart);

        assert_eq!(storage.load().unwrap(), cart);
    }

    #[test]
    fn test_load_empty_slot_is_none() {
        assert!(MemoryStorage::new().load().is_none());
    }

    #[test]
    fn test_payload_shape() {
        let storage = MemoryStorage::new();
        storage.save(&sample_cart());

        let payload: serde_json::Value =
            serde_json::from_str(&storage.payload().unwrap()).unwrap();
        assert_eq!(payload["version"], 1);
        assert_eq!(payload["currencyCode"], "INR");
        assert!(payload["savedAt"].is_string());

        let lines = payload["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["productId"], "sweet-1");
        assert_eq!(lines[0]["quantity"], 2);
        assert_eq!(lines[0]["unitPriceSnapshot"], "550");
    }

    #[test]
    fn test_corrupt_payload_loads_as_none() {
        let storage = MemoryStorage::with_payload("{not json at all");
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_unknown_schema_version_discarded() {
        let storage = MemoryStorage::with_payload(r#"{"version": 99, "lines": []}"#);
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_partial_corruption_keeps_surviving_lines() {
        let payload = r#"{
            "version": 1,
            "currencyCode": "INR",
            "lines": [
                { "productId": "good", "quantity": 2, "unitPriceSnapshot": "100" },
                { "productId": "", "quantity": 1, "unitPriceSnapshot": "50" },
                { "productId": "zero-qty", "quantity": 0, "unitPriceSnapshot": "50" },
                { "productId": "negative", "quantity": 1, "unitPriceSnapshot": "-5" },
                { "productId": "good", "quantity": 9, "unitPriceSnapshot": "100" },
                "not-an-object"
            ]
        }"#;
        let cart = MemoryStorage::with_payload(payload).load().unwrap();

        assert_eq!(cart.lines().len(), 1);
        let line = cart.line(&ProductId::from("good")).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price_snapshot.amount, Decimal::from(100));
    }

    #[test]
    fn test_missing_currency_defaults_to_inr() {
        let payload = r#"{
            "version": 1,
            "lines": [
                { "productId": "a", "quantity": 1, "unitPriceSnapshot": "75" }
            ]
        }"#;
        let cart = MemoryStorage::with_payload(payload).load().unwrap();
        assert_eq!(
            cart.line(&ProductId::from("a")).unwrap().unit_price_snapshot,
            Price::new(Decimal::from(75), CurrencyCode::INR)
        );
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("cart.json"));

        assert!(storage.load().is_none());

        let cart = sample_cart();
        storage.save(&cart);
        assert_eq!(storage.load().unwrap(), cart);
    }

    #[test]
    fn test_file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/slots/cart.json"));

        storage.save(&sample_cart());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_file_storage_corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "garbage").unwrap();

        assert!(JsonFileStorage::new(path).load().is_none());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        // A directory path cannot be written as a file; save must not panic.
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        storage.save(&sample_cart());
    }
}
