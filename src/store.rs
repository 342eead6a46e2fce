//! Cart store
//!
//! [`CartStore`] owns the cart, applies every mutation, persists the result and
//! tells its observer what changed. Renderers never touch the cart directly: they
//! read [`CartStore::cart`] and react to [`CartEvent`]s.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartLine},
    pricing::{item_count, total_price},
    products::{LineId, ProductSnapshot},
    storage::{StorageBackend, StorageError},
};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A new line was appended.
    ItemAdded,

    /// An existing line's quantity changed.
    QuantityUpdated,

    /// A line left the cart.
    ItemRemoved,

    /// No line had the requested id; nothing changed.
    NotFound,
}

impl ChangeKind {
    /// Whether the cart was modified.
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, ChangeKind::NotFound)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::ItemAdded => "item added",
            ChangeKind::QuantityUpdated => "quantity updated",
            ChangeKind::ItemRemoved => "item removed",
            ChangeKind::NotFound => "not found",
        };

        f.write_str(label)
    }
}

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The change was applied in memory but could not be persisted.
    #[error("cart change ({change}) could not be persisted")]
    Persist {
        /// Change that was applied
        change: ChangeKind,

        /// Storage failure
        #[source]
        source: StorageError,
    },
}

impl CartError {
    /// The change that was applied before the error occurred.
    #[must_use]
    pub fn change(&self) -> ChangeKind {
        match self {
            CartError::Persist { change, .. } => *change,
        }
    }
}

/// A change applied to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEvent {
    /// What happened
    pub change: ChangeKind,

    /// Line the change applied to
    pub id: LineId,

    /// Whether the cart panel should be opened to show the change
    pub open_panel: bool,
}

/// Receives cart changes, typically to re-render.
///
/// Callbacks run synchronously inside the mutating call, after the cart has been
/// updated and before it is persisted.
pub trait CartObserver {
    /// Called after each mutation that changed the cart.
    fn on_change(&mut self, event: &CartEvent, cart: &Cart);

    /// Called after the cart was replaced from storage.
    fn on_load(&mut self, _cart: &Cart) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_change(&mut self, _event: &CartEvent, _cart: &Cart) {}
}

impl<O: CartObserver + ?Sized> CartObserver for &mut O {
    fn on_change(&mut self, event: &CartEvent, cart: &Cart) {
        (**self).on_change(event, cart);
    }

    fn on_load(&mut self, cart: &Cart) {
        (**self).on_load(cart);
    }
}

/// Owns the cart and its persistence.
#[derive(Debug)]
pub struct CartStore<S: StorageBackend, O: CartObserver = NoopObserver> {
    cart: Cart,
    storage: S,
    key: String,
    observer: O,
}

impl<S: StorageBackend> CartStore<S> {
    /// Create a store with an empty cart using the default storage key.
    ///
    /// Call [`CartStore::load`] to restore a persisted cart.
    pub fn new(storage: S) -> Self {
        Self::with_observer(storage, DEFAULT_STORAGE_KEY, NoopObserver)
    }
}

impl<S: StorageBackend, O: CartObserver> CartStore<S, O> {
    /// Create a store with an empty cart, a storage key and an observer.
    pub fn with_observer(storage: S, key: impl Into<String>, observer: O) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            key: key.into(),
            observer,
        }
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// A missing, unreadable or malformed value yields an empty cart. The
    /// discarded data is logged, never reported.
    pub fn load(&mut self) -> &Cart {
        self.cart = match self.storage.get(&self.key) {
            Ok(Some(value)) => match serde_json::from_str::<Cart>(&value) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!(key = %self.key, error = %err, "discarding malformed cart data");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read cart, starting empty");
                Cart::new()
            }
        };

        info!(key = %self.key, lines = self.cart.len(), "cart loaded");

        self.observer.on_load(&self.cart);

        &self.cart
    }

    /// Persist the cart under the store's key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization or the write fails. The
    /// in-memory cart is unaffected.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let value = serde_json::to_string(&self.cart)?;

        self.storage.set(&self.key, &value).inspect_err(|err| {
            warn!(key = %self.key, error = %err, "failed to persist cart");
        })
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line when the id is already in the cart,
    /// otherwise appends a new line with a quantity of one. A line already at
    /// `u32::MAX` stays there, but the add is still reported as
    /// [`ChangeKind::QuantityUpdated`] and saved.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persist`] if the cart could not be saved.
    pub fn add_item(&mut self, product: ProductSnapshot) -> Result<ChangeKind, CartError> {
        let id = product.id;

        let change = if let Some(line) = self.cart.get_mut(id) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(%id, quantity = line.quantity, "incremented existing line");
            ChangeKind::QuantityUpdated
        } else {
            debug!(%id, title = %product.title, "added new line");
            self.cart.push(CartLine::new(product));
            ChangeKind::ItemAdded
        };

        self.commit(change, id, true)
    }

    /// Remove the line with `id`.
    ///
    /// Returns whether a line was removed. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persist`] if the cart could not be saved.
    pub fn remove_item(&mut self, id: LineId) -> Result<bool, CartError> {
        if self.cart.remove(id).is_none() {
            debug!(%id, "remove ignored, line not in cart");
            return Ok(false);
        }

        debug!(%id, "removed line");

        self.commit(ChangeKind::ItemRemoved, id, false)
            .map(|_change| true)
    }

    /// Change the quantity of the line with `id` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persist`] if the cart could not be saved.
    pub fn update_quantity(&mut self, id: LineId, delta: i64) -> Result<ChangeKind, CartError> {
        let Some(line) = self.cart.get_mut(id) else {
            debug!(%id, delta, "update ignored, line not in cart");
            return Ok(ChangeKind::NotFound);
        };

        let quantity = i64::from(line.quantity).saturating_add(delta);

        let change = if quantity <= 0 {
            self.cart.remove(id);
            debug!(%id, delta, "quantity reached zero, removed line");
            ChangeKind::ItemRemoved
        } else {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            debug!(%id, delta, quantity = line.quantity, "updated quantity");
            ChangeKind::QuantityUpdated
        };

        self.commit(change, id, false)
    }

    /// Sum of `price * quantity` over the cart.
    pub fn total(&self) -> Decimal {
        total_price(&self.cart)
    }

    /// Sum of quantities over the cart.
    pub fn item_count(&self) -> u64 {
        item_count(&self.cart)
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key the cart is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Observer receiving cart events.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give up the store, returning its backend and observer.
    pub fn into_parts(self) -> (S, O) {
        (self.storage, self.observer)
    }

    fn commit(
        &mut self,
        change: ChangeKind,
        id: LineId,
        open_panel: bool,
    ) -> Result<ChangeKind, CartError> {
        let event = CartEvent {
            change,
            id,
            open_panel,
        };

        self.observer.on_change(&event, &self.cart);

        self.save()
            .map_err(|source| CartError::Persist { change, source })?;

        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::storage::{FileStorage, MemoryStorage};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingObserver {
        events: Vec<CartEvent>,
        loads: usize,
    }

    impl CartObserver for RecordingObserver {
        fn on_change(&mut self, event: &CartEvent, _cart: &Cart) {
            self.events.push(*event);
        }

        fn on_load(&mut self, _cart: &Cart) {
            self.loads += 1;
        }
    }

    fn product(id: u64, price: Decimal) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), price, format!("/img/{id}.png"))
    }

    #[test]
    fn add_new_item_appends_line() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        let change = store.add_item(product(1, dec!(10)))?;

        assert_eq!(change, ChangeKind::ItemAdded);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().get(LineId(1)).map(|line| line.quantity), Some(1));

        Ok(())
    }

    #[test]
    fn add_existing_item_increments_quantity() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, dec!(10)))?;
        let change = store.add_item(product(1, dec!(10)))?;

        assert_eq!(change, ChangeKind::QuantityUpdated);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total(), dec!(20));

        Ok(())
    }

    #[test]
    fn add_keeps_price_captured_on_first_add() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, dec!(10)))?;
        store.add_item(product(1, dec!(99)))?;

        assert_eq!(store.total(), dec!(20));

        Ok(())
    }

    #[test]
    fn add_persists_cart() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(5, dec!(1.5)))?;

        let stored = store.storage().get(DEFAULT_STORAGE_KEY)?;

        assert_eq!(
            stored.as_deref(),
            Some(r#"[{"id":5,"title":"Product 5","price":1.5,"image":"/img/5.png","quantity":1}]"#)
        );

        Ok(())
    }

    #[test]
    fn remove_missing_item_returns_false_without_saving() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        assert!(!store.remove_item(LineId(3))?);
        assert_eq!(store.storage().get(DEFAULT_STORAGE_KEY)?, None);

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_removes_line() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, dec!(4)))?;
        store.add_item(product(1, dec!(4)))?;

        assert_eq!(store.update_quantity(LineId(1), -2)?, ChangeKind::ItemRemoved);
        assert!(store.cart().is_empty());
        assert_eq!(store.update_quantity(LineId(1), 1)?, ChangeKind::NotFound);

        Ok(())
    }

    #[test]
    fn update_quantity_below_zero_removes_line() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, dec!(4)))?;

        assert_eq!(store.update_quantity(LineId(1), -5)?, ChangeKind::ItemRemoved);
        assert_eq!(store.item_count(), 0);

        Ok(())
    }

    #[test]
    fn update_quantity_clamps_to_u32_max() -> TestResult {
        let mut store = CartStore::new(MemoryStorage::new());

        store.add_item(product(1, dec!(0)))?;

        assert_eq!(
            store.update_quantity(LineId(1), i64::MAX)?,
            ChangeKind::QuantityUpdated
        );
        assert_eq!(store.item_count(), u64::from(u32::MAX));

        Ok(())
    }

    #[test]
    fn add_at_u32_max_saturates_and_still_saves() -> TestResult {
        let mut storage = MemoryStorage::new();
        let stored = format!(
            r#"[ {{"id":1,"title":"A","price":1,"image":"","quantity":{}}} ]"#,
            u32::MAX
        );
        storage.set(DEFAULT_STORAGE_KEY, &stored)?;

        let mut store = CartStore::new(storage);
        store.load();

        assert_eq!(store.add_item(product(1, dec!(1)))?, ChangeKind::QuantityUpdated);
        assert_eq!(store.item_count(), u64::from(u32::MAX));
        assert_ne!(store.storage().get(DEFAULT_STORAGE_KEY)?, Some(stored));

        Ok(())
    }

    #[test]
    fn failed_save_keeps_in_memory_change() {
        let mut store = CartStore::new(MemoryStorage::with_quota(4));

        let result = store.add_item(product(1, dec!(10)));

        assert!(matches!(
            result,
            Err(CartError::Persist {
                change: ChangeKind::ItemAdded,
                source: StorageError::QuotaExceeded { .. },
            })
        ));
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn observer_sees_changes_and_panel_requests() -> TestResult {
        let mut store = CartStore::with_observer(
            MemoryStorage::new(),
            DEFAULT_STORAGE_KEY,
            RecordingObserver::default(),
        );

        store.add_item(product(1, dec!(2)))?;
        store.update_quantity(LineId(1), 1)?;
        store.update_quantity(LineId(9), 1)?;
        store.remove_item(LineId(1))?;

        let events = &store.observer().events;

        assert_eq!(
            events.iter().map(|event| event.change).collect::<Vec<_>>(),
            vec![
                ChangeKind::ItemAdded,
                ChangeKind::QuantityUpdated,
                ChangeKind::ItemRemoved
            ]
        );
        assert_eq!(
            events.iter().map(|event| event.open_panel).collect::<Vec<_>>(),
            vec![true, false, false]
        );

        Ok(())
    }

    #[test]
    fn load_notifies_observer() {
        let mut store = CartStore::with_observer(
            MemoryStorage::new(),
            DEFAULT_STORAGE_KEY,
            RecordingObserver::default(),
        );

        store.load();

        assert_eq!(store.observer().loads, 1);
    }

    #[test]
    fn load_discards_malformed_data() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(DEFAULT_STORAGE_KEY, "{not json")?;

        let mut store = CartStore::new(storage);

        assert!(store.load().is_empty());
        assert_eq!(store.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn load_treats_unreadable_storage_as_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("cart.json"))?;

        let mut store = CartStore::with_observer(
            FileStorage::new(dir.path()),
            DEFAULT_STORAGE_KEY,
            RecordingObserver::default(),
        );

        let persisted = store.add_item(product(1, dec!(4)));

        assert!(matches!(persisted, Err(CartError::Persist { .. })));
        assert_eq!(store.cart().len(), 1);

        assert!(store.load().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.observer().loads, 1);

        Ok(())
    }

    #[test]
    fn load_with_invalid_key_is_empty() {
        let mut store = CartStore::with_observer(
            FileStorage::new("unused"),
            "a/b",
            RecordingObserver::default(),
        );

        assert!(store.load().is_empty());
        assert_eq!(store.observer().loads, 1);
    }

    #[test]
    fn load_discards_zero_quantity_lines() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":1,"title":"A","price":1,"image":"","quantity":0}]"#,
        )?;

        let mut store = CartStore::new(storage);

        assert!(store.load().is_empty());

        Ok(())
    }

    #[test]
    fn change_kind_display() {
        assert_eq!(ChangeKind::QuantityUpdated.to_string(), "quantity updated");
        assert!(!ChangeKind::NotFound.is_change());
    }
}
