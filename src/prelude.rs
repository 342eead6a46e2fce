//! Cartkit prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, InvalidCart},
    catalog::{Catalog, CatalogError, CatalogProduct, LineIdentity},
    config::{CartConfig, ConfigError},
    notifications::{Notification, NotificationTiming, Notifier, Phase},
    pricing::{Totals, format_amount, item_count, total_price},
    products::{LineId, ProductSnapshot},
    slideshow::Slideshow,
    storage::{FileStorage, MemoryStorage, StorageBackend, StorageError},
    store::{CartError, CartEvent, CartObserver, CartStore, ChangeKind, NoopObserver},
    view::{Badge, CartSummary, CartView, LineRow, ViewAction},
};

#[cfg(target_arch = "wasm32")]
pub use crate::storage::LocalStorage;
