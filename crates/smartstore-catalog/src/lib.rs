//! SmartStore Catalog
//!
//! In-memory product, user and order store for the SmartStore storefront.
//! The catalog is the source of truth the recommendation engine builds its
//! profiles from: it hands out full snapshots (`list_users` / `list_items`)
//! and delivers incremental `behavior_updated` / `item_updated` events to
//! subscribed observers whenever a purchase is recorded or a product's
//! features change.

pub mod mock;
pub mod store;
pub mod types;

pub use store::{CatalogObserver, CatalogStore};
pub use types::{BehaviorEvent, ItemUpdate, Product, PurchaseEvent, UserPreferences, UserRecord};
