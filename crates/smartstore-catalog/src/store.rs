//! SmartStore Catalog - Store Service
//!
//! The `CatalogStore` owns the product and user maps behind async RwLocks and
//! notifies subscribed observers of purchases and product feature changes.
//! Observers are called in subscription order with typed payloads; there is no
//! implicit event-bus coupling between modules.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use smartstore_common::{Result, SmartStoreError};

use crate::types::{BehaviorEvent, ItemUpdate, Product, PurchaseEvent, UserRecord};

/// Subscription interface for catalog change events
#[async_trait]
pub trait CatalogObserver: Send + Sync {
    /// A purchase was recorded for `event.user_id`
    async fn behavior_updated(&self, event: BehaviorEvent);

    /// A product's descriptive features changed
    async fn item_updated(&self, update: ItemUpdate);
}

/// In-memory catalog/order store
pub struct CatalogStore {
    products: Arc<RwLock<BTreeMap<String, Product>>>,
    users: Arc<RwLock<BTreeMap<String, UserRecord>>>,
    observers: Arc<RwLock<Vec<Arc<dyn CatalogObserver>>>>,
}

impl CatalogStore {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(BTreeMap::new())),
            users: Arc::new(RwLock::new(BTreeMap::new())),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a catalog pre-loaded with the demo product and user seed
    pub async fn with_mock_data() -> Self {
        let store = Self::new();
        let (products, users) = crate::mock::seed();
        {
            let mut map = store.products.write().await;
            for product in products {
                map.insert(product.id.clone(), product);
            }
        }
        {
            let mut map = store.users.write().await;
            for user in users {
                map.insert(user.id.clone(), user);
            }
        }
        store
    }

    /// Subscribe an observer to catalog change events
    pub async fn subscribe(&self, observer: Arc<dyn CatalogObserver>) {
        self.observers.write().await.push(observer);
    }

    /// Full snapshot of all users, in id order
    pub async fn list_users(&self) -> Vec<UserRecord> {
        self.users.read().await.values().cloned().collect()
    }

    /// Full snapshot of all products, in id order
    pub async fn list_items(&self) -> Vec<Product> {
        self.products.read().await.values().cloned().collect()
    }

    /// Look up a single product
    pub async fn get_product(&self, product_id: &str) -> Option<Product> {
        self.products.read().await.get(product_id).cloned()
    }

    /// Look up a single user
    pub async fn get_user(&self, user_id: &str) -> Option<UserRecord> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Add a new product to the catalog
    #[instrument(level = "debug", skip(self, product))]
    pub async fn add_product(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(SmartStoreError::AlreadyExists(product.id));
        }
        debug!("📦 Adding product {}", product.id);
        products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Register a new user
    #[instrument(level = "debug", skip(self, user))]
    pub async fn add_user(&self, user: UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(SmartStoreError::AlreadyExists(user.id));
        }
        debug!("👤 Adding user {}", user.id);
        users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Record a purchase: appends to the user's history, bumps the product's
    /// sold count and notifies observers.
    ///
    /// `rating` is the buyer's review score when one was given; implicit
    /// purchases pass `None`.
    #[instrument(level = "debug", skip(self))]
    pub async fn record_purchase(
        &self,
        user_id: &str,
        item_id: &str,
        rating: Option<f64>,
    ) -> Result<()> {
        let timestamp = Utc::now();

        {
            // Both keys are checked before either map is touched so a failed
            // purchase leaves the catalog exactly as it was.
            let mut users = self.users.write().await;
            let mut products = self.products.write().await;
            let user = users
                .get_mut(user_id)
                .ok_or_else(|| SmartStoreError::NotFound(format!("user {user_id}")))?;
            let product = products
                .get_mut(item_id)
                .ok_or_else(|| SmartStoreError::NotFound(format!("product {item_id}")))?;

            product.sold += 1;
            user.purchase_history.push(PurchaseEvent {
                item_id: item_id.to_string(),
                timestamp,
                rating,
            });
        }

        debug!("🛒 Recorded purchase of {} by {}", item_id, user_id);

        let event = BehaviorEvent {
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            timestamp,
            rating,
        };
        for observer in self.observers.read().await.iter() {
            observer.behavior_updated(event.clone()).await;
        }

        Ok(())
    }

    /// Apply a feature update to a product and notify observers
    #[instrument(level = "debug", skip(self, update))]
    pub async fn update_product(&self, update: ItemUpdate) -> Result<()> {
        {
            let mut products = self.products.write().await;
            let product = products
                .get_mut(&update.item_id)
                .ok_or_else(|| SmartStoreError::NotFound(format!("product {}", update.item_id)))?;

            if let Some(category) = &update.category {
                product.category = category.clone();
            }
            if let Some(price) = update.price {
                product.price = price;
            }
            if let Some(rating) = update.rating {
                product.rating = rating;
            }
            if let Some(sold) = update.sold {
                product.sold = sold;
            }
            if let Some(tags) = &update.tags {
                product.tags = tags.clone();
            }
            if let Some(features) = &update.features {
                product.features = features.clone();
            }
        }

        debug!("🔄 Updated product {}", update.item_id);

        for observer in self.observers.read().await.iter() {
            observer.item_updated(update.clone()).await;
        }

        Ok(())
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    struct RecordingObserver {
        behaviors: Mutex<Vec<BehaviorEvent>>,
        updates: Mutex<Vec<ItemUpdate>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                behaviors: Mutex::new(Vec::new()),
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CatalogObserver for RecordingObserver {
        async fn behavior_updated(&self, event: BehaviorEvent) {
            self.behaviors.lock().await.push(event);
        }

        async fn item_updated(&self, update: ItemUpdate) {
            self.updates.lock().await.push(update);
        }
    }

    #[tokio::test]
    async fn test_mock_catalog_has_products_and_users() {
        let store = CatalogStore::with_mock_data().await;
        assert!(!store.list_items().await.is_empty());
        assert!(!store.list_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_purchase_bumps_sold_and_notifies() {
        let store = CatalogStore::with_mock_data().await;
        let observer = Arc::new(RecordingObserver::new());
        store.subscribe(observer.clone()).await;

        let product = store.list_items().await.into_iter().next().unwrap();
        let user = store.list_users().await.into_iter().next().unwrap();
        let sold_before = product.sold;

        store
            .record_purchase(&user.id, &product.id, Some(5.0))
            .await
            .unwrap();

        let product_after = store.get_product(&product.id).await.unwrap();
        assert_eq!(product_after.sold, sold_before + 1);

        let user_after = store.get_user(&user.id).await.unwrap();
        let last = user_after.purchase_history.last().unwrap();
        assert_eq!(last.item_id, product.id);
        assert_eq!(last.rating, Some(5.0));

        let behaviors = observer.behaviors.lock().await;
        assert_eq!(behaviors.len(), 1);
        assert_eq!(behaviors[0].user_id, user.id);
        assert_eq!(behaviors[0].item_id, product.id);
    }

    #[tokio::test]
    async fn test_record_purchase_unknown_product() {
        let store = CatalogStore::with_mock_data().await;
        let user = store.list_users().await.into_iter().next().unwrap();
        let history_before = user.purchase_history.len();

        let result = store.record_purchase(&user.id, "missing", None).await;
        assert!(matches!(result, Err(SmartStoreError::NotFound(_))));

        let user_after = store.get_user(&user.id).await.unwrap();
        assert_eq!(user_after.purchase_history.len(), history_before);
    }

    #[tokio::test]
    async fn test_record_purchase_unknown_user_leaves_sold_unchanged() {
        let store = CatalogStore::with_mock_data().await;
        let observer = Arc::new(RecordingObserver::new());
        store.subscribe(observer.clone()).await;

        let product = store.list_items().await.into_iter().next().unwrap();
        let sold_before = product.sold;

        let result = store.record_purchase("ghost", &product.id, Some(5.0)).await;
        assert!(matches!(result, Err(SmartStoreError::NotFound(_))));

        let product_after = store.get_product(&product.id).await.unwrap();
        assert_eq!(product_after.sold, sold_before);
        assert!(observer.behaviors.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_product_applies_changes_and_notifies() {
        let store = CatalogStore::with_mock_data().await;
        let observer = Arc::new(RecordingObserver::new());
        store.subscribe(observer.clone()).await;

        let product = store.list_items().await.into_iter().next().unwrap();
        store
            .update_product(ItemUpdate {
                item_id: product.id.clone(),
                price: Some(42.0),
                rating: Some(3.5),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = store.get_product(&product.id).await.unwrap();
        assert_eq!(updated.price, 42.0);
        assert_eq!(updated.rating, 3.5);
        // Untouched fields keep their values
        assert_eq!(updated.category, product.category);

        assert_eq!(observer.updates.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_rejects_duplicates() {
        let store = CatalogStore::with_mock_data().await;
        let product = store.list_items().await.into_iter().next().unwrap();
        let result = store.add_product(product).await;
        assert!(matches!(result, Err(SmartStoreError::AlreadyExists(_))));
    }
}
