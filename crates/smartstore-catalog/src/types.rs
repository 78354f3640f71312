//! SmartStore Catalog - Record Types
//!
//! Plain data records exchanged between the catalog and its consumers:
//! products with their descriptive features, users with their purchase
//! history, and the typed event payloads delivered to catalog observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Average review rating, 0-5
    pub rating: f64,
    /// Units sold to date
    pub sold: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
}

/// A single purchase in a user's history
///
/// `rating` is `None` for implicit purchases (the buyer never reviewed the
/// item); consumers are expected to fill in their own implicit default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub item_id: String,
    pub timestamp: DateTime<Utc>,
    pub rating: Option<f64>,
}

/// Externally supplied user preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub categories: Vec<String>,
    /// Preferred price range as `(min, max)`
    pub price_range: Option<(f64, f64)>,
}

/// A user record with purchase history
///
/// `purchase_history` is ordered chronologically (insertion order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub preferences: UserPreferences,
    pub purchase_history: Vec<PurchaseEvent>,
}

/// Payload delivered to observers when a user's behavior changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub user_id: String,
    pub item_id: String,
    pub timestamp: DateTime<Utc>,
    pub rating: Option<f64>,
}

/// Payload delivered to observers when a product's features change
///
/// Only the populated fields changed; everything else is untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub item_id: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub sold: Option<u64>,
    pub tags: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_update_default_is_empty() {
        let update = ItemUpdate {
            item_id: "p1".to_string(),
            ..Default::default()
        };
        assert!(update.category.is_none());
        assert!(update.price.is_none());
        assert!(update.rating.is_none());
        assert!(update.sold.is_none());
        assert!(update.tags.is_none());
        assert!(update.features.is_none());
    }

    #[test]
    fn test_user_preferences_default() {
        let prefs = UserPreferences::default();
        assert!(prefs.categories.is_empty());
        assert!(prefs.price_range.is_none());
    }
}
