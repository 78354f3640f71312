//! SmartStore Recommendation Engine - Profile Builder
//!
//! Converts raw catalog records into the derived vectors the scorer works
//! with: a per-user summary of category affinity, price tolerance and
//! purchase timing, and a per-item normalized feature vector plus a
//! popularity scalar. Building is pure; profiles are rebuilt whenever the
//! underlying record changes so derived state is never stale.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use smartstore_catalog::{ItemUpdate, Product, PurchaseEvent, UserPreferences, UserRecord};

/// Rating assigned to purchases the buyer never reviewed
pub const IMPLICIT_RATING: f64 = 4.0;

/// Recency score for items with an unknown creation date
const UNKNOWN_RECENCY: f64 = 0.5;

/// A single entry in a user's purchase history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub item_id: String,
    pub timestamp: DateTime<Utc>,
    pub rating: f64,
    /// True when the rating is the implicit default rather than a review
    pub implicit: bool,
}

impl From<&PurchaseEvent> for PurchaseRecord {
    fn from(event: &PurchaseEvent) -> Self {
        Self {
            item_id: event.item_id.clone(),
            timestamp: event.timestamp,
            rating: event.rating.unwrap_or(IMPLICIT_RATING),
            implicit: event.rating.is_none(),
        }
    }
}

/// Purchase counts by hour of day and day of week (Sunday = 0)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub hour_of_day: [u32; 24],
    pub day_of_week: [u32; 7],
}

impl TemporalPattern {
    fn build(purchases: &[PurchaseRecord]) -> Self {
        let mut pattern = Self::default();
        for purchase in purchases {
            pattern.hour_of_day[purchase.timestamp.hour() as usize] += 1;
            pattern.day_of_week[purchase.timestamp.weekday().num_days_from_sunday() as usize] += 1;
        }
        pattern
    }
}

/// Derived user feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserVector {
    /// Category -> purchase frequency, normalized to sum to 1 over known items
    pub categories: HashMap<String, f64>,
    /// Preferred price interval `(min, max)`
    pub price_preference: (f64, f64),
    pub temporal: TemporalPattern,
}

impl UserVector {
    /// Build the vector from a purchase history, resolving item categories
    /// and prices against the current item profiles.
    pub fn build(purchases: &[PurchaseRecord], items: &BTreeMap<String, ItemProfile>) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut prices: Vec<f64> = Vec::new();

        for purchase in purchases {
            if let Some(item) = items.get(&purchase.item_id) {
                *counts.entry(item.features.category.clone()).or_insert(0) += 1;
                prices.push(item.features.price);
            }
        }

        let total: u32 = counts.values().sum();
        let categories = counts
            .into_iter()
            .map(|(category, count)| (category, f64::from(count) / f64::from(total.max(1))))
            .collect();

        let price_preference = if prices.is_empty() {
            (0.0, 1000.0)
        } else {
            let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (min * 0.8, max * 1.2)
        };

        Self {
            categories,
            price_preference,
            temporal: TemporalPattern::build(purchases),
        }
    }

    /// Whether a price falls inside the preferred interval
    pub fn price_in_range(&self, price: f64) -> bool {
        let (min, max) = self.price_preference;
        price >= min && price <= max
    }
}

/// A user with purchase history and derived vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub purchases: Vec<PurchaseRecord>,
    pub preferences: UserPreferences,
    pub vector: UserVector,
}

impl UserProfile {
    /// Build a profile from a catalog user record
    pub fn build(record: &UserRecord, items: &BTreeMap<String, ItemProfile>) -> Self {
        let purchases: Vec<PurchaseRecord> =
            record.purchase_history.iter().map(PurchaseRecord::from).collect();
        let vector = UserVector::build(&purchases, items);
        Self {
            user_id: record.id.clone(),
            purchases,
            preferences: record.preferences.clone(),
            vector,
        }
    }

    /// Create an empty profile for a user seen for the first time through a
    /// behavior event.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            purchases: Vec::new(),
            preferences: UserPreferences::default(),
            vector: UserVector::build(&[], &BTreeMap::new()),
        }
    }

    /// Append a purchase and rebuild the derived vector
    pub fn record_purchase(
        &mut self,
        item_id: &str,
        timestamp: DateTime<Utc>,
        rating: Option<f64>,
        items: &BTreeMap<String, ItemProfile>,
    ) {
        self.purchases.push(PurchaseRecord {
            item_id: item_id.to_string(),
            timestamp,
            rating: rating.unwrap_or(IMPLICIT_RATING),
            implicit: rating.is_none(),
        });
        self.vector = UserVector::build(&self.purchases, items);
    }

    pub fn has_purchased(&self, item_id: &str) -> bool {
        self.purchases.iter().any(|p| p.item_id == item_id)
    }

    /// Rating of the first recorded purchase of an item, if any
    pub fn rating_for(&self, item_id: &str) -> Option<f64> {
        self.purchases
            .iter()
            .find(|p| p.item_id == item_id)
            .map(|p| p.rating)
    }
}

/// Descriptive item features as carried by the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFeatures {
    pub category: String,
    pub price: f64,
    pub rating: f64,
    pub tags: Vec<String>,
    pub features: Vec<String>,
}

/// Normalized item features, each scaled into [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentVector {
    pub price: f64,
    pub rating: f64,
}

/// An item with derived scoring features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProfile {
    pub item_id: String,
    pub features: ItemFeatures,
    pub sold: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub content_vector: ContentVector,
    pub popularity: f64,
}

impl ItemProfile {
    /// Build a profile from a catalog product
    pub fn build(product: &Product) -> Self {
        let mut profile = Self {
            item_id: product.id.clone(),
            features: ItemFeatures {
                category: product.category.clone(),
                price: product.price,
                rating: product.rating,
                tags: product.tags.clone(),
                features: product.features.clone(),
            },
            sold: product.sold,
            created_at: product.created_at,
            content_vector: ContentVector {
                price: 0.0,
                rating: 0.0,
            },
            popularity: 0.0,
        };
        profile.refresh();
        profile
    }

    /// Apply a feature update and rebuild the derived fields
    pub fn apply_update(&mut self, update: &ItemUpdate) {
        if let Some(category) = &update.category {
            self.features.category = category.clone();
        }
        if let Some(price) = update.price {
            self.features.price = price;
        }
        if let Some(rating) = update.rating {
            self.features.rating = rating;
        }
        if let Some(sold) = update.sold {
            self.sold = sold;
        }
        if let Some(tags) = &update.tags {
            self.features.tags = tags.clone();
        }
        if let Some(features) = &update.features {
            self.features.features = features.clone();
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.content_vector = ContentVector {
            price: (self.features.price / 1000.0).min(1.0),
            rating: self.features.rating / 5.0,
        };
        self.popularity = self.compute_popularity();
    }

    /// Weighted popularity: 0.3 recency + 0.4 rating + 0.3 sales volume
    fn compute_popularity(&self) -> f64 {
        let recency = recency_score(self.created_at);
        let rating = self.features.rating / 5.0;
        let sales = (self.sold as f64 / 1000.0).min(1.0);
        0.3 * recency + 0.4 * rating + 0.3 * sales
    }
}

/// Exponential decay over item age: ~1 for new items, ~0 past three months
pub fn recency_score(created_at: Option<DateTime<Utc>>) -> f64 {
    match created_at {
        Some(created) => {
            let days = (Utc::now() - created).num_seconds() as f64 / 86_400.0;
            (-days / 30.0).exp()
        }
        None => UNKNOWN_RECENCY,
    }
}
