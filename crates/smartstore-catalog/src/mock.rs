//! SmartStore Catalog - Demo Seed Data
//!
//! The storefront demo ships with a small fixed catalog and a handful of
//! users with purchase histories. Sold counts and ratings are chosen so the
//! recommendation engine has meaningful popularity and preference signals to
//! work with out of the box.

use chrono::{Duration, Utc};

use crate::types::{Product, PurchaseEvent, UserPreferences, UserRecord};

fn product(
    id: &str,
    name: &str,
    category: &str,
    price: f64,
    rating: f64,
    sold: u64,
    age_days: i64,
    tags: &[&str],
    features: &[&str],
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        rating,
        sold,
        created_at: Some(Utc::now() - Duration::days(age_days)),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

fn purchase(item_id: &str, days_ago: i64, rating: Option<f64>) -> PurchaseEvent {
    PurchaseEvent {
        item_id: item_id.to_string(),
        timestamp: Utc::now() - Duration::days(days_ago),
        rating,
    }
}

/// Demo products and users for the SmartStore storefront
pub fn seed() -> (Vec<Product>, Vec<UserRecord>) {
    let products = vec![
        product(
            "p001",
            "Smart Mineral Water",
            "beverages",
            3.50,
            4.8,
            450,
            12,
            &["smart", "health", "minerals"],
            &["quality monitoring", "temperature display", "portable design"],
        ),
        product(
            "p002",
            "Organic Veggie Chips",
            "snacks",
            8.90,
            4.6,
            123,
            45,
            &["organic", "health", "crispy"],
            &["no preservatives", "low-temperature fried", "certified organic"],
        ),
        product(
            "p003",
            "Sonic Toothbrush",
            "daily",
            29.90,
            4.7,
            67,
            30,
            &["smart", "sonic", "waterproof"],
            &["smart sensing", "multiple modes", "long battery life"],
        ),
        product(
            "p004",
            "Wireless Noise-Canceling Headphones",
            "electronics",
            199.00,
            4.9,
            89,
            20,
            &["wireless", "noise-canceling", "long battery life"],
            &["active noise canceling", "fast charging", "hi-fi sound"],
        ),
        product(
            "p005",
            "Energy Drink",
            "beverages",
            6.50,
            4.3,
            234,
            60,
            &["functional", "energizing", "sports"],
            &["fast energy boost", "fatigue relief", "any scenario"],
        ),
        product(
            "p006",
            "Mixed Nuts",
            "snacks",
            15.90,
            4.5,
            156,
            25,
            &["nuts", "health", "nutrition"],
            &["mixed varieties", "no additives", "nutrient-rich"],
        ),
        product(
            "p007",
            "Bamboo Fiber Towel",
            "daily",
            12.50,
            4.4,
            78,
            90,
            &["bamboo", "soft", "absorbent"],
            &["natural fiber", "quick drying", "skin friendly"],
        ),
        product(
            "p008",
            "Portable Power Bank",
            "electronics",
            89.00,
            4.6,
            112,
            15,
            &["portable", "fast charging", "high capacity"],
            &["20000 mAh", "dual ports", "compact body"],
        ),
    ];

    let users = vec![
        UserRecord {
            id: "u001".to_string(),
            name: "Alice".to_string(),
            preferences: UserPreferences {
                categories: vec!["beverages".to_string(), "snacks".to_string()],
                price_range: Some((0.0, 50.0)),
            },
            purchase_history: vec![
                purchase("p001", 10, Some(5.0)),
                purchase("p005", 7, None),
                purchase("p002", 3, Some(4.5)),
            ],
        },
        UserRecord {
            id: "u002".to_string(),
            name: "Bob".to_string(),
            preferences: UserPreferences {
                categories: vec!["electronics".to_string()],
                price_range: Some((50.0, 500.0)),
            },
            purchase_history: vec![
                purchase("p004", 14, Some(5.0)),
                purchase("p008", 5, Some(4.0)),
            ],
        },
        UserRecord {
            id: "u003".to_string(),
            name: "Carol".to_string(),
            preferences: UserPreferences::default(),
            purchase_history: vec![
                purchase("p001", 20, Some(4.0)),
                purchase("p003", 8, None),
                purchase("p006", 2, Some(5.0)),
            ],
        },
        // New user with no history yet
        UserRecord {
            id: "u004".to_string(),
            name: "Dave".to_string(),
            preferences: UserPreferences::default(),
            purchase_history: Vec::new(),
        },
    ];

    (products, users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let (products, users) = seed();
        let mut product_ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        product_ids.sort();
        product_ids.dedup();
        assert_eq!(product_ids.len(), products.len());

        let mut user_ids: Vec<_> = users.iter().map(|u| u.id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();
        assert_eq!(user_ids.len(), users.len());
    }

    #[test]
    fn test_seed_purchases_reference_products() {
        let (products, users) = seed();
        for user in &users {
            for purchase in &user.purchase_history {
                assert!(
                    products.iter().any(|p| p.id == purchase.item_id),
                    "purchase {} has no matching product",
                    purchase.item_id
                );
            }
        }
    }
}
