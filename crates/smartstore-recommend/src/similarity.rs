//! SmartStore Recommendation Engine - Similarity Scoring
//!
//! Deterministic, side-effect-free affinity functions. `content_similarity`
//! scores a candidate item against a user's derived vector from four weighted
//! signals; only the weights of signals that actually fire enter the
//! denominator, so an item outside every known category preference can still
//! score on rating and popularity alone. `user_similarity` blends the Jaccard
//! index of two purchase sets with rating agreement over the shared items.

use std::collections::HashSet;

use crate::profile::{ItemProfile, UserProfile, UserVector};

const CATEGORY_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.3;
const RATING_WEIGHT: f64 = 0.2;
const POPULARITY_WEIGHT: f64 = 0.1;

const JACCARD_WEIGHT: f64 = 0.7;
const RATING_AGREEMENT_WEIGHT: f64 = 0.3;

/// Score a candidate item against a user vector
///
/// Weighted signals: category affinity (0.4), price-in-range (0.3), rating
/// quality (0.2), popularity capped at 0.1 (0.1). The result is normalized by
/// the sum of the weights that fired.
pub fn content_similarity(user: &UserVector, item: &ItemProfile) -> f64 {
    let mut score = 0.0;
    let mut weights = 0.0;

    if let Some(affinity) = user.categories.get(&item.features.category) {
        score += affinity * CATEGORY_WEIGHT;
        weights += CATEGORY_WEIGHT;
    }

    if user.price_in_range(item.features.price) {
        score += PRICE_WEIGHT;
        weights += PRICE_WEIGHT;
    }

    score += (item.features.rating / 5.0) * RATING_WEIGHT;
    weights += RATING_WEIGHT;

    score += item.popularity.min(POPULARITY_WEIGHT);
    weights += POPULARITY_WEIGHT;

    if weights > 0.0 {
        score / weights
    } else {
        0.0
    }
}

/// Score the affinity between two users from their purchased-item sets
///
/// `0.7 × jaccard + 0.3 × avg(1 - |rating_a - rating_b| / 4)` over the
/// intersection; the agreement term is 0 when the intersection is empty.
pub fn user_similarity(a: &UserProfile, b: &UserProfile) -> f64 {
    let items_a: HashSet<&str> = a.purchases.iter().map(|p| p.item_id.as_str()).collect();
    let items_b: HashSet<&str> = b.purchases.iter().map(|p| p.item_id.as_str()).collect();

    let intersection = items_a.intersection(&items_b).count();
    let union = items_a.union(&items_b).count();
    if union == 0 {
        return 0.0;
    }

    let jaccard = intersection as f64 / union as f64;

    let mut agreement = 0.0;
    let mut common = 0u32;
    for item_id in items_a.intersection(&items_b) {
        if let (Some(rating_a), Some(rating_b)) = (a.rating_for(item_id), b.rating_for(item_id)) {
            agreement += 1.0 - (rating_a - rating_b).abs() / 4.0;
            common += 1;
        }
    }
    if common > 0 {
        agreement /= f64::from(common);
    }

    JACCARD_WEIGHT * jaccard + RATING_AGREEMENT_WEIGHT * agreement
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smartstore_catalog::Product;
    use std::collections::BTreeMap;

    fn item(id: &str, category: &str, price: f64, rating: f64, sold: u64) -> ItemProfile {
        ItemProfile::build(&Product {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            price,
            rating,
            sold,
            created_at: Some(Utc::now()),
            tags: vec![],
            features: vec![],
        })
    }

    fn user_with_purchases(user_id: &str, purchases: &[(&str, f64)]) -> UserProfile {
        let mut profile = UserProfile::empty(user_id);
        for (item_id, rating) in purchases {
            profile.record_purchase(item_id, Utc::now(), Some(*rating), &BTreeMap::new());
        }
        profile
    }

    #[test]
    fn test_content_similarity_all_signals_fire() {
        let mut vector = UserVector::build(&[], &BTreeMap::new());
        vector.categories.insert("beverages".to_string(), 1.0);
        vector.price_preference = (4.0, 6.0);

        // Category 1.0*0.4, price 0.3, rating 0.2, popularity cap 0.1 -> 1.0
        let candidate = item("b", "beverages", 6.0, 5.0, 900);
        let score = content_similarity(&vector, &candidate);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_similarity_untriggered_weights_excluded() {
        let vector = UserVector::build(&[], &BTreeMap::new());
        // No category affinity and price outside the default range: only the
        // rating and popularity weights enter the denominator.
        let candidate = item("c", "electronics", 1500.0, 5.0, 1000);
        let score = content_similarity(&vector, &candidate);
        let expected = (1.0 * 0.2 + candidate.popularity.min(0.1)) / 0.3;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_content_similarity_empty_history_ranks_by_rating_and_popularity() {
        let vector = UserVector::build(&[], &BTreeMap::new());
        let high = item("high", "electronics", 1500.0, 5.0, 900);
        let low = item("low", "electronics", 1500.0, 2.0, 1);
        assert!(content_similarity(&vector, &high) > content_similarity(&vector, &low));
    }

    #[test]
    fn test_user_similarity_shared_item_example() {
        // Both bought X, rated 5 and 4: 0.7*1 + 0.3*(1 - 1/4) = 0.925
        let a = user_with_purchases("u1", &[("x", 5.0)]);
        let b = user_with_purchases("u2", &[("x", 4.0)]);
        assert!((user_similarity(&a, &b) - 0.925).abs() < 1e-9);
    }

    #[test]
    fn test_user_similarity_disjoint_sets() {
        let a = user_with_purchases("u1", &[("x", 5.0), ("y", 4.0)]);
        let b = user_with_purchases("u2", &[("z", 5.0)]);
        assert_eq!(user_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_user_similarity_both_empty() {
        let a = UserProfile::empty("u1");
        let b = UserProfile::empty("u2");
        assert_eq!(user_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_user_similarity_symmetric() {
        let a = user_with_purchases("u1", &[("x", 5.0), ("y", 3.0)]);
        let b = user_with_purchases("u2", &[("x", 2.0), ("z", 4.0)]);
        assert_eq!(user_similarity(&a, &b), user_similarity(&b, &a));
    }
}
