//! SmartStore Recommendation Engine - Result Cache
//!
//! TTL'd cache of ranked recommendation lists. Keys are a deterministic
//! fingerprint of user id and request options only; the entry timestamp is
//! cache metadata used for the TTL check, never part of the key. Expired
//! entries are treated as absent on lookup and evicted by the periodic sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::RecommendationOptions;
use crate::engine::Recommendation;

struct CacheEntry {
    recommendations: Vec<Recommendation>,
    stored_at: Instant,
}

/// Recommendation result cache
pub struct RecommendationCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl RecommendationCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Deterministic cache key for a `(user, options)` request
    pub fn key(user_id: &str, options: &RecommendationOptions) -> String {
        let fingerprint = md5::compute(format!("{:?}", options));
        format!("rec_{}_{:x}", user_id, fingerprint)
    }

    /// Cached result, or `None` if absent or past the TTL
    pub fn get(&self, key: &str) -> Option<Vec<Recommendation>> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.recommendations.clone())
        } else {
            None
        }
    }

    /// Store a result, overwriting any prior entry for the key
    pub fn put(&mut self, key: String, recommendations: Vec<Recommendation>) {
        self.entries.insert(
            key,
            CacheEntry {
                recommendations,
                stored_at: Instant::now(),
            },
        );

        // Prune expired entries once the map outgrows its soft bound
        if self.entries.len() > self.capacity {
            let ttl = self.ttl;
            self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        }
    }

    /// Drop every cached result for one user
    pub fn invalidate_user(&mut self, user_id: &str) {
        let prefix = format!("rec_{}_", user_id);
        self.entries.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Evict entries past the TTL, returning how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
