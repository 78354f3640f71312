// =============================================================================
// SmartStore - Recommendation Engine Module
// =============================================================================
//
// Description:
//   Ranks catalog items a user has not yet purchased using content-based
//   filtering, collaborative filtering, or a hybrid blend of both. Profiles
//   are built from a catalog snapshot and updated incrementally from catalog
//   events; ranked results are cached within a TTL window and invalidated on
//   profile changes.
//
// Features:
//   • Content-based scoring against the user's derived feature vector
//   • Collaborative scoring from the top similar users' purchases
//   • Hybrid 60/40 blend with per-item source attribution
//   • TTL'd result cache with deterministic request fingerprints
//   • Periodic background cache sweep
//
// =============================================================================

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{sync::RwLock, task::JoinHandle, time::interval};
use tracing::{debug, info, instrument};

use smartstore_catalog::{
    BehaviorEvent, CatalogObserver, CatalogStore, ItemUpdate, Product, UserRecord,
};
use smartstore_common::{Result, SmartStoreError};

use crate::{
    cache::RecommendationCache,
    config::{RecommendationConfig, RecommendationOptions},
    profile::{ItemProfile, UserProfile, UserVector},
    similarity::{content_similarity, user_similarity},
};

/// How many of the most similar users feed collaborative scoring
const MAX_SIMILAR_USERS: usize = 10;

/// Hybrid blend weight for content-based contributions
const CONTENT_WEIGHT: f64 = 0.6;

/// Hybrid blend weight for collaborative contributions
const COLLABORATIVE_WEIGHT: f64 = 0.4;

/// Which strategy produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationSource {
    ContentBased,
    Collaborative,
}

/// A single ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: String,
    pub score: f64,
    pub reason: String,
    pub sources: Vec<RecommendationSource>,
}

/// Request counters, updated on every query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub empty_results: u64,
    pub strategy_usage: HashMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    ContentBased,
    Collaborative,
    Hybrid,
}

impl Strategy {
    /// Hybrid requires all three flags; otherwise the single enabled
    /// strategy wins; no flags means no strategy, never a silent default.
    fn select(options: &RecommendationOptions) -> Option<Self> {
        if options.enable_hybrid && options.enable_content_based && options.enable_collaborative {
            Some(Self::Hybrid)
        } else if options.enable_content_based {
            Some(Self::ContentBased)
        } else if options.enable_collaborative {
            Some(Self::Collaborative)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::ContentBased => "content-based",
            Self::Collaborative => "collaborative",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Recommendation engine service
///
/// Constructed once at startup and shared by handle; state lives behind
/// async RwLocks because the periodic cache sweep runs concurrently with
/// query handling.
pub struct RecommendationEngine {
    config: RecommendationConfig,

    /// User profiles, keyed by user id (ordered for deterministic iteration)
    user_profiles: Arc<RwLock<BTreeMap<String, UserProfile>>>,

    /// Item profiles, keyed by item id (ordered for deterministic iteration)
    item_profiles: Arc<RwLock<BTreeMap<String, ItemProfile>>>,

    /// user id -> (other user id -> similarity)
    similarity_cache: Arc<RwLock<HashMap<String, HashMap<String, f64>>>>,

    /// Ranked result cache
    cache: Arc<RwLock<RecommendationCache>>,

    /// Request statistics
    stats: Arc<RwLock<RecommendationStats>>,
}

impl RecommendationEngine {
    /// Create an engine with empty profile maps
    pub fn new(config: RecommendationConfig) -> Result<Self> {
        if config.cache_ttl_seconds == 0 {
            return Err(SmartStoreError::Config(
                "cache_ttl_seconds must be positive".to_string(),
            ));
        }
        if config.sweep_interval_seconds == 0 {
            return Err(SmartStoreError::Config(
                "sweep_interval_seconds must be positive".to_string(),
            ));
        }

        info!("🔧 Initializing recommendation engine");
        let ttl = Duration::from_secs(config.cache_ttl_seconds);
        let capacity = config.cache_size;
        Ok(Self {
            config,
            user_profiles: Arc::new(RwLock::new(BTreeMap::new())),
            item_profiles: Arc::new(RwLock::new(BTreeMap::new())),
            similarity_cache: Arc::new(RwLock::new(HashMap::new())),
            cache: Arc::new(RwLock::new(RecommendationCache::new(ttl, capacity))),
            stats: Arc::new(RwLock::new(RecommendationStats::default())),
        })
    }

    /// Create an engine and load a full snapshot from the catalog
    pub async fn from_store(config: RecommendationConfig, store: &CatalogStore) -> Result<Self> {
        let engine = Self::new(config)?;
        engine.load_snapshot(store).await;
        Ok(engine)
    }

    /// Replace all profiles with a full catalog snapshot
    #[instrument(level = "debug", skip(self, store))]
    pub async fn load_snapshot(&self, store: &CatalogStore) {
        let products = store.list_items().await;
        let users = store.list_users().await;
        self.load_records(&products, &users).await;
    }

    /// Replace all profiles from raw records
    ///
    /// Item profiles are built first so user vectors can resolve purchased
    /// items' categories and prices. All caches are dropped.
    pub async fn load_records(&self, products: &[Product], users: &[UserRecord]) {
        {
            let mut user_profiles = self.user_profiles.write().await;
            let mut item_profiles = self.item_profiles.write().await;

            item_profiles.clear();
            for product in products {
                item_profiles.insert(product.id.clone(), ItemProfile::build(product));
            }

            user_profiles.clear();
            for record in users {
                user_profiles.insert(record.id.clone(), UserProfile::build(record, &item_profiles));
            }
        }

        self.similarity_cache.write().await.clear();
        self.cache.write().await.clear();

        info!(
            "✅ Loaded catalog snapshot: {} items, {} users",
            products.len(),
            users.len()
        );
    }

    /// Ranked recommendations for a user
    ///
    /// Returns an empty list for unknown users, when no strategy is enabled,
    /// or when the engine is disabled - an empty list is a valid non-error
    /// state for consumers.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn get_recommendations(
        &self,
        user_id: &str,
        options: &RecommendationOptions,
    ) -> Vec<Recommendation> {
        if !self.config.enabled {
            debug!("Recommendation engine is disabled");
            return Vec::new();
        }

        self.stats.write().await.total_requests += 1;

        let key = RecommendationCache::key(user_id, options);
        if let Some(cached) = self.cache.read().await.get(&key) {
            debug!("📋 Returning cached recommendations for {}", user_id);
            self.stats.write().await.cache_hits += 1;
            return cached;
        }

        let strategy = Strategy::select(options);
        let recommendations = match strategy {
            Some(Strategy::Hybrid) => self.hybrid(user_id, options).await,
            Some(Strategy::ContentBased) => self.content_based(user_id, options).await,
            Some(Strategy::Collaborative) => self.collaborative(user_id, options).await,
            None => {
                debug!("No recommendation strategy enabled");
                Vec::new()
            }
        };

        {
            let mut stats = self.stats.write().await;
            if let Some(strategy) = strategy {
                *stats.strategy_usage.entry(strategy.name().to_string()).or_insert(0) += 1;
            }
            if recommendations.is_empty() {
                stats.empty_results += 1;
            }
        }

        self.cache.write().await.put(key, recommendations.clone());

        debug!(
            "✅ Generated {} recommendations for {}",
            recommendations.len(),
            user_id
        );
        recommendations
    }

    /// Content-based ranking: score every unpurchased item against the
    /// user's vector, keep scores strictly above the cutoff.
    async fn content_based(
        &self,
        user_id: &str,
        options: &RecommendationOptions,
    ) -> Vec<Recommendation> {
        debug!("📝 Generating content-based recommendations");

        let users = self.user_profiles.read().await;
        let Some(profile) = users.get(user_id) else {
            return Vec::new();
        };

        let items = self.item_profiles.read().await;
        let mut recommendations = Vec::new();
        for (item_id, item) in items.iter() {
            if profile.has_purchased(item_id) {
                continue;
            }

            let score = content_similarity(&profile.vector, item);
            if score > options.min_similarity {
                recommendations.push(Recommendation {
                    item_id: item_id.clone(),
                    score,
                    reason: content_reason(&profile.vector, item),
                    sources: vec![RecommendationSource::ContentBased],
                });
            }
        }

        sort_ranked(&mut recommendations);
        recommendations.truncate(options.max_recommendations);
        recommendations
    }

    /// Collaborative ranking: accumulate `similarity × rating` over the
    /// purchases of the top similar users.
    ///
    /// Contributions from multiple similar users who bought the same item
    /// are summed without normalizing by contributor count.
    async fn collaborative(
        &self,
        user_id: &str,
        options: &RecommendationOptions,
    ) -> Vec<Recommendation> {
        debug!("🤝 Generating collaborative recommendations");

        let similarities = self.user_similarities(user_id).await;
        let mut ranked: Vec<(String, f64)> = similarities.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let users = self.user_profiles.read().await;
        let Some(target) = users.get(user_id) else {
            return Vec::new();
        };

        let mut accumulated: BTreeMap<String, Recommendation> = BTreeMap::new();
        for (other_id, similarity) in ranked.into_iter().take(MAX_SIMILAR_USERS) {
            if similarity < options.min_similarity {
                continue;
            }
            let Some(other) = users.get(&other_id) else {
                continue;
            };

            for purchase in &other.purchases {
                if target.has_purchased(&purchase.item_id) {
                    continue;
                }
                let contribution = similarity * purchase.rating;
                accumulated
                    .entry(purchase.item_id.clone())
                    .and_modify(|rec| rec.score += contribution)
                    .or_insert_with(|| Recommendation {
                        item_id: purchase.item_id.clone(),
                        score: contribution,
                        reason: collaborative_reason(similarity),
                        sources: vec![RecommendationSource::Collaborative],
                    });
            }
        }

        let mut recommendations: Vec<Recommendation> = accumulated.into_values().collect();
        sort_ranked(&mut recommendations);
        recommendations.truncate(options.max_recommendations);
        recommendations
    }

    /// Hybrid ranking: 0.6 × content-based + 0.4 × collaborative, merged by
    /// item id with source attribution.
    async fn hybrid(&self, user_id: &str, options: &RecommendationOptions) -> Vec<Recommendation> {
        debug!("🔀 Generating hybrid recommendations");

        let content = self.content_based(user_id, options).await;
        let collaborative = self.collaborative(user_id, options).await;

        let mut merged: BTreeMap<String, Recommendation> = BTreeMap::new();
        for mut rec in content {
            rec.score *= CONTENT_WEIGHT;
            merged.insert(rec.item_id.clone(), rec);
        }
        for mut rec in collaborative {
            match merged.get_mut(&rec.item_id) {
                Some(existing) => {
                    existing.score += rec.score * COLLABORATIVE_WEIGHT;
                    existing.sources.push(RecommendationSource::Collaborative);
                }
                None => {
                    rec.score *= COLLABORATIVE_WEIGHT;
                    merged.insert(rec.item_id.clone(), rec);
                }
            }
        }

        let mut recommendations: Vec<Recommendation> = merged.into_values().collect();
        sort_ranked(&mut recommendations);
        recommendations.truncate(options.max_recommendations);
        recommendations
    }

    /// Similarity of a user to every other user, memoized until the next
    /// behavior update or cache sweep.
    async fn user_similarities(&self, user_id: &str) -> HashMap<String, f64> {
        if let Some(cached) = self.similarity_cache.read().await.get(user_id) {
            return cached.clone();
        }

        let similarities = {
            let users = self.user_profiles.read().await;
            let Some(profile) = users.get(user_id) else {
                return HashMap::new();
            };
            users
                .iter()
                .filter(|(other_id, _)| other_id.as_str() != user_id)
                .map(|(other_id, other)| (other_id.clone(), user_similarity(profile, other)))
                .collect::<HashMap<String, f64>>()
        };

        self.similarity_cache
            .write()
            .await
            .insert(user_id.to_string(), similarities.clone());
        similarities
    }

    /// Record a purchase behavior: updates the user's profile (creating one
    /// for first-time users), rebuilds the derived vector and invalidates
    /// that user's cached similarities and recommendations.
    #[instrument(level = "debug", skip(self, event))]
    pub async fn record_behavior(&self, event: BehaviorEvent) {
        {
            let mut users = self.user_profiles.write().await;
            let items = self.item_profiles.read().await;
            let profile = users
                .entry(event.user_id.clone())
                .or_insert_with(|| UserProfile::empty(&event.user_id));
            profile.record_purchase(&event.item_id, event.timestamp, event.rating, &items);
        }

        self.similarity_cache.write().await.remove(&event.user_id);
        self.cache.write().await.invalidate_user(&event.user_id);

        debug!("🔄 Updated profile and invalidated caches for {}", event.user_id);
    }

    /// Apply an item feature update: rebuilds the item's derived vector and
    /// conservatively clears the whole recommendation cache, since item
    /// features feed every content score.
    #[instrument(level = "debug", skip(self, update))]
    pub async fn apply_item_update(&self, update: ItemUpdate) {
        {
            let mut items = self.item_profiles.write().await;
            match items.get_mut(&update.item_id) {
                Some(profile) => profile.apply_update(&update),
                None => {
                    debug!("Item update for unknown item {}", update.item_id);
                    return;
                }
            }
        }

        self.cache.write().await.clear();
        debug!("🔄 Rebuilt item profile {} and cleared result cache", update.item_id);
    }

    /// Evict expired recommendation entries and drop all cached similarities
    pub async fn sweep_caches(&self) {
        let evicted = self.cache.write().await.sweep();
        self.similarity_cache.write().await.clear();
        debug!("🧹 Cache sweep evicted {} expired entries", evicted);
    }

    /// Spawn the periodic cache sweep
    pub fn start_sweep_task(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let period = Duration::from_secs(engine.config.sweep_interval_seconds);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                engine.sweep_caches().await;
            }
        })
    }

    /// Snapshot of the request counters
    pub async fn stats(&self) -> RecommendationStats {
        self.stats.read().await.clone()
    }
}

#[async_trait]
impl CatalogObserver for RecommendationEngine {
    async fn behavior_updated(&self, event: BehaviorEvent) {
        self.record_behavior(event).await;
    }

    async fn item_updated(&self, update: ItemUpdate) {
        self.apply_item_update(update).await;
    }
}

/// Descending by score; ties broken by item id so rankings are stable
/// between calls over the same snapshot.
fn sort_ranked(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
}

/// Comma-joined list of the content signals that fired
fn content_reason(vector: &UserVector, item: &ItemProfile) -> String {
    let mut reasons = Vec::new();
    if vector.categories.contains_key(&item.features.category) {
        reasons.push("matches your category preference");
    }
    if vector.price_in_range(item.features.price) {
        reasons.push("within your price preference");
    }
    if item.features.rating >= 4.0 {
        reasons.push("highly rated item");
    }
    reasons.join(", ")
}

fn collaborative_reason(similarity: f64) -> String {
    format!(
        "users with {}% similar shopping habits also liked this",
        (similarity * 100.0).round() as i64
    )
}
