//! SmartStore Recommendation Engine - Configuration Module
//!
//! Engine-level settings (cache TTL, sweep interval, capacity) and the
//! per-request options that select a ranking strategy and bound the result
//! list. Request options default to the engine configuration and can be
//! overridden call by call.

use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub enabled: bool,
    /// Default result list bound for requests that do not override it
    pub max_recommendations: usize,
    /// Default similarity cutoff for requests that do not override it
    pub min_similarity: f64,
    /// Recommendation cache entry lifetime
    pub cache_ttl_seconds: u64,
    /// Period of the background cache sweep
    pub sweep_interval_seconds: u64,
    /// Soft bound on cached entries before expired ones are pruned on insert
    pub cache_size: usize,
    pub enable_content_based: bool,
    pub enable_collaborative: bool,
    pub enable_hybrid: bool,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_recommendations: 10,
            min_similarity: 0.1,
            cache_ttl_seconds: 300,
            sweep_interval_seconds: 300,
            cache_size: 1000,
            enable_content_based: true,
            enable_collaborative: true,
            enable_hybrid: true,
        }
    }
}

/// Per-request recommendation options
///
/// The options fingerprint is part of the cache key, so two requests with
/// equal options share a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOptions {
    pub max_recommendations: usize,
    pub min_similarity: f64,
    pub enable_content_based: bool,
    pub enable_collaborative: bool,
    pub enable_hybrid: bool,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self::from(&RecommendationConfig::default())
    }
}

impl From<&RecommendationConfig> for RecommendationOptions {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            max_recommendations: config.max_recommendations,
            min_similarity: config.min_similarity,
            enable_content_based: config.enable_content_based,
            enable_collaborative: config.enable_collaborative,
            enable_hybrid: config.enable_hybrid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RecommendationConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_recommendations, 10);
        assert_eq!(config.min_similarity, 0.1);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.sweep_interval_seconds, 300);
        assert!(config.enable_content_based);
        assert!(config.enable_collaborative);
        assert!(config.enable_hybrid);
    }

    #[test]
    fn test_options_follow_config() {
        let config = RecommendationConfig {
            max_recommendations: 5,
            min_similarity: 0.25,
            enable_hybrid: false,
            ..Default::default()
        };
        let options = RecommendationOptions::from(&config);
        assert_eq!(options.max_recommendations, 5);
        assert_eq!(options.min_similarity, 0.25);
        assert!(options.enable_content_based);
        assert!(options.enable_collaborative);
        assert!(!options.enable_hybrid);
    }

    #[test]
    fn test_options_serialization_is_stable() {
        let options = RecommendationOptions::default();
        let a = serde_json::to_string(&options).unwrap();
        let b = serde_json::to_string(&options.clone()).unwrap();
        assert_eq!(a, b);
    }
}
