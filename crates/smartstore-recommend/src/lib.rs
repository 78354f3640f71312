//! SmartStore Recommendation Engine
//!
//! This crate provides the personalized recommendation scorer for the
//! SmartStore storefront. It builds per-user and per-item feature vectors
//! from a catalog snapshot, blends content-based and collaborative filtering
//! to rank items a user has not yet purchased, and caches ranked results
//! within a TTL window.

pub mod cache;
pub mod config;
pub mod engine;
pub mod profile;
pub mod similarity;

/// Re-exports commonly used types
pub mod prelude {
    pub use super::config::{RecommendationConfig, RecommendationOptions};
    pub use super::engine::{
        Recommendation, RecommendationEngine, RecommendationSource, RecommendationStats,
    };
    pub use super::profile::{ItemProfile, UserProfile};
}

pub use config::{RecommendationConfig, RecommendationOptions};
pub use engine::{Recommendation, RecommendationEngine, RecommendationSource};
