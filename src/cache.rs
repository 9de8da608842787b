//! In-memory caching using moka
//!
//! Holds the ordered pricing-rule snapshot read by every quote. Admin writes
//! invalidate it, so the TTL only bounds staleness from out-of-band edits.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::PricingRule;
use crate::pricing::services;

/// Application cache holding the pricing rule snapshot
#[derive(Clone)]
pub struct AppCache {
    /// Pricing rules in evaluation order (singleton)
    pub pricing_rules: Cache<String, Arc<Vec<PricingRule>>>,
    /// Bumped on every invalidation; loads started under an older value are not cached
    generation: Arc<AtomicU64>,
}

impl AppCache {
    pub const RULES_KEY: &'static str = "pricing_rules";

    /// Create a new cache instance with the given snapshot TTL
    pub fn new(rules_ttl: Duration) -> Self {
        Self {
            pricing_rules: Cache::builder()
                .max_capacity(1)
                .time_to_live(rules_ttl)
                .build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current invalidation generation, read before loading rules
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cache a snapshot loaded under `generation`.
    ///
    /// Returns false without caching when an invalidation happened
    /// after the load started.
    pub async fn insert_pricing_rules(&self, generation: u64, rules: Arc<Vec<PricingRule>>) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.pricing_rules
            .insert(Self::RULES_KEY.to_string(), rules)
            .await;
        // An invalidation between the check and the insert must still win.
        if self.generation() != generation {
            self.pricing_rules.invalidate(Self::RULES_KEY).await;
            return false;
        }
        true
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pricing_rules_cached: self.pricing_rules.entry_count() > 0,
        }
    }

    /// Drop the rule snapshot so the next quote reloads it
    pub async fn invalidate_pricing_rules(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.pricing_rules.invalidate(Self::RULES_KEY).await;
        info!("Pricing rule cache invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pricing_rules_cached: bool,
}

/// Start background cache warmer
///
/// Loads the rule snapshot on startup and refreshes it every `every`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, every: Duration) {
    let mut interval = interval(every);
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

async fn warm_cache(cache: &AppCache, db: &PgPool) {
    cache.pricing_rules.invalidate(AppCache::RULES_KEY).await;
    match services::load_rule_snapshot(db, cache).await {
        Ok(rules) => info!("Pricing rule cache warmed with {} rules", rules.len()),
        Err(e) => warn!("Failed to warm pricing rule cache: {}", e),
    }
}
