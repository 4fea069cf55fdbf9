use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::tree::MenuForest;
use crate::types::Scope;

struct CacheSlot {
    inserted_at: Instant,
    cell: Arc<OnceCell<Arc<MenuForest>>>,
}

impl CacheSlot {
    fn new() -> Self {
        Self { inserted_at: Instant::now(), cell: Arc::new(OnceCell::new()) }
    }
}

/// Read-through cache for unfiltered menu forests, keyed by scope.
///
/// At most one rebuild runs per key: concurrent callers await the in-flight
/// build through the slot's `OnceCell`. The cell is only written after a
/// full successful build, so a cancelled or failed builder leaves no partial
/// state; the next caller re-runs the build. Filtered results are never
/// cached here — filtering is per-principal and re-runs on every request.
pub struct TreeCache {
    enabled: bool,
    ttl: Duration,
    entries: DashMap<Scope, CacheSlot>,
}

impl TreeCache {
    pub fn new(ttl: Duration) -> Self {
        Self { enabled: true, ttl, entries: DashMap::new() }
    }

    /// TTL and enablement from the config singleton.
    pub fn from_config() -> Self {
        Self {
            enabled: CONFIG.cache.enabled,
            ttl: Duration::from_secs(CONFIG.cache.ttl_secs),
            entries: DashMap::new(),
        }
    }

    /// A cache that always rebuilds. Useful for tests and write-heavy
    /// embedders.
    pub fn disabled() -> Self {
        Self { enabled: false, ttl: Duration::ZERO, entries: DashMap::new() }
    }

    pub async fn get_or_build<F, Fut, E>(&self, scope: Scope, build: F) -> Result<Arc<MenuForest>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MenuForest, E>>,
    {
        if !self.enabled {
            return Ok(Arc::new(build().await?));
        }

        let cell = {
            let mut slot = self.entries.entry(scope).or_insert_with(CacheSlot::new);
            // Only a completed slot can expire; an in-flight build keeps its
            // slot so waiters converge on one rebuild.
            if slot.cell.initialized() && slot.inserted_at.elapsed() >= self.ttl {
                tracing::debug!(%scope, "menu tree cache entry expired");
                *slot = CacheSlot::new();
            }
            slot.cell.clone()
            // guard dropped here; the build must not run under the map lock
        };

        let forest = cell
            .get_or_try_init(|| async { Ok(Arc::new(build().await?)) })
            .await?;
        Ok(forest.clone())
    }

    /// Drop a single scope, e.g. after a write to its usages.
    pub fn invalidate(&self, scope: Scope) {
        self.entries.remove(&scope);
    }

    /// Drop every scope under a dashboard. Menu item writes affect all of
    /// its workspace views, not just one scope.
    pub fn invalidate_dashboard(&self, dashboard_id: Uuid) {
        self.entries.retain(|scope, _| scope.dashboard_id != dashboard_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
