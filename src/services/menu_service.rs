use std::sync::Arc;
use uuid::Uuid;

use crate::cache::TreeCache;
use crate::entity::store::EntityStore;
use crate::error::EngineError;
use crate::permission::{filter_forest, GrantIndex, Principal};
use crate::registry::FeatureRegistry;
use crate::resolver::{resolve_forest, ResolvedForest};
use crate::tree::{build_menu_tree, MenuForest};
use crate::types::Scope;

/// Composes the resolution pipeline: fetch → build (through the cache) →
/// resolve → filter. One instance serves many concurrent requests; each
/// call is an independent, stateless run apart from the shared tree cache.
pub struct MenuService {
    store: Arc<dyn EntityStore>,
    registry: Arc<FeatureRegistry>,
    cache: TreeCache,
}

impl MenuService {
    pub fn new(store: Arc<dyn EntityStore>, registry: Arc<FeatureRegistry>) -> Self {
        Self { store, registry, cache: TreeCache::from_config() }
    }

    pub fn with_cache(
        store: Arc<dyn EntityStore>,
        registry: Arc<FeatureRegistry>,
        cache: TreeCache,
    ) -> Self {
        Self { store, registry, cache }
    }

    /// The pruned, resolved, ordered forest for one principal. Permission
    /// filtering always runs against fresh grant rows; only the unfiltered
    /// tree is served from the cache.
    pub async fn menu_for(
        &self,
        scope: Scope,
        principal: &Principal,
    ) -> Result<ResolvedForest, EngineError> {
        let forest = self.unfiltered_tree(scope).await?;
        let resolved = resolve_forest(&self.registry, &forest);

        let menu_ids = forest.menu_ids();
        let rows = self.store.list_menu_permissions(&menu_ids).await?;
        let grants = GrantIndex::from_rows(rows);

        Ok(filter_forest(&resolved, principal, &grants))
    }

    /// The cached, unfiltered tree for a scope.
    pub async fn unfiltered_tree(&self, scope: Scope) -> Result<Arc<MenuForest>, EngineError> {
        let store = self.store.clone();
        let forest = self
            .cache
            .get_or_build(scope, || async move { build_menu_tree(store.as_ref(), scope).await })
            .await?;
        Ok(forest)
    }

    /// Call after any write to the scope's usages.
    pub fn invalidate(&self, scope: Scope) {
        self.cache.invalidate(scope);
    }

    /// Call after any menu item write under the dashboard; item changes are
    /// visible in every workspace view.
    pub fn invalidate_dashboard(&self, dashboard_id: Uuid) {
        self.cache.invalidate_dashboard(dashboard_id);
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }
}
