use std::sync::Arc;
use std::time::Duration;

use menu_engine::cache::TreeCache;
use menu_engine::entity::memory::InMemoryEntityStore;
use menu_engine::entity::seed::{SeedData, SeedIndex, SeedOptions};
use menu_engine::registry::{FeatureManifest, FeatureRegistry};
use menu_engine::services::MenuService;

// One dashboard (D1) with a workspace (W1), a flat menu plus a global Help
// item, and explicit permission rows on Settings. Mirrors a small tenant as
// the seed path would create it.
pub const SEED: &str = r#"
users: [u1, u2]
roles: [admin]
dashboards:
  - name: D1
    owner: u1
    workspaces:
      - name: W1
menus:
  - title: Overview
    target: overview
  - title: Tasks
    target: tasks
  - title: Settings
    target: settings
  - title: Billing
    target: billing
  - title: Help
    target: help
    global: true
usages:
  - { menu: Overview, dashboard: D1, order: 0 }
  - { menu: Tasks, dashboard: D1, order: 1 }
  - { menu: Settings, dashboard: D1, order: 2 }
  - { menu: Billing, dashboard: D1, order: 3 }
  - { menu: Help, dashboard: D1, order: 4 }
  - { menu: Overview, dashboard: D1, workspace: W1, order: 0 }
permissions:
  - { menu: Settings, user: u1, type: none }
  - { menu: Settings, role: admin, type: full }
"#;

pub struct TestEnv {
    pub store: Arc<InMemoryEntityStore>,
    pub index: SeedIndex,
    pub service: MenuService,
}

pub fn registry() -> FeatureRegistry {
    FeatureRegistry::from_manifests(
        vec![
            FeatureManifest::new("Overview", "overview"),
            FeatureManifest::new("Settings", "settings"),
            FeatureManifest::new("Help", "help"),
        ],
        vec![
            // Deliberately shadows the static overview slug
            FeatureManifest::new("Overview plugin", "overview").dynamic(),
            FeatureManifest::new("Tasks", "tasks").dynamic(),
        ],
    )
    .expect("test registry")
}

pub async fn env() -> anyhow::Result<TestEnv> {
    env_with(&SeedOptions::default()).await
}

pub async fn env_with(options: &SeedOptions) -> anyhow::Result<TestEnv> {
    let store = Arc::new(InMemoryEntityStore::new());
    let seed = SeedData::from_yaml(SEED)?;
    let index = seed.apply_with(&store, options).await?;
    let service = MenuService::with_cache(
        store.clone(),
        Arc::new(registry()),
        TreeCache::new(Duration::from_secs(60)),
    );
    Ok(TestEnv { store, index, service })
}
