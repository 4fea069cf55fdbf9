use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::entity::memory::InMemoryEntityStore;
use crate::entity::models::{
    Dashboard, MenuItem, MenuItemKind, MenuPermission, MenuUsage, PermissionType, Workspace,
};
use crate::entity::store::StoreError;

/// Declarative seed file for the in-memory store. Entities are referenced by
/// name; ids are assigned at apply time and reported back via `SeedIndex`.
///
/// Rows that violate an invariant (duplicate usage, unknown name, ambiguous
/// permission subject) are skipped with a warning, never a hard failure —
/// seed input is exactly the path the engine must survive in degraded form.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub dashboards: Vec<SeedDashboard>,
    #[serde(default)]
    pub menus: Vec<SeedMenu>,
    #[serde(default)]
    pub usages: Vec<SeedUsage>,
    #[serde(default)]
    pub permissions: Vec<SeedPermission>,
}

#[derive(Debug, Deserialize)]
pub struct SeedDashboard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// User name from `users`; a fresh id is minted when absent.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub workspaces: Vec<SeedWorkspace>,
}

#[derive(Debug, Deserialize)]
pub struct SeedWorkspace {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedMenu {
    pub title: String,
    #[serde(default)]
    pub kind: MenuItemKind,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub children: Vec<SeedMenu>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUsage {
    pub menu: String,
    pub dashboard: String,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct SeedPermission {
    pub menu: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub permission_type: PermissionType,
}

/// Options controlling seed application. `from_config` follows the
/// `SEED_GRANT_FULL_ACCESS` convenience flag.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    /// Grant every seeded user `full` on every seeded menu.
    pub grant_full_access: bool,
}

impl SeedOptions {
    pub fn from_config() -> Self {
        Self { grant_full_access: CONFIG.seed.grant_full_access }
    }
}

/// Name-to-id mapping produced by a seed run, so callers can address the
/// entities they just created.
#[derive(Debug, Default)]
pub struct SeedIndex {
    users: HashMap<String, Uuid>,
    roles: HashMap<String, Uuid>,
    dashboards: HashMap<String, Uuid>,
    workspaces: HashMap<String, Uuid>,
    menus: HashMap<String, Uuid>,
}

impl SeedIndex {
    pub fn user(&self, name: &str) -> Option<Uuid> {
        self.users.get(name).copied()
    }

    pub fn role(&self, name: &str) -> Option<Uuid> {
        self.roles.get(name).copied()
    }

    pub fn dashboard(&self, name: &str) -> Option<Uuid> {
        self.dashboards.get(name).copied()
    }

    pub fn workspace(&self, dashboard: &str, name: &str) -> Option<Uuid> {
        self.workspaces.get(&workspace_key(dashboard, name)).copied()
    }

    pub fn menu(&self, title: &str) -> Option<Uuid> {
        self.menus.get(title).copied()
    }
}

fn workspace_key(dashboard: &str, workspace: &str) -> String {
    format!("{}/{}", dashboard, workspace)
}

impl SeedData {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply with the config-selected options.
    pub async fn apply(&self, store: &InMemoryEntityStore) -> Result<SeedIndex, StoreError> {
        self.apply_with(store, &SeedOptions::from_config()).await
    }

    pub async fn apply_with(
        &self,
        store: &InMemoryEntityStore,
        options: &SeedOptions,
    ) -> Result<SeedIndex, StoreError> {
        let mut index = SeedIndex::default();

        for name in &self.users {
            index.users.entry(name.clone()).or_insert_with(Uuid::new_v4);
        }
        for name in &self.roles {
            index.roles.entry(name.clone()).or_insert_with(Uuid::new_v4);
        }

        for dashboard in &self.dashboards {
            if index.dashboards.contains_key(&dashboard.name) {
                tracing::warn!("seed: skipping duplicate dashboard '{}'", dashboard.name);
                continue;
            }
            let owner_id = dashboard
                .owner
                .as_ref()
                .and_then(|name| index.user(name))
                .unwrap_or_else(Uuid::new_v4);
            let mut entity = Dashboard::new(&dashboard.name, owner_id);
            entity.description = dashboard.description.clone();
            let dashboard_id = store.insert_dashboard(entity).await?;
            index.dashboards.insert(dashboard.name.clone(), dashboard_id);
            for workspace in &dashboard.workspaces {
                let mut entity = Workspace::new(&workspace.name, dashboard_id);
                entity.description = workspace.description.clone();
                match store.insert_workspace(entity).await {
                    Ok(id) => {
                        index
                            .workspaces
                            .insert(workspace_key(&dashboard.name, &workspace.name), id);
                    }
                    Err(StoreError::Duplicate { detail, .. }) => {
                        tracing::warn!("seed: skipping duplicate workspace '{}'", detail);
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        for menu in &self.menus {
            self.apply_menu(store, menu, None, &mut index).await?;
        }

        for usage in &self.usages {
            let Some(menu_id) = index.menu(&usage.menu) else {
                tracing::warn!("seed: usage references unknown menu '{}'", usage.menu);
                continue;
            };
            let Some(dashboard_id) = index.dashboard(&usage.dashboard) else {
                tracing::warn!("seed: usage references unknown dashboard '{}'", usage.dashboard);
                continue;
            };
            let mut entity = MenuUsage::new(menu_id, dashboard_id, usage.order);
            if let Some(workspace) = &usage.workspace {
                match index.workspace(&usage.dashboard, workspace) {
                    Some(workspace_id) => entity = entity.in_workspace(workspace_id),
                    None => {
                        tracing::warn!(
                            "seed: usage references unknown workspace '{}/{}'",
                            usage.dashboard,
                            workspace
                        );
                        continue;
                    }
                }
            }
            match store.insert_menu_usage(entity).await {
                Ok(_) => {}
                Err(StoreError::Duplicate { detail, .. }) => {
                    tracing::warn!("seed: skipping duplicate usage '{}'", detail);
                }
                Err(other) => return Err(other),
            }
        }

        for permission in &self.permissions {
            let Some(menu_id) = index.menu(&permission.menu) else {
                tracing::warn!("seed: permission references unknown menu '{}'", permission.menu);
                continue;
            };
            let entity = match (&permission.user, &permission.role) {
                (Some(user), None) => match index.user(user) {
                    Some(user_id) => {
                        MenuPermission::for_user(menu_id, user_id, permission.permission_type)
                    }
                    None => {
                        tracing::warn!("seed: permission references unknown user '{}'", user);
                        continue;
                    }
                },
                (None, Some(role)) => match index.role(role) {
                    Some(role_id) => {
                        MenuPermission::for_role(menu_id, role_id, permission.permission_type)
                    }
                    None => {
                        tracing::warn!("seed: permission references unknown role '{}'", role);
                        continue;
                    }
                },
                _ => {
                    tracing::warn!(
                        "seed: permission on '{}' must name exactly one of user/role",
                        permission.menu
                    );
                    continue;
                }
            };
            match store.insert_menu_permission(entity).await {
                Ok(_) => {}
                Err(StoreError::Duplicate { detail, .. }) => {
                    tracing::warn!("seed: skipping duplicate permission '{}'", detail);
                }
                Err(other) => return Err(other),
            }
        }

        if options.grant_full_access {
            self.grant_full_access(store, &index).await?;
        }

        Ok(index)
    }

    fn apply_menu<'a>(
        &'a self,
        store: &'a InMemoryEntityStore,
        menu: &'a SeedMenu,
        parent_id: Option<Uuid>,
        index: &'a mut SeedIndex,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut entity = MenuItem::new(&menu.title);
            entity.kind = menu.kind;
            entity.icon = menu.icon.clone();
            entity.target = menu.target.clone();
            entity.parent_id = parent_id;
            entity.global_context = menu.global;
            let id = match store.insert_menu_item(entity).await {
                Ok(id) => id,
                Err(StoreError::Duplicate { detail, .. }) => {
                    tracing::warn!("seed: skipping duplicate menu item '{}'", detail);
                    return Ok(());
                }
                Err(other) => return Err(other),
            };
            // Titles index the seed file; on collision the first one wins.
            if index.menus.contains_key(&menu.title) {
                tracing::warn!("seed: menu title '{}' is ambiguous for references", menu.title);
            } else {
                index.menus.insert(menu.title.clone(), id);
            }
            for child in &menu.children {
                self.apply_menu(store, child, Some(id), index).await?;
            }
            Ok(())
        })
    }

    async fn grant_full_access(
        &self,
        store: &InMemoryEntityStore,
        index: &SeedIndex,
    ) -> Result<(), StoreError> {
        for user_id in index.users.values() {
            for menu_id in index.menus.values() {
                let grant = MenuPermission::for_user(*menu_id, *user_id, PermissionType::Full);
                match store.insert_menu_permission(grant).await {
                    Ok(_) | Err(StoreError::Duplicate { .. }) => {}
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(())
    }
}
