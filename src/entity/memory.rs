use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entity::models::{Dashboard, MenuItem, MenuPermission, MenuUsage, Workspace};
use crate::entity::store::{EntityStore, StoreError};

#[derive(Default)]
struct Inner {
    dashboards: HashMap<Uuid, Dashboard>,
    workspaces: HashMap<Uuid, Workspace>,
    menu_items: HashMap<Uuid, MenuItem>,
    menu_usages: HashMap<Uuid, MenuUsage>,
    menu_permissions: HashMap<Uuid, MenuPermission>,
}

/// Reference `EntityStore` backed by in-process maps. Used by tests, demos
/// and embedders that don't bring their own storage. The write surface
/// enforces the data-model invariants (uniqueness, valid references, no
/// parent cycles, cascade delete); the `*_raw` variants bypass them the way
/// an external import path can, so degraded inputs stay reproducible.
#[derive(Default)]
pub struct InMemoryEntityStore {
    inner: RwLock<Inner>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_dashboard(&self, dashboard: Dashboard) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        let id = dashboard.id;
        inner.dashboards.insert(id, dashboard);
        Ok(id)
    }

    pub async fn insert_workspace(&self, workspace: Workspace) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.dashboards.contains_key(&workspace.dashboard_id) {
            return Err(StoreError::InvalidReference(format!(
                "workspace '{}' references missing dashboard {}",
                workspace.name, workspace.dashboard_id
            )));
        }
        if inner
            .workspaces
            .values()
            .any(|w| w.dashboard_id == workspace.dashboard_id && w.name == workspace.name)
        {
            return Err(StoreError::Duplicate {
                entity: "workspace",
                detail: format!("{} in dashboard {}", workspace.name, workspace.dashboard_id),
            });
        }
        let id = workspace.id;
        inner.workspaces.insert(id, workspace);
        Ok(id)
    }

    pub async fn insert_menu_item(&self, item: MenuItem) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(parent_id) = item.parent_id {
            if !inner.menu_items.contains_key(&parent_id) {
                return Err(StoreError::InvalidReference(format!(
                    "menu item '{}' references missing parent {}",
                    item.title, parent_id
                )));
            }
        }
        if inner
            .menu_items
            .values()
            .any(|m| m.parent_id == item.parent_id && m.title == item.title)
        {
            return Err(StoreError::Duplicate {
                entity: "menu item",
                detail: item.title,
            });
        }
        let id = item.id;
        inner.menu_items.insert(id, item);
        Ok(id)
    }

    /// Insert without reference or uniqueness checks. Import-path escape
    /// hatch; the tree builder is expected to degrade gracefully on whatever
    /// this lets through.
    pub async fn insert_menu_item_raw(&self, item: MenuItem) -> Uuid {
        let id = item.id;
        self.inner.write().await.menu_items.insert(id, item);
        id
    }

    /// Re-parent a menu item. Rejects edges that would close a cycle.
    pub async fn set_menu_item_parent(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.menu_items.contains_key(&id) {
            return Err(StoreError::InvalidReference(format!("missing menu item {}", id)));
        }
        if let Some(new_parent) = parent_id {
            // Walk up from the proposed parent; hitting `id` means a cycle.
            let mut cursor = Some(new_parent);
            while let Some(current) = cursor {
                if current == id {
                    return Err(StoreError::InvalidReference(format!(
                        "parent {} would create a cycle through menu item {}",
                        new_parent, id
                    )));
                }
                cursor = match inner.menu_items.get(&current) {
                    Some(item) => item.parent_id,
                    None => {
                        return Err(StoreError::InvalidReference(format!(
                            "missing parent menu item {}",
                            current
                        )))
                    }
                };
            }
        }
        if let Some(item) = inner.menu_items.get_mut(&id) {
            item.parent_id = parent_id;
            item.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    pub async fn insert_menu_usage(&self, usage: MenuUsage) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.dashboards.contains_key(&usage.dashboard_id) {
            return Err(StoreError::InvalidReference(format!(
                "usage references missing dashboard {}",
                usage.dashboard_id
            )));
        }
        if let Some(workspace_id) = usage.workspace_id {
            match inner.workspaces.get(&workspace_id) {
                Some(ws) if ws.dashboard_id == usage.dashboard_id => {}
                Some(_) => {
                    return Err(StoreError::InvalidReference(format!(
                        "workspace {} belongs to another dashboard",
                        workspace_id
                    )))
                }
                None => {
                    return Err(StoreError::InvalidReference(format!(
                        "usage references missing workspace {}",
                        workspace_id
                    )))
                }
            }
        }
        if !inner.menu_items.contains_key(&usage.menu_id) {
            return Err(StoreError::InvalidReference(format!(
                "usage references missing menu item {}",
                usage.menu_id
            )));
        }
        if inner.menu_usages.values().any(|u| {
            u.menu_id == usage.menu_id
                && u.dashboard_id == usage.dashboard_id
                && u.workspace_id == usage.workspace_id
        }) {
            return Err(StoreError::Duplicate {
                entity: "menu usage",
                detail: format!("menu {} in scope {:?}", usage.menu_id, usage.workspace_id),
            });
        }
        let id = usage.id;
        inner.menu_usages.insert(id, usage);
        Ok(id)
    }

    /// Insert without the per-scope uniqueness check. Import-path escape
    /// hatch.
    pub async fn insert_menu_usage_raw(&self, usage: MenuUsage) -> Uuid {
        let id = usage.id;
        self.inner.write().await.menu_usages.insert(id, usage);
        id
    }

    pub async fn insert_menu_permission(
        &self,
        permission: MenuPermission,
    ) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.menu_items.contains_key(&permission.menu_id) {
            return Err(StoreError::InvalidReference(format!(
                "permission references missing menu item {}",
                permission.menu_id
            )));
        }
        if inner
            .menu_permissions
            .values()
            .any(|p| p.menu_id == permission.menu_id && p.subject == permission.subject)
        {
            return Err(StoreError::Duplicate {
                entity: "menu permission",
                detail: format!("menu {} subject {:?}", permission.menu_id, permission.subject),
            });
        }
        let id = permission.id;
        inner.menu_permissions.insert(id, permission);
        Ok(id)
    }

    /// Delete a dashboard, cascading to its workspaces and usages.
    /// Permissions are owned by `(menu, subject)` and are left untouched.
    pub async fn remove_dashboard(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.dashboards.remove(&id).is_none() {
            return Err(StoreError::InvalidReference(format!("missing dashboard {}", id)));
        }
        inner.workspaces.retain(|_, w| w.dashboard_id != id);
        inner.menu_usages.retain(|_, u| u.dashboard_id != id);
        Ok(())
    }

    /// Delete a workspace, cascading to its usages.
    pub async fn remove_workspace(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.workspaces.remove(&id).is_none() {
            return Err(StoreError::InvalidReference(format!("missing workspace {}", id)));
        }
        inner.menu_usages.retain(|_, u| u.workspace_id != Some(id));
        Ok(())
    }

    pub async fn remove_menu_usage(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.menu_usages.remove(&id).is_none() {
            return Err(StoreError::InvalidReference(format!("missing menu usage {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get_dashboard(&self, id: Uuid) -> Result<Option<Dashboard>, StoreError> {
        Ok(self.inner.read().await.dashboards.get(&id).cloned())
    }

    async fn get_workspace(&self, id: Uuid) -> Result<Option<Workspace>, StoreError> {
        Ok(self.inner.read().await.workspaces.get(&id).cloned())
    }

    async fn list_menu_usages(
        &self,
        dashboard_id: Uuid,
        workspace_id: Option<Uuid>,
    ) -> Result<Vec<MenuUsage>, StoreError> {
        let inner = self.inner.read().await;
        let mut usages: Vec<MenuUsage> = inner
            .menu_usages
            .values()
            .filter(|u| u.dashboard_id == dashboard_id)
            .filter(|u| match workspace_id {
                Some(ws) => u.workspace_id.is_none() || u.workspace_id == Some(ws),
                None => u.workspace_id.is_none(),
            })
            .cloned()
            .collect();
        // Deterministic result order regardless of map iteration
        usages.sort_by(|a, b| (a.order_index, a.id).cmp(&(b.order_index, b.id)));
        Ok(usages)
    }

    async fn list_menu_items(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.menu_items.get(id).cloned())
            .collect())
    }

    async fn list_menu_permissions(
        &self,
        menu_ids: &[Uuid],
    ) -> Result<Vec<MenuPermission>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<MenuPermission> = inner
            .menu_permissions
            .values()
            .filter(|p| menu_ids.contains(&p.menu_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.menu_id, a.id).cmp(&(b.menu_id, b.id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::models::{PermissionType, Workspace};

    #[tokio::test]
    async fn workspace_name_unique_per_dashboard() {
        let store = InMemoryEntityStore::new();
        let dash = store
            .insert_dashboard(Dashboard::new("Primary", Uuid::new_v4()))
            .await
            .unwrap();
        store.insert_workspace(Workspace::new("Ops", dash)).await.unwrap();
        let err = store.insert_workspace(Workspace::new("Ops", dash)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "workspace", .. }));
    }

    #[tokio::test]
    async fn menu_title_unique_per_parent_but_not_across_parents() {
        let store = InMemoryEntityStore::new();
        let a = store.insert_menu_item(MenuItem::new("Reports")).await.unwrap();
        let b = store.insert_menu_item(MenuItem::new("Archive")).await.unwrap();
        store
            .insert_menu_item(MenuItem::new("Monthly").with_parent(a))
            .await
            .unwrap();
        // Same title under a different parent is fine
        store
            .insert_menu_item(MenuItem::new("Monthly").with_parent(b))
            .await
            .unwrap();
        let err = store
            .insert_menu_item(MenuItem::new("Monthly").with_parent(a))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "menu item", .. }));
    }

    #[tokio::test]
    async fn reparent_rejects_cycles() {
        let store = InMemoryEntityStore::new();
        let a = store.insert_menu_item(MenuItem::new("A")).await.unwrap();
        let b = store.insert_menu_item(MenuItem::new("B").with_parent(a)).await.unwrap();
        let c = store.insert_menu_item(MenuItem::new("C").with_parent(b)).await.unwrap();

        // A -> C would close A -> B -> C -> A
        let err = store.set_menu_item_parent(a, Some(c)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));

        // Self-parent is the degenerate cycle
        let err = store.set_menu_item_parent(a, Some(a)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));

        // Legitimate re-parent still works
        store.set_menu_item_parent(c, Some(a)).await.unwrap();
    }

    #[tokio::test]
    async fn usage_unique_per_scope() {
        let store = InMemoryEntityStore::new();
        let dash = store
            .insert_dashboard(Dashboard::new("Primary", Uuid::new_v4()))
            .await
            .unwrap();
        let menu = store.insert_menu_item(MenuItem::new("Overview")).await.unwrap();
        store.insert_menu_usage(MenuUsage::new(menu, dash, 0)).await.unwrap();
        let err = store
            .insert_menu_usage(MenuUsage::new(menu, dash, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "menu usage", .. }));
    }

    #[tokio::test]
    async fn usage_rejects_foreign_workspace() {
        let store = InMemoryEntityStore::new();
        let owner = Uuid::new_v4();
        let dash_a = store.insert_dashboard(Dashboard::new("A", owner)).await.unwrap();
        let dash_b = store.insert_dashboard(Dashboard::new("B", owner)).await.unwrap();
        let ws_b = store.insert_workspace(Workspace::new("Ops", dash_b)).await.unwrap();
        let menu = store.insert_menu_item(MenuItem::new("Overview")).await.unwrap();

        let err = store
            .insert_menu_usage(MenuUsage::new(menu, dash_a, 0).in_workspace(ws_b))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn dashboard_delete_cascades_workspaces_and_usages() {
        let store = InMemoryEntityStore::new();
        let dash = store
            .insert_dashboard(Dashboard::new("Primary", Uuid::new_v4()))
            .await
            .unwrap();
        let ws = store.insert_workspace(Workspace::new("Ops", dash)).await.unwrap();
        let menu = store.insert_menu_item(MenuItem::new("Overview")).await.unwrap();
        store.insert_menu_usage(MenuUsage::new(menu, dash, 0)).await.unwrap();
        store
            .insert_menu_usage(MenuUsage::new(menu, dash, 0).in_workspace(ws))
            .await
            .unwrap();
        store
            .insert_menu_permission(MenuPermission::for_user(
                menu,
                Uuid::new_v4(),
                PermissionType::View,
            ))
            .await
            .unwrap();

        store.remove_dashboard(dash).await.unwrap();

        assert!(store.get_workspace(ws).await.unwrap().is_none());
        assert!(store.list_menu_usages(dash, None).await.unwrap().is_empty());
        // Permissions have no cascade: the grant survives the dashboard
        assert_eq!(store.list_menu_permissions(&[menu]).await.unwrap().len(), 1);
    }
}
