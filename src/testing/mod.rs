use uuid::Uuid;

use crate::entity::memory::InMemoryEntityStore;
use crate::entity::models::{Dashboard, MenuItem, MenuUsage, Workspace};

/// Unit-test fixture: one dashboard with helpers for growing a menu tree
/// around it. Panics on invariant violations — a broken fixture is a broken
/// test.
pub struct Fixture {
    pub store: InMemoryEntityStore,
    pub dashboard_id: Uuid,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = InMemoryEntityStore::new();
        let dashboard_id = store
            .insert_dashboard(Dashboard::new("Primary", Uuid::new_v4()))
            .await
            .expect("fixture dashboard");
        Self { store, dashboard_id }
    }

    pub async fn workspace(&self, name: &str) -> Uuid {
        self.store
            .insert_workspace(Workspace::new(name, self.dashboard_id))
            .await
            .expect("fixture workspace")
    }

    pub async fn menu(&self, title: &str, target: &str) -> Uuid {
        self.store
            .insert_menu_item(MenuItem::new(title).with_target(target))
            .await
            .expect("fixture menu item")
    }

    pub async fn global_menu(&self, title: &str, target: &str) -> Uuid {
        self.store
            .insert_menu_item(MenuItem::new(title).with_target(target).global())
            .await
            .expect("fixture menu item")
    }

    pub async fn child_menu(&self, title: &str, target: &str, parent: Uuid) -> Uuid {
        self.store
            .insert_menu_item(MenuItem::new(title).with_target(target).with_parent(parent))
            .await
            .expect("fixture menu item")
    }

    pub async fn usage(&self, menu: Uuid, order: i32) -> Uuid {
        self.store
            .insert_menu_usage(MenuUsage::new(menu, self.dashboard_id, order))
            .await
            .expect("fixture usage")
    }

    pub async fn workspace_usage(&self, menu: Uuid, workspace: Uuid, order: i32) -> Uuid {
        self.store
            .insert_menu_usage(
                MenuUsage::new(menu, self.dashboard_id, order).in_workspace(workspace),
            )
            .await
            .expect("fixture usage")
    }
}
