use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Associates a menu item with a dashboard (`workspace_id` = None) or a
/// workspace within that dashboard. `(menu_id, dashboard_id, workspace_id)`
/// is unique; `order_index` defines sibling ordering, ties break by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuUsage {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub dashboard_id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

impl MenuUsage {
    pub fn new(menu_id: Uuid, dashboard_id: Uuid, order_index: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            menu_id,
            dashboard_id,
            workspace_id: None,
            order_index,
            created_at: Utc::now(),
        }
    }

    pub fn in_workspace(mut self, workspace_id: Uuid) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }
}
