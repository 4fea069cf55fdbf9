use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::models::{Dashboard, MenuItem, MenuPermission, MenuUsage, Workspace};

/// Errors from an entity store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate {entity}: {detail}")]
    Duplicate { entity: &'static str, detail: String },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Read surface the resolution engine consumes. Writes are owned by external
/// CRUD/admin surfaces; "not found" is `Ok(None)`, `StoreError` is reserved
/// for backend failures and invariant violations on write paths.
///
/// Implementations must be safe for concurrent reads.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_dashboard(&self, id: Uuid) -> Result<Option<Dashboard>, StoreError>;

    async fn get_workspace(&self, id: Uuid) -> Result<Option<Workspace>, StoreError>;

    /// Usage rows for a scope. With `workspace_id = None` this returns only
    /// the dashboard-level rows. With a workspace id it returns that
    /// workspace's rows plus all dashboard-level rows; the tree builder
    /// decides which dashboard-level rows apply to the workspace view.
    async fn list_menu_usages(
        &self,
        dashboard_id: Uuid,
        workspace_id: Option<Uuid>,
    ) -> Result<Vec<MenuUsage>, StoreError>;

    /// Batched menu item lookup. Unknown ids are silently absent from the
    /// result; the caller decides whether that is an integrity problem.
    async fn list_menu_items(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, StoreError>;

    /// All permission rows for the given menus, in one batched call.
    async fn list_menu_permissions(
        &self,
        menu_ids: &[Uuid],
    ) -> Result<Vec<MenuPermission>, StoreError>;
}
