use thiserror::Error;
use uuid::Uuid;

use crate::entity::store::StoreError;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Dashboard not found: {0}")]
    DashboardNotFound(Uuid),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(Uuid),

    #[error("Workspace {workspace_id} does not belong to dashboard {dashboard_id}")]
    ScopeMismatch { workspace_id: Uuid, dashboard_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}
