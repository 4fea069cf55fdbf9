/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The (dashboard, workspace?) pair that selects which menu usages apply.
/// A scope with no workspace is the dashboard's own menu view; a scope with
/// a workspace is that workspace's view merged with the dashboard's
/// global-context items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub dashboard_id: Uuid,
    pub workspace_id: Option<Uuid>,
}

impl Scope {
    pub fn dashboard(dashboard_id: Uuid) -> Self {
        Self { dashboard_id, workspace_id: None }
    }

    pub fn workspace(dashboard_id: Uuid, workspace_id: Uuid) -> Self {
        Self { dashboard_id, workspace_id: Some(workspace_id) }
    }

    pub fn is_workspace(&self) -> bool {
        self.workspace_id.is_some()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.workspace_id {
            Some(ws) => write!(f, "{}/{}", self.dashboard_id, ws),
            None => write!(f, "{}", self.dashboard_id),
        }
    }
}
