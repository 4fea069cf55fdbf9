use thiserror::Error;

use crate::entity::store::StoreError;
use crate::registry::error::RegistryError;
use crate::tree::error::TreeError;

/// Crate-level error for callers driving the whole pipeline. Identifier and
/// scope failures must reach the caller; integrity issues never surface here
/// (they are recovered in place with a warning), and registry errors only
/// occur at startup.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Stable code for client handling
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Tree(TreeError::DashboardNotFound(_)) => "DASHBOARD_NOT_FOUND",
            EngineError::Tree(TreeError::WorkspaceNotFound(_)) => "WORKSPACE_NOT_FOUND",
            EngineError::Tree(TreeError::ScopeMismatch { .. }) => "SCOPE_MISMATCH",
            EngineError::Tree(TreeError::Store(_)) => "STORE_ERROR",
            EngineError::Registry(_) => "CONFIGURATION_ERROR",
            EngineError::Store(_) => "STORE_ERROR",
        }
    }
}
