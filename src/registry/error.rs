use thiserror::Error;

use crate::registry::manifest::FeatureKind;

/// Registry construction is fail-fast: any of these at startup must prevent
/// the process from serving requests with an inconsistent catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate feature url '{url}' in {kind:?} catalog")]
    DuplicateUrl { kind: FeatureKind, url: String },

    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {message}")]
    Parse { path: String, message: String },
}
