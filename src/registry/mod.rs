pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use error::RegistryError;
pub use loader::{CatalogDirLoader, FixedCatalogLoader, ManifestLoader};
pub use manifest::{FeatureKind, FeatureManifest};
pub use registry::FeatureRegistry;
