use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::error::RegistryError;
use crate::registry::manifest::{FeatureKind, FeatureManifest};

/// Source of feature manifests, consumed once at process start. The static
/// and dynamic catalogs are disjoint by construction; actual code loading of
/// a feature's implementation is the rendering layer's concern, never this
/// crate's.
#[async_trait]
pub trait ManifestLoader: Send + Sync {
    async fn load_static_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError>;
    async fn load_dynamic_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError>;
}

/// Loader over two directories of manifest files (`.yaml`, `.yml` or
/// `.json`), one per catalog. A missing directory is an empty catalog, not
/// an error; unparseable files are configuration errors and fail the load.
pub struct CatalogDirLoader {
    static_dir: PathBuf,
    dynamic_dir: PathBuf,
}

impl CatalogDirLoader {
    pub fn new(static_dir: impl Into<PathBuf>, dynamic_dir: impl Into<PathBuf>) -> Self {
        Self { static_dir: static_dir.into(), dynamic_dir: dynamic_dir.into() }
    }

    fn scan(dir: &Path, kind: FeatureKind) -> Result<Vec<FeatureManifest>, RegistryError> {
        if !dir.exists() {
            tracing::debug!("manifest directory {} missing; empty {:?} catalog", dir.display(), kind);
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        // Filesystem order is not deterministic
        paths.sort();

        let mut manifests = Vec::with_capacity(paths.len());
        for path in paths {
            let display = path.display().to_string();
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let content = fs::read_to_string(&path)
                .map_err(|source| RegistryError::Io { path: display.clone(), source })?;
            let mut manifest: FeatureManifest = match extension {
                "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| {
                    RegistryError::Parse { path: display.clone(), message: e.to_string() }
                })?,
                "json" => serde_json::from_str(&content).map_err(|e| {
                    RegistryError::Parse { path: display.clone(), message: e.to_string() }
                })?,
                _ => {
                    let skipped = &display;
                    tracing::debug!("skipping non-manifest file {skipped}");
                    continue;
                }
            };
            manifest.feature_kind = kind;
            manifests.push(manifest);
        }
        Ok(manifests)
    }
}

#[async_trait]
impl ManifestLoader for CatalogDirLoader {
    async fn load_static_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError> {
        Self::scan(&self.static_dir, FeatureKind::Static)
    }

    async fn load_dynamic_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError> {
        Self::scan(&self.dynamic_dir, FeatureKind::Dynamic)
    }
}

/// Loader over fixed in-process lists. The embedding application's module
/// loader typically supplies this after doing its own discovery.
#[derive(Default)]
pub struct FixedCatalogLoader {
    static_manifests: Vec<FeatureManifest>,
    dynamic_manifests: Vec<FeatureManifest>,
}

impl FixedCatalogLoader {
    pub fn new(
        static_manifests: Vec<FeatureManifest>,
        dynamic_manifests: Vec<FeatureManifest>,
    ) -> Self {
        Self { static_manifests, dynamic_manifests }
    }
}

#[async_trait]
impl ManifestLoader for FixedCatalogLoader {
    async fn load_static_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError> {
        let mut manifests = self.static_manifests.clone();
        for manifest in &mut manifests {
            manifest.feature_kind = FeatureKind::Static;
        }
        Ok(manifests)
    }

    async fn load_dynamic_manifests(&self) -> Result<Vec<FeatureManifest>, RegistryError> {
        let mut manifests = self.dynamic_manifests.clone();
        for manifest in &mut manifests {
            manifest.feature_kind = FeatureKind::Dynamic;
        }
        Ok(manifests)
    }
}
