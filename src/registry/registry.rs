use std::collections::HashMap;

use crate::registry::error::RegistryError;
use crate::registry::loader::ManifestLoader;
use crate::registry::manifest::{FeatureKind, FeatureManifest};

/// Immutable catalog of available features, built once at process start.
/// There is no mutation API: registration is a load-time concern of the
/// module loader, which keeps request-time resolution a pure lookup.
#[derive(Debug)]
pub struct FeatureRegistry {
    static_catalog: HashMap<String, FeatureManifest>,
    dynamic_catalog: HashMap<String, FeatureManifest>,
}

impl FeatureRegistry {
    pub async fn from_loader(loader: &dyn ManifestLoader) -> Result<Self, RegistryError> {
        let static_manifests = loader.load_static_manifests().await?;
        let dynamic_manifests = loader.load_dynamic_manifests().await?;
        Self::from_manifests(static_manifests, dynamic_manifests)
    }

    pub fn from_manifests(
        static_manifests: Vec<FeatureManifest>,
        dynamic_manifests: Vec<FeatureManifest>,
    ) -> Result<Self, RegistryError> {
        let static_catalog = Self::index(static_manifests, FeatureKind::Static)?;
        let dynamic_catalog = Self::index(dynamic_manifests, FeatureKind::Dynamic)?;
        tracing::info!(
            static_features = static_catalog.len(),
            dynamic_features = dynamic_catalog.len(),
            "feature registry built"
        );
        Ok(Self { static_catalog, dynamic_catalog })
    }

    pub fn empty() -> Self {
        Self { static_catalog: HashMap::new(), dynamic_catalog: HashMap::new() }
    }

    fn index(
        manifests: Vec<FeatureManifest>,
        kind: FeatureKind,
    ) -> Result<HashMap<String, FeatureManifest>, RegistryError> {
        let mut catalog = HashMap::with_capacity(manifests.len());
        for manifest in manifests {
            if catalog.contains_key(&manifest.url) {
                return Err(RegistryError::DuplicateUrl { kind, url: manifest.url });
            }
            catalog.insert(manifest.url.clone(), manifest);
        }
        Ok(catalog)
    }

    pub fn find_static(&self, url: &str) -> Option<&FeatureManifest> {
        self.static_catalog.get(url)
    }

    pub fn find_dynamic(&self, url: &str) -> Option<&FeatureManifest> {
        self.dynamic_catalog.get(url)
    }

    /// Lookup across both catalogs, static first. Statically bundled
    /// features are never shadowed by a dynamic one with the same slug.
    pub fn find(&self, url: &str) -> Option<&FeatureManifest> {
        self.find_static(url).or_else(|| self.find_dynamic(url))
    }

    /// All manifests, static catalog first, each catalog sorted by url.
    pub fn list_features(&self) -> Vec<&FeatureManifest> {
        let mut statics: Vec<&FeatureManifest> = self.static_catalog.values().collect();
        statics.sort_by(|a, b| a.url.cmp(&b.url));
        let mut dynamics: Vec<&FeatureManifest> = self.dynamic_catalog.values().collect();
        dynamics.sort_by(|a, b| a.url.cmp(&b.url));
        statics.into_iter().chain(dynamics).collect()
    }

    pub fn len(&self) -> usize {
        self.static_catalog.len() + self.dynamic_catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.static_catalog.is_empty() && self.dynamic_catalog.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_url_within_a_catalog_fails_construction() {
        let err = FeatureRegistry::from_manifests(
            vec![
                FeatureManifest::new("Overview", "overview"),
                FeatureManifest::new("Overview v2", "overview"),
            ],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateUrl { kind: FeatureKind::Static, .. }
        ));
    }

    #[test]
    fn same_url_across_catalogs_is_allowed() {
        let registry = FeatureRegistry::from_manifests(
            vec![FeatureManifest::new("Overview", "overview")],
            vec![FeatureManifest::new("Overview plugin", "overview").dynamic()],
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("overview").unwrap().title, "Overview");
    }

    #[test]
    fn list_features_orders_static_then_dynamic() {
        let registry = FeatureRegistry::from_manifests(
            vec![
                FeatureManifest::new("B", "b"),
                FeatureManifest::new("A", "a"),
            ],
            vec![FeatureManifest::new("C", "c").dynamic()],
        )
        .unwrap();
        let urls: Vec<&str> = registry.list_features().iter().map(|m| m.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }
}
