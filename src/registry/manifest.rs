use serde::{Deserialize, Serialize};

/// How a feature was made available: bundled with the application, or
/// discovered at startup by the module loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    #[default]
    Static,
    Dynamic,
}

/// Describes a routable feature slice available to bind to a menu target.
/// Assembled at process start; never persisted. `url` is the slug menu
/// targets resolve against, unique within each catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureManifest {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Stamped by the loader from the catalog the manifest came from.
    #[serde(default)]
    pub feature_kind: FeatureKind,
}

impl FeatureManifest {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: None,
            description: None,
            feature_kind: FeatureKind::Static,
        }
    }

    pub fn dynamic(mut self) -> Self {
        self.feature_kind = FeatureKind::Dynamic;
        self
    }
}
