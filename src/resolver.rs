use serde::Serialize;
use uuid::Uuid;

use crate::entity::models::MenuItemKind;
use crate::registry::{FeatureManifest, FeatureRegistry};
use crate::tree::{MenuForest, MenuNode};

/// Outcome of binding a menu node to a feature, decided before any import is
/// attempted. `Unresolved` is a first-class outcome, not an error: the
/// renderer turns it into a "feature unavailable" placeholder. The actual
/// lazy import of a resolved feature's implementation belongs to the
/// rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Resolution {
    Static(FeatureManifest),
    Dynamic(FeatureManifest),
    Unresolved { target: Option<String> },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved { .. })
    }

    pub fn manifest(&self) -> Option<&FeatureManifest> {
        match self {
            Resolution::Static(manifest) | Resolution::Dynamic(manifest) => Some(manifest),
            Resolution::Unresolved { .. } => None,
        }
    }

    /// The resolved feature's url, when there is one.
    pub fn url(&self) -> Option<&str> {
        self.manifest().map(|m| m.url.as_str())
    }
}

/// A menu node annotated with its resolution. What the renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNode {
    pub menu_id: Uuid,
    pub usage_id: Uuid,
    pub title: String,
    pub kind: MenuItemKind,
    pub icon: Option<String>,
    pub order_index: i32,
    pub resolution: Resolution,
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    pub fn find(&self, title: &str) -> Option<&ResolvedNode> {
        if self.title == title {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(title))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedForest {
    pub roots: Vec<ResolvedNode>,
}

impl ResolvedForest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        fn count(nodes: &[ResolvedNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    pub fn find(&self, title: &str) -> Option<&ResolvedNode> {
        self.roots.iter().find_map(|root| root.find(title))
    }

    pub fn menu_ids(&self) -> Vec<Uuid> {
        fn walk(nodes: &[ResolvedNode], out: &mut Vec<Uuid>) {
            for node in nodes {
                out.push(node.menu_id);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }
}

/// Resolve a single node against the registry snapshot: static catalog
/// first, then dynamic, then the unresolved placeholder carrying the
/// original target for diagnostics. Pure; no loading is triggered.
pub fn resolve_node(registry: &FeatureRegistry, node: &MenuNode) -> ResolvedNode {
    let resolution = match node.target.as_deref() {
        Some(target) => {
            if let Some(manifest) = registry.find_static(target) {
                Resolution::Static(manifest.clone())
            } else if let Some(manifest) = registry.find_dynamic(target) {
                Resolution::Dynamic(manifest.clone())
            } else {
                tracing::debug!(menu_id = %node.menu_id, slug = target, "no feature for menu target");
                Resolution::Unresolved { target: Some(target.to_string()) }
            }
        }
        None => Resolution::Unresolved { target: None },
    };
    ResolvedNode {
        menu_id: node.menu_id,
        usage_id: node.usage_id,
        title: node.title.clone(),
        kind: node.kind,
        icon: node.icon.clone(),
        order_index: node.order_index,
        resolution,
        children: node.children.iter().map(|child| resolve_node(registry, child)).collect(),
    }
}

/// Annotate a whole forest. Sibling order is preserved as-is.
pub fn resolve_forest(registry: &FeatureRegistry, forest: &MenuForest) -> ResolvedForest {
    ResolvedForest {
        roots: forest.roots.iter().map(|root| resolve_node(registry, root)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FeatureManifest;

    fn node(title: &str, target: Option<&str>) -> MenuNode {
        MenuNode {
            menu_id: Uuid::new_v4(),
            usage_id: Uuid::new_v4(),
            title: title.to_string(),
            kind: MenuItemKind::Item,
            icon: None,
            target: target.map(str::to_string),
            order_index: 0,
            children: Vec::new(),
        }
    }

    fn registry() -> FeatureRegistry {
        FeatureRegistry::from_manifests(
            vec![FeatureManifest::new("Overview", "overview")],
            vec![
                FeatureManifest::new("Overview plugin", "overview").dynamic(),
                FeatureManifest::new("Reports", "reports").dynamic(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn static_wins_over_dynamic_for_the_same_slug() {
        let resolved = resolve_node(&registry(), &node("Overview", Some("overview")));
        match resolved.resolution {
            Resolution::Static(manifest) => assert_eq!(manifest.title, "Overview"),
            other => panic!("expected static resolution, got {:?}", other),
        }
    }

    #[test]
    fn dynamic_is_used_when_static_has_no_match() {
        let resolved = resolve_node(&registry(), &node("Reports", Some("reports")));
        assert!(matches!(resolved.resolution, Resolution::Dynamic(_)));
    }

    #[test]
    fn unknown_target_resolves_to_unresolved_with_diagnostics() {
        let resolved = resolve_node(&registry(), &node("Billing", Some("billing")));
        match resolved.resolution {
            Resolution::Unresolved { target } => assert_eq!(target.as_deref(), Some("billing")),
            other => panic!("expected unresolved, got {:?}", other),
        }
    }

    #[test]
    fn missing_target_resolves_to_unresolved() {
        let resolved = resolve_node(&registry(), &node("Section", None));
        assert_eq!(resolved.resolution, Resolution::Unresolved { target: None });
        assert!(resolved.resolution.url().is_none());
    }

    #[test]
    fn children_are_resolved_recursively_in_order() {
        let mut parent = node("Parent", Some("overview"));
        parent.children.push(node("First", Some("reports")));
        parent.children.push(node("Second", None));

        let resolved = resolve_node(&registry(), &parent);
        assert_eq!(resolved.children.len(), 2);
        assert_eq!(resolved.children[0].title, "First");
        assert!(resolved.children[0].resolution.is_resolved());
        assert!(!resolved.children[1].resolution.is_resolved());
    }
}
