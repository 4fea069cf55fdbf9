use serde::Serialize;
use uuid::Uuid;

use crate::entity::models::MenuItemKind;

/// A single entry in the assembled menu tree. Children are always sorted by
/// `(order_index, usage_id)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuNode {
    pub menu_id: Uuid,
    pub usage_id: Uuid,
    pub title: String,
    pub kind: MenuItemKind,
    pub icon: Option<String>,
    pub target: Option<String>,
    pub order_index: i32,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Depth-first search by title, self included.
    pub fn find(&self, title: &str) -> Option<&MenuNode> {
        if self.title == title {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(title))
    }
}

/// An ordered forest of menu nodes: the root list obeys the same
/// `(order_index, usage_id)` ordering as every `children` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuForest {
    pub roots: Vec<MenuNode>,
}

impl MenuForest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total node count across the whole forest.
    pub fn len(&self) -> usize {
        fn count(nodes: &[MenuNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    pub fn find(&self, title: &str) -> Option<&MenuNode> {
        self.roots.iter().find_map(|root| root.find(title))
    }

    /// Every menu id in the forest, depth-first.
    pub fn menu_ids(&self) -> Vec<Uuid> {
        fn walk(nodes: &[MenuNode], out: &mut Vec<Uuid>) {
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
