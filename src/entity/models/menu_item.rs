use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a menu entry. Carried through to the renderer, never interpreted
/// by the resolution engine itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    #[default]
    Item,
    Group,
    Link,
}

/// A reusable menu definition. `target` is the slug used to resolve a
/// feature; `parent_id` forms a tree. `(title, parent_id)` is unique,
/// including the "no parent" case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub title: String,
    pub kind: MenuItemKind,
    pub icon: Option<String>,
    pub target: Option<String>,
    pub parent_id: Option<Uuid>,
    /// Merged into every workspace view under the owning dashboard,
    /// regardless of per-workspace usage rows.
    pub global_context: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            kind: MenuItemKind::Item,
            icon: None,
            target: None,
            parent_id: None,
            global_context: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn global(mut self) -> Self {
        self.global_context = true;
        self
    }
}
