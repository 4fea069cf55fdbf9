use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grant level for a menu entry. `Full` implies `View`; `None` is an
/// explicit deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    None,
    View,
    Full,
}

impl PermissionType {
    pub fn allows_view(&self) -> bool {
        !matches!(self, PermissionType::None)
    }
}

/// The principal a grant addresses. A grant is either per-user or per-role,
/// never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionSubject {
    User(Uuid),
    Role(Uuid),
}

/// A visibility grant on a menu entry, owned by the `(menu_id, subject)`
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPermission {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub subject: PermissionSubject,
    pub permission_type: PermissionType,
    pub created_at: DateTime<Utc>,
}

impl MenuPermission {
    pub fn new(menu_id: Uuid, subject: PermissionSubject, permission_type: PermissionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            menu_id,
            subject,
            permission_type,
            created_at: Utc::now(),
        }
    }

    pub fn for_user(menu_id: Uuid, user_id: Uuid, permission_type: PermissionType) -> Self {
        Self::new(menu_id, PermissionSubject::User(user_id), permission_type)
    }

    pub fn for_role(menu_id: Uuid, role_id: Uuid, permission_type: PermissionType) -> Self {
        Self::new(menu_id, PermissionSubject::Role(role_id), permission_type)
    }
}
