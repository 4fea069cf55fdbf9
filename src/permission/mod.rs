use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::entity::models::{MenuPermission, PermissionSubject};
use crate::resolver::{ResolvedForest, ResolvedNode};

/// The caller a tree is being filtered for.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub role_ids: HashSet<Uuid>,
}

impl Principal {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id, role_ids: HashSet::new() }
    }

    pub fn with_roles(user_id: Uuid, roles: impl IntoIterator<Item = Uuid>) -> Self {
        Self { user_id, role_ids: roles.into_iter().collect() }
    }

    pub fn has_role(&self, role_id: Uuid) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Permission rows grouped by menu id. Built once per request from the
/// batched `list_menu_permissions` fetch; this is the only place visibility
/// semantics are decided.
#[derive(Debug, Default)]
pub struct GrantIndex {
    by_menu: HashMap<Uuid, Vec<MenuPermission>>,
}

impl GrantIndex {
    pub fn from_rows(rows: Vec<MenuPermission>) -> Self {
        let mut by_menu: HashMap<Uuid, Vec<MenuPermission>> = HashMap::new();
        for row in rows {
            by_menu.entry(row.menu_id).or_default().push(row);
        }
        Self { by_menu }
    }

    pub fn is_empty(&self) -> bool {
        self.by_menu.is_empty()
    }

    /// The visibility law. A menu with no rows at all is visible to everyone
    /// (default-open). When rows exist, a user-level row for this principal
    /// overrides every role-level row for the same menu; otherwise the
    /// principal's roles are consulted. When rows exist but none address
    /// this principal, the menu stays hidden.
    pub fn allows(&self, menu_id: Uuid, principal: &Principal) -> bool {
        let rows = match self.by_menu.get(&menu_id) {
            Some(rows) if !rows.is_empty() => rows,
            _ => return true,
        };

        let mut saw_user_row = false;
        let mut user_allows = false;
        for row in rows {
            if row.subject == PermissionSubject::User(principal.user_id) {
                saw_user_row = true;
                user_allows |= row.permission_type.allows_view();
            }
        }
        if saw_user_row {
            return user_allows;
        }

        rows.iter().any(|row| match row.subject {
            PermissionSubject::Role(role_id) => {
                principal.has_role(role_id) && row.permission_type.allows_view()
            }
            PermissionSubject::User(_) => false,
        })
    }
}

/// Prune a resolved forest down to what the principal may see.
///
/// Pruning is structural: an invisible parent drops its whole subtree, while
/// a visible parent with no visible children remains (it may still be a
/// navigable leaf via its own target). Pure and idempotent; re-run per
/// principal on every request, never cached.
pub fn filter_forest(
    forest: &ResolvedForest,
    principal: &Principal,
    grants: &GrantIndex,
) -> ResolvedForest {
    ResolvedForest { roots: filter_nodes(&forest.roots, principal, grants) }
}

fn filter_nodes(
    nodes: &[ResolvedNode],
    principal: &Principal,
    grants: &GrantIndex,
) -> Vec<ResolvedNode> {
    nodes
        .iter()
        .filter(|node| grants.allows(node.menu_id, principal))
        .map(|node| ResolvedNode {
            children: filter_nodes(&node.children, principal, grants),
            ..node.clone()
        })
        .collect()
}
