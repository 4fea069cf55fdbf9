use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::entity::models::{MenuItem, MenuUsage};
use crate::entity::store::EntityStore;
use crate::tree::error::TreeError;
use crate::tree::node::{MenuForest, MenuNode};
use crate::types::Scope;

struct Entry {
    usage: MenuUsage,
    item: MenuItem,
}

/// Assemble the ordered menu forest for a scope.
///
/// Identifier and scope errors are returned to the caller; malformed data
/// (duplicate usages, orphaned usages, parents outside the join, cycles) is
/// recovered in place with a warning. The result never contains a cycle or a
/// duplicate `menu_id`, and every sibling list is sorted by
/// `(order_index, usage_id)`.
pub async fn build_menu_tree(
    store: &dyn EntityStore,
    scope: Scope,
) -> Result<MenuForest, TreeError> {
    store
        .get_dashboard(scope.dashboard_id)
        .await?
        .ok_or(TreeError::DashboardNotFound(scope.dashboard_id))?;
    if let Some(workspace_id) = scope.workspace_id {
        let workspace = store
            .get_workspace(workspace_id)
            .await?
            .ok_or(TreeError::WorkspaceNotFound(workspace_id))?;
        if workspace.dashboard_id != scope.dashboard_id {
            return Err(TreeError::ScopeMismatch {
                workspace_id,
                dashboard_id: scope.dashboard_id,
            });
        }
    }

    let usages = store
        .list_menu_usages(scope.dashboard_id, scope.workspace_id)
        .await?;

    let mut menu_ids: Vec<Uuid> = usages.iter().map(|u| u.menu_id).collect();
    menu_ids.sort();
    menu_ids.dedup();
    let items: HashMap<Uuid, MenuItem> = store
        .list_menu_items(&menu_ids)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut entries: Vec<Entry> = Vec::with_capacity(usages.len());
    for usage in usages {
        let Some(item) = items.get(&usage.menu_id) else {
            tracing::warn!(
                scope = %scope,
                usage_id = %usage.id,
                menu_id = %usage.menu_id,
                "dropping usage of missing menu item"
            );
            continue;
        };
        // A dashboard-level row only joins a workspace view when its item is
        // flagged global-context.
        if scope.workspace_id.is_some() && usage.workspace_id.is_none() && !item.global_context {
            continue;
        }
        entries.push(Entry { usage, item: item.clone() });
    }

    entries.sort_by(|a, b| {
        (a.usage.order_index, a.usage.id).cmp(&(b.usage.order_index, b.usage.id))
    });

    Ok(assemble(scope, entries))
}

/// Collapse each menu id to a single entry, then link parents and break
/// cycles. Input must already be in `(order_index, usage_id)` order.
fn assemble(scope: Scope, entries: Vec<Entry>) -> MenuForest {
    let mut chosen: Vec<Entry> = Vec::with_capacity(entries.len());
    let mut slot_by_menu: HashMap<Uuid, usize> = HashMap::new();
    for entry in entries {
        match slot_by_menu.get(&entry.usage.menu_id).copied() {
            None => {
                slot_by_menu.insert(entry.usage.menu_id, chosen.len());
                chosen.push(entry);
            }
            Some(slot) => {
                let existing_is_workspace = chosen[slot].usage.workspace_id.is_some();
                let incoming_is_workspace = entry.usage.workspace_id.is_some();
                if incoming_is_workspace && !existing_is_workspace {
                    // Workspace row overrides the dashboard-level global row.
                    tracing::debug!(
                        scope = %scope,
                        menu_id = %entry.usage.menu_id,
                        "workspace usage overrides dashboard-level usage"
                    );
                    chosen[slot] = entry;
                } else if !incoming_is_workspace && existing_is_workspace {
                    tracing::debug!(
                        scope = %scope,
                        menu_id = %entry.usage.menu_id,
                        "workspace usage overrides dashboard-level usage"
                    );
                } else {
                    // Should not happen given the per-scope uniqueness
                    // invariant; seed and import paths can still produce it.
                    tracing::warn!(
                        scope = %scope,
                        menu_id = %entry.usage.menu_id,
                        kept_usage_id = %chosen[slot].usage.id,
                        dropped_usage_id = %entry.usage.id,
                        "duplicate menu usage in scope; keeping first by order"
                    );
                }
            }
        }
    }
    // Overrides can replace an early slot with a later-ordered row.
    chosen.sort_by(|a, b| {
        (a.usage.order_index, a.usage.id).cmp(&(b.usage.order_index, b.usage.id))
    });

    let present: HashMap<Uuid, usize> = chosen
        .iter()
        .enumerate()
        .map(|(idx, e)| (e.item.id, idx))
        .collect();
    let mut child_indices: HashMap<Uuid, Vec<usize>> = HashMap::new();
    let mut root_indices: Vec<usize> = Vec::new();
    for (idx, entry) in chosen.iter().enumerate() {
        match entry.item.parent_id {
            Some(parent) if parent == entry.item.id => {
                tracing::warn!(
                    scope = %scope,
                    menu_id = %entry.item.id,
                    "menu item is its own parent; promoting to root"
                );
                root_indices.push(idx);
            }
            Some(parent) if present.contains_key(&parent) => {
                child_indices.entry(parent).or_default().push(idx);
            }
            // No parent, or the parent lives outside this join (legitimate
            // for cross-scope global items): promote to root.
            _ => root_indices.push(idx),
        }
    }

    let mut visited: HashSet<Uuid> = HashSet::with_capacity(chosen.len());
    let mut roots: Vec<MenuNode> = Vec::new();
    for idx in root_indices {
        roots.push(attach(scope, idx, &chosen, &child_indices, &mut visited));
    }
    // Anything still unvisited sits on a parent cycle. Promote the first
    // node in sibling order; the traversal drops the edge that closes the
    // loop.
    for idx in 0..chosen.len() {
        if !visited.contains(&chosen[idx].item.id) {
            tracing::warn!(
                scope = %scope,
                menu_id = %chosen[idx].item.id,
                title = %chosen[idx].item.title,
                "parent cycle detected; promoting menu item to root"
            );
            roots.push(attach(scope, idx, &chosen, &child_indices, &mut visited));
        }
    }

    roots.sort_by(|a, b| (a.order_index, a.usage_id).cmp(&(b.order_index, b.usage_id)));
    MenuForest { roots }
}

fn attach(
    scope: Scope,
    idx: usize,
    entries: &[Entry],
    child_indices: &HashMap<Uuid, Vec<usize>>,
    visited: &mut HashSet<Uuid>,
) -> MenuNode {
    let entry = &entries[idx];
    visited.insert(entry.item.id);
    let mut node = MenuNode {
        menu_id: entry.item.id,
        usage_id: entry.usage.id,
        title: entry.item.title.clone(),
        kind: entry.item.kind,
        icon: entry.item.icon.clone(),
        target: entry.item.target.clone(),
        order_index: entry.usage.order_index,
        children: Vec::new(),
    };
    if let Some(children) = child_indices.get(&entry.item.id) {
        for &child_idx in children {
            let child = &entries[child_idx];
            if visited.contains(&child.item.id) {
                tracing::warn!(
                    scope = %scope,
                    parent_id = %entry.item.id,
                    child_id = %child.item.id,
                    "dropping cycle-forming menu edge"
                );
                continue;
            }
            node.children.push(attach(scope, child_idx, entries, child_indices, visited));
        }
    }
    node
}
