pub mod dashboard;
pub mod menu_item;
pub mod menu_permission;
pub mod menu_usage;
pub mod workspace;

pub use dashboard::Dashboard;
pub use menu_item::{MenuItem, MenuItemKind};
pub use menu_permission::{MenuPermission, PermissionSubject, PermissionType};
pub use menu_usage::MenuUsage;
pub use workspace::Workspace;
