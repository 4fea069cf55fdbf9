pub mod builder;
pub mod error;
pub mod node;

pub use builder::build_menu_tree;
pub use error::TreeError;
pub use node::{MenuForest, MenuNode};
