pub mod memory;
pub mod models;
pub mod seed;
pub mod store;

pub use memory::InMemoryEntityStore;
pub use store::{EntityStore, StoreError};
