// Services module - cart state and persistence scheduling

pub mod cart_store;
pub mod persister;

pub use cart_store::CartStore;
pub use persister::Snapshot;
