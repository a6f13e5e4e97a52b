// Repositories module - cart persistence layer

pub mod cart_repository;


pub use cart_repository::{CartRepository, StorageCartRepository, DEFAULT_CART_STORAGE_KEY};
