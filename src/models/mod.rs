// Re-export all model types
pub use self::cart::*;
pub use self::errors::*;
pub use self::validation::*;

mod cart;
mod errors;
mod validation;
