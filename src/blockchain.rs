// Thin re-export module: block structure, chain management and validation
// live in separate files under `blockchain/`.

pub mod block;
pub mod chain;
pub mod validation;

pub use block::*;
pub use chain::*;
pub use validation::*;
