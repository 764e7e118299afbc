//! Vault access - the loader seam and the forbidden keyword collector.

mod keywords;
mod loader;

pub use keywords::*;
pub use loader::*;
