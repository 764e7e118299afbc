//! Review - result models for the reviewer and quality agents, extraction
//! of those results from raw LLM output, and the algorithmic review that
//! runs before any agent sees a draft.

mod algorithmic;
mod extract;
mod models;

pub use algorithmic::*;
pub use extract::*;
pub use models::*;
