//! # Info Control
//!
//! The AI information control layer of the fiction pipeline. It sits between
//! the story bible (`story_model`) and the drafting model: scene contexts are
//! filtered before they reach the model, drafts are checked for leaks when
//! they come back, and foreshadowing pacing is tracked across episodes.
//!
//! ## Core Components
//!
//! - **markup**: inline `<!-- ai_visibility: N -->` markers and Obsidian links
//! - **expression_filter**: exact-substring forbidden keyword detection
//! - **context_filter**: per-section visibility applied to a markdown document
//! - **foreshadowing**: registry of foreshadowings and scene instructions
//! - **timeline**: derived cross-episode index for silence/payoff queries
//! - **vault**: loader seam and the forbidden keyword collector
//! - **text_stats**: style metrics over drafts
//! - **review**: review/quality result models, YAML extraction, algorithmic review
//! - **controller**: the facade tying the pieces together per scene
//!
//! Every operation is synchronous and returns a new value; the only I/O goes
//! through an injected [`VaultLoader`].

pub mod config;
pub mod context_filter;
pub mod controller;
pub mod error;
pub mod expression_filter;
pub mod foreshadowing;
pub mod markup;
pub mod review;
pub mod text_stats;
pub mod timeline;
pub mod vault;

pub use config::*;
pub use context_filter::*;
pub use controller::*;
pub use error::*;
pub use expression_filter::*;
pub use foreshadowing::*;
pub use markup::*;
pub use review::*;
pub use text_stats::*;
pub use timeline::*;
pub use vault::*;
