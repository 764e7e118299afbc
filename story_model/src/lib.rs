//! # Story Model
//!
//! The "Story Bible" crate - the data model behind AI information control.
//! It describes what the drafting model may know about a work: visibility
//! levels, secrets, per-section visibility configuration, and foreshadowings
//! with their state machine. This crate performs no I/O and contains no
//! filtering logic.

pub mod episode;
pub mod error;
pub mod foreshadowing;
pub mod visibility;

pub use episode::*;
pub use error::*;
pub use foreshadowing::*;
pub use visibility::*;
