//! Domain types for the cheatsheet.
//!
//! This module contains the core data structures:
//! - Tips: numbered entries, raw and expanded
//! - Stories: raw stories and their placed copies

pub mod story;
pub mod tip;

// Re-export commonly used types
pub use story::{Placement, RawStory, Story, StoryKey};
pub use tip::{RawTip, Tip};
