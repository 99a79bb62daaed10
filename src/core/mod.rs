//! Core cheatsheet logic.
//!
//! This module contains:
//! - Redistribute: story placement onto home and related tips
//! - Resolver: mapping a clicked reference to a story instance
//!
//! Nothing here depends on rendering or navigation.

pub mod redistribute;
pub mod resolver;

// Re-export commonly used types
pub use redistribute::{expand, expand_with_stats, normalize_related, ExpansionStats};
pub use resolver::{resolve, Reference, Resolution};
