//! cheatsheet - Tip cards with cross-referenced stories
//!
//! Loads a static list of numbered tips, each with user-submitted stories,
//! and presents every story both on its home tip and on each tip it
//! references.
//!
//! # Architecture
//!
//! Data flows one way:
//! - The loader reads and parses the tip document once
//! - Redistribution builds the expanded view from scratch
//! - The view renders cards and follows cross-references
//!
//! # Modules
//!
//! - `domain`: Data structures (RawTip, Tip, Story)
//! - `core`: Redistribution and reference resolution (no UI)
//! - `loader`: Reading the tip document from a file or URL
//! - `view`: HTML rendering, card board, navigation
//! - `app`: The owned session tying these together
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Render the card page
//! cheatsheet render --source data/tips.json --output site/index.html
//!
//! # Inspect one tip's stories
//! cheatsheet show 12
//!
//! # Follow the "Tip #4" reference shown on tip 12
//! cheatsheet navigate 4 --from 12
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod loader;
pub mod view;

// Re-export main types at crate root for convenience
pub use app::Cheatsheet;
pub use crate::core::{expand, resolve, Reference, Resolution};
pub use domain::{Placement, RawStory, RawTip, Story, StoryKey, Tip};
pub use loader::{LoadError, LoaderSettings, Source};
pub use view::{Board, NavigationSettings, Navigator, Outcome, Surface};
