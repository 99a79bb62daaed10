//! Presentation of the expanded view.
//!
//! - Render: static HTML card page
//! - Board: expand/collapse state, one card open at a time
//! - Navigate: following cross-references to story instances
//!
//! Everything here consumes expanded tips; nothing writes tip data.

pub mod board;
pub mod navigate;
pub mod render;

pub use board::{Board, Toggle};
pub use navigate::{LogSurface, NavigationSettings, Navigator, Outcome, Surface, Wait, WaitPolicy};
pub use render::{render_error_page, render_page, PageOptions};
