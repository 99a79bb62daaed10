//! Interactive card board.
//!
//! Tracks which card is expanded (at most one) and when the expanded card's
//! stories become visible. Story blocks are only available once the expand
//! animation has finished.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::domain::Tip;

/// Result of clicking a card's expand control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Card opened; any other open card was closed
    Expanded,

    /// Card was open and is now closed
    Collapsed,

    /// Card has no stories and cannot expand
    NoStories,

    /// No card for that tip number
    NotFound,
}

/// Expand/collapse state over the expanded tips
#[derive(Debug, Clone)]
pub struct Board {
    tips: Vec<Tip>,
    expanded: Option<u32>,
    ready_at: Option<Instant>,
    expand_delay: Duration,
}

impl Board {
    /// Create a board with every card collapsed
    pub fn new(tips: Vec<Tip>, expand_delay: Duration) -> Self {
        Self {
            tips,
            expanded: None,
            ready_at: None,
            expand_delay,
        }
    }

    pub fn tips(&self) -> &[Tip] {
        &self.tips
    }

    pub fn tip(&self, number: u32) -> Option<&Tip> {
        self.tips.iter().find(|t| t.number == number)
    }

    /// Currently expanded card
    pub fn expanded(&self) -> Option<u32> {
        self.expanded
    }

    pub fn is_expanded(&self, number: u32) -> bool {
        self.expanded == Some(number)
    }

    /// Click on a card's expand control
    pub fn toggle(&mut self, number: u32, now: Instant) -> Toggle {
        if self.is_expanded(number) {
            self.collapse_all();
            return Toggle::Collapsed;
        }

        match self.tip(number) {
            None => Toggle::NotFound,
            Some(tip) if !tip.has_stories() => Toggle::NoStories,
            Some(_) => {
                self.open(number, now);
                Toggle::Expanded
            }
        }
    }

    /// Open a card unless it already is; returns whether the card is open
    pub fn expand(&mut self, number: u32, now: Instant) -> bool {
        if self.is_expanded(number) {
            return true;
        }

        match self.tip(number) {
            Some(tip) if tip.has_stories() => {
                self.open(number, now);
                true
            }
            _ => false,
        }
    }

    pub fn collapse_all(&mut self) {
        if let Some(number) = self.expanded.take() {
            debug!(tip = number, "Collapsed card");
        }
        self.ready_at = None;
    }

    /// Whether the card's stories are visible at `now`
    pub fn is_ready(&self, number: u32, now: Instant) -> bool {
        self.is_expanded(number) && self.ready_at.map_or(false, |at| now >= at)
    }

    fn open(&mut self, number: u32, now: Instant) {
        self.collapse_all();
        self.expanded = Some(number);
        self.ready_at = Some(now + self.expand_delay);
        debug!(tip = number, "Expanded card");
    }
}
